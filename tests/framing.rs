use json_syntax::{json, Parse, Value};
use lod::{Options, Processor};

fn parse(source: &str) -> Value {
	Value::parse_str(source).unwrap().0
}

fn library() -> Value {
	parse(
		r#"{
			"@context": { "@vocab": "http://example.org/" },
			"@graph": [
				{
					"@id": "http://example.org/book1",
					"@type": "Book",
					"title": "T1",
					"author": { "@id": "http://example.org/person1" }
				},
				{
					"@id": "http://example.org/person1",
					"@type": "Person",
					"name": "N"
				}
			]
		}"#,
	)
}

#[async_std::test]
async fn frames_by_type_with_implicit_embedding() {
	let processor = Processor::no_loader();
	let frame = parse(
		r#"{
			"@context": { "@vocab": "http://example.org/" },
			"@type": "Book"
		}"#,
	);

	let framed = processor
		.frame(&library(), &frame, &Options::default())
		.await
		.unwrap();

	assert_eq!(
		framed,
		json!({
			"@context": { "@vocab": "http://example.org/" },
			"@id": "http://example.org/book1",
			"@type": "Book",
			"author": {
				"@id": "http://example.org/person1",
				"@type": "Person",
				"name": "N"
			},
			"title": "T1"
		})
	);
}

#[async_std::test]
async fn embed_never_produces_references() {
	let processor = Processor::no_loader();
	let frame = parse(
		r#"{
			"@context": { "@vocab": "http://example.org/" },
			"@type": "Book",
			"author": { "@embed": "@never" }
		}"#,
	);

	let framed = processor
		.frame(&library(), &frame, &Options::default())
		.await
		.unwrap();

	assert_eq!(
		framed,
		json!({
			"@context": { "@vocab": "http://example.org/" },
			"@id": "http://example.org/book1",
			"@type": "Book",
			"author": { "@id": "http://example.org/person1" },
			"title": "T1"
		})
	);
}

#[async_std::test]
async fn missing_properties_default_to_null() {
	let processor = Processor::no_loader();
	let frame = parse(
		r#"{
			"@context": { "@vocab": "http://example.org/" },
			"@type": "Book",
			"publisher": {}
		}"#,
	);

	let mut options = Options::default();
	options.explicit = true;

	let framed = processor.frame(&library(), &frame, &options).await.unwrap();

	assert_eq!(
		framed,
		json!({
			"@context": { "@vocab": "http://example.org/" },
			"@id": "http://example.org/book1",
			"@type": "Book",
			"publisher": null
		})
	);
}

#[async_std::test]
async fn frame_defaults_are_injected() {
	let processor = Processor::no_loader();
	let frame = parse(
		r#"{
			"@context": { "@vocab": "http://example.org/" },
			"@type": "Book",
			"edition": { "@default": "first" }
		}"#,
	);

	let mut options = Options::default();
	options.explicit = true;

	let framed = processor.frame(&library(), &frame, &options).await.unwrap();

	assert_eq!(
		framed,
		json!({
			"@context": { "@vocab": "http://example.org/" },
			"@id": "http://example.org/book1",
			"@type": "Book",
			"edition": "first"
		})
	);
}

#[async_std::test]
async fn omit_default_drops_missing_properties() {
	let processor = Processor::no_loader();
	let frame = parse(
		r#"{
			"@context": { "@vocab": "http://example.org/" },
			"@type": "Book",
			"publisher": {}
		}"#,
	);

	let mut options = Options::default();
	options.explicit = true;
	options.omit_default = true;

	let framed = processor.frame(&library(), &frame, &options).await.unwrap();

	assert_eq!(
		framed,
		json!({
			"@context": { "@vocab": "http://example.org/" },
			"@id": "http://example.org/book1",
			"@type": "Book"
		})
	);
}

#[async_std::test]
async fn require_all_restricts_matches() {
	let processor = Processor::no_loader();

	// Both nodes have a type, only the book has a title: with requireAll,
	// a frame asking for both matches the book alone.
	let frame = parse(
		r#"{
			"@context": { "@vocab": "http://example.org/" },
			"@type": {},
			"title": {}
		}"#,
	);

	let mut options = Options::default();
	options.require_all = true;
	options.explicit = true;

	let framed = processor.frame(&library(), &frame, &options).await.unwrap();

	assert_eq!(
		framed,
		json!({
			"@context": { "@vocab": "http://example.org/" },
			"@id": "http://example.org/book1",
			"@type": "Book",
			"title": "T1"
		})
	);
}

#[async_std::test]
async fn wildcard_frame_matches_every_node() {
	let processor = Processor::no_loader();
	let frame = parse(r#"{ "@context": { "@vocab": "http://example.org/" } }"#);

	let framed = processor
		.frame(&library(), &frame, &Options::default())
		.await
		.unwrap();

	// Both nodes match; the book embeds the person, which then appears by
	// reference at the top level.
	let Value::Object(framed) = &framed else {
		panic!("expected an object")
	};

	let graph = framed
		.get_unique("@graph")
		.unwrap()
		.expect("expected a @graph entry");
	assert_eq!(Value::force_as_array(graph).len(), 2);
}
