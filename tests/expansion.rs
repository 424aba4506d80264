use json_syntax::{json, Parse, Value};
use lod::{Options, Processor};
use static_iref::iri;

fn parse(source: &str) -> Value {
	Value::parse_str(source).unwrap().0
}

#[async_std::test]
async fn expands_simple_document() {
	let processor = Processor::no_loader();
	let document = parse(
		r#"{
			"@context": { "name": "http://schema.org/name" },
			"name": "Manu"
		}"#,
	);

	let expanded = processor.expand(&document, &Options::default()).await.unwrap();

	assert_eq!(
		expanded,
		json!([ { "http://schema.org/name": [ { "@value": "Manu" } ] } ])
	);
}

#[async_std::test]
async fn drops_unmapped_keys_and_reports_them() {
	let processor = Processor::no_loader();
	let document = parse(
		r#"{
			"@context": { "name": "http://schema.org/name" },
			"name": "A",
			"foo": "B"
		}"#,
	);

	let mut dropped = Vec::new();
	let mut callback = |key: &str| -> Result<(), lod::expansion::CallbackError> {
		dropped.push(key.to_string());
		Ok(())
	};

	let expanded = processor
		.expand_full(
			&document,
			&Options::default(),
			&mut lod::warning::Log,
			Some(&mut callback),
		)
		.await
		.unwrap();

	assert_eq!(
		expanded,
		json!([ { "http://schema.org/name": [ { "@value": "A" } ] } ])
	);
	assert_eq!(dropped, ["foo"]);
}

#[async_std::test]
async fn key_dropped_callback_aborts_expansion() {
	let processor = Processor::no_loader();
	let document = parse(
		r#"{
			"@context": { "name": "http://schema.org/name" },
			"foo": "B"
		}"#,
	);

	let mut callback =
		|key: &str| -> Result<(), lod::expansion::CallbackError> { Err(key.to_string().into()) };

	let result = processor
		.expand_full(
			&document,
			&Options::default(),
			&mut lod::warning::Log,
			Some(&mut callback),
		)
		.await;

	assert!(result.is_err());
}

#[async_std::test]
async fn resolves_relative_iris_against_base() {
	let processor = Processor::no_loader();
	let document = parse(r#"{ "@id": "c", "@type": "T" }"#);

	let options = Options::with_base(iri!("http://example.org/a/b").to_owned());
	let expanded = processor.expand(&document, &options).await.unwrap();

	assert_eq!(
		expanded,
		json!([ {
			"@id": "http://example.org/a/c",
			"@type": [ "http://example.org/a/T" ]
		} ])
	);
}

#[async_std::test]
async fn expands_list_of_lists() {
	let processor = Processor::no_loader();
	let document = parse(
		r#"{
			"@context": { "p": { "@id": "http://ex/p", "@container": "@list" } },
			"p": [[1, 2], [3]]
		}"#,
	);

	let expanded = processor.expand(&document, &Options::default()).await.unwrap();

	assert_eq!(
		expanded,
		json!([ {
			"http://ex/p": [ {
				"@list": [
					{ "@list": [ { "@value": 1 }, { "@value": 2 } ] },
					{ "@list": [ { "@value": 3 } ] }
				]
			} ]
		} ])
	);
}

#[async_std::test]
async fn applies_type_scoped_contexts_in_lexicographic_order() {
	let processor = Processor::no_loader();
	let document = parse(
		r#"{
			"@context": {
				"@vocab": "http://example.org/",
				"Foo": {
					"@id": "http://example.org/Foo",
					"@context": { "bar": "http://example.org/scoped-bar" }
				}
			},
			"@type": "Foo",
			"bar": "b"
		}"#,
	);

	let expanded = processor.expand(&document, &Options::default()).await.unwrap();

	assert_eq!(
		expanded,
		json!([ {
			"@type": [ "http://example.org/Foo" ],
			"http://example.org/scoped-bar": [ { "@value": "b" } ]
		} ])
	);
}

#[async_std::test]
async fn expands_language_maps() {
	let processor = Processor::no_loader();
	let document = parse(
		r#"{
			"@context": {
				"label": { "@id": "http://ex/label", "@container": "@language" }
			},
			"label": { "en": "The Queen", "de": ["Die Königin"] }
		}"#,
	);

	let expanded = processor.expand(&document, &Options::default()).await.unwrap();

	// Map entries are processed in insertion order.
	assert_eq!(
		expanded,
		json!([ {
			"http://ex/label": [
				{ "@value": "The Queen", "@language": "en" },
				{ "@value": "Die Königin", "@language": "de" }
			]
		} ])
	);
}

#[async_std::test]
async fn drops_free_floating_values() {
	let processor = Processor::no_loader();
	let document = parse(r#"[ "free floating", { "@id": "http://ex/a" }, 42 ]"#);

	let expanded = processor.expand(&document, &Options::default()).await.unwrap();
	assert_eq!(expanded, json!([]));
}

#[async_std::test]
async fn expands_reverse_properties() {
	let processor = Processor::no_loader();
	let document = parse(
		r#"{
			"@id": "http://ex/a",
			"@reverse": {
				"http://ex/parent": { "@id": "http://ex/b" }
			}
		}"#,
	);

	let expanded = processor.expand(&document, &Options::default()).await.unwrap();

	assert_eq!(
		expanded,
		json!([ {
			"@id": "http://ex/a",
			"@reverse": {
				"http://ex/parent": [ { "@id": "http://ex/b" } ]
			}
		} ])
	);
}

#[async_std::test]
async fn keeps_json_literals_unprocessed() {
	let processor = Processor::no_loader();
	let document = parse(
		r#"{
			"@context": { "p": { "@id": "http://ex/p", "@type": "@json" } },
			"p": { "b": 2, "a": 1 }
		}"#,
	);

	let expanded = processor.expand(&document, &Options::default()).await.unwrap();

	// Key order of the JSON literal is preserved verbatim.
	assert_eq!(
		expanded,
		json!([ {
			"http://ex/p": [ { "@value": { "b": 2, "a": 1 }, "@type": "@json" } ]
		} ])
	);
}
