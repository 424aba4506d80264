use json_syntax::{json, Parse, Value};
use lod::{Options, Processor};
use static_iref::iri;

fn parse(source: &str) -> Value {
	Value::parse_str(source).unwrap().0
}

#[async_std::test]
async fn compacts_simple_document() {
	let processor = Processor::no_loader();
	let document = parse(r#"{ "http://schema.org/name": "Manu" }"#);
	let context = parse(r#"{ "name": "http://schema.org/name" }"#);

	let compacted = processor
		.compact(&document, &context, &Options::default())
		.await
		.unwrap();

	assert_eq!(
		compacted,
		json!({
			"@context": { "name": "http://schema.org/name" },
			"name": "Manu"
		})
	);
}

#[async_std::test]
async fn compacts_with_term_selection() {
	let processor = Processor::no_loader();
	let document = parse(
		r#"[ {
			"http://ex/p": [
				{ "@value": "a", "@language": "en" },
				{ "@value": "b" }
			]
		} ]"#,
	);

	// `plain` fits untagged strings, `tagged` fits English ones.
	let context = parse(
		r#"{
			"tagged": { "@id": "http://ex/p", "@language": "en" },
			"plain": { "@id": "http://ex/p", "@language": null }
		}"#,
	);

	let compacted = processor
		.compact(&document, &context, &Options::default())
		.await
		.unwrap();

	assert_eq!(
		compacted,
		json!({
			"@context": {
				"tagged": { "@id": "http://ex/p", "@language": "en" },
				"plain": { "@id": "http://ex/p", "@language": null }
			},
			"tagged": "a",
			"plain": "b"
		})
	);
}

#[async_std::test]
async fn list_of_lists_round_trip() {
	let processor = Processor::no_loader();
	let document = parse(
		r#"{
			"@context": { "p": { "@id": "http://ex/p", "@container": "@list" } },
			"p": [[1, 2], [3]]
		}"#,
	);
	let context = parse(r#"{ "p": { "@id": "http://ex/p", "@container": "@list" } }"#);

	let expanded = processor.expand(&document, &Options::default()).await.unwrap();
	let compacted = processor
		.compact(&expanded, &context, &Options::default())
		.await
		.unwrap();

	assert_eq!(
		compacted,
		json!({
			"@context": { "p": { "@id": "http://ex/p", "@container": "@list" } },
			"p": [[1, 2], [3]]
		})
	);

	// Expanding the compacted document yields the original expansion.
	let re_expanded = processor.expand(&compacted, &Options::default()).await.unwrap();
	assert_eq!(re_expanded, expanded);
}

#[async_std::test]
async fn compacts_iris_relative_to_base() {
	let processor = Processor::no_loader();
	let options = Options::with_base(iri!("http://example.org/a/b").to_owned());

	let document = parse(r#"{ "@id": "http://example.org/a/c", "@type": "http://example.org/a/T" }"#);
	let context = parse("{}");

	let expanded = processor.expand(&document, &options).await.unwrap();
	let compacted = processor.compact(&expanded, &context, &options).await.unwrap();

	// Only document-relative positions compact to relative IRIs; `@type`
	// values are vocabulary-mapped and stay absolute.
	assert_eq!(
		compacted,
		json!({ "@id": "c", "@type": "http://example.org/a/T" })
	);
}

#[async_std::test]
async fn compact_expand_round_trip() {
	let processor = Processor::no_loader();
	let document = parse(
		r#"{
			"@context": {
				"@vocab": "http://example.org/",
				"knows": { "@type": "@id" }
			},
			"@id": "http://example.org/a",
			"name": "A",
			"knows": "http://example.org/b"
		}"#,
	);
	let context = parse(
		r#"{
			"@vocab": "http://example.org/",
			"knows": { "@type": "@id" }
		}"#,
	);

	let expanded = processor.expand(&document, &Options::default()).await.unwrap();
	let compacted = processor
		.compact(&expanded, &context, &Options::default())
		.await
		.unwrap();
	let re_expanded = processor.expand(&compacted, &Options::default()).await.unwrap();

	assert_eq!(re_expanded, expanded);
}

#[async_std::test]
async fn honors_set_containers_and_compact_arrays() {
	let processor = Processor::no_loader();
	let document = parse(
		r#"[ {
			"http://ex/tag": [ { "@value": "a" } ]
		} ]"#,
	);

	let context = parse(r#"{ "tag": { "@id": "http://ex/tag", "@container": "@set" } }"#);

	let compacted = processor
		.compact(&document, &context, &Options::default())
		.await
		.unwrap();

	// A @set container keeps the array form even for singletons.
	assert_eq!(
		compacted,
		json!({
			"@context": { "tag": { "@id": "http://ex/tag", "@container": "@set" } },
			"tag": [ "a" ]
		})
	);
}

#[async_std::test]
async fn compacts_index_maps() {
	let processor = Processor::no_loader();
	let document = parse(
		r#"[ {
			"http://ex/post": [
				{ "@value": "one", "@index": "1" },
				{ "@value": "two", "@index": "2" }
			]
		} ]"#,
	);

	let context = parse(r#"{ "post": { "@id": "http://ex/post", "@container": "@index" } }"#);

	let compacted = processor
		.compact(&document, &context, &Options::default())
		.await
		.unwrap();

	assert_eq!(
		compacted,
		json!({
			"@context": { "post": { "@id": "http://ex/post", "@container": "@index" } },
			"post": { "1": "one", "2": "two" }
		})
	);
}
