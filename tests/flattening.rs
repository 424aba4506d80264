use json_syntax::{json, Parse, Value};
use lod::{Options, Processor};

fn parse(source: &str) -> Value {
	Value::parse_str(source).unwrap().0
}

#[async_std::test]
async fn flattens_embedded_nodes() {
	let processor = Processor::no_loader();
	let document = parse(
		r#"{
			"@context": { "@vocab": "http://example.org/" },
			"@id": "http://example.org/a",
			"knows": { "@id": "http://example.org/b", "name": "B" }
		}"#,
	);

	let flattened = processor
		.flatten(&document, None, &Options::default())
		.await
		.unwrap();

	assert_eq!(
		flattened,
		json!([
			{
				"@id": "http://example.org/a",
				"http://example.org/knows": [ { "@id": "http://example.org/b" } ]
			},
			{
				"@id": "http://example.org/b",
				"http://example.org/name": [ { "@value": "B" } ]
			}
		])
	);
}

#[async_std::test]
async fn issues_blank_node_labels_in_order() {
	let processor = Processor::no_loader();
	let document = parse(
		r#"{
			"@context": { "@vocab": "http://example.org/" },
			"@graph": [
				{ "name": "first" },
				{ "name": "second" }
			]
		}"#,
	);

	let flattened = processor
		.flatten(&document, None, &Options::default())
		.await
		.unwrap();

	assert_eq!(
		flattened,
		json!([
			{ "@id": "_:b0", "http://example.org/name": [ { "@value": "first" } ] },
			{ "@id": "_:b1", "http://example.org/name": [ { "@value": "second" } ] }
		])
	);
}

#[async_std::test]
async fn named_graph_content_is_grouped() {
	let processor = Processor::no_loader();
	let document = parse(
		r#"{
			"@id": "http://example.org/g",
			"@graph": [
				{ "@id": "http://example.org/a", "http://example.org/p": "v" }
			]
		}"#,
	);

	let flattened = processor
		.flatten(&document, None, &Options::default())
		.await
		.unwrap();

	assert_eq!(
		flattened,
		json!([ {
			"@id": "http://example.org/g",
			"@graph": [ {
				"@id": "http://example.org/a",
				"http://example.org/p": [ { "@value": "v" } ]
			} ]
		} ])
	);
}

#[async_std::test]
async fn flattened_output_can_be_compacted() {
	let processor = Processor::no_loader();
	let document = parse(
		r#"{
			"@context": { "@vocab": "http://example.org/" },
			"@id": "http://example.org/a",
			"knows": { "@id": "http://example.org/b", "name": "B" }
		}"#,
	);
	let context = parse(r#"{ "@vocab": "http://example.org/" }"#);

	let flattened = processor
		.flatten(&document, Some(&context), &Options::default())
		.await
		.unwrap();

	assert_eq!(
		flattened,
		json!({
			"@context": { "@vocab": "http://example.org/" },
			"@graph": [
				{
					"@id": "http://example.org/a",
					"knows": { "@id": "http://example.org/b" }
				},
				{
					"@id": "http://example.org/b",
					"name": "B"
				}
			]
		})
	);
}
