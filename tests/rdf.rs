use json_syntax::{json, Parse, Value};
use lod::{nquads, Options, Processor};

fn parse(source: &str) -> Value {
	Value::parse_str(source).unwrap().0
}

#[async_std::test]
async fn serializes_nodes_to_quads() {
	let processor = Processor::no_loader();
	let document = parse(
		r#"{
			"@id": "http://ex/a",
			"@type": "http://ex/T",
			"http://ex/p": "v"
		}"#,
	);

	let dataset = processor.to_rdf(&document, &Options::default()).await.unwrap();

	assert_eq!(
		nquads::serialize_dataset(&dataset),
		"<http://ex/a> <http://ex/p> \"v\" .\n\
		 <http://ex/a> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://ex/T> .\n"
	);
}

#[async_std::test]
async fn serializes_lists_as_first_rest_chains() {
	let processor = Processor::no_loader();
	let document = parse(
		r#"{
			"@id": "http://ex/a",
			"http://ex/p": { "@list": ["x"] }
		}"#,
	);

	let dataset = processor.to_rdf(&document, &Options::default()).await.unwrap();

	assert_eq!(
		nquads::serialize_dataset(&dataset),
		"<http://ex/a> <http://ex/p> _:b0 .\n\
		 _:b0 <http://www.w3.org/1999/02/22-rdf-syntax-ns#first> \"x\" .\n\
		 _:b0 <http://www.w3.org/1999/02/22-rdf-syntax-ns#rest> <http://www.w3.org/1999/02/22-rdf-syntax-ns#nil> .\n"
	);
}

#[async_std::test]
async fn serializes_typed_and_tagged_literals() {
	let processor = Processor::no_loader();
	let document = parse(
		r#"{
			"@id": "http://ex/a",
			"http://ex/n": 7,
			"http://ex/b": true,
			"http://ex/l": { "@value": "hallo", "@language": "DE" }
		}"#,
	);

	let dataset = processor.to_rdf(&document, &Options::default()).await.unwrap();

	// Language tags are lowercased in the canonical serialization.
	assert_eq!(
		nquads::serialize_dataset(&dataset),
		"<http://ex/a> <http://ex/b> \"true\"^^<http://www.w3.org/2001/XMLSchema#boolean> .\n\
		 <http://ex/a> <http://ex/l> \"hallo\"@de .\n\
		 <http://ex/a> <http://ex/n> \"7\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n"
	);
}

#[async_std::test]
async fn large_integers_keep_full_precision() {
	let processor = Processor::no_loader();
	let document = parse(
		r#"{
			"@id": "http://ex/a",
			"http://ex/n": 10000000000000000000
		}"#,
	);

	let dataset = processor.to_rdf(&document, &Options::default()).await.unwrap();

	assert_eq!(
		nquads::serialize_dataset(&dataset),
		"<http://ex/a> <http://ex/n> \"10000000000000000000\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n"
	);
}

#[async_std::test]
async fn named_graphs_become_graph_labels() {
	let processor = Processor::no_loader();
	let document = parse(
		r#"{
			"@id": "http://ex/g",
			"@graph": [ { "@id": "http://ex/a", "http://ex/p": "v" } ]
		}"#,
	);

	let dataset = processor.to_rdf(&document, &Options::default()).await.unwrap();

	assert_eq!(
		nquads::serialize_dataset(&dataset),
		"<http://ex/a> <http://ex/p> \"v\" <http://ex/g> .\n"
	);
}

#[test]
fn deserializes_quads_to_nodes() {
	let processor = Processor::no_loader();
	let dataset = nquads::parse_dataset(
		"<http://ex/a> <http://ex/p> <http://ex/o> .\n\
		 <http://ex/a> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://ex/T> .\n",
	)
	.unwrap();

	let expanded = processor.from_rdf(&dataset, &Options::default()).unwrap();

	assert_eq!(
		expanded,
		json!([ {
			"@id": "http://ex/a",
			"http://ex/p": [ { "@id": "http://ex/o" } ],
			"@type": [ "http://ex/T" ]
		} ])
	);
}

#[test]
fn deserializes_list_chains() {
	let processor = Processor::no_loader();
	let dataset = nquads::parse_dataset(
		"<http://ex/a> <http://ex/p> _:b0 .\n\
		 _:b0 <http://www.w3.org/1999/02/22-rdf-syntax-ns#first> \"x\" .\n\
		 _:b0 <http://www.w3.org/1999/02/22-rdf-syntax-ns#rest> <http://www.w3.org/1999/02/22-rdf-syntax-ns#nil> .\n",
	)
	.unwrap();

	let expanded = processor.from_rdf(&dataset, &Options::default()).unwrap();

	assert_eq!(
		expanded,
		json!([ {
			"@id": "http://ex/a",
			"http://ex/p": [ { "@list": [ { "@value": "x" } ] } ]
		} ])
	);
}

#[test]
fn native_types_are_decoded_on_request() {
	let processor = Processor::no_loader();
	let dataset = nquads::parse_dataset(
		"<http://ex/a> <http://ex/n> \"7\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n\
		 <http://ex/a> <http://ex/b> \"true\"^^<http://www.w3.org/2001/XMLSchema#boolean> .\n",
	)
	.unwrap();

	let mut options = Options::default();
	options.use_native_types = true;

	let expanded = processor.from_rdf(&dataset, &options).unwrap();

	assert_eq!(
		expanded,
		json!([ {
			"@id": "http://ex/a",
			"http://ex/n": [ { "@value": 7 } ],
			"http://ex/b": [ { "@value": true } ]
		} ])
	);
}

#[async_std::test]
async fn quads_round_trip() {
	let processor = Processor::no_loader();
	let document = parse(
		r#"{
			"@id": "http://ex/a",
			"@type": "http://ex/T",
			"http://ex/p": [ { "@value": "v" }, { "@id": "http://ex/o" } ]
		}"#,
	);

	let dataset = processor.to_rdf(&document, &Options::default()).await.unwrap();
	let expanded = processor.from_rdf(&dataset, &Options::default()).unwrap();
	let dataset_again = processor.to_rdf(&expanded, &Options::default()).await.unwrap();

	assert_eq!(
		nquads::serialize_dataset(&dataset),
		nquads::serialize_dataset(&dataset_again)
	);
}

#[async_std::test]
async fn json_literals_use_canonical_form() {
	let processor = Processor::no_loader();
	let document = parse(
		r#"{
			"@context": { "p": { "@id": "http://ex/p", "@type": "@json" } },
			"@id": "http://ex/a",
			"p": { "b": 2, "a": 1 }
		}"#,
	);

	let dataset = processor.to_rdf(&document, &Options::default()).await.unwrap();

	assert_eq!(
		nquads::serialize_dataset(&dataset),
		"<http://ex/a> <http://ex/p> \"{\\\"a\\\":1,\\\"b\\\":2}\"^^<http://www.w3.org/1999/02/22-rdf-syntax-ns#JSON> .\n"
	);
}
