use json_syntax::{Parse, Value};
use lod::{canonical_nquads, nquads, Options, Processor};

fn parse(source: &str) -> Value {
	Value::parse_str(source).unwrap().0
}

#[async_std::test]
async fn normalizes_documents_to_canonical_nquads() {
	let processor = Processor::no_loader();
	let document = parse(
		r#"{
			"@context": { "@vocab": "http://example.org/" },
			"name": "A"
		}"#,
	);

	let normalized = processor.normalize(&document, &Options::default()).await.unwrap();
	assert_eq!(normalized, "_:c14n0 <http://example.org/name> \"A\" .\n");
}

#[async_std::test]
async fn canonical_labels_are_isomorphism_invariant() {
	// A two-node cycle: the canonical labels are assigned by the N-degree
	// hash, independently of the input labels.
	let first = nquads::parse_dataset(
		"_:b0 <http://ex/p> _:b1 .\n_:b1 <http://ex/p> _:b0 .\n",
	)
	.unwrap();
	let second = nquads::parse_dataset(
		"_:other <http://ex/p> _:thing .\n_:thing <http://ex/p> _:other .\n",
	)
	.unwrap();

	let first_canonical = canonical_nquads(&first);
	assert_eq!(
		first_canonical,
		"_:c14n0 <http://ex/p> _:c14n1 .\n_:c14n1 <http://ex/p> _:c14n0 .\n"
	);
	assert_eq!(canonical_nquads(&second), first_canonical);
}

#[async_std::test]
async fn normalization_is_idempotent() {
	let processor = Processor::no_loader();
	let document = parse(
		r#"{
			"@context": { "@vocab": "http://example.org/" },
			"knows": { "name": "B" },
			"name": "A"
		}"#,
	);

	let normalized = processor.normalize(&document, &Options::default()).await.unwrap();
	let dataset = nquads::parse_dataset(&normalized).unwrap();
	assert_eq!(canonical_nquads(&dataset), normalized);
}
