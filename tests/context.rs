use json_syntax::{json, Parse, Value};
use lod::context_processing::{self, process_context, ContextCache, ProcessingStack};
use lod::{Context, ErrorCode, MapLoader, NoLoader, Options, Processor};
use static_iref::iri;

fn parse(source: &str) -> Value {
	Value::parse_str(source).unwrap().0
}

async fn process(
	local_context: &Value,
	options: context_processing::Options,
) -> Result<Context, context_processing::Error> {
	let loader = NoLoader;
	let cache = ContextCache::new();
	let mut warnings = lod::warning::Log;
	let mut env = context_processing::Environment::new(&loader, &cache, &mut warnings);

	process_context(
		&mut env,
		&Context::new(None),
		local_context,
		ProcessingStack::new(),
		None,
		options,
	)
	.await
}

#[async_std::test]
async fn protected_term_redefinition_is_rejected() {
	let local_context = parse(
		r#"[
			{ "@protected": true, "x": "http://ex/x" },
			{ "x": "http://ex/y" }
		]"#,
	);

	let error = process(&local_context, context_processing::Options::default())
		.await
		.unwrap_err();

	assert_eq!(error.code(), ErrorCode::ProtectedTermRedefinition);
}

#[async_std::test]
async fn protected_term_redefinition_with_override() {
	let local_context = parse(
		r#"[
			{ "@protected": true, "x": "http://ex/x" },
			{ "x": "http://ex/y" }
		]"#,
	);

	let context = process(
		&local_context,
		context_processing::Options::default().with_override(),
	)
	.await
	.unwrap();

	assert_eq!(
		context.get("x").unwrap().value.as_ref().unwrap().as_str(),
		"http://ex/y"
	);
}

#[async_std::test]
async fn identical_protected_redefinition_is_allowed() {
	let local_context = parse(
		r#"[
			{ "@protected": true, "x": "http://ex/x" },
			{ "x": "http://ex/x" }
		]"#,
	);

	let context = process(&local_context, context_processing::Options::default())
		.await
		.unwrap();

	assert!(context.get("x").unwrap().protected);
}

#[async_std::test]
async fn nullifying_protected_context_is_rejected() {
	let local_context = parse(r#"[ { "@protected": true, "x": "http://ex/x" }, null ]"#);

	let error = process(&local_context, context_processing::Options::default())
		.await
		.unwrap_err();

	assert_eq!(error.code(), ErrorCode::InvalidContextNullification);
}

#[async_std::test]
async fn cyclic_term_definitions_are_rejected() {
	let local_context = parse(r#"{ "a": "b:suffix", "b": "a:suffix" }"#);

	let error = process(&local_context, context_processing::Options::default())
		.await
		.unwrap_err();

	assert_eq!(error.code(), ErrorCode::CyclicIriMapping);
}

#[async_std::test]
async fn invalid_vocab_mapping_is_rejected() {
	let local_context = parse(r#"{ "@vocab": true }"#);

	let error = process(&local_context, context_processing::Options::default())
		.await
		.unwrap_err();

	assert_eq!(error.code(), ErrorCode::InvalidVocabMapping);
}

#[async_std::test]
async fn loads_remote_contexts_through_the_loader() {
	let mut loader = MapLoader::new();
	loader.insert(
		iri!("http://example.org/context.json").to_owned(),
		parse(r#"{ "@context": { "name": "http://schema.org/name" } }"#),
	);

	let processor = Processor::new(loader);
	let document = parse(
		r#"{
			"@context": "http://example.org/context.json",
			"name": "Manu"
		}"#,
	);

	let expanded = processor.expand(&document, &Options::default()).await.unwrap();
	assert_eq!(
		expanded,
		json!([ { "http://schema.org/name": [ { "@value": "Manu" } ] } ])
	);

	// The resolved context is cached; a second expansion does not hit the
	// loader again and yields the same result.
	let again = processor.expand(&document, &Options::default()).await.unwrap();
	assert_eq!(again, expanded);
}

#[async_std::test]
async fn missing_remote_context_fails() {
	let processor = Processor::no_loader();
	let document = parse(r#"{ "@context": "http://example.org/missing.json" }"#);

	let error = processor
		.expand(&document, &Options::default())
		.await
		.unwrap_err();

	assert_eq!(error.code(), ErrorCode::LoadingRemoteContextFailed);
}
