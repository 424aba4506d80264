use crate::{stack, Environment, Error, Options, ProcessingStack, Warning, WarningHandler};
use iref::{IriBuf, IriRef};
use json_syntax::Value;
use lod_core::{Context, ExtractContext, Loader, ProcessingMode, Term};

mod define;
mod iri;
mod merged;

pub use define::*;
pub use iri::*;
pub use merged::*;

/// Resolve `iri_ref` against the given base IRI.
fn resolve_iri(iri_ref: &IriRef, base_iri: Option<&IriBuf>) -> Option<IriBuf> {
	match base_iri {
		Some(base_iri) => Some(iri_ref.resolved(base_iri)),
		None => iri_ref.as_iri().map(|iri| iri.to_owned()),
	}
}

/// Context keywords handled before term definitions are created.
fn is_control_entry(key: &str) -> bool {
	matches!(
		key,
		"@base" | "@direction" | "@import" | "@language" | "@propagate" | "@protected"
			| "@version" | "@vocab"
	)
}

/// Loads the raw `@context` value of the remote context behind `iri`,
/// through the document cache.
async fn load_remote_context<L, W>(
	env: &mut Environment<'_, L, W>,
	iri: &IriBuf,
) -> Result<Value, Error>
where
	L: Loader,
{
	match env.cache.document(iri) {
		Some(context) => {
			log::debug!("remote context `{iri}` found in cache");
			Ok(context)
		}
		None => {
			log::debug!("dereferencing remote context `{iri}`");
			let document = env.loader.load(iri).await?;

			// A response carrying a context link header stands for the
			// linked context document.
			if let Some(context_url) = &document.context_url {
				let context_url = context_url.clone();
				let context = Box::pin(load_remote_context(env, &context_url)).await?;
				env.cache.insert_document(iri.clone(), context.clone());
				return Ok(context);
			}

			let context = document
				.into_document()
				.into_ld_context()
				.map_err(Error::ContextExtractionFailed)?;
			env.cache.insert_document(iri.clone(), context.clone());
			Ok(context)
		}
	}
}

// This function tries to follow the recommended context processing algorithm.
// See `https://www.w3.org/TR/json-ld11-api/#context-processing-algorithm`.
//
// The recommended default value for `remote_contexts` is the empty set,
// `false` for `override_protected`, and `true` for `propagate`.
pub async fn process_context<L, W>(
	env: &mut Environment<'_, L, W>,
	active_context: &Context,
	local_context: &Value,
	remote_contexts: ProcessingStack,
	base_url: Option<&IriBuf>,
	mut options: Options,
) -> Result<Context, Error>
where
	L: Loader,
	W: WarningHandler,
{
	// 1) Initialize result to the result of cloning active context.
	let mut result = active_context.clone();

	// 2) If `local_context` is an object containing the member @propagate,
	// its value MUST be boolean true or false, set `propagate` to that value.
	if let Value::Object(def) = local_context {
		if let Some(propagate) = lod_core::object::entry(def, "@propagate") {
			if options.processing_mode == ProcessingMode::JsonLd1_0 {
				return Err(Error::InvalidContextEntry);
			}

			match propagate {
				Value::Boolean(b) => options.propagate = *b,
				_ => return Err(Error::InvalidPropagateValue),
			}
		}
	}

	// 3) If propagate is false, and result does not have a previous context,
	// set previous context in result to active context.
	if !options.propagate && result.previous_context().is_none() {
		result.set_previous_context(active_context.clone());
	}

	// 4) If local context is not an array, set it to an array containing only
	// local context.
	// 5) For each item context in local context:
	for context in Value::force_as_array(local_context) {
		match context {
			// 5.1) If context is null:
			Value::Null => {
				// If `override_protected` is false and `active_context` contains
				// any protected term definitions, an invalid context
				// nullification has been detected and processing is aborted.
				if !options.override_protected && result.has_protected_items() {
					return Err(Error::InvalidContextNullification);
				}

				// Otherwise, initialize result as a newly-initialized active
				// context, setting both `base_iri` and `original_base_url` to
				// the value of `original_base_url` in active context, and, if
				// `propagate` is false, `previous_context` in `result` to the
				// previous value of `result`.
				let previous_result = result;
				result = Context::new(active_context.original_base_url().cloned());

				if !options.propagate {
					result.set_previous_context(previous_result);
				}
			}

			// 5.2) If context is a string,
			Value::String(iri_ref) => {
				// Initialize `context` to the result of resolving context
				// against base URL. If base URL is not a valid IRI, then
				// context MUST be a valid IRI, otherwise a loading document
				// failed error has been detected and processing is aborted.
				let context_iri = IriRef::new(iri_ref.as_str())
					.ok()
					.and_then(|iri_ref| resolve_iri(iri_ref, base_url))
					.ok_or(Error::LoadingDocumentFailed)?;

				// If the number of entries in the `remote_contexts` array
				// exceeds a processor defined limit, a context overflow error
				// has been detected and processing is aborted; otherwise, add
				// context to remote contexts.
				if remote_contexts.depth() >= stack::MAX_DEPTH {
					return Err(Error::ContextOverflow);
				}

				let mut remote_contexts = remote_contexts.clone();
				if remote_contexts.push(context_iri.clone()) {
					// If context was previously dereferenced, the processor
					// MUST NOT do a further dereference: the resolved context
					// caches short-circuit both the dereference and the
					// processing of the loaded context.
					match env.cache.processed(&context_iri, result.id()) {
						Some(processed) => result = processed,
						None => {
							let parent_id = result.id();
							let loaded_context =
								load_remote_context(env, &context_iri).await?;

							// Set result to the result of recursively calling
							// this algorithm, passing result for active
							// context, loaded context for local context, the
							// documentUrl of context document for base URL,
							// and a copy of remote contexts.
							let new_options = Options {
								processing_mode: options.processing_mode,
								override_protected: false,
								propagate: true,
							};

							let processed = Box::pin(process_context(
								env,
								&result,
								&loaded_context,
								remote_contexts.clone(),
								Some(&context_iri),
								new_options,
							))
							.await?;

							env.cache.insert_processed(
								context_iri.clone(),
								parent_id,
								processed.clone(),
							);

							result = processed;
						}
					}
				}
			}

			// 5.4) Context definition.
			Value::Object(context) => {
				// 5.5) If context has a @version entry:
				if let Some(version) = lod_core::object::entry(context, "@version") {
					// 5.5.1) Its value MUST be the numeric value `1.1`.
					match version {
						Value::Number(n) if n.as_f64_lossy() == 1.1 => (),
						_ => return Err(Error::InvalidVersionValue),
					}

					// 5.5.2) If processing mode is set to json-ld-1.0, a
					// processing mode conflict error has been detected.
					if options.processing_mode == ProcessingMode::JsonLd1_0 {
						return Err(Error::ProcessingModeConflict);
					}
				}

				// 5.6) If context has an @import entry:
				let import_context = match lod_core::object::entry(context, "@import") {
					Some(import_value) => {
						// 5.6.1) If processing mode is json-ld-1.0, an invalid
						// context entry error has been detected.
						if options.processing_mode == ProcessingMode::JsonLd1_0 {
							return Err(Error::InvalidContextEntry);
						}

						// 5.6.2) Its value MUST be a string.
						let import_value =
							import_value.as_string().ok_or(Error::InvalidImportValue)?;

						// 5.6.3) Initialize import to the result of resolving
						// the value of @import against base URL.
						let import = IriRef::new(import_value)
							.ok()
							.and_then(|iri_ref| resolve_iri(iri_ref, base_url))
							.ok_or(Error::InvalidImportValue)?;

						// 5.6.4) Dereference import.
						let import_context = load_remote_context(env, &import).await?;

						// 5.6.6) If the dereferenced document has no top-level
						// map with an @context entry, or if the value of
						// @context is not a context definition (i.e., it is
						// not a map), an invalid remote context has been
						// detected and processing is aborted.
						match import_context {
							Value::Object(import_context_def) => {
								// 5.6.7) If `import context` has a @import
								// entry, an invalid context entry error has
								// been detected and processing is aborted.
								if lod_core::object::entry(&import_context_def, "@import")
									.is_some()
								{
									return Err(Error::InvalidContextEntry);
								}

								// 5.6.8) Set `context` to the result of
								// merging context into `import context`,
								// replacing common entries with those from
								// `context`.
								Some(import_context_def)
							}
							_ => return Err(Error::InvalidRemoteContext),
						}
					}
					None => None,
				};

				let context = Merged::new(context, import_context);

				// 5.7) If context has a @base entry and remote contexts is
				// empty, i.e., the currently being processed context is not a
				// remote context:
				if remote_contexts.is_empty() {
					if let Some(value) = context.get("@base") {
						match value {
							Value::Null => {
								// If value is null, remove the base IRI of
								// result.
								result.set_base_iri(None);
							}
							Value::String(iri_ref) => {
								let iri_ref = IriRef::new(iri_ref.as_str())
									.map_err(|_| Error::InvalidBaseIri)?;
								match iri_ref.as_iri() {
									Some(iri) => result.set_base_iri(Some(iri.to_owned())),
									None => {
										// Value is a relative IRI reference,
										// resolved against the current base
										// IRI of result.
										let resolved =
											resolve_iri(iri_ref, result.base_iri())
												.ok_or(Error::InvalidBaseIri)?;
										result.set_base_iri(Some(resolved))
									}
								}
							}
							_ => return Err(Error::InvalidBaseIri),
						}
					}
				}

				// 5.8) If context has a @vocab entry:
				if let Some(value) = context.get("@vocab") {
					match value {
						Value::Null => {
							// If value is null, remove any vocabulary mapping
							// from result.
							result.set_vocabulary(None);
						}
						Value::String(value) => {
							// Otherwise, if value is an IRI or blank node
							// identifier, the vocabulary mapping of result is
							// set to the result of IRI expanding value using
							// true for document relative.
							match expand_iri_simple(
								&result,
								value.as_str(),
								true,
								true,
								env.warnings,
							) {
								Term::Id(vocab) if vocab.is_valid() => {
									result.set_vocabulary(Some(Term::Id(vocab)))
								}
								_ => return Err(Error::InvalidVocabMapping),
							}
						}
						_ => return Err(Error::InvalidVocabMapping),
					}
				}

				// 5.9) If context has a @language entry:
				if let Some(value) = context.get("@language") {
					match value {
						Value::Null => {
							// 5.9.2) If value is null, remove any default
							// language from result.
							result.set_default_language(None);
						}
						Value::String(tag) => {
							let tag = lod_core::LenientLangTagBuf::from(tag.as_str());
							if !tag.is_well_formed() {
								env.warnings.handle(Warning::MalformedLanguageTag(
									tag.as_str().to_string(),
								));
							}
							result.set_default_language(Some(tag));
						}
						_ => return Err(Error::InvalidDefaultLanguage),
					}
				}

				// 5.10) If context has a @direction entry:
				if let Some(value) = context.get("@direction") {
					// 5.10.1) If processing mode is json-ld-1.0, an invalid
					// context entry error has been detected and processing is
					// aborted.
					if options.processing_mode == ProcessingMode::JsonLd1_0 {
						return Err(Error::InvalidContextEntry);
					}

					match value {
						Value::Null => {
							// 5.10.3) If value is null, remove any base
							// direction from result.
							result.set_default_base_direction(None);
						}
						Value::String(dir) => {
							let dir = lod_core::Direction::try_from(dir.as_str())
								.map_err(|_| Error::InvalidBaseDirection)?;
							result.set_default_base_direction(Some(dir));
						}
						_ => return Err(Error::InvalidBaseDirection),
					}
				}

				// 5.11) If context has a @propagate entry, its value MUST be
				// boolean. Type errors are caught here; the value itself is
				// handled at step 2.
				if let Some(value) = context.get("@propagate") {
					if options.processing_mode == ProcessingMode::JsonLd1_0 {
						return Err(Error::InvalidContextEntry);
					}

					if !matches!(value, Value::Boolean(_)) {
						return Err(Error::InvalidPropagateValue);
					}
				}

				// 5.12) Create a map `defined` to keep track of whether or not
				// a term has already been defined or is currently being
				// defined during recursion.
				let mut defined = DefinedTerms::new();
				let protected = match context.get("@protected") {
					Some(Value::Boolean(b)) => {
						if options.processing_mode == ProcessingMode::JsonLd1_0 {
							return Err(Error::InvalidContextEntry);
						}
						*b
					}
					Some(_) => return Err(Error::InvalidProtectedValue),
					None => false,
				};

				// 5.13) For each key-value pair in context where key is not
				// @base, @direction, @import, @language, @propagate,
				// @protected, @version, or @vocab, invoke the Create Term
				// Definition algorithm.
				//
				// The `@type` entry, when redefined, is processed first so
				// that type-scoped behavior is available to the other
				// definitions.
				if context.get("@type").is_some() {
					define(
						env,
						&mut result,
						&context,
						"@type",
						&mut defined,
						remote_contexts.clone(),
						base_url,
						protected,
						options,
					)
					.await?
				}

				for key in context.keys() {
					if !is_control_entry(key) && key != "@type" {
						define(
							env,
							&mut result,
							&context,
							key,
							&mut defined,
							remote_contexts.clone(),
							base_url,
							protected,
							options,
						)
						.await?
					}
				}
			}

			// 5.3) Anything else is an invalid local context.
			_ => return Err(Error::InvalidLocalContext),
		}
	}

	Ok(result)
}
