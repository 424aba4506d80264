use super::{resolve_iri, DefinedTerms, Merged};
use crate::{Environment, Error, Options, ProcessingStack, Warning, WarningHandler};
use iref::{Iri, IriRef};
use lod_core::{is_keyword_like, warning, Context, Id, Keyword, Loader, Term};
use rdf_types::BlankId;

pub struct MalformedIri(pub String);

impl From<MalformedIri> for Warning {
	fn from(MalformedIri(s): MalformedIri) -> Self {
		Self::MalformedIri(s)
	}
}

/// IRI expansion during context processing.
///
/// Like [`expand_iri_simple`], but ensures that any term or prefix used
/// by `value` and defined in `local_context` gets its term definition
/// created first.
///
/// Default values for `document_relative` and `vocab` should be `false`
/// and `true`.
#[allow(clippy::too_many_arguments)]
pub async fn expand_iri_with<L, W>(
	env: &mut Environment<'_, L, W>,
	active_context: &mut Context,
	value: &str,
	document_relative: bool,
	vocab: bool,
	local_context: &Merged<'_>,
	defined: &mut DefinedTerms,
	remote_contexts: ProcessingStack,
	options: Options,
) -> Result<Term, Error>
where
	L: Loader,
	W: WarningHandler,
{
	if let Ok(keyword) = Keyword::try_from(value) {
		return Ok(Term::Keyword(keyword));
	}

	if is_keyword_like(value) {
		env.warnings
			.handle(Warning::KeywordLikeValue(value.to_string()));
		return Ok(Term::Null);
	}

	// If `local_context` is not null, it contains an entry with a key that
	// equals value, and the value of the entry for value in defined is not
	// true, invoke the Create Term Definition algorithm. This ensures that
	// a term definition is created for value in active context during
	// context processing.
	Box::pin(super::define(
		env,
		active_context,
		local_context,
		value,
		defined,
		remote_contexts.clone(),
		None,
		false,
		options.with_no_override(),
	))
	.await?;

	if let Some(term_definition) = active_context.get(value) {
		// If active context has a term definition for value, and the
		// associated IRI mapping is a keyword, return that keyword.
		if let Some(value) = &term_definition.value {
			if value.is_keyword() {
				return Ok(value.clone());
			}
		}

		// If vocab is true and the active context has a term definition
		// for value, return the associated IRI mapping.
		if vocab {
			return match &term_definition.value {
				Some(value) => Ok(value.clone()),
				None => Ok(Term::Null),
			};
		}
	}

	if value.find(':').map(|i| i > 0).unwrap_or(false) {
		if let Ok(blank_id) = BlankId::new(value) {
			return Ok(Term::Id(Id::blank(blank_id.to_owned())));
		}

		if value == "_:" {
			return Ok(Term::Id(Id::Invalid("_:".to_string())));
		}

		if let Some((prefix, suffix)) = as_compact_iri(value) {
			// If local context is not null, it contains a `prefix` entry,
			// and the value of the prefix entry in defined is not true,
			// invoke the Create Term Definition algorithm, passing active
			// context, local context, prefix as term, and defined.
			Box::pin(super::define(
				env,
				active_context,
				local_context,
				prefix,
				defined,
				remote_contexts,
				None,
				false,
				options.with_no_override(),
			))
			.await?;

			// If active context contains a term definition for prefix
			// having a non-null IRI mapping and the prefix flag of the
			// term definition is true, return the result of concatenating
			// the IRI mapping associated with prefix and suffix.
			if let Some(term_definition) = active_context.get(prefix) {
				if term_definition.prefix {
					if let Some(mapping) = &term_definition.value {
						let mut result = mapping.as_str().to_string();
						result.push_str(suffix);

						return Ok(Term::Id(Id::from_string(result)));
					}
				}
			}
		}

		if let Ok(iri) = Iri::new(value) {
			return Ok(Term::Id(Id::iri(iri.to_owned())));
		}
	}

	// If vocab is true, and active context has a vocabulary mapping,
	// return the result of concatenating the vocabulary mapping with
	// value.
	if vocab {
		match active_context.vocabulary() {
			Some(Term::Id(mapping)) => {
				let mut result = mapping.as_str().to_string();
				result.push_str(value);

				return Ok(Term::Id(Id::from_string(result)));
			}
			Some(_) => return Ok(invalid_iri(env.warnings, value.to_string())),
			None => (),
		}
	}

	// Otherwise, if document relative is true set value to the result of
	// resolving value against the base IRI from active context. Only the
	// basic algorithm in section 5.2 of [RFC3986] is used; neither
	// Syntax-Based Normalization nor Scheme-Based Normalization are
	// performed.
	if document_relative {
		if let Ok(iri_ref) = IriRef::new(value) {
			if let Some(iri) = resolve_iri(iri_ref, active_context.base_iri()) {
				return Ok(Term::Id(Id::iri(iri)));
			}
		}
	}

	// Return value as is.
	Ok(invalid_iri(env.warnings, value.to_string()))
}

/// IRI expansion against a fully processed context.
///
/// Default values for `document_relative` and `vocab` should be `false`
/// and `true`.
pub fn expand_iri_simple<W, H>(
	active_context: &Context,
	value: &str,
	document_relative: bool,
	vocab: bool,
	warnings: &mut H,
) -> Term
where
	W: From<MalformedIri>,
	H: warning::Handler<W>,
{
	if let Ok(keyword) = Keyword::try_from(value) {
		return Term::Keyword(keyword);
	}

	if is_keyword_like(value) {
		return Term::Null;
	}

	if let Some(term_definition) = active_context.get(value) {
		// If active context has a term definition for value, and the
		// associated IRI mapping is a keyword, return that keyword.
		if let Some(value) = &term_definition.value {
			if value.is_keyword() {
				return value.clone();
			}
		}

		// If vocab is true and the active context has a term definition
		// for value, return the associated IRI mapping.
		if vocab {
			return match &term_definition.value {
				Some(value) => value.clone(),
				None => Term::Null,
			};
		}
	}

	if value.find(':').map(|i| i > 0).unwrap_or(false) {
		if let Ok(blank_id) = BlankId::new(value) {
			return Term::Id(Id::blank(blank_id.to_owned()));
		}

		if value == "_:" {
			return Term::Id(Id::Invalid("_:".to_string()));
		}

		if let Some((prefix, suffix)) = as_compact_iri(value) {
			// If active context contains a term definition for prefix
			// having a non-null IRI mapping and the prefix flag of the
			// term definition is true, return the result of concatenating
			// the IRI mapping associated with prefix and suffix.
			if let Some(term_definition) = active_context.get(prefix) {
				if term_definition.prefix {
					if let Some(mapping) = &term_definition.value {
						let mut result = mapping.as_str().to_string();
						result.push_str(suffix);

						return Term::Id(Id::from_string(result));
					}
				}
			}
		}

		if let Ok(iri) = Iri::new(value) {
			return Term::Id(Id::iri(iri.to_owned()));
		}
	}

	if vocab {
		match active_context.vocabulary() {
			Some(Term::Id(mapping)) => {
				let mut result = mapping.as_str().to_string();
				result.push_str(value);

				return Term::Id(Id::from_string(result));
			}
			Some(_) => return invalid_iri(warnings, value.to_string()),
			None => (),
		}
	}

	if document_relative {
		if let Ok(iri_ref) = IriRef::new(value) {
			if let Some(iri) = resolve_iri(iri_ref, active_context.base_iri()) {
				return Term::Id(Id::iri(iri));
			}
		}
	}

	// Return value as is.
	invalid_iri(warnings, value.to_string())
}

/// Splits `value` as a compact IRI.
///
/// A leading colon never introduces a prefix, and a suffix beginning with
/// `//` makes the value an IRI rather than a compact IRI.
pub(crate) fn as_compact_iri(value: &str) -> Option<(&str, &str)> {
	let i = value.find(':').filter(|i| *i > 0)?;
	let (prefix, rest) = value.split_at(i);
	let suffix = &rest[1..];

	if suffix.starts_with("//") {
		None
	} else {
		Some((prefix, suffix))
	}
}

fn invalid_iri<W, H>(warnings: &mut H, value: String) -> Term
where
	W: From<MalformedIri>,
	H: warning::Handler<W>,
{
	warnings.handle(MalformedIri(value.clone()).into());
	Term::Id(Id::Invalid(value))
}
