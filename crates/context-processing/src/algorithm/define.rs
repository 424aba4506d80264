use super::{expand_iri_simple, expand_iri_with, Merged};
use crate::{Environment, Error, Options, ProcessingStack, Warning, WarningHandler};
use iref::{Iri, IriBuf, IriRef};
use json_syntax::{Object, Value};
use lod_core::{
	is_keyword_like, Container, ContainerKind, Context, Direction, Id, Keyword,
	LenientLangTagBuf, Loader, Nullable, ProcessingMode, Term, TermDefinition, Type,
};
use rdf_types::BlankId;
use std::collections::HashMap;

fn is_gen_delim(c: char) -> bool {
	matches!(c, ':' | '/' | '?' | '#' | '[' | ']' | '@')
}

// Checks if the input term is an IRI ending with a gen-delim character, or a
// blank node identifier.
fn is_gen_delim_or_blank(t: &Term) -> bool {
	match t {
		Term::Id(Id::Valid(rdf_types::Id::Blank(_))) => true,
		Term::Id(Id::Valid(rdf_types::Id::Iri(iri))) => {
			iri.as_str().chars().last().map(is_gen_delim).unwrap_or(false)
		}
		_ => false,
	}
}

/// Checks if the given character is included in the given string anywhere but
/// at the first or last position.
fn contains_between_boundaries(id: &str, c: char) -> bool {
	if let Some(i) = id.find(c) {
		let j = id.rfind(c).unwrap();
		i > 0 && j < id.len() - 1
	} else {
		false
	}
}

/// Keys allowed in an expanded term definition.
fn is_term_definition_entry(key: &str) -> bool {
	matches!(
		key,
		"@id" | "@reverse"
			| "@container"
			| "@context"
			| "@direction"
			| "@index"
			| "@language"
			| "@nest"
			| "@prefix"
			| "@protected"
			| "@type"
	)
}

#[derive(Default)]
pub struct DefinedTerms(HashMap<String, DefinedTerm>);

impl DefinedTerms {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn begin(&mut self, key: &str) -> Result<bool, Error> {
		match self.0.get(key) {
			Some(d) => {
				if d.pending {
					Err(Error::CyclicIriMapping)
				} else {
					Ok(false)
				}
			}
			None => {
				self.0
					.insert(key.to_string(), DefinedTerm { pending: true });

				Ok(true)
			}
		}
	}

	pub fn end(&mut self, key: &str) {
		self.0.get_mut(key).unwrap().pending = false
	}
}

struct DefinedTerm {
	pending: bool,
}

fn get<'o>(object: &'o Object, key: &str) -> Result<Option<&'o Value>, Error> {
	object.get_unique(key).map_err(|_| Error::DuplicateKey)
}

/// Follows the `https://www.w3.org/TR/json-ld11-api/#create-term-definition`
/// algorithm.
///
/// Default value for `base_url` is `None`. Default values for `protected` and
/// `override_protected` are `false`.
#[allow(clippy::too_many_arguments)]
pub async fn define<L, W>(
	env: &mut Environment<'_, L, W>,
	active_context: &mut Context,
	local_context: &Merged<'_>,
	term: &str,
	defined: &mut DefinedTerms,
	remote_contexts: ProcessingStack,
	base_url: Option<&IriBuf>,
	protected: bool,
	options: Options,
) -> Result<(), Error>
where
	L: Loader,
	W: WarningHandler,
{
	if !defined.begin(term)? {
		return Ok(());
	}

	if term.is_empty() {
		return Err(Error::InvalidTermDefinition);
	}

	// Initialize `value` to a copy of the value associated with the entry
	// `term` in `local_context`.
	let Some(value) = local_context.get(term) else {
		defined.end(term);
		return Ok(());
	};

	// The value associated with defined's term entry is false: the term
	// definition is now being created but is not yet complete.
	// Done with `defined.begin`.

	if term == "@type" {
		// If term is @type and processing mode is json-ld-1.0, a keyword
		// redefinition error has been detected and processing is aborted.
		if options.processing_mode == ProcessingMode::JsonLd1_0 {
			return Err(Error::KeywordRedefinition);
		}

		// At this point, `value` MUST be a map with only either or both of
		// the following entries: an entry for @container with value @set,
		// an entry for @protected. Any other value means that a keyword
		// redefinition error has been detected.
		let Value::Object(value) = value else {
			return Err(Error::KeywordRedefinition);
		};

		if value.is_empty() {
			return Err(Error::KeywordRedefinition);
		}

		let mut definition = TermDefinition {
			value: Some(Term::Keyword(Keyword::Type)),
			..Default::default()
		};

		for entry in value.entries() {
			match entry.key.as_str() {
				"@container" if entry.value.as_string() == Some("@set") => {
					definition.container = Container::Set
				}
				"@protected" => {
					if options.processing_mode == ProcessingMode::JsonLd1_0 {
						return Err(Error::InvalidTermDefinition);
					}

					match &entry.value {
						Value::Boolean(b) => definition.protected = *b,
						_ => return Err(Error::InvalidProtectedValue),
					}
				}
				_ => return Err(Error::KeywordRedefinition),
			}
		}

		let previous_definition = active_context.set(term, None);

		// If override protected is false and previous_definition exists
		// and is protected, the new definition must not differ (other than
		// the value of protected).
		if !options.override_protected {
			if let Some(previous_definition) = previous_definition {
				if previous_definition.protected {
					if definition.modulo_protected_field()
						!= previous_definition.modulo_protected_field()
					{
						return Err(Error::ProtectedTermRedefinition);
					}

					definition.protected = true;
				}
			}
		}

		active_context.set(term, Some(definition));
		defined.end(term);
		return Ok(());
	}

	// Since keywords cannot be overridden, term MUST NOT be a keyword and a
	// keyword redefinition error has been detected and processing is
	// aborted. Terms that merely look like keywords are ignored with a
	// warning.
	if Keyword::try_from(term).is_ok() {
		return Err(Error::KeywordRedefinition);
	}

	if is_keyword_like(term) {
		env.warnings
			.handle(Warning::KeywordLikeTerm(term.to_string()));
		defined.end(term);
		return Ok(());
	}

	// Initialize `previous_definition` to any existing term definition for
	// `term` in `active_context`, removing that term definition from active
	// context.
	let previous_definition = active_context.set(term, None);

	// If value is null, convert it to a map consisting of a single entry
	// whose key is @id and whose value is null.
	let (id_entry, simple_term, expanded) = match value {
		Value::Null => (Some(Nullable::Null), false, None),
		Value::String(id) => (Some(Nullable::Some(id.as_str())), true, None),
		Value::Object(o) => {
			let id = match get(o, "@id")? {
				Some(Value::Null) => Some(Nullable::Null),
				Some(Value::String(id)) => Some(Nullable::Some(id.as_str())),
				Some(_) => return Err(Error::InvalidIriMapping),
				None => None,
			};

			(id, false, Some(o))
		}
		_ => return Err(Error::InvalidTermDefinition),
	};

	// Create a new term definition, `definition`, initializing `prefix`
	// flag to `false`, `protected` to `protected`, and `reverse_property`
	// to `false`.
	let mut definition = TermDefinition {
		protected,
		..Default::default()
	};

	if let Some(o) = expanded {
		// If value contains any entry other than @id, @reverse, @container,
		// @context, @direction, @index, @language, @nest, @prefix,
		// @protected, or @type, an invalid term definition error has been
		// detected and processing is aborted.
		for entry in o.entries() {
			if !is_term_definition_entry(entry.key.as_str()) {
				return Err(Error::InvalidTermDefinition);
			}
		}

		// If the @protected entry in value is true set the protected flag
		// in definition to true.
		if let Some(protected_value) = get(o, "@protected")? {
			// If processing mode is json-ld-1.0, an invalid term
			// definition has been detected and processing is aborted.
			if options.processing_mode == ProcessingMode::JsonLd1_0 {
				return Err(Error::InvalidTermDefinition);
			}

			match protected_value {
				Value::Boolean(b) => definition.protected = *b,
				_ => return Err(Error::InvalidProtectedValue),
			}
		}

		// If value contains the entry @type:
		if let Some(type_value) = get(o, "@type")? {
			// Its value MUST be a string, which is IRI expanded using
			// local context and defined.
			let type_value = type_value.as_string().ok_or(Error::InvalidTypeMapping)?;

			let typ = expand_iri_with(
				env,
				active_context,
				type_value,
				false,
				true,
				local_context,
				defined,
				remote_contexts.clone(),
				options,
			)
			.await?;

			// If the expanded type is @json or @none, and processing mode
			// is json-ld-1.0, an invalid type mapping error has been
			// detected and processing is aborted.
			if options.processing_mode == ProcessingMode::JsonLd1_0
				&& (typ == Keyword::Json || typ == Keyword::None)
			{
				return Err(Error::InvalidTypeMapping);
			}

			match Type::try_from(typ) {
				Ok(typ) => definition.typ = Some(typ),
				Err(_) => return Err(Error::InvalidTypeMapping),
			}
		}

		// If `value` contains the entry @reverse:
		if let Some(reverse_value) = get(o, "@reverse")? {
			// If `value` contains `@id` or `@nest` entries, an invalid
			// reverse property error has been detected and processing is
			// aborted.
			if get(o, "@id")?.is_some() || get(o, "@nest")?.is_some() {
				return Err(Error::InvalidReverseProperty);
			}

			let reverse_value = reverse_value.as_string().ok_or(Error::InvalidIriMapping)?;

			// If the value associated with the @reverse entry is a string
			// having the form of a keyword, return; processors SHOULD
			// generate a warning.
			if is_keyword_like(reverse_value) {
				env.warnings
					.handle(Warning::KeywordLikeValue(reverse_value.to_string()));
				defined.end(term);
				return Ok(());
			}

			// Otherwise, set the IRI mapping of definition to the result
			// of IRI expanding the value associated with the @reverse
			// entry. If the result does not have the form of an IRI or a
			// blank node identifier, an invalid IRI mapping error has been
			// detected and processing is aborted.
			match expand_iri_with(
				env,
				active_context,
				reverse_value,
				false,
				true,
				local_context,
				defined,
				remote_contexts.clone(),
				options,
			)
			.await?
			{
				Term::Id(mapping) if mapping.is_valid() => {
					definition.value = Some(Term::Id(mapping))
				}
				_ => return Err(Error::InvalidIriMapping),
			}

			// If `value` contains an `@container` entry, set the
			// `container` mapping of `definition` to an array containing
			// its value; if its value is neither `@set`, nor `@index`, nor
			// null, an invalid reverse property error has been detected
			// and processing is aborted.
			if let Some(container_value) = get(o, "@container")? {
				match container_value {
					Value::Null => (),
					Value::String(s) => match s.as_str() {
						"@set" => definition.container = Container::Set,
						"@index" => definition.container = Container::Index,
						_ => return Err(Error::InvalidReverseProperty),
					},
					_ => return Err(Error::InvalidReverseProperty),
				}
			}

			// Set the `reverse_property` flag of `definition` to `true`.
			definition.reverse_property = true;

			// Set the term definition of `term` in `active_context` to
			// `definition` and the value associated with `defined`'s entry
			// `term` to `true` and return.
			active_context.set(term, Some(definition));
			defined.end(term);
			return Ok(());
		}
	}

	match id_entry {
		// If `value` contains the entry `@id` and its value does not equal
		// `term`:
		Some(id_value) if id_value != Nullable::Some(term) => {
			match id_value {
				// If the `@id` entry of value is `null`, the term is not
				// used for IRI expansion, but is retained to be able to
				// detect future redefinitions of this term.
				Nullable::Null => (),
				Nullable::Some(id_value) => {
					// If the value associated with the `@id` entry is not
					// a keyword, but has the form of a keyword, return;
					// processors SHOULD generate a warning.
					if is_keyword_like(id_value) && Keyword::try_from(id_value).is_err() {
						env.warnings
							.handle(Warning::KeywordLikeValue(id_value.to_string()));
						defined.end(term);
						return Ok(());
					}

					// Otherwise, set the IRI mapping of `definition` to
					// the result of IRI expanding the value associated
					// with the `@id` entry.
					definition.value = match expand_iri_with(
						env,
						active_context,
						id_value,
						false,
						true,
						local_context,
						defined,
						remote_contexts.clone(),
						options,
					)
					.await?
					{
						Term::Keyword(Keyword::Context) => {
							// If it equals `@context`, an invalid keyword
							// alias error has been detected and processing
							// is aborted.
							return Err(Error::InvalidKeywordAlias);
						}
						Term::Id(prop) if !prop.is_valid() => {
							// If the resulting IRI mapping is neither a
							// keyword, nor an IRI, nor a blank node
							// identifier, an invalid IRI mapping error has
							// been detected and processing is aborted.
							return Err(Error::InvalidIriMapping);
						}
						Term::Null => return Err(Error::InvalidIriMapping),
						value => Some(value),
					};

					// If `term` contains a colon (:) anywhere but as the
					// first or last character of `term`, or if it contains
					// a slash (/) anywhere:
					if contains_between_boundaries(term, ':') || term.contains('/') {
						// Set the value associated with `defined`'s `term`
						// entry to `true`.
						defined.end(term);

						// If the result of IRI expanding `term` is not the
						// same as the IRI mapping of definition, an
						// invalid IRI mapping error has been detected and
						// processing is aborted.
						let expanded_term = expand_iri_with(
							env,
							active_context,
							term,
							false,
							true,
							local_context,
							defined,
							remote_contexts.clone(),
							options,
						)
						.await?;
						if definition.value.as_ref() != Some(&expanded_term) {
							return Err(Error::InvalidIriMapping);
						}
					}

					// If `term` contains neither a colon (:) nor a slash
					// (/), simple term is true, and if the IRI mapping of
					// definition is either an IRI ending with a gen-delim
					// character, or a blank node identifier, set the
					// `prefix` flag in `definition` to true.
					if !term.contains(':')
						&& !term.contains('/') && simple_term
						&& is_gen_delim_or_blank(definition.value.as_ref().unwrap())
					{
						definition.prefix = true;
					}
				}
			}
		}
		_ => {
			// Otherwise if the `term` contains a colon (:) anywhere after
			// the first character, it is either a compact IRI, a blank
			// node identifier, or an absolute IRI.
			if term.find(':').map(|i| i > 0).unwrap_or(false) {
				if let Some((prefix, suffix)) = super::as_compact_iri(term) {
					// If `term` is a compact IRI with a prefix that is an
					// entry in local context a dependency has been found.
					// Use this algorithm recursively passing the prefix as
					// term.
					if local_context.get(prefix).is_some() {
						Box::pin(define(
							env,
							active_context,
							local_context,
							prefix,
							defined,
							remote_contexts.clone(),
							None,
							false,
							options.with_no_override(),
						))
						.await?;
					}

					// If `term`'s prefix has a term definition in
					// `active_context`, set the IRI mapping of
					// `definition` to the result of concatenating the
					// value associated with the prefix's IRI mapping and
					// the term's suffix.
					if let Some(prefix_definition) = active_context.get(prefix) {
						let mut result = String::new();

						if let Some(prefix_iri) =
							prefix_definition.value.as_ref().and_then(Term::as_iri)
						{
							result = prefix_iri.to_string()
						}

						result.push_str(suffix);

						if let Ok(iri) = Iri::new(result.as_str()) {
							definition.value = Some(Term::Id(Id::iri(iri.to_owned())))
						} else {
							return Err(Error::InvalidIriMapping);
						}
					}
				}

				// Not a compact IRI: a blank node identifier or an
				// absolute IRI.
				if definition.value.is_none() {
					if let Ok(blank_id) = BlankId::new(term) {
						definition.value = Some(Term::Id(Id::blank(blank_id.to_owned())))
					} else if let Ok(iri_ref) = IriRef::new(term) {
						match iri_ref.as_iri() {
							Some(iri) => {
								definition.value = Some(Term::Id(Id::iri(iri.to_owned())))
							}
							None => {
								if iri_ref.as_str().contains('/') {
									// Term is a relative IRI reference: set
									// the IRI mapping of definition to the
									// result of IRI expanding term.
									match expand_iri_simple(
										active_context,
										iri_ref.as_str(),
										false,
										true,
										env.warnings,
									) {
										Term::Id(Id::Valid(rdf_types::Id::Iri(id))) => {
											definition.value = Some(Term::Id(Id::iri(id)))
										}
										// If the resulting IRI mapping is
										// not an IRI, an invalid IRI
										// mapping error has been detected
										// and processing is aborted.
										_ => return Err(Error::InvalidIriMapping),
									}
								}
							}
						}
					}
				}
			} else if term.contains('/') {
				// Term is a relative IRI reference.
				match expand_iri_simple(active_context, term, false, true, env.warnings) {
					Term::Id(Id::Valid(rdf_types::Id::Iri(id))) => {
						definition.value = Some(Term::Id(Id::iri(id)))
					}
					_ => return Err(Error::InvalidIriMapping),
				}
			}

			// Not a compact IRI, IRI, IRI reference or blank node id.
			if definition.value.is_none() {
				if let Some(context_vocabulary) = active_context.vocabulary() {
					// Otherwise, if `active_context` has a vocabulary
					// mapping, the IRI mapping of `definition` is set to
					// the result of concatenating the value associated
					// with the vocabulary mapping and `term`.
					if let Some(vocabulary_iri) = context_vocabulary.as_iri() {
						let mut result = vocabulary_iri.to_string();
						result.push_str(term);
						if let Ok(iri) = Iri::new(result.as_str()) {
							definition.value = Some(Term::Id(Id::iri(iri.to_owned())))
						} else {
							return Err(Error::InvalidIriMapping);
						}
					} else {
						return Err(Error::InvalidIriMapping);
					}
				} else {
					// If it does not have a vocabulary mapping, an invalid
					// IRI mapping error has been detected and processing
					// is aborted.
					return Err(Error::InvalidIriMapping);
				}
			}
		}
	}

	if let Some(o) = expanded {
		// If value contains the entry @container:
		if let Some(container_value) = get(o, "@container")? {
			// If the container value is @graph, @id, or @type, or is
			// otherwise not a string, generate an invalid container
			// mapping error and abort processing if processing mode is
			// json-ld-1.0.
			if options.processing_mode == ProcessingMode::JsonLd1_0 {
				match container_value.as_string() {
					Some("@graph" | "@id" | "@type") | None => {
						return Err(Error::InvalidContainerMapping)
					}
					_ => (),
				}
			}

			// Initialize `container` to the value associated with the
			// `@container` entry, which MUST be either `@graph`, `@id`,
			// `@index`, `@language`, `@list`, `@set`, `@type`, or an array
			// containing exactly any one of those keywords, an array
			// containing `@graph` and either `@id` or `@index` optionally
			// including `@set`, or an array containing a combination of
			// `@set` and any of `@index`, `@graph`, `@id`, `@type`,
			// `@language` in any order. Otherwise, an invalid container
			// mapping has been detected and processing is aborted.
			let mut container = Container::None;
			for kind_value in Value::force_as_array(container_value) {
				let kind = kind_value
					.as_string()
					.and_then(|s| ContainerKind::try_from(s).ok())
					.ok_or(Error::InvalidContainerMapping)?;

				container = container
					.with(kind)
					.ok_or(Error::InvalidContainerMapping)?;
			}

			if container.is_empty() {
				return Err(Error::InvalidContainerMapping);
			}

			definition.container = container;

			// If the `container` mapping of definition includes `@type`:
			if definition.container.contains(ContainerKind::Type) {
				match &definition.typ {
					None => {
						// If type mapping in definition is undefined, set
						// it to @id.
						definition.typ = Some(Type::Id)
					}
					Some(Type::Id | Type::Vocab) => (),
					// If type mapping in definition is neither `@id` nor
					// `@vocab`, an invalid type mapping error has been
					// detected and processing is aborted.
					_ => return Err(Error::InvalidTypeMapping),
				}
			}
		}

		// If value contains the entry @index:
		if let Some(index_value) = get(o, "@index")? {
			// If processing mode is json-ld-1.0 or container mapping does
			// not include `@index`, an invalid term definition has been
			// detected and processing is aborted.
			if !definition.container.contains(ContainerKind::Index)
				|| options.processing_mode == ProcessingMode::JsonLd1_0
			{
				return Err(Error::InvalidTermDefinition);
			}

			// Initialize `index` to the value associated with the `@index`
			// entry, which MUST be a string expanding to an IRI.
			let index_value = index_value
				.as_string()
				.ok_or(Error::InvalidTermDefinition)?;

			match expand_iri_simple(active_context, index_value, false, true, env.warnings) {
				Term::Id(Id::Valid(rdf_types::Id::Iri(_))) => (),
				_ => return Err(Error::InvalidTermDefinition),
			}

			definition.index = Some(index_value.to_string())
		}

		// If `value` contains the entry `@context`:
		if let Some(context) = get(o, "@context")? {
			// If processing mode is json-ld-1.0, an invalid term
			// definition has been detected and processing is aborted.
			if options.processing_mode == ProcessingMode::JsonLd1_0 {
				return Err(Error::InvalidTermDefinition);
			}

			// Invoke the Context Processing algorithm using the
			// `active_context`, `context` as local context, `base_url`,
			// and `true` for override protected. If any error is detected,
			// an invalid scoped context error has been detected and
			// processing is aborted. The result itself is discarded: the
			// scoped context is processed again where it applies.
			Box::pin(super::process_context(
				env,
				active_context,
				context,
				remote_contexts.clone(),
				base_url,
				options.with_override(),
			))
			.await
			.map_err(|_| Error::InvalidScopedContext)?;

			// Set the local context of definition to context, and base URL
			// to base URL.
			definition.context = Some(Box::new(context.clone()));
			definition.base_url = base_url.cloned();
		}

		// If `value` contains the entry `@language` and does not contain
		// the entry `@type`:
		if get(o, "@type")?.is_none() {
			if let Some(language_value) = get(o, "@language")? {
				// Initialize `language` to the value associated with the
				// `@language` entry, which MUST be either null or a
				// string. If `language` is not well-formed according to
				// section 2.2.9 of [BCP47], processors SHOULD issue a
				// warning.
				definition.language = match language_value {
					Value::Null => Some(Nullable::Null),
					Value::String(tag) => {
						let tag = LenientLangTagBuf::from(tag.as_str());
						if !tag.is_well_formed() {
							env.warnings.handle(Warning::MalformedLanguageTag(
								tag.as_str().to_string(),
							));
						}
						Some(Nullable::Some(tag))
					}
					_ => return Err(Error::InvalidLanguageMapping),
				};
			}

			// If `value` contains the entry `@direction` and does not
			// contain the entry `@type`:
			if let Some(direction_value) = get(o, "@direction")? {
				// Initialize `direction` to the value associated with the
				// `@direction` entry, which MUST be either null, "ltr", or
				// "rtl".
				definition.direction = match direction_value {
					Value::Null => Some(Nullable::Null),
					Value::String(s) => match Direction::try_from(s.as_str()) {
						Ok(direction) => Some(Nullable::Some(direction)),
						Err(_) => return Err(Error::InvalidBaseDirection),
					},
					_ => return Err(Error::InvalidBaseDirection),
				};
			}
		}

		// If value contains the entry @nest:
		if let Some(nest_value) = get(o, "@nest")? {
			// If processing mode is json-ld-1.0, an invalid term
			// definition has been detected and processing is aborted.
			if options.processing_mode == ProcessingMode::JsonLd1_0 {
				return Err(Error::InvalidTermDefinition);
			}

			// Its value MUST be a string which is not a keyword other than
			// @nest.
			let nest_value = nest_value.as_string().ok_or(Error::InvalidNestValue)?;
			if Keyword::try_from(nest_value).is_ok() && nest_value != "@nest" {
				return Err(Error::InvalidNestValue);
			}

			definition.nest = Some(nest_value.to_string());
		}

		// If value contains the entry @prefix:
		if let Some(prefix_value) = get(o, "@prefix")? {
			// If processing mode is json-ld-1.0, or if `term` contains a
			// colon (:) or slash (/), an invalid term definition has been
			// detected and processing is aborted.
			if term.contains(':')
				|| term.contains('/')
				|| options.processing_mode == ProcessingMode::JsonLd1_0
			{
				return Err(Error::InvalidTermDefinition);
			}

			// Set the `prefix` flag to the value associated with the
			// @prefix entry, which MUST be a boolean.
			match prefix_value {
				Value::Boolean(b) => definition.prefix = *b,
				_ => return Err(Error::InvalidPrefixValue),
			}

			// If the `prefix` flag of `definition` is set to `true`, and
			// its IRI mapping is a keyword, an invalid term definition has
			// been detected and processing is aborted.
			if definition.prefix && matches!(&definition.value, Some(t) if t.is_keyword()) {
				return Err(Error::InvalidTermDefinition);
			}
		}
	}

	// If override protected is false and previous_definition exists and is
	// protected:
	if !options.override_protected {
		if let Some(previous_definition) = previous_definition {
			if previous_definition.protected {
				// If `definition` is not the same as `previous_definition`
				// (other than the value of protected), a protected term
				// redefinition error has been detected, and processing is
				// aborted.
				if definition.modulo_protected_field()
					!= previous_definition.modulo_protected_field()
				{
					return Err(Error::ProtectedTermRedefinition);
				}

				// Set `definition` to `previous definition` to retain the
				// value of protected.
				definition.protected = true;
			}
		}
	}

	// Set the term definition of `term` in `active_context` to `definition`
	// and set the value associated with `defined`'s entry term to true.
	active_context.set(term, Some(definition));
	defined.end(term);

	Ok(())
}
