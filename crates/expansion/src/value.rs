use crate::{element::ExpandedEntry, Environment, Error, Options, Warning, WarningHandler};
use json_syntax::Value;
use lod_core::{Context, Keyword, LenientLangTagBuf, Loader, Nullable, Term, Type};

/// Value Expansion algorithm, turning a scalar into a value object (or a
/// node reference under an `@id`/`@vocab` type coercion).
///
/// See <https://www.w3.org/TR/json-ld11-api/#value-expansion>.
pub(crate) fn expand_literal<L, W>(
	env: &mut Environment<'_, L, W>,
	active_context: &Context,
	active_property: Option<&str>,
	value: &Value,
) -> Value
where
	L: Loader,
	W: WarningHandler,
{
	let active_property_definition = active_property.and_then(|p| active_context.get(p));
	let type_mapping = active_property_definition.and_then(|d| d.typ.clone());

	// If the active property has a type mapping in active context that is
	// @id or @vocab, and the value is a string, return a new map
	// containing a single entry where the key is @id and the value is the
	// result of IRI expanding value.
	if let Some(s) = value.as_string() {
		match &type_mapping {
			Some(Type::Id) => {
				let id = crate::expand_iri(env, active_context, s, true, false);
				let mut result = json_syntax::Object::default();
				result.insert("@id".into(), id_value(id, s));
				return Value::Object(result);
			}
			Some(Type::Vocab) => {
				let id = crate::expand_iri(env, active_context, s, true, true);
				let mut result = json_syntax::Object::default();
				result.insert("@id".into(), id_value(id, s));
				return Value::Object(result);
			}
			_ => (),
		}
	}

	// Otherwise, initialize result to a map with an @value entry whose
	// value is set to value.
	let mut result = json_syntax::Object::default();
	result.insert("@value".into(), value.clone());

	match type_mapping {
		// If active property has a type mapping in active context, other
		// than @id, @vocab, or @none, add @type to result and set its
		// value to the value associated with the type mapping.
		Some(Type::Json) => {
			result.insert("@type".into(), Value::String("@json".into()));
		}
		Some(Type::Iri(iri)) => {
			result.insert("@type".into(), Value::String(iri.as_str().into()));
		}
		_ => {
			// Otherwise, if value is a string:
			if value.is_string() {
				// Initialize language to the language mapping for active
				// property in active context, if any, otherwise to the
				// default language of active context.
				let language = match active_property_definition.and_then(|d| d.language.clone())
				{
					Some(Nullable::Some(language)) => Some(language),
					Some(Nullable::Null) => None,
					None => active_context.default_language().cloned(),
				};

				// Initialize direction to the direction mapping for active
				// property in active context, if any, otherwise to the
				// default base direction of active context.
				let direction = match active_property_definition.and_then(|d| d.direction) {
					Some(Nullable::Some(direction)) => Some(direction),
					Some(Nullable::Null) => None,
					None => active_context.default_base_direction(),
				};

				if let Some(language) = language {
					if !language.is_well_formed() {
						env.warnings.handle(Warning::MalformedLanguageTag(
							language.as_str().to_string(),
						));
					}

					result.insert("@language".into(), Value::String(language.as_str().into()));
				}

				if let Some(direction) = direction {
					result
						.insert("@direction".into(), Value::String(direction.as_str().into()));
				}
			}
		}
	}

	Value::Object(result)
}

/// Expanded `@id` entry value: the expanded identifier, or the original
/// string when the identifier cannot be interpreted.
fn id_value(id: Term, original: &str) -> Value {
	match id {
		Term::Null => Value::String(original.into()),
		id => Value::String(id.as_str().into()),
	}
}

/// Expansion of an object containing an entry expanding to `@value`.
pub(crate) fn expand_value_object<L, W>(
	env: &mut Environment<'_, L, W>,
	type_scoped_context: &Context,
	input_type: Option<Term>,
	expanded_entries: Vec<ExpandedEntry<'_>>,
	value_entry: &Value,
	options: Options,
) -> Result<Value, Error>
where
	L: Loader,
	W: WarningHandler,
{
	let is_json = matches!(&input_type, Some(Term::Keyword(Keyword::Json)));

	let mut type_value = None;
	let mut language_value = None;
	let mut direction_value = None;
	let mut index_value = None;

	// The value of an entry expanding to `@value` MAY only have entries
	// expanding to `@value`, `@type`, `@language`, `@direction` and
	// `@index`; anything else is an invalid value object.
	for ExpandedEntry(_, expanded_key, value) in &expanded_entries {
		match expanded_key {
			Term::Keyword(Keyword::Value) => (),
			Term::Keyword(Keyword::Type) => type_value = Some(*value),
			Term::Keyword(Keyword::Language) => language_value = Some(*value),
			Term::Keyword(Keyword::Direction) => direction_value = Some(*value),
			Term::Keyword(Keyword::Index) => index_value = Some(*value),
			_ => return Err(Error::InvalidValueObject),
		}
	}

	// An @type entry cannot be combined with @language or @direction.
	if type_value.is_some() && (language_value.is_some() || direction_value.is_some()) {
		return Err(Error::InvalidValueObject);
	}

	let mut result = json_syntax::Object::default();

	if is_json {
		// If input type is @json, the value is kept unprocessed as a JSON
		// literal.
		if language_value.is_some() || direction_value.is_some() {
			return Err(Error::InvalidValueObject);
		}

		result.insert("@value".into(), value_entry.clone());
		result.insert("@type".into(), Value::String("@json".into()));
	} else {
		// If the value of the @value entry is null, return null.
		if value_entry.is_null() {
			return Ok(Value::Null);
		}

		// The @value value MUST be a scalar. When expanding a frame,
		// wildcard patterns (empty maps, empty arrays or arrays of
		// scalars) are kept.
		let scalar = matches!(
			value_entry,
			Value::Boolean(_) | Value::Number(_) | Value::String(_)
		);
		let frame_pattern = options.frame_expansion
			&& match value_entry {
				Value::Object(o) => o.is_empty(),
				Value::Array(items) => items.iter().all(|item| {
					matches!(item, Value::Boolean(_) | Value::Number(_) | Value::String(_))
				}),
				_ => false,
			};

		if !scalar && !frame_pattern {
			return Err(Error::InvalidValueObjectValue);
		}

		// A language-tagged value MUST be a string.
		if language_value.is_some() && !value_entry.is_string() && !frame_pattern {
			return Err(Error::InvalidLanguageTaggedValue);
		}

		result.insert("@value".into(), value_entry.clone());

		if let Some(type_value) = type_value {
			// The @type entry MUST be a string expanding to an IRI. When
			// expanding a frame, an empty map or an array of strings is
			// also allowed.
			match type_value {
				Value::String(s) => {
					match crate::expand_iri(env, type_scoped_context, s.as_str(), true, true) {
						Term::Id(id) if id.is_valid() => {
							result.insert("@type".into(), Value::String(id.as_str().into()));
						}
						_ => return Err(Error::InvalidTypedValue),
					}
				}
				Value::Object(o) if options.frame_expansion && o.is_empty() => {
					result.insert("@type".into(), type_value.clone());
				}
				Value::Array(items) if options.frame_expansion => {
					let mut types = Vec::with_capacity(items.len());
					for item in items {
						let s = item.as_string().ok_or(Error::InvalidTypedValue)?;
						match crate::expand_iri(env, type_scoped_context, s, true, true) {
							Term::Id(id) if id.is_valid() => {
								types.push(Value::String(id.as_str().into()))
							}
							_ => return Err(Error::InvalidTypedValue),
						}
					}
					result.insert("@type".into(), Value::Array(types));
				}
				_ => return Err(Error::InvalidTypedValue),
			}
		}

		if let Some(language_value) = language_value {
			let language = language_value
				.as_string()
				.ok_or(Error::InvalidLanguageTaggedString)?;

			let tag = LenientLangTagBuf::from(language);
			if !tag.is_well_formed() {
				env.warnings
					.handle(Warning::MalformedLanguageTag(language.to_string()));
			}

			result.insert("@language".into(), Value::String(language.into()));
		}

		if let Some(direction_value) = direction_value {
			let direction = direction_value
				.as_string()
				.and_then(|s| lod_core::Direction::try_from(s).ok())
				.ok_or(Error::InvalidBaseDirection)?;

			result.insert("@direction".into(), Value::String(direction.as_str().into()));
		}
	}

	if let Some(index_value) = index_value {
		let index = index_value.as_string().ok_or(Error::InvalidIndexValue)?;
		result.insert("@index".into(), Value::String(index.into()));
	}

	Ok(Value::Object(result))
}
