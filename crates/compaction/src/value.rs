use crate::{compact_iri, Error, Options};
use json_syntax::{Object, Value};
use lod_core::{object, ContainerKind, Context, Id, Nullable, Term, Type};

/// Value Compaction algorithm.
///
/// Reduces a value object (or node reference) to a scalar when the active
/// property's type, language and direction mappings make the reduction
/// reversible. Returns the original object when no reduction applies; the
/// caller then compacts it entry by entry.
///
/// See <https://www.w3.org/TR/json-ld11-api/#value-compaction>.
pub(crate) fn compact_value(
	value_object: &Object,
	active_context: &Context,
	active_property: Option<&str>,
	options: Options,
) -> Result<Value, Error> {
	let definition = active_property.and_then(|p| active_context.get(p));
	let type_mapping = definition.and_then(|d| d.typ.as_ref());
	let container = definition.map(|d| d.container).unwrap_or_default();

	// Number of entries relevant for the reduction: an @index entry
	// carried by an index container does not count, as it is preserved by
	// the container key.
	let mut count = value_object.len();
	if object::entry(value_object, "@index").is_some()
		&& container.contains(ContainerKind::Index)
	{
		count -= 1;
	}

	if count > 2 {
		return Ok(Value::Object(value_object.clone()));
	}

	// Node references reduce to their identifier under an @id or @vocab
	// type coercion.
	if let Some(id) = object::entry(value_object, "@id").and_then(Value::as_string) {
		if count == 1 {
			match type_mapping {
				Some(Type::Id) => {
					let compacted = compact_iri(
						active_context,
						&Term::Id(Id::from_string(id.to_string())),
						None,
						false,
						false,
						options,
					)?;
					return Ok(Value::String(compacted.unwrap_or_default().into()));
				}
				Some(Type::Vocab) => {
					let compacted = compact_iri(
						active_context,
						&Term::Id(Id::from_string(id.to_string())),
						None,
						true,
						false,
						options,
					)?;
					return Ok(Value::String(compacted.unwrap_or_default().into()));
				}
				_ => (),
			}
		}

		return Ok(Value::Object(value_object.clone()));
	}

	let Some(value_value) = object::entry(value_object, "@value") else {
		return Ok(Value::Object(value_object.clone()));
	};

	// A value whose @type matches the type mapping reduces to the bare
	// value. This covers `@json` literals under an `@json` type coercion.
	if let Some(type_value) = object::entry(value_object, "@type").and_then(Value::as_string) {
		if let Some(type_mapping) = type_mapping {
			if count == 2 && type_value == type_mapping.as_str() {
				return Ok(value_value.clone());
			}
		}

		return Ok(Value::Object(value_object.clone()));
	}

	// Effective language and direction for the active property.
	let language = match definition.and_then(|d| d.language.as_ref()) {
		Some(Nullable::Some(language)) => Some(language.as_str().to_string()),
		Some(Nullable::Null) => None,
		None => active_context
			.default_language()
			.map(|l| l.as_str().to_string()),
	};

	let direction = match definition.and_then(|d| d.direction) {
		Some(Nullable::Some(direction)) => Some(direction),
		Some(Nullable::Null) => None,
		None => active_context.default_base_direction(),
	};

	let value_language = object::entry(value_object, "@language").and_then(Value::as_string);
	let value_direction = object::entry(value_object, "@direction")
		.and_then(Value::as_string)
		.and_then(|s| lod_core::Direction::try_from(s).ok());

	let language_matches = match (&value_language, &language) {
		(Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
		(None, None) => true,
		_ => false,
	};

	let direction_matches = value_direction == direction;

	if value_language.is_some() || value_direction.is_some() {
		if language_matches && direction_matches && value_value.is_string() {
			return Ok(value_value.clone());
		}

		return Ok(Value::Object(value_object.clone()));
	}

	if count == 1 {
		// A lone non-string @value is unaffected by language defaults; a
		// string reduces only when no language or direction would be
		// picked up on expansion.
		if !value_value.is_string() || (language.is_none() && direction.is_none()) {
			return Ok(value_value.clone());
		}
	}

	Ok(Value::Object(value_object.clone()))
}
