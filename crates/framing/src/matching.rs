use crate::{Error, State};
use json_syntax::{Object, Value};
use lod_core::{object, Keyword};

/// A frame flag value: expanded frames carry flags as value objects.
pub(crate) enum FrameFlag {
	String(String),
	Boolean(bool),
}

/// Reads a framing flag entry (`@embed`, `@explicit`, `@omitDefault`,
/// `@requireAll`) from a frame object.
pub(crate) fn get_frame_flag(frame: &Object, name: &str) -> Option<FrameFlag> {
	let value = object::entry(frame, name)?;
	let first = Value::force_as_array(value).first()?;

	let unwrapped = match first.as_object() {
		Some(o) => object::entry(o, "@value").unwrap_or(first),
		None => first,
	};

	match unwrapped {
		Value::String(s) => Some(FrameFlag::String(s.as_str().to_string())),
		Value::Boolean(b) => Some(FrameFlag::Boolean(*b)),
		_ => None,
	}
}

/// Extracts the single frame object of an expanded frame document.
///
/// An empty frame is the wildcard frame.
pub(crate) fn single_frame(expanded_frame: &Value) -> Result<Object, Error> {
	match expanded_frame {
		Value::Object(o) => Ok(o.clone()),
		Value::Array(items) => match items.as_slice() {
			[] => Ok(Object::default()),
			[Value::Object(o)] => Ok(o.clone()),
			_ => Err(Error::InvalidFrame),
		},
		_ => Err(Error::InvalidFrame),
	}
}

/// Sub-frame for a frame property value: its first object, or the
/// wildcard frame when the property pattern carries none.
pub(crate) fn sub_frame(frame_value: &Value) -> Result<Object, Error> {
	for item in Value::force_as_array(frame_value) {
		if let Value::Object(o) = item {
			return Ok(o.clone());
		}
	}

	Ok(Object::default())
}

/// Sub-frame for the items of a framed list: the `@list` entry of the
/// list pattern, or the wildcard frame.
pub(crate) fn list_sub_frame(sub_frame: &Object) -> Result<Object, Error> {
	match object::entry(sub_frame, "@list") {
		Some(list_frame) => self::sub_frame(list_frame),
		None => Ok(Object::default()),
	}
}

/// Filters `ids` to the subjects matching `frame`, in sorted order.
pub(crate) fn filter_subjects(
	state: &State,
	ids: &[&str],
	frame: &Object,
) -> Result<Vec<String>, Error> {
	let mut matches = Vec::new();

	for id in ids {
		if let Some(subject) = state.subjects.get(id) {
			if filter_subject(state, subject, frame)? {
				matches.push(id.to_string())
			}
		}
	}

	Ok(matches)
}

/// Frame matching: checks if `subject` matches the `frame` pattern.
///
/// With `requireAll`, every property named by the frame must be present
/// (or defaulted); otherwise a single match suffices. Wildcard (`{}`) and
/// match-none (`[]`) patterns are honored for `@id`, `@type`, properties
/// and value objects.
pub(crate) fn filter_subject(
	state: &State,
	subject: &Object,
	frame: &Object,
) -> Result<bool, Error> {
	let require_all = match get_frame_flag(frame, "@requireAll") {
		Some(FrameFlag::Boolean(b)) => b,
		_ => state.options.require_all,
	};

	let mut matched_count = 0;
	let mut property_count = 0;

	for entry in frame.entries() {
		let key = entry.key.as_str();
		let frame_value = &entry.value;

		match key {
			"@id" => {
				// An @id pattern matches the listed identifiers; an empty
				// array matches none, a wildcard any.
				let patterns = Value::force_as_array(frame_value);
				let subject_id = object::entry(subject, "@id").and_then(Value::as_string);

				let matches = if patterns.is_empty() {
					subject_id.is_none()
				} else if patterns.len() == 1 && object::is_empty_object(&patterns[0]) {
					true
				} else {
					match subject_id {
						Some(id) => patterns
							.iter()
							.any(|p| p.as_string().map(|p| p == id).unwrap_or(false)),
						None => false,
					}
				};

				if !matches {
					return Ok(false);
				}

				property_count += 1;
				matched_count += 1;
			}

			"@type" => {
				// An empty array requires the absence of @type; a
				// wildcard its presence; otherwise any listed type
				// matches.
				let patterns = Value::force_as_array(frame_value);
				let subject_types = object::entry(subject, "@type")
					.map(Value::force_as_array)
					.unwrap_or(&[]);

				let matches = if patterns.is_empty() {
					subject_types.is_empty()
				} else if patterns.len() == 1 && object::is_empty_object(&patterns[0]) {
					!subject_types.is_empty()
				} else if patterns.len() == 1 && object::is_default_object(&patterns[0]) {
					true
				} else {
					patterns.iter().any(|p| subject_types.contains(p))
				};

				if !matches {
					return Ok(false);
				}

				property_count += 1;
				matched_count += 1;
			}

			key if Keyword::try_from(key).is_ok() => {
				// Other keywords (including the framing flags) do not
				// take part in matching.
			}

			property => {
				property_count += 1;

				let patterns = Value::force_as_array(frame_value);
				let values = object::entry(subject, property)
					.map(Value::force_as_array)
					.unwrap_or(&[]);

				let has_default = patterns
					.first()
					.map(object::is_default_object)
					.unwrap_or(false);

				if has_default {
					// A property with a @default always matches.
					matched_count += 1;
					continue;
				}

				if patterns.is_empty() {
					// Match none.
					if !values.is_empty() {
						return Ok(false);
					}

					matched_count += 1;
					continue;
				}

				if values.is_empty() {
					if require_all {
						return Ok(false);
					}

					continue;
				}

				let first = &patterns[0];
				let matches = if object::is_empty_object(first) {
					// Wildcard: any value present.
					true
				} else if object::is_value_object(first) {
					values.iter().any(|v| value_pattern_match(first, v))
				} else if let Value::Object(node_pattern) = first {
					// Node pattern: any node value matching the pattern.
					values.iter().any(|v| {
						node_value_match(state, node_pattern, v).unwrap_or(false)
					})
				} else {
					// Scalar patterns match by equality.
					values.iter().any(|v| patterns.contains(v))
				};

				if matches {
					matched_count += 1;
				} else if require_all {
					return Ok(false);
				}
			}
		}
	}

	// A frame without matching constraints matches everything; otherwise
	// at least one constraint must have matched (or all of them with
	// requireAll).
	if property_count == 0 {
		return Ok(true);
	}

	if require_all {
		Ok(matched_count == property_count)
	} else {
		Ok(matched_count > 0)
	}
}

/// Checks a node value (a node reference into the subject map) against a
/// node pattern.
fn node_value_match(
	state: &State,
	pattern: &Object,
	value: &Value,
) -> Result<bool, Error> {
	if object::is_node_reference(value) {
		if let Some(id) = object::node_id(value) {
			if let Some(node) = state.subjects.get(id) {
				return filter_subject(state, node, pattern);
			}
		}
	}

	if let Value::Object(node) = value {
		return filter_subject(state, node, pattern);
	}

	Ok(false)
}

/// Checks a value object against a value pattern.
///
/// Each of `@value`, `@type`, `@language` and `@direction` can be a
/// wildcard (`{}`), a match-none (`[]`), or a list of admissible values.
pub(crate) fn value_pattern_match(pattern: &Value, value: &Value) -> bool {
	let (Some(pattern), Some(value)) = (pattern.as_object(), value.as_object()) else {
		return false;
	};

	dimension_match(
		object::entry(pattern, "@value"),
		object::entry(value, "@value"),
		false,
	) && dimension_match(
		object::entry(pattern, "@type"),
		object::entry(value, "@type"),
		false,
	) && dimension_match(
		object::entry(pattern, "@language"),
		object::entry(value, "@language"),
		true,
	) && dimension_match(
		object::entry(pattern, "@direction"),
		object::entry(value, "@direction"),
		false,
	)
}

fn dimension_match(
	pattern: Option<&Value>,
	value: Option<&Value>,
	case_insensitive: bool,
) -> bool {
	match pattern {
		// No constraint.
		None => true,
		Some(pattern) => {
			let candidates = Value::force_as_array(pattern);

			if candidates.is_empty() {
				// Match none.
				return value.is_none();
			}

			if candidates.len() == 1 && object::is_empty_object(&candidates[0]) {
				// Wildcard.
				return value.is_some();
			}

			match value {
				Some(value) => candidates.iter().any(|candidate| {
					if case_insensitive {
						match (candidate.as_string(), value.as_string()) {
							(Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
							_ => candidate == value,
						}
					} else {
						candidate == value
					}
				}),
				None => false,
			}
		}
	}
}
