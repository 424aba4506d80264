//! Classification helpers over expanded-form JSON values.
//!
//! Expanded documents are plain [`json_syntax::Value`] trees; the
//! algorithms recognize the JSON-LD entity kinds (node objects, value
//! objects, list objects, graph objects) through the predicates below.

use json_syntax::{object::Object, Value};

/// Returns the unique value of the `key` entry, if any.
///
/// Duplicate entries count as absent; inputs are checked for duplicate
/// keys where the algorithms require it.
pub fn entry<'a>(object: &'a Object, key: &str) -> Option<&'a Value> {
	object.get_unique(key).ok().flatten()
}

/// Checks if `value` is an object without entries, the frame wildcard.
pub fn is_empty_object(value: &Value) -> bool {
	matches!(value, Value::Object(o) if o.is_empty())
}

/// Checks if `value` is a value object, i.e. an object with an `@value`
/// entry.
pub fn is_value_object(value: &Value) -> bool {
	matches!(value, Value::Object(o) if entry(o, "@value").is_some())
}

/// Checks if `value` is a list object, i.e. an object with an `@list`
/// entry.
pub fn is_list_object(value: &Value) -> bool {
	matches!(value, Value::Object(o) if entry(o, "@list").is_some())
}

/// Checks if `value` is a node object: an object without `@value`,
/// `@list` or `@set` entry.
pub fn is_node_object(value: &Value) -> bool {
	match value {
		Value::Object(o) => {
			entry(o, "@value").is_none() && entry(o, "@list").is_none() && entry(o, "@set").is_none()
		}
		_ => false,
	}
}

/// Checks if `value` is a node reference: an object whose only entry is
/// `@id`.
pub fn is_node_reference(value: &Value) -> bool {
	matches!(value, Value::Object(o) if o.len() == 1 && entry(o, "@id").is_some())
}

/// Checks if `value` is a graph object: a node object with an `@graph`
/// entry and no other entries than `@graph`, `@id`, `@index` and
/// `@context`.
pub fn is_graph_object(value: &Value) -> bool {
	match value {
		Value::Object(o) => {
			entry(o, "@graph").is_some()
				&& o.entries()
					.iter()
					.all(|e| matches!(e.key.as_str(), "@graph" | "@id" | "@index" | "@context"))
		}
		_ => false,
	}
}

/// Checks if `value` is a graph object without an `@id` entry.
pub fn is_simple_graph_object(value: &Value) -> bool {
	is_graph_object(value) && matches!(value, Value::Object(o) if entry(o, "@id").is_none())
}

/// Checks if `value` is a default object, i.e. an object with an
/// `@default` entry.
pub fn is_default_object(value: &Value) -> bool {
	matches!(value, Value::Object(o) if entry(o, "@default").is_some())
}

/// Returns the `@id` entry of a node object, when it is a string.
pub fn node_id(value: &Value) -> Option<&str> {
	match value {
		Value::Object(o) => entry(o, "@id").and_then(Value::as_string),
		_ => None,
	}
}

/// Adds `value` to the `key` entry of `map`.
///
/// An existing non-array entry is turned into an array first; array
/// values are appended item by item. With `as_array`, a missing entry is
/// created as an array even for a single value.
pub fn add_value(map: &mut Object, key: &str, value: Value, as_array: bool) {
	match map.get_unique(key).ok().flatten().map(Value::is_array) {
		Some(false) => {
			let entry = map.remove_unique(key).ok().flatten().unwrap();
			map.insert(entry.key, Value::Array(vec![entry.value]));
		}
		None if as_array => {
			map.insert(key.into(), Value::Array(Vec::new()));
		}
		_ => (),
	}

	match value {
		Value::Array(values) => {
			for value in values {
				add_value(map, key, value, false)
			}
		}
		value => {
			if let Some(array) = map.get_unique_mut(key).ok().flatten() {
				array.as_array_mut().unwrap().push(value);
				return;
			}

			map.insert(key.into(), value);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use json_syntax::json;

	#[test]
	fn classification() {
		let value = json!({ "@value": "a", "@language": "en" });
		assert!(is_value_object(&value));
		assert!(!is_node_object(&value));

		let list = json!({ "@list": [1, 2] });
		assert!(is_list_object(&list));

		let node = json!({ "@id": "http://example.org/a", "http://example.org/p": [] });
		assert!(is_node_object(&node));
		assert!(!is_node_reference(&node));
		assert_eq!(node_id(&node), Some("http://example.org/a"));

		let reference = json!({ "@id": "http://example.org/a" });
		assert!(is_node_reference(&reference));

		let graph = json!({ "@graph": [], "@id": "http://example.org/g" });
		assert!(is_graph_object(&graph));
		assert!(!is_simple_graph_object(&graph));
	}

	#[test]
	fn add_value_promotes_to_array() {
		let mut o = json_syntax::Object::default();
		add_value(&mut o, "p", json!("a"), false);
		assert_eq!(Value::Object(o.clone()), json!({ "p": "a" }));

		add_value(&mut o, "p", json!("b"), false);
		assert_eq!(Value::Object(o), json!({ "p": ["a", "b"] }));
	}
}
