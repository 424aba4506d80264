use json_syntax::{Object, Value};
use lod_core::{object, Container, ContainerKind, Context};
use std::collections::HashMap;

/// Removes the `@preserve` wrappers from a compacted framing output.
///
/// Preserved default values surface as plain values; preserved `@null`
/// defaults become `null` property values. Singleton arrays introduced by
/// the unwrapping are collapsed again according to `compact_arrays` and
/// the property containers of `active_context`.
pub fn remove_preserve(
	active_context: &Context,
	value: &Value,
	compact_arrays: bool,
) -> Option<Value> {
	match value {
		Value::Array(items) => {
			let mut result = Vec::with_capacity(items.len());
			for item in items {
				if let Some(cleaned) = remove_preserve(active_context, item, compact_arrays) {
					result.push(cleaned)
				}
			}
			Some(Value::Array(result))
		}

		Value::Object(o) => {
			if let Some(preserved) = object::entry(o, "@preserve") {
				let preserved = match preserved {
					Value::Array(items) if items.len() == 1 => &items[0],
					other => other,
				};

				if preserved.as_string() == Some("@null") {
					return None;
				}

				return remove_preserve(active_context, preserved, compact_arrays);
			}

			if object::is_value_object(value) {
				return Some(value.clone());
			}

			let mut result = Object::default();
			for entry in o.entries() {
				let key = entry.key.as_str();
				let cleaned = remove_preserve(active_context, &entry.value, compact_arrays);

				let container = active_context
					.get(key)
					.map(|d| d.container)
					.unwrap_or(Container::None);

				let cleaned = match cleaned {
					// A preserved `@null` default surfaces as a null
					// property value.
					None => Value::Null,
					Some(Value::Array(mut items)) => {
						if compact_arrays
							&& items.len() == 1
							&& !container.contains(ContainerKind::Set)
							&& !container.contains(ContainerKind::List)
							&& key != "@graph"
							&& key != "@list"
						{
							items.remove(0)
						} else {
							Value::Array(items)
						}
					}
					Some(other) => other,
				};

				result.insert(entry.key.clone(), cleaned);
			}

			Some(Value::Object(result))
		}

		other => Some(other.clone()),
	}
}

/// Removes the `@id` entries holding a blank node identifier used exactly
/// once in the framed output.
pub fn prune_blank_nodes(value: &mut Value) {
	let mut usages = HashMap::new();
	count_blank_nodes(value, &mut usages);
	prune(value, &usages);
}

fn count_blank_nodes(value: &Value, usages: &mut HashMap<String, usize>) {
	match value {
		Value::Array(items) => {
			for item in items {
				count_blank_nodes(item, usages)
			}
		}
		Value::Object(o) => {
			for entry in o.entries() {
				if matches!(entry.key.as_str(), "@id" | "@type") {
					for id in Value::force_as_array(&entry.value) {
						if let Some(id) = id.as_string() {
							if id.starts_with("_:") {
								*usages.entry(id.to_string()).or_insert(0) += 1;
							}
						}
					}
				}

				count_blank_nodes(&entry.value, usages)
			}
		}
		_ => (),
	}
}

fn prune(value: &mut Value, usages: &HashMap<String, usize>) {
	match value {
		Value::Array(items) => {
			for item in items {
				prune(item, usages)
			}
		}
		Value::Object(o) => {
			let single_use = object::entry(o, "@id")
				.and_then(Value::as_string)
				.map(|id| id.starts_with("_:") && usages.get(id).copied() == Some(1))
				.unwrap_or(false);

			if single_use {
				o.remove_unique("@id").ok();
			}

			let keys: Vec<String> = o.entries().iter().map(|e| e.key.to_string()).collect();
			for key in keys {
				if let Some(entry_value) = o.get_unique_mut(key.as_str()).ok().flatten() {
					prune(entry_value, usages)
				}
			}
		}
		_ => (),
	}
}
