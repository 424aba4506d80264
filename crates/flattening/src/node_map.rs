use crate::Error;
use indexmap::IndexMap;
use json_syntax::{object::Entry, Object, Value};
use lod_core::{object, IdentifierIssuer};
use rdf_types::BlankId;

/// Node map: graph name → node identifier → node object.
///
/// The default graph is named `@default`. Nodes are kept in expanded
/// form, without embedded nodes: every node-to-node link is a node
/// reference.
#[derive(Debug, Default)]
pub struct NodeMap {
	graphs: IndexMap<String, NodeMapGraph>,
}

impl NodeMap {
	pub fn new() -> Self {
		let mut graphs = IndexMap::new();
		graphs.insert("@default".to_string(), NodeMapGraph::default());
		Self { graphs }
	}

	pub fn graph(&self, name: &str) -> Option<&NodeMapGraph> {
		self.graphs.get(name)
	}

	pub fn default_graph(&self) -> &NodeMapGraph {
		self.graphs.get("@default").unwrap()
	}

	pub fn graph_names(&self) -> impl Iterator<Item = &str> {
		self.graphs.keys().map(String::as_str)
	}

	fn graph_mut(&mut self, name: &str) -> &mut NodeMapGraph {
		self.graphs.entry(name.to_string()).or_default()
	}

	/// Merges every graph into a single one, combining the properties of
	/// nodes sharing an identifier. Used by framing.
	pub fn merged(&self) -> NodeMapGraph {
		let mut result = NodeMapGraph::default();

		for graph in self.graphs.values() {
			for (id, node) in &graph.nodes {
				let target = result.declare_node(id, None).unwrap();
				for Entry { key, value } in node.entries() {
					if key == "@id" {
						continue;
					}

					for item in Value::force_as_array(value) {
						add_unique_value(target, key.as_str(), item.clone());
					}
				}
			}
		}

		result
	}
}

/// Nodes of a single graph, keyed by identifier.
#[derive(Debug, Default, Clone)]
pub struct NodeMapGraph {
	nodes: IndexMap<String, Object>,
}

impl NodeMapGraph {
	pub fn contains(&self, id: &str) -> bool {
		self.nodes.contains_key(id)
	}

	pub fn get(&self, id: &str) -> Option<&Object> {
		self.nodes.get(id)
	}

	pub fn get_mut(&mut self, id: &str) -> Option<&mut Object> {
		self.nodes.get_mut(id)
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Object)> {
		self.nodes.iter().map(|(id, node)| (id.as_str(), node))
	}

	/// Nodes sorted by identifier.
	pub fn iter_sorted(&self) -> impl Iterator<Item = (&str, &Object)> {
		let mut nodes: Vec<_> = self.iter().collect();
		nodes.sort_unstable_by_key(|(id, _)| *id);
		nodes.into_iter()
	}

	/// Returns the node with the given identifier, creating its entry if
	/// missing. Fails when `index` conflicts with an already recorded
	/// index for this node.
	pub fn declare_node(&mut self, id: &str, index: Option<&Value>) -> Result<&mut Object, Error> {
		let node = self.nodes.entry(id.to_string()).or_insert_with(|| {
			let mut node = Object::default();
			node.insert("@id".into(), Value::String(id.into()));
			node
		});

		if let Some(index) = index {
			match object::entry(node, "@index") {
				Some(existing) if existing != index => {
					return Err(Error::ConflictingIndexes {
						node_id: id.to_string(),
						defined_index: existing
							.as_string()
							.unwrap_or_default()
							.to_string(),
						conflicting_index: index.as_string().unwrap_or_default().to_string(),
					})
				}
				Some(_) => (),
				None => {
					node.insert("@index".into(), index.clone());
				}
			}
		}

		Ok(node)
	}
}

/// Adds `value` to the `key` array entry of `node`, skipping values
/// already present (structural equality).
fn add_unique_value(node: &mut Object, key: &str, value: Value) {
	match object::entry(node, key) {
		Some(existing) => {
			let already_present = Value::force_as_array(existing).contains(&value);
			if !already_present {
				object::add_value(node, key, value, true)
			}
		}
		None => object::add_value(node, key, value, true),
	}
}

/// Node Map Generation algorithm.
///
/// See <https://www.w3.org/TR/json-ld11-api/#node-map-generation>.
pub fn generate_node_map(
	expanded: &Value,
	issuer: &mut IdentifierIssuer,
) -> Result<NodeMap, Error> {
	let mut node_map = NodeMap::new();
	extend_node_map(
		expanded,
		&mut node_map,
		issuer,
		"@default",
		None,
		None,
		&mut None,
	)?;
	Ok(node_map)
}

/// Active subject of the recursion: a node identifier, or the reverse
/// reference to link back to.
enum Subject<'a> {
	Id(&'a str),
	Reverse(&'a Object),
}

#[allow(clippy::too_many_arguments)]
fn extend_node_map(
	element: &Value,
	node_map: &mut NodeMap,
	issuer: &mut IdentifierIssuer,
	active_graph: &str,
	active_subject: Option<&Subject>,
	active_property: Option<&str>,
	list: &mut Option<&mut Vec<Value>>,
) -> Result<(), Error> {
	match element {
		// 1) If element is an array, process each item.
		Value::Array(items) => {
			for item in items {
				extend_node_map(
					item,
					node_map,
					issuer,
					active_graph,
					active_subject,
					active_property,
					list,
				)?;
			}
			Ok(())
		}

		Value::Object(element_object) => {
			// 3) If element has an @type entry, relabel any blank node
			// type.
			let relabeled_types = object::entry(element_object, "@type").map(|types| {
				Value::force_as_array(types)
					.iter()
					.map(|ty| match ty.as_string() {
						Some(s) if BlankId::new(s).is_ok() => {
							Value::String(issuer.issue(s).as_str().into())
						}
						_ => ty.clone(),
					})
					.collect::<Vec<Value>>()
			});

			if object::entry(element_object, "@value").is_some() {
				// 4) If element has an @value entry.
				let mut element = element.clone();
				if let (Some(types), Some(o)) = (&relabeled_types, element.as_object_mut()) {
					o.remove_unique("@type").ok();
					o.insert("@type".into(), Value::Array(types.clone()));
				}

				match list {
					None => {
						// 4.1) Add element to the active property of the
						// active subject, unless already present.
						if let (Some(Subject::Id(subject)), Some(property)) =
							(active_subject, active_property)
						{
							let node =
								node_map.graph_mut(active_graph).get_mut(subject).unwrap();
							add_unique_value(node, property, element);
						}
					}
					Some(list) => {
						// 4.2) Otherwise, append element to the @list
						// array of list.
						list.push(element)
					}
				}

				Ok(())
			} else if let Some(list_value) = object::entry(element_object, "@list") {
				// 5) Otherwise, if element has an @list entry.
				let mut flattened_list = Vec::new();
				extend_node_map(
					list_value,
					node_map,
					issuer,
					active_graph,
					active_subject,
					active_property,
					&mut Some(&mut flattened_list),
				)?;

				let mut result = Object::default();
				result.insert("@list".into(), Value::Array(flattened_list));
				if let Some(index) = object::entry(element_object, "@index") {
					result.insert("@index".into(), index.clone());
				}

				match list {
					None => {
						if let (Some(Subject::Id(subject)), Some(property)) =
							(active_subject, active_property)
						{
							let node =
								node_map.graph_mut(active_graph).get_mut(subject).unwrap();
							object::add_value(node, property, Value::Object(result), true);
						}
					}
					Some(list) => list.push(Value::Object(result)),
				}

				Ok(())
			} else {
				// 6) Otherwise, element is a node object.
				let id = match object::entry(element_object, "@id").and_then(Value::as_string)
				{
					Some(id) if BlankId::new(id).is_ok() => issuer.issue(id).to_string(),
					Some(id) => id.to_string(),
					None => issuer.next().to_string(),
				};

				// 6.3) Create an entry for the node in the graph.
				node_map
					.graph_mut(active_graph)
					.declare_node(&id, None)?;

				// 6.4) If active subject is a map (a reverse reference),
				// add it to the node.
				if let Some(Subject::Reverse(reference)) = active_subject {
					let node = node_map.graph_mut(active_graph).get_mut(&id).unwrap();
					add_unique_value(
						node,
						active_property.unwrap(),
						Value::Object((*reference).clone()),
					);
				} else if let (Some(Subject::Id(subject)), Some(property)) =
					(active_subject, active_property)
				{
					// 6.5) Otherwise, if active property is not null, link
					// the node from the active subject.
					let mut reference = Object::default();
					reference.insert("@id".into(), Value::String(id.as_str().into()));

					match list {
						None => {
							let node =
								node_map.graph_mut(active_graph).get_mut(subject).unwrap();
							add_unique_value(node, property, Value::Object(reference));
						}
						Some(list) => list.push(Value::Object(reference)),
					}
				}

				// 6.6) If element has an @type entry, merge it into the
				// node's types.
				if let Some(types) = relabeled_types {
					let node = node_map.graph_mut(active_graph).get_mut(&id).unwrap();
					for ty in types {
						add_unique_value(node, "@type", ty);
					}
				}

				// 6.7) If element has an @index entry, record it, failing
				// on conflicting indexes.
				if let Some(index) = object::entry(element_object, "@index") {
					node_map
						.graph_mut(active_graph)
						.declare_node(&id, Some(index))?;
				}

				// 6.8) If element has an @reverse entry, process each
				// reverse value with a reverse reference to this node.
				if let Some(Value::Object(reverse_map)) =
					object::entry(element_object, "@reverse")
				{
					let mut referenced_node = Object::default();
					referenced_node.insert("@id".into(), Value::String(id.as_str().into()));
					let reference = Subject::Reverse(&referenced_node);

					for Entry { key, value } in reverse_map.entries() {
						for item in Value::force_as_array(value) {
							extend_node_map(
								item,
								node_map,
								issuer,
								active_graph,
								Some(&reference),
								Some(key.as_str()),
								&mut None,
							)?;
						}
					}
				}

				// 6.9) If element has an @graph entry, process its content
				// under the graph named after this node.
				if let Some(graph_value) = object::entry(element_object, "@graph") {
					node_map.graph_mut(&id);
					extend_node_map(
						graph_value,
						node_map,
						issuer,
						&id,
						None,
						None,
						&mut None,
					)?;
				}

				// 6.10) If element has an @included entry, process its
				// content in the current graph.
				if let Some(included) = object::entry(element_object, "@included") {
					extend_node_map(
						included,
						node_map,
						issuer,
						active_graph,
						None,
						None,
						&mut None,
					)?;
				}

				// 6.11) Finally, process each property, creating the
				// property entry on the node even when its value is empty.
				for Entry { key, value } in element_object.entries() {
					let property = key.as_str();
					if matches!(
						property,
						"@id" | "@type" | "@index" | "@reverse" | "@graph" | "@included"
					) {
						continue;
					}

					let property = if BlankId::new(property).is_ok() {
						issuer.issue(property).to_string()
					} else {
						property.to_string()
					};

					{
						let node = node_map.graph_mut(active_graph).get_mut(&id).unwrap();
						if object::entry(node, &property).is_none() {
							node.insert(property.as_str().into(), Value::Array(Vec::new()));
						}
					}

					extend_node_map(
						value,
						node_map,
						issuer,
						active_graph,
						Some(&Subject::Id(&id)),
						Some(&property),
						&mut None,
					)?;
				}

				Ok(())
			}
		}

		// 2) Scalars only appear inside lists.
		_ => {
			if let Some(list) = list {
				list.push(element.clone())
			}

			Ok(())
		}
	}
}
