//! JSON-LD node map generation and flattening.
//!
//! See <https://www.w3.org/TR/json-ld11-api/#flattening-algorithms>.
use json_syntax::{Object, Value};
use lod_core::{object, ErrorCode, IdentifierIssuer};

mod node_map;

pub use node_map::{generate_node_map, NodeMap, NodeMapGraph};

/// Errors that can happen during node map generation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Conflicting indexes for node `{node_id}`: `{defined_index}` and `{conflicting_index}`")]
	ConflictingIndexes {
		node_id: String,
		defined_index: String,
		conflicting_index: String,
	},
}

impl Error {
	pub fn code(&self) -> ErrorCode {
		match self {
			Self::ConflictingIndexes { .. } => ErrorCode::ConflictingIndexes,
		}
	}
}

/// Flattens an expanded document: collects every node of every graph into
/// a flat, identifier-sorted array of node objects, named graphs becoming
/// `@graph` entries of their graph-name node.
///
/// Blank node identifiers are relabeled by `issuer`, which must be scoped
/// to this call.
pub fn flatten(expanded: &Value, issuer: &mut IdentifierIssuer) -> Result<Value, Error> {
	let node_map = generate_node_map(expanded, issuer)?;

	let mut default_graph = node_map.default_graph().clone();

	let mut graph_names: Vec<&str> = node_map
		.graph_names()
		.filter(|name| *name != "@default")
		.collect();
	graph_names.sort_unstable();

	for graph_name in graph_names {
		let graph = node_map.graph(graph_name).unwrap();

		// The graph name node entry holds the graph content.
		let entry = default_graph.declare_node(graph_name, None)?;
		let mut nodes = Vec::new();
		for (_, node) in graph.iter_sorted() {
			if !is_id_only(node) {
				nodes.push(Value::Object(node.clone()))
			}
		}

		entry.insert("@graph".into(), Value::Array(nodes));
	}

	let mut result = Vec::new();
	for (_, node) in default_graph.iter_sorted() {
		if !is_id_only(node) {
			result.push(Value::Object(node.clone()))
		}
	}

	Ok(Value::Array(result))
}

/// Checks if a node object carries nothing but its identifier.
fn is_id_only(node: &Object) -> bool {
	node.len() == 1 && object::entry(node, "@id").is_some()
}

#[cfg(test)]
mod tests {
	use super::*;
	use json_syntax::json;

	#[test]
	fn flattens_nested_nodes() {
		let expanded = json!([
			{
				"@id": "http://example.org/a",
				"http://example.org/knows": [
					{
						"@id": "http://example.org/b",
						"http://example.org/name": [ { "@value": "B" } ]
					}
				]
			}
		]);

		let mut issuer = IdentifierIssuer::new("_:b");
		let flattened = flatten(&expanded, &mut issuer).unwrap();

		let expected = json!([
			{
				"@id": "http://example.org/a",
				"http://example.org/knows": [ { "@id": "http://example.org/b" } ]
			},
			{
				"@id": "http://example.org/b",
				"http://example.org/name": [ { "@value": "B" } ]
			}
		]);

		assert_eq!(flattened, expected);
	}

	#[test]
	fn labels_anonymous_nodes() {
		let expanded = json!([
			{ "http://example.org/p": [ { "@value": 1 } ] },
			{ "http://example.org/p": [ { "@value": 2 } ] }
		]);

		let mut issuer = IdentifierIssuer::new("_:b");
		let flattened = flatten(&expanded, &mut issuer).unwrap();

		let expected = json!([
			{ "@id": "_:b0", "http://example.org/p": [ { "@value": 1 } ] },
			{ "@id": "_:b1", "http://example.org/p": [ { "@value": 2 } ] }
		]);

		assert_eq!(flattened, expected);
	}
}
