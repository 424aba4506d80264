use crate::Error;
use indexmap::IndexMap;
use json_syntax::{Object, Parse, Value};
use lod_core::rdf::{
	self, parse_i18n, Dataset, Literal, ValidId, RDF_DIRECTION, RDF_FIRST, RDF_JSON,
	RDF_LANGUAGE, RDF_NIL, RDF_REST, RDF_TYPE, RDF_VALUE, XSD_BOOLEAN, XSD_DOUBLE, XSD_INTEGER,
	XSD_STRING,
};
use lod_core::{object, RdfDirection};
use std::collections::{HashMap, HashSet};

/// RDF deserialization options.
#[derive(Clone, Copy, Debug, Default)]
pub struct FromRdfOptions {
	/// Convert `xsd:boolean`, `xsd:integer` and `xsd:double` literals to
	/// native JSON values.
	pub use_native_types: bool,

	/// Keep `rdf:type` quads as regular properties instead of `@type`.
	pub use_rdf_type: bool,

	/// Direction encoding recognized when rebuilding direction-tagged
	/// strings.
	pub rdf_direction: Option<RdfDirection>,
}

/// Parts of a compound literal (a blank node carrying `rdf:value`,
/// `rdf:language` and `rdf:direction` properties).
struct CompoundParts {
	value: Option<String>,
	language: Option<String>,
	direction: Option<String>,
}

/// Serialize RDF as JSON-LD algorithm: turns a dataset into an expanded
/// JSON-LD document.
///
/// See <https://www.w3.org/TR/json-ld11-api/#serialize-rdf-as-json-ld-algorithm>.
pub fn from_rdf(dataset: &Dataset, options: FromRdfOptions) -> Result<Value, Error> {
	// Under the compound-literal direction mode, collect the compound
	// literal blank nodes first; their triples are folded back into value
	// objects.
	let compound = if options.rdf_direction == Some(RdfDirection::CompoundLiteral) {
		collect_compound_literals(dataset)
	} else {
		HashMap::new()
	};

	let mut graph_map: IndexMap<String, IndexMap<String, Object>> = IndexMap::new();
	graph_map.insert("@default".to_string(), IndexMap::new());

	// Potential list heads: blank node → referencing (graph, subject,
	// property), disqualified (`None`) once referenced more than once.
	let mut list_heads: IndexMap<(String, String), Option<(String, String)>> = IndexMap::new();

	for quad in dataset {
		let rdf_types::Quad(subject, predicate, o, graph) = quad;

		let subject_str = subject.to_string();
		if compound.contains_key(&subject_str) {
			continue;
		}

		let graph_name = match graph {
			Some(g) => g.to_string(),
			None => "@default".to_string(),
		};

		// A named graph implies an entry for its name in the default
		// graph.
		if graph_name != "@default" {
			graph_map.entry(graph_name.clone()).or_default();
			let default_graph = graph_map.get_mut("@default").unwrap();
			default_graph
				.entry(graph_name.clone())
				.or_insert_with(|| new_node(&graph_name));
		}

		let node_map = graph_map.get_mut(&graph_name).unwrap();
		node_map
			.entry(subject_str.clone())
			.or_insert_with(|| new_node(&subject_str));

		let predicate_str = predicate.to_string();

		let object_id = match o {
			rdf::Value::Id(id) => {
				let id_str = id.to_string();
				if compound.contains_key(&id_str) {
					None
				} else {
					Some(id_str)
				}
			}
			rdf::Value::Literal(_) => None,
		};

		// Referenced nodes get their own entry, except rdf:nil.
		if let Some(id) = &object_id {
			if id != RDF_NIL.as_str() {
				node_map.entry(id.clone()).or_insert_with(|| new_node(id));
			}
		}

		// rdf:type quads populate @type, unless `useRdfType` is set.
		if predicate_str == RDF_TYPE.as_str() && object_id.is_some() && !options.use_rdf_type {
			let node = node_map.get_mut(&subject_str).unwrap();
			object::add_value(
				node,
				"@type",
				Value::String(object_id.unwrap().as_str().into()),
				true,
			);
			continue;
		}

		let value = match (&object_id, o) {
			// An rdf:nil object outside a list chain is an empty list.
			(Some(id), _) if id == RDF_NIL.as_str() && predicate_str != RDF_REST.as_str() => {
				let mut list = Object::default();
				list.insert("@list".into(), Value::Array(Vec::new()));
				Value::Object(list)
			}
			_ => rdf_to_object(o, &options, &compound)?,
		};

		let node = node_map.get_mut(&subject_str).unwrap();
		object::add_value(node, &predicate_str, value, true);

		// A blank object node may be the head of an RDF list; it cannot
		// be one once referenced more than once.
		if let Some(id) = &object_id {
			if id.starts_with("_:")
				&& predicate_str != RDF_FIRST.as_str()
				&& predicate_str != RDF_REST.as_str()
			{
				let key = (graph_name.clone(), id.clone());
				match list_heads.get_mut(&key) {
					Some(state) => *state = None,
					None => {
						list_heads.insert(key, Some((subject_str.clone(), predicate_str)));
					}
				}
			}
		}
	}

	// Convert well-formed rdf:first/rdf:rest chains to @list arrays.
	for ((graph_name, head), state) in &list_heads {
		let Some((referencing_subject, referencing_property)) = state else {
			continue;
		};

		convert_list(
			graph_map.get_mut(graph_name).unwrap(),
			head,
			referencing_subject,
			referencing_property,
		);
	}

	// Assemble the result: default graph nodes in identifier order, named
	// graph contents under the @graph entry of their graph name node.
	let default_graph = graph_map.get("@default").unwrap();
	let mut subjects: Vec<&String> = default_graph.keys().collect();
	subjects.sort_unstable();

	let mut result = Vec::new();
	for subject in subjects {
		let mut node = default_graph.get(subject).unwrap().clone();

		if let Some(graph) = graph_map.get(subject) {
			let mut ids: Vec<&String> = graph.keys().collect();
			ids.sort_unstable();

			let mut graph_nodes = Vec::new();
			for id in ids {
				let graph_node = graph.get(id).unwrap();
				if !is_id_only(graph_node) {
					graph_nodes.push(Value::Object(graph_node.clone()))
				}
			}

			node.insert("@graph".into(), Value::Array(graph_nodes));
		}

		if !is_id_only(&node) {
			result.push(Value::Object(node))
		}
	}

	Ok(Value::Array(result))
}

fn new_node(id: &str) -> Object {
	let mut node = Object::default();
	node.insert("@id".into(), Value::String(id.into()));
	node
}

fn is_id_only(node: &Object) -> bool {
	node.len() == 1 && object::entry(node, "@id").is_some()
}

/// Walks an rdf:first/rdf:rest chain starting at `head`; when the chain
/// is well-formed, replaces the node reference in the referencing node
/// with a list object and removes the consumed chain nodes.
fn convert_list(
	node_map: &mut IndexMap<String, Object>,
	head: &str,
	referencing_subject: &str,
	referencing_property: &str,
) {
	let mut items = Vec::new();
	let mut consumed = Vec::new();
	let mut current = head.to_string();
	let mut seen = HashSet::new();

	loop {
		if current == RDF_NIL.as_str() {
			break;
		}

		if !seen.insert(current.clone()) {
			// cycle
			return;
		}

		let Some(node) = node_map.get(&current) else {
			return;
		};

		// A valid list node is a blank node carrying exactly @id,
		// rdf:first (one value) and rdf:rest (one node reference).
		if !current.starts_with("_:") || node.len() != 3 {
			return;
		}

		let first = object::entry(node, RDF_FIRST.as_str()).map(Value::force_as_array);
		let rest = object::entry(node, RDF_REST.as_str()).map(Value::force_as_array);

		let (Some([first]), Some([rest])) = (first, rest) else {
			return;
		};

		let Some(next) = object::node_id(rest) else {
			return;
		};

		items.push(first.clone());
		consumed.push(current.clone());
		current = next.to_string();
	}

	// Replace the reference in the referencing node.
	let Some(referencing_node) = node_map.get_mut(referencing_subject) else {
		return;
	};

	let Some(values) = referencing_node
		.get_unique_mut(referencing_property)
		.ok()
		.flatten()
		.and_then(Value::as_array_mut)
	else {
		return;
	};

	for value in values.iter_mut() {
		if object::node_id(value) == Some(head) && object::is_node_reference(value) {
			let mut list = Object::default();
			list.insert("@list".into(), Value::Array(items));
			*value = Value::Object(list);
			break;
		}
	}

	for id in consumed {
		node_map.shift_remove(&id);
	}
}

/// Collects compound literal blank nodes: subjects carrying an
/// `rdf:value` property, whose parts are reassembled into value objects.
fn collect_compound_literals(dataset: &Dataset) -> HashMap<String, CompoundParts> {
	let mut compound: HashMap<String, CompoundParts> = HashMap::new();

	for quad in dataset {
		let rdf_types::Quad(subject, predicate, o, _) = quad;

		if let ValidId::Blank(b) = subject {
			if *predicate == ValidId::Iri(RDF_VALUE.to_owned()) {
				if let rdf::Value::Literal(l) = o {
					compound
						.entry(b.to_string())
						.or_insert_with(|| CompoundParts {
							value: None,
							language: None,
							direction: None,
						})
						.value = Some(l.value.clone());
				}
			}
		}
	}

	for quad in dataset {
		let rdf_types::Quad(subject, predicate, o, _) = quad;

		if let ValidId::Blank(b) = subject {
			if let Some(parts) = compound.get_mut(&b.to_string()) {
				if let rdf::Value::Literal(l) = o {
					if *predicate == ValidId::Iri(RDF_LANGUAGE.to_owned()) {
						parts.language = Some(l.value.clone());
					} else if *predicate == ValidId::Iri(RDF_DIRECTION.to_owned()) {
						parts.direction = Some(l.value.clone());
					}
				}
			}
		}
	}

	compound
}

/// RDF to Object Conversion algorithm.
fn rdf_to_object(
	o: &rdf::Value,
	options: &FromRdfOptions,
	compound: &HashMap<String, CompoundParts>,
) -> Result<Value, Error> {
	match o {
		rdf::Value::Id(id) => {
			let id_str = id.to_string();

			// Compound literal references decode to value objects.
			if let Some(parts) = compound.get(&id_str) {
				let mut result = Object::default();
				result.insert(
					"@value".into(),
					Value::String(parts.value.clone().unwrap_or_default().into()),
				);
				if let Some(language) = &parts.language {
					result.insert("@language".into(), Value::String(language.as_str().into()));
				}
				if let Some(direction) = &parts.direction {
					result
						.insert("@direction".into(), Value::String(direction.as_str().into()));
				}
				return Ok(Value::Object(result));
			}

			let mut result = Object::default();
			result.insert("@id".into(), Value::String(id_str.into()));
			Ok(Value::Object(result))
		}

		rdf::Value::Literal(literal) => literal_to_object(literal, options),
	}
}

fn literal_to_object(literal: &Literal, options: &FromRdfOptions) -> Result<Value, Error> {
	let mut result = Object::default();

	// Language-tagged strings.
	if let Some(language) = &literal.language {
		result.insert("@value".into(), Value::String(literal.value.as_str().into()));
		result.insert("@language".into(), Value::String(language.as_str().into()));
		return Ok(Value::Object(result));
	}

	// JSON literals.
	if literal.datatype.as_iri() == RDF_JSON {
		let (value, _) =
			Value::parse_str(&literal.value).map_err(|_| Error::InvalidJsonLiteral)?;
		result.insert("@value".into(), value);
		result.insert("@type".into(), Value::String("@json".into()));
		return Ok(Value::Object(result));
	}

	// i18n datatypes carry a language and a direction.
	if options.rdf_direction == Some(RdfDirection::I18nDatatype) {
		if let Some((language, direction)) = parse_i18n(&literal.datatype) {
			result.insert("@value".into(), Value::String(literal.value.as_str().into()));
			if let Some(language) = language {
				result.insert("@language".into(), Value::String(language.as_str().into()));
			}
			result.insert(
				"@direction".into(),
				Value::String(direction.as_str().into()),
			);
			return Ok(Value::Object(result));
		}
	}

	if options.use_native_types {
		// Booleans, integers and doubles become native values when their
		// lexical form is canonical enough to parse.
		if literal.datatype.as_iri() == XSD_BOOLEAN {
			match literal.value.as_str() {
				"true" => {
					result.insert("@value".into(), Value::Boolean(true));
					return Ok(Value::Object(result));
				}
				"false" => {
					result.insert("@value".into(), Value::Boolean(false));
					return Ok(Value::Object(result));
				}
				_ => (),
			}
		} else if literal.datatype.as_iri() == XSD_INTEGER || literal.datatype.as_iri() == XSD_DOUBLE {
			if let Ok((value @ Value::Number(_), _)) = Value::parse_str(&literal.value) {
				result.insert("@value".into(), value);
				return Ok(Value::Object(result));
			}
		}
	}

	result.insert("@value".into(), Value::String(literal.value.as_str().into()));
	if literal.datatype.as_iri() != XSD_STRING {
		result.insert(
			"@type".into(),
			Value::String(literal.datatype.as_str().into()),
		);
	}

	Ok(Value::Object(result))
}
