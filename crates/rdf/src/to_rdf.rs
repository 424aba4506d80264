use json_syntax::{Object, Print, Value};
use lod_core::rdf::{
	self, i18n, Dataset, Literal, ValidId, RDF_DIRECTION, RDF_FIRST, RDF_JSON, RDF_LANGUAGE,
	RDF_NIL, RDF_REST, RDF_TYPE, RDF_VALUE, XSD_BOOLEAN, XSD_DOUBLE, XSD_INTEGER, XSD_STRING,
};
use lod_core::{object, Direction, IdentifierIssuer, Keyword, LenientLangTagBuf, RdfDirection};
use lod_flattening::NodeMap;

/// RDF serialization options.
#[derive(Clone, Copy, Debug, Default)]
pub struct ToRdfOptions {
	/// Keep quads with a blank node predicate (generalized RDF).
	pub produce_generalized_rdf: bool,

	/// Direction encoding for direction-tagged strings. When unset, the
	/// direction is dropped.
	pub rdf_direction: Option<RdfDirection>,
}

// <https://www.w3.org/TR/xmlschema11-2/#f-doubleLexmap>
const XSD_CANONICAL_FLOAT: pretty_dtoa::FmtFloatConfig = pretty_dtoa::FmtFloatConfig::default()
	.force_e_notation()
	.capitalize_e(true);

/// Deserialize JSON-LD to RDF algorithm: turns a node map into a dataset.
///
/// The identifier issuer must be the one used to generate the node map,
/// so that list conversion can allocate fresh blank node identifiers.
pub fn to_rdf(
	node_map: &NodeMap,
	issuer: &mut IdentifierIssuer,
	options: ToRdfOptions,
) -> Dataset {
	let mut dataset = Dataset::new();

	let mut graph_names: Vec<&str> = node_map.graph_names().collect();
	graph_names.sort_unstable();

	for graph_name in graph_names {
		// 1.2) If graph name is neither the default graph, an IRI nor a
		// blank node identifier, continue.
		let graph_label = if graph_name == "@default" {
			None
		} else {
			match node_id(graph_name) {
				Some(id) => Some(id),
				None => continue,
			}
		};

		let graph = node_map.graph(graph_name).unwrap();
		let mut ids: Vec<&str> = graph.iter().map(|(id, _)| id).collect();
		ids.sort_unstable();

		for id in ids {
			// 1.3.1) If subject is neither an IRI nor a blank node
			// identifier, continue.
			let Some(subject) = node_id(id) else {
				continue;
			};

			let node = graph.get(id).unwrap();

			for entry in node.entries() {
				let property = entry.key.as_str();

				match property {
					"@type" => {
						// 1.3.2.1) Emit an rdf:type quad for each
						// well-formed type.
						for ty in Value::force_as_array(&entry.value) {
							let Some(ty) = ty.as_string().and_then(node_id) else {
								continue;
							};

							dataset.insert(rdf_types::Quad(
								subject.clone(),
								ValidId::Iri(RDF_TYPE.to_owned()),
								rdf::Value::Id(ty),
								graph_label.clone(),
							));
						}
					}

					// 1.3.2.2) Keywords carry no quads.
					property if Keyword::try_from(property).is_ok() => (),

					property => {
						// 1.3.2.3) Blank node predicates are dropped
						// unless generalized RDF is requested; 1.3.2.4)
						// non-IRI properties are dropped.
						let Some(predicate) = node_id(property) else {
							continue;
						};

						if matches!(predicate, ValidId::Blank(_))
							&& !options.produce_generalized_rdf
						{
							continue;
						}

						for item in Value::force_as_array(&entry.value) {
							if let Some(object) = object_to_rdf(
								item,
								issuer,
								&mut dataset,
								&graph_label,
								options,
							) {
								dataset.insert(rdf_types::Quad(
									subject.clone(),
									predicate.clone(),
									object,
									graph_label.clone(),
								));
							}
						}
					}
				}
			}
		}
	}

	dataset
}

/// Parses an IRI or blank node identifier.
fn node_id(s: &str) -> Option<ValidId> {
	match lod_core::Id::from_string(s.to_string()) {
		lod_core::Id::Valid(id) => Some(id),
		lod_core::Id::Invalid(_) => None,
	}
}

/// Object to RDF Conversion algorithm.
///
/// Returns the RDF value of an expanded object, emitting auxiliary quads
/// (list chains, compound literals) into `dataset`. Returns `None` when
/// the object cannot be represented, in which case the calling quad is
/// dropped.
fn object_to_rdf(
	item: &Value,
	issuer: &mut IdentifierIssuer,
	dataset: &mut Dataset,
	graph_label: &Option<ValidId>,
	options: ToRdfOptions,
) -> Option<rdf::Value> {
	let item_object = item.as_object()?;

	// Node objects and references convert to their identifier.
	if object::is_node_object(item) && !object::is_list_object(item) {
		return object::node_id(item).and_then(node_id).map(rdf::Value::Id);
	}

	// List objects convert to an rdf:first/rdf:rest chain.
	if let Some(list) = object::entry(item_object, "@list") {
		return Some(list_to_rdf(
			Value::force_as_array(list),
			issuer,
			dataset,
			graph_label,
			options,
		));
	}

	// Value objects convert to literals.
	let value = object::entry(item_object, "@value")?;
	let datatype = object::entry(item_object, "@type").and_then(Value::as_string);
	let language = object::entry(item_object, "@language")
		.and_then(Value::as_string)
		.map(LenientLangTagBuf::from);
	let direction = object::entry(item_object, "@direction")
		.and_then(Value::as_string)
		.and_then(|s| Direction::try_from(s).ok());

	// A language-tagged string with an ill-formed language tag is
	// dropped.
	if let Some(language) = &language {
		if !language.is_well_formed() {
			return None;
		}
	}

	let literal = if datatype == Some("@json") {
		// JSON literals are serialized with the canonical JSON form.
		Literal::typed(canonical_json(value), RDF_JSON.to_owned())
	} else {
		match value {
			Value::Boolean(b) => {
				let lexical = if *b { "true" } else { "false" };
				Literal::typed(
					lexical.to_string(),
					explicit_datatype(datatype).unwrap_or_else(|| XSD_BOOLEAN.to_owned()),
				)
			}
			Value::Number(n) => {
				let as_double = datatype == Some(XSD_DOUBLE.as_str());
				let f = n.as_f64_lossy();
				if !as_double && f.fract() == 0.0 && f.abs() < 1e21 {
					// Canonical xsd:integer lexical form. Formatting the
					// float directly keeps full precision for magnitudes
					// beyond `i64`; negative zero collapses to `0`.
					let lexical = if f == 0.0 {
						"0".to_string()
					} else {
						format!("{f:.0}")
					};

					Literal::typed(
						lexical,
						explicit_datatype(datatype)
							.unwrap_or_else(|| XSD_INTEGER.to_owned()),
					)
				} else {
					// Canonical xsd:double lexical form.
					Literal::typed(
						pretty_dtoa::dtoa(f, XSD_CANONICAL_FLOAT),
						explicit_datatype(datatype).unwrap_or_else(|| XSD_DOUBLE.to_owned()),
					)
				}
			}
			Value::String(s) => {
				let s = s.as_str();

				match (&language, direction, options.rdf_direction) {
					(language, Some(direction), Some(RdfDirection::I18nDatatype)) => {
						Literal::typed(
							s.to_string(),
							i18n(language.as_ref(), direction),
						)
					}
					(language, Some(direction), Some(RdfDirection::CompoundLiteral)) => {
						// The compound literal replaces the object with a
						// fresh blank node carrying the value parts.
						let blank = issuer.next();
						let id = ValidId::Blank(blank);

						dataset.insert(rdf_types::Quad(
							id.clone(),
							ValidId::Iri(RDF_VALUE.to_owned()),
							rdf::Value::Literal(Literal::string(s.to_string())),
							graph_label.clone(),
						));

						if let Some(language) = language {
							dataset.insert(rdf_types::Quad(
								id.clone(),
								ValidId::Iri(RDF_LANGUAGE.to_owned()),
								rdf::Value::Literal(Literal::string(
									language.to_lowercase().into_string(),
								)),
								graph_label.clone(),
							));
						}

						dataset.insert(rdf_types::Quad(
							id.clone(),
							ValidId::Iri(RDF_DIRECTION.to_owned()),
							rdf::Value::Literal(Literal::string(
								direction.as_str().to_string(),
							)),
							graph_label.clone(),
						));

						return Some(rdf::Value::Id(id));
					}
					(Some(language), _, _) => {
						// Direction, if any, is dropped when no encoding
						// is configured.
						Literal::lang_string(s.to_string(), language.clone())
					}
					(None, _, _) => Literal::typed(
						s.to_string(),
						explicit_datatype(datatype).unwrap_or_else(|| XSD_STRING.to_owned()),
					),
				}
			}
			_ => return None,
		}
	};

	Some(rdf::Value::Literal(literal))
}

fn explicit_datatype(datatype: Option<&str>) -> Option<iref::IriBuf> {
	datatype.and_then(|d| iref::IriBuf::new(d.to_string()).ok())
}

/// List to RDF Conversion algorithm.
fn list_to_rdf(
	list: &[Value],
	issuer: &mut IdentifierIssuer,
	dataset: &mut Dataset,
	graph_label: &Option<ValidId>,
	options: ToRdfOptions,
) -> rdf::Value {
	if list.is_empty() {
		return rdf::Value::iri(RDF_NIL.to_owned());
	}

	// Allocate one blank node per list item, chained with rdf:rest.
	let nodes: Vec<ValidId> = list.iter().map(|_| ValidId::Blank(issuer.next())).collect();

	for (i, (node, item)) in nodes.iter().zip(list).enumerate() {
		if let Some(object) = object_to_rdf(item, issuer, dataset, graph_label, options) {
			dataset.insert(rdf_types::Quad(
				node.clone(),
				ValidId::Iri(RDF_FIRST.to_owned()),
				object,
				graph_label.clone(),
			));
		}

		let rest = match nodes.get(i + 1) {
			Some(next) => rdf::Value::Id(next.clone()),
			None => rdf::Value::iri(RDF_NIL.to_owned()),
		};

		dataset.insert(rdf_types::Quad(
			node.clone(),
			ValidId::Iri(RDF_REST.to_owned()),
			rest,
			graph_label.clone(),
		));
	}

	rdf::Value::Id(nodes[0].clone())
}

/// Canonical JSON form used as the lexical form of `rdf:JSON` literals:
/// object entries sorted by UTF-16 code units at every level, compact
/// printing.
pub fn canonical_json(value: &Value) -> String {
	fn sort(value: &Value) -> Value {
		match value {
			Value::Array(items) => Value::Array(items.iter().map(sort).collect()),
			Value::Object(o) => {
				let mut entries: Vec<(&str, &Value)> = o
					.entries()
					.iter()
					.map(|e| (e.key.as_str(), &e.value))
					.collect();

				entries.sort_by(|(a, _), (b, _)| {
					let a: Vec<u16> = a.encode_utf16().collect();
					let b: Vec<u16> = b.encode_utf16().collect();
					a.cmp(&b)
				});

				let mut sorted = Object::default();
				for (key, value) in entries {
					sorted.insert(key.into(), sort(value));
				}

				Value::Object(sorted)
			}
			other => other.clone(),
		}
	}

	sort(value).compact_print().to_string()
}

#[cfg(test)]
mod tests {
	use super::*;
	use json_syntax::json;

	#[test]
	fn canonical_json_sorts_keys() {
		let value = json!({ "b": 1, "a": { "d": true, "c": [2, 3] } });
		assert_eq!(canonical_json(&value), r#"{"a":{"c":[2,3],"d":true},"b":1}"#);
	}
}
