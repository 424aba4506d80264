//! URDNA2015 RDF Dataset Canonicalization.
//!
//! Deterministically relabels the blank nodes of a dataset with
//! `_:c14n`-prefixed identifiers, so that isomorphic datasets serialize
//! to byte-identical canonical N-Quads.
//!
//! See <https://www.w3.org/TR/rdf-canon/>.
use indexmap::IndexMap;
use lod_core::rdf::{nquads, Dataset, Quad, ValidId, Value};
use lod_core::IdentifierIssuer;
use rdf_types::BlankIdBuf;
use sha2::{Digest, Sha256};

mod permutation;

use permutation::Permutations;

/// Canonicalizes a dataset: every blank node is relabeled with its
/// canonical `_:c14n` identifier.
pub fn canonicalize(dataset: &Dataset) -> Dataset {
	Urdna2015::new(dataset).run()
}

/// Canonical N-Quads serialization of a dataset: quads are relabeled by
/// [`canonicalize`] and serialized in sorted order.
pub fn canonical_nquads(dataset: &Dataset) -> String {
	nquads::serialize_dataset(&canonicalize(dataset))
}

struct BlankNodeInfo {
	quads: Vec<Quad>,
	hash: Option<String>,
}

/// Canonicalization state, scoped to a single dataset.
struct Urdna2015 {
	blank_node_info: IndexMap<String, BlankNodeInfo>,
	canonical_issuer: IdentifierIssuer,
	quads: Vec<Quad>,
}

impl Urdna2015 {
	fn new(dataset: &Dataset) -> Self {
		let mut blank_node_info: IndexMap<String, BlankNodeInfo> = IndexMap::new();
		let mut quads = Vec::with_capacity(dataset.len());

		// 2) For every quad, map each blank node it mentions to the quad.
		for quad in dataset {
			for label in quad_blank_nodes(quad) {
				blank_node_info
					.entry(label.to_string())
					.or_insert_with(|| BlankNodeInfo {
						quads: Vec::new(),
						hash: None,
					})
					.quads
					.push(quad.clone());
			}

			quads.push(quad.clone());
		}

		Self {
			blank_node_info,
			canonical_issuer: IdentifierIssuer::new("_:c14n"),
			quads,
		}
	}

	/// 4.4) Canonicalization algorithm.
	fn run(mut self) -> Dataset {
		// 3) Track the blank node identifiers without a canonical label.
		let mut non_normalized: Vec<String> =
			self.blank_node_info.keys().cloned().collect();

		// 5) Issue canonical identifiers for blank nodes with a unique
		// first-degree hash, repeating while at least one was issued.
		let mut simple = true;
		while simple {
			simple = false;

			let mut hash_to_blank_nodes: IndexMap<String, Vec<String>> = IndexMap::new();
			for id in &non_normalized {
				let hash = self.hash_first_degree_quads(id);
				hash_to_blank_nodes.entry(hash).or_default().push(id.clone());
			}

			let mut hashes: Vec<&String> = hash_to_blank_nodes.keys().collect();
			hashes.sort_unstable();

			for hash in hashes.into_iter().cloned().collect::<Vec<String>>() {
				let id_list = &hash_to_blank_nodes[&hash];
				if id_list.len() > 1 {
					continue;
				}

				let id = id_list[0].clone();
				self.canonical_issuer.issue(&id);
				non_normalized.retain(|other| *other != id);
				simple = true;
			}
		}

		// 6) The remaining blank nodes share their first-degree hash with
		// others; disambiguate them through the N-degree hash, in hash
		// order.
		let mut hash_to_blank_nodes: IndexMap<String, Vec<String>> = IndexMap::new();
		for id in &non_normalized {
			let hash = self.hash_first_degree_quads(id);
			hash_to_blank_nodes.entry(hash).or_default().push(id.clone());
		}

		let mut hashes: Vec<String> = hash_to_blank_nodes.keys().cloned().collect();
		hashes.sort_unstable();

		for hash in hashes {
			let id_list = hash_to_blank_nodes[&hash].clone();

			let mut hash_path_list = Vec::new();
			for id in id_list {
				if self.canonical_issuer.has_issued(&id) {
					continue;
				}

				let mut issuer = IdentifierIssuer::new("_:b");
				issuer.issue(&id);
				hash_path_list.push(self.hash_n_degree_quads(&id, issuer));
			}

			// 6.3) Issue canonical identifiers in N-degree hash order,
			// following each temporary issuer's issuance order.
			hash_path_list.sort_by(|(a, _), (b, _)| a.cmp(b));
			for (_, issuer) in hash_path_list {
				let order: Vec<String> = issuer.order().map(str::to_string).collect();
				for existing in order {
					self.canonical_issuer.issue(&existing);
				}
			}
		}

		// 7) Relabel every quad with the canonical identifiers.
		let mut result = Dataset::new();
		let quads: Vec<Quad> = self.quads.iter().cloned().collect();
		for quad in &quads {
			result.insert(self.relabel_quad(quad));
		}

		result
	}

	/// 4.6) Hash First Degree Quads.
	fn hash_first_degree_quads(&mut self, id: &str) -> String {
		if let Some(hash) = self
			.blank_node_info
			.get(id)
			.and_then(|info| info.hash.clone())
		{
			return hash;
		}

		let quads = self.blank_node_info[id].quads.clone();

		// Serialize each quad with position-dependent placeholders: the
		// reference blank node becomes `_:a`, every other blank `_:z`.
		let mut lines: Vec<String> = quads
			.iter()
			.map(|quad| nquads::quad_to_string(&first_degree_quad(quad, id)))
			.collect();

		lines.sort();

		let mut md = Sha256::new();
		for line in lines {
			md.update(line.as_bytes());
		}
		let hash = hex(md.finalize().as_slice());

		self.blank_node_info[id].hash = Some(hash.clone());
		hash
	}

	/// 4.7) Hash Related Blank Node.
	fn hash_related_blank_node(
		&mut self,
		related: &str,
		quad: &Quad,
		issuer: &IdentifierIssuer,
		position: char,
	) -> String {
		// Use the canonical identifier of the related blank node if
		// issued, then the one issued by the path issuer, and the
		// first-degree hash as a last resort.
		let id = if let Some(id) = self.canonical_issuer.get(related) {
			id.to_string()
		} else if let Some(id) = issuer.get(related) {
			id.to_string()
		} else {
			self.hash_first_degree_quads(related)
		};

		let mut md = Sha256::new();
		md.update(position.to_string().as_bytes());
		if position != 'g' {
			md.update(predicate_string(quad).as_bytes());
		}
		md.update(id.as_bytes());

		hex(md.finalize().as_slice())
	}

	/// 4.8) Hash N-Degree Quads.
	fn hash_n_degree_quads(
		&mut self,
		id: &str,
		mut issuer: IdentifierIssuer,
	) -> (String, IdentifierIssuer) {
		// 1-3) Group the blank nodes related to `id` by their related
		// hash.
		let quads = self.blank_node_info[id].quads.clone();
		let mut hash_to_related: IndexMap<String, Vec<String>> = IndexMap::new();

		for quad in &quads {
			for (related, position) in related_blank_nodes(quad, id) {
				let hash = self.hash_related_blank_node(&related, quad, &issuer, position);
				hash_to_related.entry(hash).or_default().push(related);
			}
		}

		let mut md = Sha256::new();

		let mut hashes: Vec<String> = hash_to_related.keys().cloned().collect();
		hashes.sort_unstable();

		// 5) For each group, sorted by related hash, find the
		// lexicographically least identifier path over every permutation
		// of the group.
		for hash in hashes {
			md.update(hash.as_bytes());

			let blank_nodes = hash_to_related[&hash].clone();
			let mut chosen_path = String::new();
			let mut chosen_issuer: Option<IdentifierIssuer> = None;

			'permutations: for permutation in Permutations::new(blank_nodes) {
				let mut issuer_copy = issuer.clone();
				let mut path = String::new();
				let mut recursion_list: Vec<String> = Vec::new();

				for related in &permutation {
					if let Some(canonical) = self.canonical_issuer.get(related) {
						path.push_str(canonical.as_str());
					} else {
						if !issuer_copy.has_issued(related) {
							recursion_list.push(related.clone());
						}

						path.push_str(issuer_copy.issue(related).as_str());
					}

					// Terminate early when the path already compares
					// greater than the chosen one.
					if !chosen_path.is_empty()
						&& path.len() >= chosen_path.len()
						&& path > chosen_path
					{
						continue 'permutations;
					}
				}

				for related in &recursion_list {
					let (result_hash, result_issuer) =
						self.hash_n_degree_quads(related, issuer_copy);

					issuer_copy = result_issuer;
					path.push_str(issuer_copy.issue(related).as_str());
					path.push('<');
					path.push_str(&result_hash);
					path.push('>');

					if !chosen_path.is_empty()
						&& path.len() >= chosen_path.len()
						&& path > chosen_path
					{
						continue 'permutations;
					}
				}

				if chosen_path.is_empty() || path < chosen_path {
					chosen_path = path;
					chosen_issuer = Some(issuer_copy);
				}
			}

			md.update(chosen_path.as_bytes());
			issuer = chosen_issuer.unwrap();
		}

		(hex(md.finalize().as_slice()), issuer)
	}

	fn relabel_quad(&mut self, quad: &Quad) -> Quad {
		let rdf_types::Quad(subject, predicate, object, graph) = quad;

		rdf_types::Quad(
			self.relabel_id(subject),
			predicate.clone(),
			match object {
				Value::Id(id) => Value::Id(self.relabel_id(id)),
				literal => literal.clone(),
			},
			graph.as_ref().map(|g| self.relabel_id(g)),
		)
	}

	fn relabel_id(&mut self, id: &ValidId) -> ValidId {
		match id {
			ValidId::Blank(b) => ValidId::Blank(self.canonical_issuer.issue(b.as_str())),
			iri => iri.clone(),
		}
	}
}

/// Blank node labels mentioned by a quad, in subject, object and graph
/// position.
fn quad_blank_nodes(quad: &Quad) -> impl Iterator<Item = &str> {
	let rdf_types::Quad(subject, _, object, graph) = quad;

	[
		blank_label(subject),
		object.as_id().and_then(|id| blank_label(id)),
		graph.as_ref().and_then(blank_label),
	]
	.into_iter()
	.flatten()
}

/// Blank nodes related to `id` in a quad, with their position code.
fn related_blank_nodes<'a>(quad: &'a Quad, id: &str) -> Vec<(String, char)> {
	let rdf_types::Quad(subject, _, object, graph) = quad;
	let mut related = Vec::new();

	if let Some(label) = blank_label(subject) {
		if label != id {
			related.push((label.to_string(), 's'));
		}
	}

	if let Some(label) = object.as_id().and_then(|i| blank_label(i)) {
		if label != id {
			related.push((label.to_string(), 'o'));
		}
	}

	if let Some(label) = graph.as_ref().and_then(blank_label) {
		if label != id {
			related.push((label.to_string(), 'g'));
		}
	}

	related
}

fn blank_label(id: &ValidId) -> Option<&str> {
	match id {
		ValidId::Blank(b) => Some(b.as_str()),
		ValidId::Iri(_) => None,
	}
}

fn predicate_string(quad: &Quad) -> String {
	match &quad.1 {
		ValidId::Iri(iri) => format!("<{iri}>"),
		ValidId::Blank(b) => b.to_string(),
	}
}

/// First-degree copy of a quad: the reference blank node is serialized as
/// `_:a`, every other blank node as `_:z`.
fn first_degree_quad(quad: &Quad, id: &str) -> Quad {
	let rdf_types::Quad(subject, predicate, object, graph) = quad;

	rdf_types::Quad(
		placeholder(subject, id),
		predicate.clone(),
		match object {
			Value::Id(object_id) => Value::Id(placeholder(object_id, id)),
			literal => literal.clone(),
		},
		graph.as_ref().map(|g| placeholder(g, id)),
	)
}

fn placeholder(node: &ValidId, id: &str) -> ValidId {
	match node {
		ValidId::Blank(b) => {
			let label = if b.as_str() == id { "_:a" } else { "_:z" };
			ValidId::Blank(BlankIdBuf::new(label.to_string()).unwrap())
		}
		iri => iri.clone(),
	}
}

fn hex(bytes: &[u8]) -> String {
	let mut s = String::with_capacity(bytes.len() * 2);
	for b in bytes {
		s.push_str(&format!("{b:02x}"));
	}
	s
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn mutual_blank_nodes() {
		let input = "_:b0 <http://ex/p> _:b1 .\n_:b1 <http://ex/p> _:b0 .\n";
		let dataset = nquads::parse_dataset(input).unwrap();
		let canonical = canonical_nquads(&dataset);

		assert_eq!(
			canonical,
			"_:c14n0 <http://ex/p> _:c14n1 .\n_:c14n1 <http://ex/p> _:c14n0 .\n"
		);

		// Swapping the input labels yields byte-identical output.
		let swapped = "_:z1 <http://ex/p> _:z0 .\n_:z0 <http://ex/p> _:z1 .\n";
		let swapped_dataset = nquads::parse_dataset(swapped).unwrap();
		assert_eq!(canonical_nquads(&swapped_dataset), canonical);
	}

	#[test]
	fn idempotent() {
		let input = "_:a <http://ex/p> <http://ex/o> .\n_:a <http://ex/q> _:b <http://ex/g> .\n";
		let dataset = nquads::parse_dataset(input).unwrap();

		let once = canonicalize(&dataset);
		let twice = canonicalize(&once);
		assert_eq!(
			nquads::serialize_dataset(&once),
			nquads::serialize_dataset(&twice)
		);
	}

	#[test]
	fn shared_hash_group() {
		// Two interchangeable blank nodes hanging off the same subject:
		// their first-degree hashes collide and the N-degree pass must
		// order them deterministically.
		let input = "\
			_:s <http://ex/p> _:x .\n\
			_:s <http://ex/p> _:y .\n\
			_:x <http://ex/q> \"1\" .\n\
			_:y <http://ex/q> \"2\" .\n";
		let dataset = nquads::parse_dataset(input).unwrap();
		let canonical = canonical_nquads(&dataset);

		let relabeled = "\
			_:s <http://ex/p> _:y .\n\
			_:s <http://ex/p> _:x .\n\
			_:y <http://ex/q> \"1\" .\n\
			_:x <http://ex/q> \"2\" .\n";
		let relabeled_dataset = nquads::parse_dataset(relabeled).unwrap();
		assert_eq!(canonical_nquads(&relabeled_dataset), canonical);
	}
}
