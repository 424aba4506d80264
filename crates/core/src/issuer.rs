use indexmap::IndexMap;
use rdf_types::BlankIdBuf;

/// Blank node identifier issuer.
///
/// Issues identifiers of the form `<prefix><counter>`, keeping track of
/// every identifier issued for an existing label and of the order in which
/// labels were first seen. The canonicalization algorithm relies on both
/// the mapping and the issuance order, and clones issuers during its
/// permutation search.
#[derive(Clone, Debug)]
pub struct IdentifierIssuer {
	prefix: String,
	counter: usize,
	issued: IndexMap<String, BlankIdBuf>,
}

impl IdentifierIssuer {
	/// Creates a new issuer with the given prefix, e.g. `_:b` or `_:c14n`.
	///
	/// The prefix must start with `_:` and be followed by blank node label
	/// characters, so that every issued identifier is a valid blank node
	/// identifier.
	pub fn new(prefix: impl Into<String>) -> Self {
		let prefix = prefix.into();
		debug_assert!(prefix.starts_with("_:"));
		Self {
			prefix,
			counter: 0,
			issued: IndexMap::new(),
		}
	}

	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	fn next_label(&mut self) -> BlankIdBuf {
		let label = BlankIdBuf::new(format!("{}{}", self.prefix, self.counter)).unwrap();
		self.counter += 1;
		label
	}

	/// Issues a fresh identifier, not associated with any existing label.
	pub fn next(&mut self) -> BlankIdBuf {
		self.next_label()
	}

	/// Returns the identifier issued for `existing`, issuing a new one on
	/// first use.
	pub fn issue(&mut self, existing: &str) -> BlankIdBuf {
		if let Some(id) = self.issued.get(existing) {
			return id.clone();
		}

		let id = self.next_label();
		self.issued.insert(existing.to_string(), id.clone());
		id
	}

	/// Checks if an identifier has been issued for `existing`.
	pub fn has_issued(&self, existing: &str) -> bool {
		self.issued.contains_key(existing)
	}

	/// Returns the identifier issued for `existing`, if any.
	pub fn get(&self, existing: &str) -> Option<&BlankIdBuf> {
		self.issued.get(existing)
	}

	/// Existing labels in issuance order.
	pub fn order(&self) -> impl Iterator<Item = &str> {
		self.issued.keys().map(String::as_str)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn issues_in_order() {
		let mut issuer = IdentifierIssuer::new("_:b");
		assert_eq!(issuer.issue("x").as_str(), "_:b0");
		assert_eq!(issuer.issue("y").as_str(), "_:b1");
		assert_eq!(issuer.issue("x").as_str(), "_:b0");
		assert!(issuer.has_issued("y"));
		assert!(!issuer.has_issued("z"));

		let order: Vec<_> = issuer.order().collect();
		assert_eq!(order, ["x", "y"]);
	}
}
