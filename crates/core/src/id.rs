use crate::Term;
use iref::IriBuf;
use rdf_types::{BlankIdBuf, InvalidBlankId};
use std::fmt;

/// Valid node identifier: an IRI or a blank node identifier.
pub type ValidId = rdf_types::Id<IriBuf, BlankIdBuf>;

/// Node identifier.
///
/// Used to reference a node across a document or to a remote document.
/// It can be an IRI, a blank node identifier, or an invalid reference
/// (a string that is neither). Invalid references are kept through
/// expansion, as required by the API specification, and dropped when
/// producing RDF.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Id {
	/// Valid node identifier.
	Valid(ValidId),

	/// Invalid reference.
	Invalid(String),
}

impl Id {
	pub fn iri(iri: IriBuf) -> Self {
		Self::Valid(ValidId::Iri(iri))
	}

	pub fn blank(b: BlankIdBuf) -> Self {
		Self::Valid(ValidId::Blank(b))
	}

	pub fn from_string(s: String) -> Self {
		match IriBuf::new(s) {
			Ok(iri) => Self::Valid(ValidId::Iri(iri)),
			Err(e) => match BlankIdBuf::new(e.0) {
				Ok(blank) => Self::Valid(ValidId::Blank(blank)),
				Err(InvalidBlankId(s)) => Self::Invalid(s),
			},
		}
	}

	/// Checks if this is a valid reference: an IRI or a blank node
	/// identifier.
	#[inline(always)]
	pub fn is_valid(&self) -> bool {
		!matches!(self, Self::Invalid(_))
	}

	#[inline(always)]
	pub fn is_blank(&self) -> bool {
		matches!(self, Self::Valid(ValidId::Blank(_)))
	}

	#[inline(always)]
	pub fn as_blank(&self) -> Option<&BlankIdBuf> {
		match self {
			Self::Valid(ValidId::Blank(b)) => Some(b),
			_ => None,
		}
	}

	#[inline(always)]
	pub fn is_iri(&self) -> bool {
		matches!(self, Self::Valid(ValidId::Iri(_)))
	}

	#[inline(always)]
	pub fn as_iri(&self) -> Option<&IriBuf> {
		match self {
			Self::Valid(ValidId::Iri(iri)) => Some(iri),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &str {
		match self {
			Self::Valid(ValidId::Iri(iri)) => iri.as_str(),
			Self::Valid(ValidId::Blank(b)) => b.as_str(),
			Self::Invalid(s) => s.as_str(),
		}
	}

	pub fn into_string(self) -> String {
		match self {
			Self::Valid(ValidId::Iri(iri)) => iri.into_string(),
			Self::Valid(ValidId::Blank(b)) => b.to_string(),
			Self::Invalid(s) => s,
		}
	}

	#[inline(always)]
	pub fn into_term(self) -> Term {
		Term::Id(self)
	}
}

impl From<ValidId> for Id {
	fn from(id: ValidId) -> Self {
		Self::Valid(id)
	}
}

impl From<IriBuf> for Id {
	fn from(iri: IriBuf) -> Self {
		Self::Valid(ValidId::Iri(iri))
	}
}

impl From<BlankIdBuf> for Id {
	fn from(b: BlankIdBuf) -> Self {
		Self::Valid(ValidId::Blank(b))
	}
}

impl TryFrom<Id> for ValidId {
	type Error = String;

	fn try_from(id: Id) -> Result<Self, String> {
		match id {
			Id::Valid(id) => Ok(id),
			Id::Invalid(s) => Err(s),
		}
	}
}

impl PartialEq<str> for Id {
	fn eq(&self, other: &str) -> bool {
		self.as_str() == other
	}
}

impl fmt::Display for Id {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.as_str().fmt(f)
	}
}
