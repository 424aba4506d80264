use crate::{Id, Keyword};
use iref::IriBuf;
use std::fmt;

/// Result of IRI expansion: either `null`, a node identifier, or a
/// keyword.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Term {
	/// `null` value.
	Null,

	/// Node identifier.
	Id(Id),

	/// Keyword.
	Keyword(Keyword),
}

impl Term {
	#[inline(always)]
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	#[inline(always)]
	pub fn is_keyword(&self) -> bool {
		matches!(self, Self::Keyword(_))
	}

	pub fn as_keyword(&self) -> Option<Keyword> {
		match self {
			Self::Keyword(k) => Some(*k),
			_ => None,
		}
	}

	pub fn as_id(&self) -> Option<&Id> {
		match self {
			Self::Id(id) => Some(id),
			_ => None,
		}
	}

	pub fn as_iri(&self) -> Option<&IriBuf> {
		match self {
			Self::Id(id) => id.as_iri(),
			_ => None,
		}
	}

	/// String representation: the identifier, the keyword, or the empty
	/// string for `null`.
	pub fn as_str(&self) -> &str {
		match self {
			Self::Null => "",
			Self::Id(id) => id.as_str(),
			Self::Keyword(k) => k.into_str(),
		}
	}
}

impl From<Id> for Term {
	fn from(id: Id) -> Self {
		Self::Id(id)
	}
}

impl From<IriBuf> for Term {
	fn from(iri: IriBuf) -> Self {
		Self::Id(Id::iri(iri))
	}
}

impl From<Keyword> for Term {
	fn from(k: Keyword) -> Self {
		Self::Keyword(k)
	}
}

impl TryFrom<Term> for Id {
	type Error = Term;

	fn try_from(term: Term) -> Result<Id, Term> {
		match term {
			Term::Id(id) => Ok(id),
			term => Err(term),
		}
	}
}

impl PartialEq<Keyword> for Term {
	fn eq(&self, other: &Keyword) -> bool {
		matches!(self, Self::Keyword(k) if k == other)
	}
}

impl fmt::Display for Term {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.as_str().fmt(f)
	}
}
