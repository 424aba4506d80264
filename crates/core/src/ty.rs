use crate::{Id, Keyword, Term};
use iref::IriBuf;

/// Type mapping of a term definition.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Type {
	Id,
	Json,
	None,
	Vocab,
	Iri(IriBuf),
}

impl Type {
	pub fn as_str(&self) -> &str {
		match self {
			Self::Id => "@id",
			Self::Json => "@json",
			Self::None => "@none",
			Self::Vocab => "@vocab",
			Self::Iri(iri) => iri.as_str(),
		}
	}

	pub fn as_iri(&self) -> Option<&IriBuf> {
		match self {
			Self::Iri(iri) => Some(iri),
			_ => None,
		}
	}
}

impl TryFrom<Term> for Type {
	type Error = Term;

	fn try_from(term: Term) -> Result<Type, Term> {
		match term {
			Term::Keyword(Keyword::Id) => Ok(Self::Id),
			Term::Keyword(Keyword::Json) => Ok(Self::Json),
			Term::Keyword(Keyword::None) => Ok(Self::None),
			Term::Keyword(Keyword::Vocab) => Ok(Self::Vocab),
			Term::Id(Id::Valid(rdf_types::Id::Iri(iri))) => Ok(Self::Iri(iri)),
			term => Err(term),
		}
	}
}
