//! RDF dataset model.

use crate::{Direction, LenientLangTagBuf};
use indexmap::IndexSet;
use iref::{Iri, IriBuf};
use rdf_types::BlankIdBuf;
use std::fmt;
use std::str::FromStr;
use static_iref::iri;

pub mod nquads;

pub use rdf_types::Quad as GenericQuad;

pub const RDF_TYPE: &Iri = iri!("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");
pub const RDF_FIRST: &Iri = iri!("http://www.w3.org/1999/02/22-rdf-syntax-ns#first");
pub const RDF_REST: &Iri = iri!("http://www.w3.org/1999/02/22-rdf-syntax-ns#rest");
pub const RDF_VALUE: &Iri = iri!("http://www.w3.org/1999/02/22-rdf-syntax-ns#value");
pub const RDF_DIRECTION: &Iri = iri!("http://www.w3.org/1999/02/22-rdf-syntax-ns#direction");
pub const RDF_LANGUAGE: &Iri = iri!("http://www.w3.org/1999/02/22-rdf-syntax-ns#language");
pub const RDF_JSON: &Iri = iri!("http://www.w3.org/1999/02/22-rdf-syntax-ns#JSON");
pub const RDF_NIL: &Iri = iri!("http://www.w3.org/1999/02/22-rdf-syntax-ns#nil");
pub const RDF_LANGSTRING: &Iri = iri!("http://www.w3.org/1999/02/22-rdf-syntax-ns#langString");

pub const XSD_BOOLEAN: &Iri = iri!("http://www.w3.org/2001/XMLSchema#boolean");
pub const XSD_INTEGER: &Iri = iri!("http://www.w3.org/2001/XMLSchema#integer");
pub const XSD_DOUBLE: &Iri = iri!("http://www.w3.org/2001/XMLSchema#double");
pub const XSD_STRING: &Iri = iri!("http://www.w3.org/2001/XMLSchema#string");

pub const I18N_NAMESPACE: &str = "https://www.w3.org/ns/i18n#";

/// Subject, predicate or graph label position: an IRI or a blank node
/// identifier.
pub use crate::ValidId;

/// RDF literal.
///
/// Directionality is not carried here: direction-tagged strings are
/// encoded through the `i18n` datatype or a compound literal, depending
/// on the configured serialization mode.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Literal {
	pub value: String,
	pub datatype: IriBuf,
	pub language: Option<LenientLangTagBuf>,
}

impl Literal {
	/// String literal of type `xsd:string`.
	pub fn string(value: String) -> Self {
		Self {
			value,
			datatype: XSD_STRING.to_owned(),
			language: None,
		}
	}

	/// Typed literal.
	pub fn typed(value: String, datatype: IriBuf) -> Self {
		Self {
			value,
			datatype,
			language: None,
		}
	}

	/// Language-tagged string, of type `rdf:langString`.
	pub fn lang_string(value: String, language: LenientLangTagBuf) -> Self {
		Self {
			value,
			datatype: RDF_LANGSTRING.to_owned(),
			language: Some(language),
		}
	}

	pub fn is_lang_string(&self) -> bool {
		self.datatype.as_iri() == RDF_LANGSTRING
	}
}

/// Object position: an IRI, a blank node identifier, or a literal.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Value {
	Id(ValidId),
	Literal(Literal),
}

impl Value {
	pub fn iri(iri: IriBuf) -> Self {
		Self::Id(ValidId::Iri(iri))
	}

	pub fn blank(b: BlankIdBuf) -> Self {
		Self::Id(ValidId::Blank(b))
	}

	pub fn as_id(&self) -> Option<&ValidId> {
		match self {
			Self::Id(id) => Some(id),
			Self::Literal(_) => None,
		}
	}

	pub fn as_literal(&self) -> Option<&Literal> {
		match self {
			Self::Id(_) => None,
			Self::Literal(l) => Some(l),
		}
	}

	pub fn is_blank(&self) -> bool {
		matches!(self, Self::Id(ValidId::Blank(_)))
	}

	pub fn is_iri(&self, iri: &Iri) -> bool {
		matches!(self, Self::Id(ValidId::Iri(i)) if i == iri)
	}
}

impl From<ValidId> for Value {
	fn from(id: ValidId) -> Self {
		Self::Id(id)
	}
}

impl From<Literal> for Value {
	fn from(l: Literal) -> Self {
		Self::Literal(l)
	}
}

/// RDF quad.
///
/// The predicate position admits blank node identifiers so that
/// generalized RDF can be represented; the serializers drop such quads
/// unless generalized output is requested.
pub type Quad = rdf_types::Quad<ValidId, ValidId, Value, ValidId>;

/// RDF dataset: an insertion-ordered set of quads.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Dataset {
	quads: IndexSet<Quad>,
}

impl Dataset {
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a quad, returning `false` if it was already present.
	pub fn insert(&mut self, quad: Quad) -> bool {
		self.quads.insert(quad)
	}

	pub fn len(&self) -> usize {
		self.quads.len()
	}

	pub fn is_empty(&self) -> bool {
		self.quads.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Quad> {
		self.quads.iter()
	}

	/// Graph labels appearing in the dataset, default graph excluded.
	pub fn graph_names(&self) -> impl Iterator<Item = &ValidId> {
		let mut seen = IndexSet::new();
		self.quads.iter().filter_map(move |q| {
			let g = q.3.as_ref()?;
			if seen.insert(g.clone()) {
				Some(g)
			} else {
				None
			}
		})
	}
}

impl IntoIterator for Dataset {
	type Item = Quad;
	type IntoIter = indexmap::set::IntoIter<Quad>;

	fn into_iter(self) -> Self::IntoIter {
		self.quads.into_iter()
	}
}

impl<'a> IntoIterator for &'a Dataset {
	type Item = &'a Quad;
	type IntoIter = indexmap::set::Iter<'a, Quad>;

	fn into_iter(self) -> Self::IntoIter {
		self.quads.iter()
	}
}

impl FromIterator<Quad> for Dataset {
	fn from_iter<I: IntoIterator<Item = Quad>>(iter: I) -> Self {
		Self {
			quads: iter.into_iter().collect(),
		}
	}
}

impl Extend<Quad> for Dataset {
	fn extend<I: IntoIterator<Item = Quad>>(&mut self, iter: I) {
		self.quads.extend(iter)
	}
}

/// Direction representation method.
///
/// Decides how direction-tagged strings are encoded when producing RDF,
/// and recognized when parsing it back.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum RdfDirection {
	/// Encode the direction in the literal type IRI, using the
	/// `https://www.w3.org/ns/i18n#` namespace: the IRI is of the form
	/// `https://www.w3.org/ns/i18n#language_direction` (the language part
	/// may be empty).
	I18nDatatype,

	/// Encode the direction using a compound literal: a fresh blank node
	/// with `rdf:value`, `rdf:language` and `rdf:direction` properties.
	CompoundLiteral,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid `rdfDirection` value `{0}`")]
pub struct InvalidRdfDirection(pub String);

impl FromStr for RdfDirection {
	type Err = InvalidRdfDirection;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"i18n-datatype" => Ok(Self::I18nDatatype),
			"compound-literal" => Ok(Self::CompoundLiteral),
			_ => Err(InvalidRdfDirection(s.to_string())),
		}
	}
}

/// Builds an `i18n` datatype IRI from a language tag and a direction.
///
/// The language tag is lowercased, as everywhere in the RDF
/// serialization.
pub fn i18n(language: Option<&LenientLangTagBuf>, direction: Direction) -> IriBuf {
	let iri = match language {
		Some(language) => {
			format!("{I18N_NAMESPACE}{}_{direction}", language.to_lowercase())
		}
		None => format!("{I18N_NAMESPACE}_{direction}"),
	};

	IriBuf::new(iri).unwrap()
}

/// Splits an `i18n` datatype IRI back into its language and direction
/// parts.
pub fn parse_i18n(iri: &Iri) -> Option<(Option<LenientLangTagBuf>, Direction)> {
	let suffix = iri.as_str().strip_prefix(I18N_NAMESPACE)?;
	let (language, direction) = suffix.split_once('_')?;
	let direction = Direction::try_from(direction).ok()?;
	let language = if language.is_empty() {
		None
	} else {
		Some(LenientLangTagBuf::from(language))
	};

	Some((language, direction))
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Id(id) => nquads::fmt_id(id, f),
			Self::Literal(l) => nquads::fmt_literal(l, f),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn i18n_round_trip() {
		let tag = LenientLangTagBuf::from("en");
		let iri = i18n(Some(&tag), Direction::Rtl);
		assert_eq!(iri.as_str(), "https://www.w3.org/ns/i18n#en_rtl");

		// The language part is lowercased.
		let tag = LenientLangTagBuf::from("DE");
		let iri = i18n(Some(&tag), Direction::Rtl);
		assert_eq!(iri.as_str(), "https://www.w3.org/ns/i18n#de_rtl");

		let (language, direction) = parse_i18n(&iri).unwrap();
		assert_eq!(language.unwrap().as_str(), "en");
		assert_eq!(direction, Direction::Rtl);

		let bare = i18n(None, Direction::Ltr);
		let (language, direction) = parse_i18n(&bare).unwrap();
		assert!(language.is_none());
		assert_eq!(direction, Direction::Ltr);
	}
}
