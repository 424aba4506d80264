use crate::{Container, Direction, LenientLangTagBuf, Nullable, Term, Type};
use iref::IriBuf;

/// Term definition of an active context.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct TermDefinition {
	/// IRI mapping. `None` when the term is only reserved (defined with a
	/// `null` `@id`) so future redefinitions can be detected.
	pub value: Option<Term>,

	/// Prefix flag: the term may be used as the prefix of a compact IRI.
	pub prefix: bool,

	/// Protection flag.
	pub protected: bool,

	/// Reverse property flag.
	pub reverse_property: bool,

	/// Base URL in effect when the definition was created. Used to
	/// resolve IRIs appearing in the local context.
	pub base_url: Option<IriBuf>,

	/// Raw local (property-scoped) context.
	pub context: Option<Box<json_syntax::Value>>,

	/// Container mapping.
	pub container: Container,

	/// Index mapping.
	pub index: Option<String>,

	/// Language mapping. `Some(Nullable::Null)` clears the default
	/// language for values of this term.
	pub language: Option<Nullable<LenientLangTagBuf>>,

	/// Direction mapping.
	pub direction: Option<Nullable<Direction>>,

	/// Type mapping.
	pub typ: Option<Type>,

	/// Nest value.
	pub nest: Option<String>,
}

impl TermDefinition {
	/// Compares two definitions ignoring the `protected` flag, the
	/// equality used to detect protected term redefinitions.
	pub fn modulo_protected_field(&self) -> ModuloProtectedField {
		ModuloProtectedField(self)
	}
}

/// Reference to a term definition whose comparison ignores the
/// `protected` flag.
pub struct ModuloProtectedField<'a>(&'a TermDefinition);

impl<'a> PartialEq for ModuloProtectedField<'a> {
	fn eq(&self, other: &Self) -> bool {
		self.0.value == other.0.value
			&& self.0.prefix == other.0.prefix
			&& self.0.reverse_property == other.0.reverse_property
			&& self.0.context == other.0.context
			&& self.0.container == other.0.container
			&& self.0.index == other.0.index
			&& self.0.language == other.0.language
			&& self.0.direction == other.0.direction
			&& self.0.typ == other.0.typ
			&& self.0.nest == other.0.nest
	}
}

impl<'a> Eq for ModuloProtectedField<'a> {}
