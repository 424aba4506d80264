//! Active context and related types.
mod definition;
pub mod inverse;

use crate::{Direction, LenientLangTagBuf, Term};
use iref::IriBuf;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use uuid::Uuid;

pub use definition::*;
pub use inverse::InverseContext;

/// Processed JSON-LD context.
///
/// Result of the [context processing algorithm][1]. Treated as a value:
/// every mutation refreshes the snapshot identifier, so caches may key on
/// [`Context::id`] and share snapshots across processing calls.
///
/// [1]: <https://www.w3.org/TR/json-ld11-api/#context-processing-algorithm>
#[derive(Debug)]
pub struct Context {
	id: Uuid,
	original_base_url: Option<IriBuf>,
	base_iri: Option<IriBuf>,
	vocabulary: Option<Term>,
	default_language: Option<LenientLangTagBuf>,
	default_base_direction: Option<Direction>,
	previous_context: Option<Box<Self>>,
	definitions: HashMap<String, TermDefinition>,
	inverse: OnceCell<InverseContext>,
}

impl Default for Context {
	fn default() -> Self {
		Self::new(None)
	}
}

impl Context {
	/// Creates a new context with the given base IRI.
	pub fn new(base_iri: Option<IriBuf>) -> Self {
		Self {
			id: Uuid::new_v4(),
			original_base_url: base_iri.clone(),
			base_iri,
			vocabulary: None,
			default_language: None,
			default_base_direction: None,
			previous_context: None,
			definitions: HashMap::new(),
			inverse: OnceCell::new(),
		}
	}

	/// Snapshot identifier, refreshed on every mutation.
	pub fn id(&self) -> Uuid {
		self.id
	}

	/// Returns the definition of the given `term`, if any.
	pub fn get(&self, term: &str) -> Option<&TermDefinition> {
		self.definitions.get(term)
	}

	/// Checks if the given `term` is defined.
	pub fn contains_term(&self, term: &str) -> bool {
		self.definitions.contains_key(term)
	}

	/// Returns the original base URL of the context.
	pub fn original_base_url(&self) -> Option<&IriBuf> {
		self.original_base_url.as_ref()
	}

	/// Returns the base IRI of the context.
	pub fn base_iri(&self) -> Option<&IriBuf> {
		self.base_iri.as_ref()
	}

	/// Returns the `@vocab` value, if any.
	pub fn vocabulary(&self) -> Option<&Term> {
		self.vocabulary.as_ref()
	}

	/// Returns the default `@language` value.
	pub fn default_language(&self) -> Option<&LenientLangTagBuf> {
		self.default_language.as_ref()
	}

	/// Returns the default `@direction` value.
	pub fn default_base_direction(&self) -> Option<Direction> {
		self.default_base_direction
	}

	/// Returns the previous context, set when a non-propagated context is
	/// applied.
	pub fn previous_context(&self) -> Option<&Self> {
		self.previous_context.as_deref()
	}

	/// Number of terms defined.
	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}

	/// Iterates over the term definitions.
	pub fn definitions(&self) -> impl Iterator<Item = (&String, &TermDefinition)> {
		self.definitions.iter()
	}

	/// Checks if the context has any protected term definition.
	pub fn has_protected_items(&self) -> bool {
		self.definitions.values().any(|d| d.protected)
	}

	/// Returns the inverse of this context, building it on first use.
	pub fn inverse(&self) -> &InverseContext {
		self.inverse.get_or_init(|| self.into())
	}

	fn touch(&mut self) {
		self.id = Uuid::new_v4();
		self.inverse.take();
	}

	/// Sets the definition for the given `term`, returning the previous
	/// definition if any.
	pub fn set(&mut self, term: &str, definition: Option<TermDefinition>) -> Option<TermDefinition> {
		self.touch();
		match definition {
			Some(definition) => self.definitions.insert(term.to_string(), definition),
			None => self.definitions.remove(term),
		}
	}

	pub fn set_base_iri(&mut self, iri: Option<IriBuf>) {
		self.touch();
		self.base_iri = iri
	}

	pub fn set_vocabulary(&mut self, vocab: Option<Term>) {
		self.touch();
		self.vocabulary = vocab
	}

	pub fn set_default_language(&mut self, lang: Option<LenientLangTagBuf>) {
		self.touch();
		self.default_language = lang
	}

	pub fn set_default_base_direction(&mut self, dir: Option<Direction>) {
		self.touch();
		self.default_base_direction = dir
	}

	pub fn set_previous_context(&mut self, previous: Self) {
		self.touch();
		self.previous_context = Some(Box::new(previous))
	}
}

impl Clone for Context {
	fn clone(&self) -> Self {
		Self {
			id: self.id,
			original_base_url: self.original_base_url.clone(),
			base_iri: self.base_iri.clone(),
			vocabulary: self.vocabulary.clone(),
			default_language: self.default_language.clone(),
			default_base_direction: self.default_base_direction,
			previous_context: self.previous_context.clone(),
			definitions: self.definitions.clone(),
			inverse: OnceCell::new(),
		}
	}
}
