use super::Context;
use crate::{Container, Direction, Nullable, Term, Type};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Type mapping selector used during term selection.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TypeSelection {
	Reverse,
	Any,
	Type(Type),
}

#[derive(Debug)]
struct InverseType {
	reverse: Option<String>,
	any: Option<String>,
	map: HashMap<Type, String>,
}

impl InverseType {
	fn select(&self, selection: &TypeSelection) -> Option<&str> {
		match selection {
			TypeSelection::Reverse => self.reverse.as_deref(),
			TypeSelection::Any => self.any.as_deref(),
			TypeSelection::Type(ty) => self.map.get(ty).map(String::as_str),
		}
	}

	fn set_any(&mut self, term: &str) {
		if self.any.is_none() {
			self.any = Some(term.to_string())
		}
	}

	fn set_none(&mut self, term: &str) {
		self.set(&Type::None, term)
	}

	fn set(&mut self, ty: &Type, term: &str) {
		if !self.map.contains_key(ty) {
			self.map.insert(ty.clone(), term.to_string());
		}
	}
}

/// Language/direction key. Language tags are stored lowercased.
type LangDir = Nullable<(Option<String>, Option<Direction>)>;

/// Language mapping selector used during term selection.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LangSelection<'a> {
	Any,
	Lang(Nullable<(Option<&'a str>, Option<Direction>)>),
}

#[derive(Debug)]
struct InverseLang {
	any: Option<String>,
	map: HashMap<LangDir, String>,
}

impl InverseLang {
	fn select(&self, selection: &LangSelection) -> Option<&str> {
		match selection {
			LangSelection::Any => self.any.as_deref(),
			LangSelection::Lang(lang_dir) => {
				let lang_dir = lang_dir.map(|(l, d)| (l.map(str::to_lowercase), d));
				self.map.get(&lang_dir).map(String::as_str)
			}
		}
	}

	fn set_any(&mut self, term: &str) {
		if self.any.is_none() {
			self.any = Some(term.to_string())
		}
	}

	fn set_none(&mut self, term: &str) {
		self.set(Nullable::Some((None, None)), term)
	}

	fn set(&mut self, lang_dir: Nullable<(Option<&str>, Option<Direction>)>, term: &str) {
		let lang_dir = lang_dir.map(|(l, d)| (l.map(str::to_lowercase), d));
		self.map.entry(lang_dir).or_insert_with(|| term.to_string());
	}
}

#[derive(Debug)]
struct Any {
	none: String,
}

#[derive(Debug)]
struct InverseContainer {
	language: InverseLang,
	typ: InverseType,
	any: Any,
}

impl InverseContainer {
	fn new(term: &str) -> Self {
		Self {
			language: InverseLang {
				any: None,
				map: HashMap::new(),
			},
			typ: InverseType {
				reverse: None,
				any: None,
				map: HashMap::new(),
			},
			any: Any {
				none: term.to_string(),
			},
		}
	}
}

/// Container to type/language map of a single variable.
#[derive(Debug)]
pub struct InverseDefinition {
	map: HashMap<Container, InverseContainer>,
}

impl InverseDefinition {
	fn new() -> Self {
		Self {
			map: HashMap::new(),
		}
	}

	fn get(&self, container: &Container) -> Option<&InverseContainer> {
		self.map.get(container)
	}

	fn reference_mut(
		&mut self,
		container: Container,
		insert: impl FnOnce() -> InverseContainer,
	) -> &mut InverseContainer {
		self.map.entry(container).or_insert_with(insert)
	}

	/// Selects the term for the first matching container and preferred
	/// value, in order.
	pub fn select(&self, containers: &[Container], selection: &Selection) -> Option<&str> {
		for container in containers {
			if let Some(type_lang_map) = self.get(container) {
				match selection {
					Selection::Any => return Some(&type_lang_map.any.none),
					Selection::Type(preferred_values) => {
						for item in preferred_values {
							if let Some(term) = type_lang_map.typ.select(item) {
								return Some(term);
							}
						}
					}
					Selection::Lang(preferred_values) => {
						for item in preferred_values {
							if let Some(term) = type_lang_map.language.select(item) {
								return Some(term);
							}
						}
					}
				}
			}
		}

		None
	}
}

/// Preferred-value selection for term selection.
#[derive(Debug)]
pub enum Selection<'a> {
	Any,
	Type(Vec<TypeSelection>),
	Lang(Vec<LangSelection<'a>>),
}

/// Inverse context.
///
/// Index from IRIs (and keywords) back to the best term for compaction,
/// built lazily from an active context snapshot.
#[derive(Debug)]
pub struct InverseContext {
	map: HashMap<Term, InverseDefinition>,
}

impl InverseContext {
	pub fn new() -> Self {
		Self {
			map: HashMap::new(),
		}
	}

	pub fn contains(&self, term: &Term) -> bool {
		self.map.contains_key(term)
	}

	pub fn get(&self, term: &Term) -> Option<&InverseDefinition> {
		self.map.get(term)
	}

	fn reference_mut(
		&mut self,
		term: &Term,
		insert: impl FnOnce() -> InverseDefinition,
	) -> &mut InverseDefinition {
		self.map.entry(term.clone()).or_insert_with(insert)
	}

	pub fn select(
		&self,
		var: &Term,
		containers: &[Container],
		selection: &Selection,
	) -> Option<&str> {
		self.get(var)
			.and_then(|container_map| container_map.select(containers, selection))
	}
}

impl Default for InverseContext {
	fn default() -> Self {
		Self::new()
	}
}

impl<'a> From<&'a Context> for InverseContext {
	fn from(context: &'a Context) -> Self {
		let mut result = InverseContext::new();

		// Terms are visited ordered by length then lexicographically, so
		// the shortest (then first) term wins every first-insertion below.
		let mut definitions: Vec<_> = context.definitions().collect();
		definitions.sort_by(|(a, _), (b, _)| {
			let ord = a.len().cmp(&b.len());
			if ord == Ordering::Equal {
				a.cmp(b)
			} else {
				ord
			}
		});

		for (term, term_definition) in definitions {
			let Some(var) = term_definition.value.as_ref() else {
				continue;
			};

			let container = term_definition.container;
			let container_map = result.reference_mut(var, InverseDefinition::new);
			let type_lang_map =
				container_map.reference_mut(container, || InverseContainer::new(term));

			let type_map = &mut type_lang_map.typ;
			let lang_map = &mut type_lang_map.language;

			if term_definition.reverse_property {
				// If the term definition indicates that the term
				// represents a reverse property:
				if type_map.reverse.is_none() {
					type_map.reverse = Some(term.clone())
				}
			} else {
				match &term_definition.typ {
					Some(Type::None) => {
						// Otherwise, if term definition has a type mapping
						// which is @none:
						type_map.set_any(term);
						lang_map.set_any(term);
					}
					Some(typ) => {
						// Otherwise, if term definition has a type mapping:
						type_map.set(typ, term)
					}
					None => match (&term_definition.language, &term_definition.direction) {
						(Some(language), Some(direction)) => {
							// Otherwise, if term definition has both a
							// language mapping and a direction mapping:
							match (language, direction) {
								(Nullable::Some(language), Nullable::Some(direction)) => lang_map
									.set(
										Nullable::Some((Some(language.as_str()), Some(*direction))),
										term,
									),
								(Nullable::Some(language), Nullable::Null) => lang_map
									.set(Nullable::Some((Some(language.as_str()), None)), term),
								(Nullable::Null, Nullable::Some(direction)) => {
									lang_map.set(Nullable::Some((None, Some(*direction))), term)
								}
								(Nullable::Null, Nullable::Null) => {
									lang_map.set(Nullable::Null, term)
								}
							}
						}
						(Some(language), None) => match language {
							// Otherwise, if term definition has a language
							// mapping (might be null):
							Nullable::Some(language) => {
								lang_map.set(Nullable::Some((Some(language.as_str()), None)), term)
							}
							Nullable::Null => lang_map.set(Nullable::Null, term),
						},
						(None, Some(direction)) => match direction {
							// Otherwise, if term definition has a direction
							// mapping (might be null):
							Nullable::Some(direction) => {
								lang_map.set(Nullable::Some((None, Some(*direction))), term)
							}
							Nullable::Null => lang_map.set(Nullable::Some((None, None)), term),
						},
						(None, None) => {
							lang_map.set(
								Nullable::Some((
									context.default_language().map(|l| l.as_str()),
									context.default_base_direction(),
								)),
								term,
							);
							lang_map.set_none(term);
							type_map.set_none(term);
						}
					},
				}
			}
		}

		result
	}
}
