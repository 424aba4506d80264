use crate::Keyword;

/// Single container kind appearing in an `@container` entry.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum ContainerKind {
	Graph,
	Id,
	Index,
	Language,
	List,
	Set,
	Type,
}

impl ContainerKind {
	pub fn into_keyword(self) -> Keyword {
		use ContainerKind::*;
		match self {
			Graph => Keyword::Graph,
			Id => Keyword::Id,
			Index => Keyword::Index,
			Language => Keyword::Language,
			List => Keyword::List,
			Set => Keyword::Set,
			Type => Keyword::Type,
		}
	}

	pub fn as_str(&self) -> &'static str {
		self.into_keyword().into_str()
	}
}

impl<'a> TryFrom<&'a str> for ContainerKind {
	type Error = &'a str;

	fn try_from(str: &'a str) -> Result<ContainerKind, &'a str> {
		use ContainerKind::*;
		match str {
			"@graph" => Ok(Graph),
			"@id" => Ok(Id),
			"@index" => Ok(Index),
			"@language" => Ok(Language),
			"@list" => Ok(List),
			"@set" => Ok(Set),
			"@type" => Ok(Type),
			_ => Err(str),
		}
	}
}

/// Container mapping of a term definition.
///
/// Only the combinations allowed by the 1.1 syntax are representable:
/// a single kind, `@graph` with `@id` or `@index`, or `@set` with any of
/// `@graph`, `@id`, `@index`, `@language`, `@type` (and the `@graph`
/// combinations).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Container {
	#[default]
	None,
	Graph,
	Id,
	Index,
	Language,
	List,
	Set,
	Type,

	GraphSet,
	GraphId,
	GraphIndex,
	GraphIdSet,
	GraphIndexSet,
	IdSet,
	IndexSet,
	LanguageSet,
	TypeSet,
}

impl Container {
	pub fn new(kind: ContainerKind) -> Self {
		match kind {
			ContainerKind::Graph => Self::Graph,
			ContainerKind::Id => Self::Id,
			ContainerKind::Index => Self::Index,
			ContainerKind::Language => Self::Language,
			ContainerKind::List => Self::List,
			ContainerKind::Set => Self::Set,
			ContainerKind::Type => Self::Type,
		}
	}

	/// Adds `kind` to the container, or fails if the combination is not
	/// allowed.
	pub fn with(self, kind: ContainerKind) -> Option<Self> {
		use Container::*;
		let new = match (self, kind) {
			(None, k) => Self::new(k),
			(current, k) if current.contains(k) => current,

			(Graph, ContainerKind::Id) | (Id, ContainerKind::Graph) => GraphId,
			(Graph, ContainerKind::Index) | (Index, ContainerKind::Graph) => GraphIndex,
			(Graph, ContainerKind::Set) | (Set, ContainerKind::Graph) => GraphSet,
			(Id, ContainerKind::Set) | (Set, ContainerKind::Id) => IdSet,
			(Index, ContainerKind::Set) | (Set, ContainerKind::Index) => IndexSet,
			(Language, ContainerKind::Set) | (Set, ContainerKind::Language) => LanguageSet,
			(Type, ContainerKind::Set) | (Set, ContainerKind::Type) => TypeSet,

			(GraphSet, ContainerKind::Id) | (GraphId, ContainerKind::Set) => GraphIdSet,
			(GraphSet, ContainerKind::Index) | (GraphIndex, ContainerKind::Set) => GraphIndexSet,
			(IdSet, ContainerKind::Graph) => GraphIdSet,
			(IndexSet, ContainerKind::Graph) => GraphIndexSet,

			_ => return Option::None,
		};

		Some(new)
	}

	pub fn contains(&self, kind: ContainerKind) -> bool {
		use Container::*;
		match kind {
			ContainerKind::Graph => matches!(
				self,
				Graph | GraphSet | GraphId | GraphIndex | GraphIdSet | GraphIndexSet
			),
			ContainerKind::Id => matches!(self, Id | IdSet | GraphId | GraphIdSet),
			ContainerKind::Index => matches!(self, Index | IndexSet | GraphIndex | GraphIndexSet),
			ContainerKind::Language => matches!(self, Language | LanguageSet),
			ContainerKind::List => matches!(self, List),
			ContainerKind::Set => matches!(
				self,
				Set | GraphSet | GraphIdSet | GraphIndexSet | IdSet | IndexSet | LanguageSet
					| TypeSet
			),
			ContainerKind::Type => matches!(self, Type | TypeSet),
		}
	}

	pub fn is_empty(&self) -> bool {
		matches!(self, Self::None)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn valid_combinations() {
		let c = Container::new(ContainerKind::Graph)
			.with(ContainerKind::Id)
			.unwrap()
			.with(ContainerKind::Set)
			.unwrap();
		assert!(c.contains(ContainerKind::Graph));
		assert!(c.contains(ContainerKind::Id));
		assert!(c.contains(ContainerKind::Set));
		assert!(!c.contains(ContainerKind::Index));
	}

	#[test]
	fn invalid_combinations() {
		assert!(Container::List.with(ContainerKind::Set).is_none());
		assert!(Container::Language.with(ContainerKind::Id).is_none());
		assert!(Container::GraphId.with(ContainerKind::Index).is_none());
	}
}
