use super::{LoadError, Loader, LoadingResult, RemoteDocument};
use iref::{Iri, IriBuf};
use std::collections::HashMap;

/// Loader serving documents from an in-memory map.
///
/// No network call is ever performed, which makes this loader the natural
/// choice for tests and for offline processing with pre-fetched contexts.
#[derive(Debug, Default, Clone)]
pub struct MapLoader {
	documents: HashMap<IriBuf, json_syntax::Value>,
}

#[derive(Debug, thiserror::Error)]
#[error("no document for this IRI")]
pub struct EntryNotFound;

impl MapLoader {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers the document served for `url`.
	pub fn insert(&mut self, url: IriBuf, document: json_syntax::Value) {
		self.documents.insert(url, document);
	}
}

impl From<HashMap<IriBuf, json_syntax::Value>> for MapLoader {
	fn from(documents: HashMap<IriBuf, json_syntax::Value>) -> Self {
		Self { documents }
	}
}

impl Loader for MapLoader {
	async fn load(&self, url: &Iri) -> LoadingResult {
		match self.documents.get(url) {
			Some(document) => Ok(RemoteDocument::new(
				Some(url.to_owned()),
				Some("application/ld+json".to_string()),
				document.clone(),
			)),
			None => Err(LoadError::new(url.to_owned(), EntryNotFound)),
		}
	}
}
