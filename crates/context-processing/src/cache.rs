use iref::IriBuf;
use lod_core::Context;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use uuid::Uuid;

const DEFAULT_CAPACITY: usize = 100;

/// Remote context caches.
///
/// Two layers, both LRU:
///   - the *document* cache stores the raw `@context` value extracted
///     from a dereferenced remote document, keyed by IRI, so a context is
///     fetched at most once;
///   - the *processed* cache stores fully processed snapshots, keyed by
///     `(context IRI, parent snapshot id)`, so applying the same remote
///     context to the same parent is free.
///
/// The cache is read-mostly and can be shared between processing calls.
pub struct ContextCache {
	documents: Mutex<LruCache<IriBuf, json_syntax::Value>>,
	processed: Mutex<LruCache<(IriBuf, Uuid), Context>>,
}

impl ContextCache {
	pub fn new() -> Self {
		Self::with_capacity(DEFAULT_CAPACITY)
	}

	pub fn with_capacity(capacity: usize) -> Self {
		let capacity = NonZeroUsize::new(capacity).expect("cache capacity must be non-zero");
		Self {
			documents: Mutex::new(LruCache::new(capacity)),
			processed: Mutex::new(LruCache::new(capacity)),
		}
	}

	/// Returns the raw `@context` previously extracted from the document
	/// behind `url`.
	pub fn document(&self, url: &IriBuf) -> Option<json_syntax::Value> {
		self.documents.lock().unwrap().get(url).cloned()
	}

	pub fn insert_document(&self, url: IriBuf, context: json_syntax::Value) {
		self.documents.lock().unwrap().put(url, context);
	}

	/// Returns the processed context resulting from applying the remote
	/// context `url` to the parent snapshot `parent`.
	pub fn processed(&self, url: &IriBuf, parent: Uuid) -> Option<Context> {
		self.processed
			.lock()
			.unwrap()
			.get(&(url.clone(), parent))
			.cloned()
	}

	pub fn insert_processed(&self, url: IriBuf, parent: Uuid, context: Context) {
		self.processed.lock().unwrap().put((url, parent), context);
	}
}

impl Default for ContextCache {
	fn default() -> Self {
		Self::new()
	}
}
