use json_syntax::{Object, Value};

/// Local context definition merged with its `@import`ed context, if any.
///
/// Entries of the local definition replace common entries of the imported
/// one.
pub struct Merged<'a> {
	context: &'a Object,
	import: Option<Object>,
}

impl<'a> Merged<'a> {
	pub fn new(context: &'a Object, import: Option<Object>) -> Self {
		Self { context, import }
	}

	/// Returns the merged value of the `key` entry.
	pub fn get(&self, key: &str) -> Option<&Value> {
		lod_core::object::entry(self.context, key)
			.or_else(|| self.import.as_ref().and_then(|i| lod_core::object::entry(i, key)))
	}

	/// Iterates over the merged entry keys: imported-only entries first,
	/// then local entries.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		let local = self.context;
		self.import
			.iter()
			.flat_map(|import| import.entries().iter())
			.map(|e| e.key.as_str())
			.filter(move |key| lod_core::object::entry(local, key).is_none())
			.chain(local.entries().iter().map(|e| e.key.as_str()))
	}
}
