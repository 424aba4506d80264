use crate::Options;
use json_syntax::{Object, Value};
use lod_context_processing::{process_context, ContextCache, ProcessingStack};
use lod_core::{object, warning, Context, Dataset, ErrorCode, IdentifierIssuer, Loader, NoLoader};
use lod_expansion::KeyDroppedCallback;

/// Any error produced by one of the processing operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	ContextProcessing(#[from] lod_context_processing::Error),

	#[error(transparent)]
	Expansion(#[from] lod_expansion::Error),

	#[error(transparent)]
	Compaction(#[from] lod_compaction::Error),

	#[error(transparent)]
	Flattening(#[from] lod_flattening::Error),

	#[error(transparent)]
	Framing(#[from] lod_framing::Error),

	#[error(transparent)]
	Rdf(#[from] lod_rdf::Error),
}

impl Error {
	/// The JSON-LD error code of this error.
	pub fn code(&self) -> ErrorCode {
		match self {
			Self::ContextProcessing(e) => e.code(),
			Self::Expansion(e) => e.code(),
			Self::Compaction(e) => e.code(),
			Self::Flattening(e) => e.code(),
			Self::Framing(e) => e.code(),
			Self::Rdf(e) => e.code(),
		}
	}
}

/// JSON-LD processor.
///
/// Owns the document loader used to dereference remote contexts and the
/// caches shared by every processing call. A processor can be reused:
/// remote contexts are fetched and processed at most once.
pub struct Processor<L = NoLoader> {
	loader: L,
	cache: ContextCache,
}

impl Processor<NoLoader> {
	/// Creates a processor that fails on any remote document access.
	pub fn no_loader() -> Self {
		Self::new(NoLoader)
	}
}

impl<L: Loader> Processor<L> {
	pub fn new(loader: L) -> Self {
		Self::with_cache(loader, ContextCache::new())
	}

	/// Creates a processor with an externally supplied context cache, so
	/// that already resolved contexts can be carried over.
	pub fn with_cache(loader: L, cache: ContextCache) -> Self {
		Self { loader, cache }
	}

	pub fn loader(&self) -> &L {
		&self.loader
	}

	/// The active context resulting from the `base` and `expandContext`
	/// options.
	async fn initial_context(&self, options: &Options) -> Result<Context, Error> {
		let mut context = Context::new(options.base.clone());

		if let Some(expand_context) = &options.expand_context {
			// An expand context wrapped in an `@context` entry is
			// unwrapped first.
			let local_context = expand_context
				.as_object()
				.and_then(|o| object::entry(o, "@context"))
				.unwrap_or(expand_context);

			let mut warnings = warning::Log;
			let mut env = lod_context_processing::Environment::new(
				&self.loader,
				&self.cache,
				&mut warnings,
			);

			context = process_context(
				&mut env,
				&context,
				local_context,
				ProcessingStack::new(),
				options.base.as_ref(),
				options.context_processing(),
			)
			.await?;
		}

		Ok(context)
	}

	/// Processes a local context value against the initial context.
	async fn process_local_context(
		&self,
		context_value: &Value,
		options: &Options,
	) -> Result<Context, Error> {
		let initial = Context::new(options.base.clone());

		let mut warnings = warning::Log;
		let mut env =
			lod_context_processing::Environment::new(&self.loader, &self.cache, &mut warnings);

		Ok(process_context(
			&mut env,
			&initial,
			context_value,
			ProcessingStack::new(),
			options.base.as_ref(),
			options.context_processing(),
		)
		.await?)
	}

	/// Expands `document`, reporting warnings to `warnings` and dropped
	/// keys to the optional `on_key_dropped` callback.
	pub async fn expand_full<'a, W>(
		&'a self,
		document: &Value,
		options: &Options,
		warnings: &'a mut W,
		on_key_dropped: Option<&'a mut KeyDroppedCallback<'a>>,
	) -> Result<Value, Error>
	where
		W: lod_expansion::WarningHandler,
	{
		self.expand_with(document, options, false, warnings, on_key_dropped)
			.await
	}

	async fn expand_with<'a, W>(
		&'a self,
		document: &Value,
		options: &Options,
		frame_expansion: bool,
		warnings: &'a mut W,
		on_key_dropped: Option<&'a mut KeyDroppedCallback<'a>>,
	) -> Result<Value, Error>
	where
		W: lod_expansion::WarningHandler,
	{
		let active_context = self.initial_context(options).await?;

		let mut env = lod_expansion::Environment {
			loader: &self.loader,
			cache: &self.cache,
			warnings,
			on_key_dropped,
		};

		Ok(lod_expansion::expand(
			&mut env,
			document,
			&active_context,
			options.base.as_ref(),
			options.expansion(frame_expansion),
		)
		.await?)
	}

	/// Expansion algorithm: rewrites `document` into its fully explicit
	/// form.
	pub async fn expand(&self, document: &Value, options: &Options) -> Result<Value, Error> {
		self.expand_full(document, options, &mut warning::Log, None)
			.await
	}

	/// Compaction algorithm: expands `document` and compacts it with the
	/// given context.
	pub async fn compact(
		&self,
		document: &Value,
		context: &Value,
		options: &Options,
	) -> Result<Value, Error> {
		let expanded = self.expand(document, options).await?;
		self.compact_expanded(&expanded, context, options).await
	}

	/// Compacts an already expanded document.
	pub async fn compact_expanded(
		&self,
		expanded: &Value,
		context: &Value,
		options: &Options,
	) -> Result<Value, Error> {
		let context_value = unwrap_context(context);
		let active_context = self.process_local_context(context_value, options).await?;

		let mut warnings = warning::Log;
		let mut env = lod_compaction::Environment {
			loader: &self.loader,
			cache: &self.cache,
			warnings: &mut warnings,
		};

		let compacted = lod_compaction::compact_document(
			&mut env,
			expanded,
			&active_context,
			options.graph,
			options.compaction(),
		)
		.await?;

		Ok(attach_context(compacted, context_value))
	}

	/// Flattening algorithm: collects every node of the expanded document
	/// into an identifier-keyed flat form, compacted when a context is
	/// given.
	pub async fn flatten(
		&self,
		document: &Value,
		context: Option<&Value>,
		options: &Options,
	) -> Result<Value, Error> {
		let expanded = self.expand(document, options).await?;

		let mut issuer = IdentifierIssuer::new("_:b");
		let flattened = lod_flattening::flatten(&expanded, &mut issuer)?;

		match context {
			None => Ok(flattened),
			Some(context) => self.compact_expanded(&flattened, context, options).await,
		}
	}

	/// Framing algorithm: matches `document` against `frame` and shapes
	/// the output accordingly.
	pub async fn frame(
		&self,
		document: &Value,
		frame: &Value,
		options: &Options,
	) -> Result<Value, Error> {
		let expanded = self.expand(document, options).await?;

		let mut warnings = warning::Log;
		let expanded_frame = self
			.expand_with(frame, options, true, &mut warnings, None)
			.await?;

		let framing_options = options.framing();
		let framed = lod_framing::frame(&expanded, &expanded_frame, &framing_options)?;

		// The framed output is compacted with the frame's own context,
		// forcing the @graph form, then cleaned of its @preserve
		// wrappers.
		let frame_context = unwrap_context(frame);
		let active_context = self.process_local_context(frame_context, options).await?;

		let mut env = lod_compaction::Environment {
			loader: &self.loader,
			cache: &self.cache,
			warnings: &mut warnings,
		};

		let compacted = lod_compaction::compact_document(
			&mut env,
			&framed,
			&active_context,
			true,
			options.compaction(),
		)
		.await?;

		let cleaned =
			lod_framing::remove_preserve(&active_context, &compacted, options.compact_arrays)
				.unwrap_or(Value::Null);

		// Under `omitGraph`, a single-node result sheds its @graph
		// wrapper.
		let graph_key = lod_compaction::compact_iri(
			&active_context,
			&lod_core::Term::Keyword(lod_core::Keyword::Graph),
			None,
			true,
			false,
			options.compaction(),
		)?
		.unwrap_or_else(|| "@graph".to_string());

		let result = match cleaned {
			Value::Object(o) if framing_options.omit_graph => {
				match object::entry(&o, graph_key.as_str()) {
					Some(Value::Array(nodes)) if nodes.len() == 1 => match &nodes[0] {
						Value::Object(node) => Value::Object(node.clone()),
						other => other.clone(),
					},
					Some(Value::Object(node)) => Value::Object(node.clone()),
					_ => Value::Object(o),
				}
			}
			other => other,
		};

		Ok(attach_context(result, frame_context))
	}

	/// RDF serialization algorithm: expands `document` and converts its
	/// node map to a dataset.
	pub async fn to_rdf(&self, document: &Value, options: &Options) -> Result<Dataset, Error> {
		let expanded = self.expand(document, options).await?;

		let mut issuer = IdentifierIssuer::new("_:b");
		let node_map = lod_flattening::generate_node_map(&expanded, &mut issuer)?;

		Ok(lod_rdf::to_rdf(&node_map, &mut issuer, options.to_rdf()))
	}

	/// RDF deserialization algorithm: converts a dataset to an expanded
	/// JSON-LD document.
	pub fn from_rdf(&self, dataset: &Dataset, options: &Options) -> Result<Value, Error> {
		Ok(lod_rdf::from_rdf(dataset, options.from_rdf())?)
	}

	/// URDNA2015 canonicalization of `document`: serializes it to RDF and
	/// returns the canonical N-Quads text.
	pub async fn normalize(&self, document: &Value, options: &Options) -> Result<String, Error> {
		let dataset = self.to_rdf(document, options).await?;
		Ok(lod_canonicalization::canonical_nquads(&dataset))
	}

	/// URDNA2015 canonicalization of an already parsed dataset.
	pub fn normalize_dataset(&self, dataset: &Dataset) -> String {
		lod_canonicalization::canonical_nquads(dataset)
	}
}

impl Default for Processor<NoLoader> {
	fn default() -> Self {
		Self::no_loader()
	}
}

/// Unwraps the `@context` entry of a context document.
fn unwrap_context(context: &Value) -> &Value {
	context
		.as_object()
		.and_then(|o| object::entry(o, "@context"))
		.unwrap_or(context)
}

/// Checks if a context value would leave the output unchanged.
fn is_empty_context(context: &Value) -> bool {
	match context {
		Value::Null => true,
		Value::Array(items) => items.iter().all(is_empty_context),
		Value::Object(o) => o.is_empty(),
		_ => false,
	}
}

/// Attaches the original context value to a compacted document, as its
/// first entry.
fn attach_context(compacted: Value, context: &Value) -> Value {
	if is_empty_context(context) {
		return compacted;
	}

	// A singleton context array is unwrapped in the output.
	let context = match context {
		Value::Array(items) if items.len() == 1 => &items[0],
		other => other,
	};

	let mut result = Object::default();
	result.insert("@context".into(), context.clone());

	match compacted {
		Value::Object(o) => {
			for entry in o.entries().iter().cloned() {
				result.insert(entry.key, entry.value);
			}
		}
		Value::Array(items) => {
			// Arrays only arise without the @graph wrapping, when the
			// compacted document is empty.
			if !items.is_empty() {
				result.insert("@graph".into(), Value::Array(items));
			}
		}
		Value::Null => (),
		other => return other,
	}

	Value::Object(result)
}
