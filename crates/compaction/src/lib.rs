//! Implementation of the [JSON-LD compaction algorithm](https://www.w3.org/TR/json-ld11-api/#compaction-algorithms).
use iref::IriBuf;
use json_syntax::Value;
use lod_core::{object, warning, Context, ErrorCode, Keyword, Loader, ProcessingMode, Term};
use lod_context_processing::ContextCache;

mod iri;
mod node;
mod value;

pub use iri::compact_iri;
pub(crate) use node::compact_node;
pub(crate) use value::compact_value;

/// Handler for the context processing warnings raised by scoped context
/// applications during compaction.
pub trait WarningHandler: warning::Handler<lod_context_processing::Warning> {}

impl<H> WarningHandler for H where H: warning::Handler<lod_context_processing::Warning> {}

/// Errors that can happen during compaction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("IRI confused with prefix")]
	IriConfusedWithPrefix,

	#[error("Invalid `@nest` value")]
	InvalidNestValue,

	#[error("Context processing failed: {0}")]
	ContextProcessing(#[from] lod_context_processing::Error),
}

impl Error {
	pub fn code(&self) -> ErrorCode {
		match self {
			Self::IriConfusedWithPrefix => ErrorCode::IriConfusedWithPrefix,
			Self::InvalidNestValue => ErrorCode::InvalidNestValue,
			Self::ContextProcessing(e) => e.code(),
		}
	}
}

/// Compaction environment.
pub struct Environment<'a, L, W> {
	pub loader: &'a L,
	pub cache: &'a ContextCache,
	pub warnings: &'a mut W,
}

impl<'a, L, W> Environment<'a, L, W> {
	pub(crate) fn context_env(&mut self) -> lod_context_processing::Environment<'_, L, W> {
		lod_context_processing::Environment {
			loader: self.loader,
			cache: self.cache,
			warnings: self.warnings,
		}
	}
}

/// Compaction options.
#[derive(Clone, Copy)]
pub struct Options {
	/// JSON-LD processing mode.
	pub processing_mode: ProcessingMode,

	/// Determines if IRIs are compacted relative to the base IRI or
	/// document location when compacting.
	pub compact_to_relative: bool,

	/// If set to `true`, arrays with just one element are replaced with
	/// that element during compaction. If set to `false`, all arrays will
	/// remain arrays even if they have just one element.
	pub compact_arrays: bool,

	/// If set to `true`, properties are processed by lexical order.
	pub ordered: bool,
}

impl Default for Options {
	fn default() -> Options {
		Options {
			processing_mode: ProcessingMode::default(),
			compact_to_relative: true,
			compact_arrays: true,
			ordered: false,
		}
	}
}

impl From<Options> for lod_context_processing::Options {
	fn from(options: Options) -> lod_context_processing::Options {
		lod_context_processing::Options {
			processing_mode: options.processing_mode,
			..Default::default()
		}
	}
}

/// Compacts an expanded document fragment.
///
/// See <https://www.w3.org/TR/json-ld11-api/#compaction-algorithm>.
#[allow(clippy::too_many_arguments)]
pub async fn compact_fragment<L, W>(
	env: &mut Environment<'_, L, W>,
	element: &Value,
	active_context: &Context,
	type_scoped_context: &Context,
	active_property: Option<&str>,
	options: Options,
) -> Result<Value, Error>
where
	L: Loader,
	W: WarningHandler,
{
	match element {
		// Scalars are their own compacted form.
		Value::Null | Value::Boolean(_) | Value::Number(_) | Value::String(_) => {
			Ok(element.clone())
		}

		Value::Array(items) => {
			// Compact each item, dropping nulls.
			let mut result = Vec::new();
			for item in items {
				let compacted_item = Box::pin(compact_fragment(
					env,
					item,
					active_context,
					type_scoped_context,
					active_property,
					options,
				))
				.await?;

				if !compacted_item.is_null() {
					result.push(compacted_item)
				}
			}

			// If the result contains a single item, and the container
			// mapping of active property does not force an array
			// representation, return that item.
			let mut list_or_set = false;
			if let Some(active_property) = active_property {
				if let Some(definition) = active_context.get(active_property) {
					list_or_set = definition.container.contains(lod_core::ContainerKind::List)
						|| definition.container.contains(lod_core::ContainerKind::Set);
				}
			}

			if result.len() == 1
				&& options.compact_arrays
				&& active_property != Some("@graph")
				&& active_property != Some("@set")
				&& !list_or_set
			{
				return Ok(result.into_iter().next().unwrap());
			}

			Ok(Value::Array(result))
		}

		Value::Object(element_object) => {
			// If the active context has a previous context, the active
			// context is not propagated. Unless element is a value object
			// or a node reference, set active context to the previous
			// context.
			let mut active_context = active_context;
			if active_context.previous_context().is_some()
				&& !object::is_value_object(element)
				&& !object::is_node_reference(element)
			{
				active_context = active_context.previous_context().unwrap();
			}

			// If the term definition for active property in active
			// context has a local context, apply it.
			let processed_context;
			if let Some(active_property) = active_property {
				if let Some(definition) = type_scoped_context.get(active_property) {
					if let Some(local_context) = &definition.context {
						let processing_options: lod_context_processing::Options =
							options.into();
						processed_context =
							lod_context_processing::algorithm::process_context(
								&mut env.context_env(),
								active_context,
								local_context,
								lod_context_processing::ProcessingStack::new(),
								definition.base_url.as_ref(),
								processing_options.with_override(),
							)
							.await?;
						active_context = &processed_context;
					}
				}
			}

			// Value objects and node references compact through the Value
			// Compaction algorithm.
			if object::is_value_object(element) || object::is_node_reference(element) {
				let compacted =
					compact_value(element_object, active_context, active_property, options)?;
				if !matches!(compacted, Value::Object(_)) {
					return Ok(compacted);
				}
			}

			// A list object under a term with a list container compacts
			// to its bare content (lists of lists included).
			if object::is_list_object(element) {
				let list_container = active_property
					.and_then(|p| active_context.get(p))
					.map(|d| d.container.contains(lod_core::ContainerKind::List))
					.unwrap_or(false);

				if list_container {
					let list_value = object::entry(element_object, "@list").unwrap();
					return Box::pin(compact_fragment(
						env,
						list_value,
						active_context,
						active_context,
						active_property,
						options,
					))
					.await;
				}
			}

			// List objects outside a `@list` container and node objects
			// compact entry by entry.
			compact_node(
				env,
				element_object,
				active_context,
				active_property,
				options,
			)
			.await
		}
	}
}

/// Compacts an entire expanded document, with `graph` compacting into the
/// `@graph` form used by framing.
pub async fn compact_document<L, W>(
	env: &mut Environment<'_, L, W>,
	expanded: &Value,
	active_context: &Context,
	graph: bool,
	options: Options,
) -> Result<Value, Error>
where
	L: Loader,
	W: WarningHandler,
{
	let element: Value = if graph {
		let mut wrapper = json_syntax::Object::default();
		wrapper.insert(
			"@graph".into(),
			match expanded {
				Value::Array(items) => Value::Array(items.clone()),
				Value::Null => Value::Array(Vec::new()),
				other => Value::Array(vec![other.clone()]),
			},
		);
		Value::Object(wrapper)
	} else {
		expanded.clone()
	};

	let compacted = compact_fragment(
		env,
		&element,
		active_context,
		active_context,
		if graph { Some("@graph") } else { None },
		options,
	)
	.await?;

	// An empty array compacts into an empty object; a remaining array is
	// keyed under a compacted `@graph`.
	match compacted {
		Value::Array(items) => {
			let mut result = json_syntax::Object::default();
			if !items.is_empty() {
				let graph_key = compact_iri(
					active_context,
					&Term::Keyword(Keyword::Graph),
					None,
					true,
					false,
					options,
				)?
				.unwrap_or_else(|| "@graph".to_string());
				result.insert(graph_key.as_str().into(), Value::Array(items));
			}
			Ok(Value::Object(result))
		}
		Value::Null => Ok(Value::Object(json_syntax::Object::default())),
		other => Ok(other),
	}
}

/// Compacted form of an expanded `@id` entry value (a string, or an array
/// of strings when compacting a frame).
pub(crate) fn compact_id(
	active_context: &Context,
	value: &Value,
	options: Options,
) -> Result<Value, Error> {
	match value {
		Value::String(id) => {
			let compacted = compact_iri(
				active_context,
				&Term::Id(lod_core::Id::from_string(id.as_str().to_string())),
				None,
				false,
				false,
				options,
			)?;
			Ok(Value::String(compacted.unwrap_or_default().into()))
		}
		Value::Array(items) => {
			let mut result = Vec::with_capacity(items.len());
			for item in items {
				result.push(compact_id(active_context, item, options)?)
			}
			if result.len() == 1 && options.compact_arrays {
				Ok(result.into_iter().next().unwrap())
			} else {
				Ok(Value::Array(result))
			}
		}
		// Frame wildcard.
		other => Ok(other.clone()),
	}
}

/// Compacted form of an expanded `@type` entry value.
pub(crate) fn compact_type(
	active_context: &Context,
	type_scoped_context: &Context,
	value: &Value,
	options: Options,
) -> Result<Value, Error> {
	match value {
		Value::String(ty) => {
			let compacted = compact_iri(
				type_scoped_context,
				&Term::Id(lod_core::Id::from_string(ty.as_str().to_string())),
				None,
				true,
				false,
				options,
			)?;
			Ok(Value::String(compacted.unwrap_or_default().into()))
		}
		Value::Array(items) => {
			let mut result = Vec::with_capacity(items.len());
			for item in items {
				result.push(compact_type(
					active_context,
					type_scoped_context,
					item,
					options,
				)?)
			}

			// A single type compacts to a string, unless the type alias
			// term forces a set representation.
			let mut as_array = !options.compact_arrays;
			if options.processing_mode == ProcessingMode::JsonLd1_1 {
				if let Some(type_definition) = active_context.get("@type") {
					if type_definition
						.container
						.contains(lod_core::ContainerKind::Set)
					{
						as_array = true
					}
				}
			}

			if result.len() == 1 && !as_array {
				Ok(result.into_iter().next().unwrap())
			} else {
				Ok(Value::Array(result))
			}
		}
		other => Ok(other.clone()),
	}
}

pub(crate) fn as_array(value: &Value) -> &[Value] {
	Value::force_as_array(value)
}
