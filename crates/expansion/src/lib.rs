//! Implementation of the [JSON-LD expansion algorithm](https://www.w3.org/TR/json-ld11-api/#expansion-algorithms).
//!
//! Expanded documents are plain [`json_syntax::Value`] trees in the
//! expanded document form: an array of node objects whose property values
//! are arrays of value, node or list objects.
use iref::IriBuf;
use json_syntax::Value;
use lod_core::{object, warning, Context, ErrorCode, Loader, ProcessingMode};
use lod_context_processing::ContextCache;
use std::fmt;

mod element;
mod node;
mod value;

pub(crate) use element::expand_element;
pub(crate) use node::expand_node;
pub(crate) use value::{expand_literal, expand_value_object};

/// Error raised by the key-dropped callback to abort expansion.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Callback invoked once for each object key dropped during expansion
/// because it expands neither to a keyword nor to an IRI-like value.
pub type KeyDroppedCallback<'a> = dyn FnMut(&str) -> Result<(), CallbackError> + 'a;

/// Warnings that can be raised during expansion.
#[derive(Debug, Clone)]
pub enum Warning {
	EmptyTerm,
	BlankNodeIdProperty(String),
	MalformedIri(String),
	MalformedLanguageTag(String),
	KeywordLikeValue(String),
}

impl fmt::Display for Warning {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::EmptyTerm => write!(f, "empty term"),
			Self::BlankNodeIdProperty(b) => {
				write!(f, "blank node identifier `{b}` used as property")
			}
			Self::MalformedIri(s) => write!(f, "malformed IRI `{s}`"),
			Self::MalformedLanguageTag(s) => write!(f, "malformed language tag `{s}`"),
			Self::KeywordLikeValue(s) => write!(f, "keyword-like value `{s}`"),
		}
	}
}

impl From<lod_context_processing::MalformedIri> for Warning {
	fn from(lod_context_processing::MalformedIri(s): lod_context_processing::MalformedIri) -> Self {
		Self::MalformedIri(s)
	}
}

/// Handler for both expansion warnings and the context processing
/// warnings raised by nested context applications.
pub trait WarningHandler:
	warning::Handler<Warning> + warning::Handler<lod_context_processing::Warning>
{
}

impl<H> WarningHandler for H where
	H: warning::Handler<Warning> + warning::Handler<lod_context_processing::Warning>
{
}

/// Errors that can happen during expansion.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Colliding keywords")]
	CollidingKeywords,

	#[error("Invalid `@id` value")]
	InvalidIdValue,

	#[error("Invalid `@index` value")]
	InvalidIndexValue,

	#[error("Invalid `@included` value")]
	InvalidIncludedValue,

	#[error("Invalid `@nest` value")]
	InvalidNestValue,

	#[error("Invalid `@reverse` value")]
	InvalidReverseValue,

	#[error("Invalid reverse property map")]
	InvalidReversePropertyMap,

	#[error("Invalid reverse property value")]
	InvalidReversePropertyValue,

	#[error("Invalid set or list object")]
	InvalidSetOrListObject,

	#[error("Invalid type value")]
	InvalidTypeValue,

	#[error("Invalid typed value")]
	InvalidTypedValue,

	#[error("Invalid value object")]
	InvalidValueObject,

	#[error("Invalid value object value")]
	InvalidValueObjectValue,

	#[error("Invalid language map value")]
	InvalidLanguageMapValue,

	#[error("Invalid language-tagged string")]
	InvalidLanguageTaggedString,

	#[error("Invalid language-tagged value")]
	InvalidLanguageTaggedValue,

	#[error("Invalid base direction")]
	InvalidBaseDirection,

	#[error("List of lists")]
	ListOfLists,

	#[error("Duplicate key")]
	DuplicateKey,

	#[error("Context processing failed: {0}")]
	ContextProcessing(#[from] lod_context_processing::Error),

	#[error("Key-dropped callback error: {0}")]
	Callback(CallbackError),
}

impl Error {
	pub fn code(&self) -> ErrorCode {
		match self {
			Self::CollidingKeywords => ErrorCode::CollidingKeywords,
			Self::InvalidIdValue => ErrorCode::InvalidIdValue,
			Self::InvalidIndexValue => ErrorCode::InvalidIndexValue,
			Self::InvalidIncludedValue => ErrorCode::InvalidIncludedValue,
			Self::InvalidNestValue => ErrorCode::InvalidNestValue,
			Self::InvalidReverseValue => ErrorCode::InvalidReverseValue,
			Self::InvalidReversePropertyMap => ErrorCode::InvalidReversePropertyMap,
			Self::InvalidReversePropertyValue => ErrorCode::InvalidReversePropertyValue,
			Self::InvalidSetOrListObject => ErrorCode::InvalidSetOrListObject,
			Self::InvalidTypeValue => ErrorCode::InvalidTypeValue,
			Self::InvalidTypedValue => ErrorCode::InvalidTypedValue,
			Self::InvalidValueObject => ErrorCode::InvalidValueObject,
			Self::InvalidValueObjectValue => ErrorCode::InvalidValueObjectValue,
			Self::InvalidLanguageMapValue => ErrorCode::InvalidLanguageMapValue,
			Self::InvalidLanguageTaggedString => ErrorCode::InvalidLanguageTaggedString,
			Self::InvalidLanguageTaggedValue => ErrorCode::InvalidLanguageTaggedValue,
			Self::InvalidBaseDirection => ErrorCode::InvalidBaseDirection,
			Self::ListOfLists => ErrorCode::ListOfLists,
			Self::DuplicateKey => ErrorCode::DuplicateKey,
			Self::ContextProcessing(e) => e.code(),
			Self::Callback(_) => ErrorCode::LoadingDocumentFailed,
		}
	}
}

/// Expansion environment.
pub struct Environment<'a, L, W> {
	pub loader: &'a L,
	pub cache: &'a ContextCache,
	pub warnings: &'a mut W,
	pub on_key_dropped: Option<&'a mut KeyDroppedCallback<'a>>,
}

impl<'a, L, W> Environment<'a, L, W> {
	/// Reports a dropped key, aborting expansion if the callback errors.
	pub(crate) fn key_dropped(&mut self, key: &str) -> Result<(), Error> {
		if let Some(callback) = &mut self.on_key_dropped {
			callback(key).map_err(Error::Callback)?
		}

		Ok(())
	}

	pub(crate) fn context_env(
		&mut self,
	) -> lod_context_processing::Environment<'_, L, W> {
		lod_context_processing::Environment {
			loader: self.loader,
			cache: self.cache,
			warnings: self.warnings,
		}
	}
}

/// IRI expansion, reporting malformed IRIs as expansion warnings.
pub(crate) fn expand_iri<L, W: WarningHandler>(
	env: &mut Environment<'_, L, W>,
	active_context: &Context,
	value: &str,
	document_relative: bool,
	vocab: bool,
) -> lod_core::Term {
	lod_context_processing::expand_iri_simple::<Warning, W>(
		active_context,
		value,
		document_relative,
		vocab,
		env.warnings,
	)
}

/// Options of the expansion algorithm.
#[derive(Clone, Copy)]
pub struct Options {
	/// The processing mode.
	pub processing_mode: ProcessingMode,

	/// If set to `true`, entries are processed by lexical order of their
	/// keys.
	pub ordered: bool,

	/// Frame expansion: keep wildcard patterns (`{}`, `[]`), `@default`
	/// entries and free-floating nodes, as required when expanding a
	/// frame document.
	pub frame_expansion: bool,
}

impl Default for Options {
	fn default() -> Options {
		Options {
			processing_mode: ProcessingMode::default(),
			ordered: false,
			frame_expansion: false,
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

/// Expands `document` with the given active context, producing a document
/// in the expanded form (an array of expanded objects).
///
/// See <https://www.w3.org/TR/json-ld11-api/#expansion-algorithm>.
pub async fn expand<L, W>(
	env: &mut Environment<'_, L, W>,
	document: &Value,
	active_context: &Context,
	base_url: Option<&IriBuf>,
	options: Options,
) -> Result<Value, Error>
where
	L: Loader,
	W: WarningHandler,
{
	let expanded = expand_element(env, active_context, None, document, base_url, options, false)
		.await?;

	// If the expanded document is a map with only an `@graph` entry, set
	// it to that value. If it is null, use an empty array; otherwise
	// ensure it is an array.
	match expanded {
		Value::Null => Ok(Value::Array(Vec::new())),
		Value::Object(mut o) if o.len() == 1 && object::entry(&o, "@graph").is_some() => {
			let graph = o.remove_unique("@graph").ok().flatten().unwrap().value;
			match graph {
				Value::Array(items) => Ok(Value::Array(items)),
				Value::Null => Ok(Value::Array(Vec::new())),
				other => Ok(Value::Array(vec![other])),
			}
		}
		Value::Array(items) => Ok(Value::Array(items)),
		other => Ok(Value::Array(vec![other])),
	}
}
