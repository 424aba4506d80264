//! JSON-LD context processing types and algorithms.
use lod_core::{warning, ErrorCode, ExtractContextError, LoadError, ProcessingMode};
use std::fmt;

pub mod algorithm;
mod cache;
mod stack;

pub use algorithm::{expand_iri_simple, process_context, MalformedIri};
pub use cache::ContextCache;
pub use stack::ProcessingStack;

/// Warnings that can be raised during context processing.
#[derive(Debug, Clone)]
pub enum Warning {
	KeywordLikeTerm(String),
	KeywordLikeValue(String),
	MalformedIri(String),
	MalformedLanguageTag(String),
}

impl fmt::Display for Warning {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::KeywordLikeTerm(s) => write!(f, "keyword-like term `{s}`"),
			Self::KeywordLikeValue(s) => write!(f, "keyword-like value `{s}`"),
			Self::MalformedIri(s) => write!(f, "malformed IRI `{s}`"),
			Self::MalformedLanguageTag(s) => write!(f, "malformed language tag `{s}`"),
		}
	}
}

pub trait WarningHandler: warning::Handler<Warning> {}

impl<H> WarningHandler for H where H: warning::Handler<Warning> {}

/// Errors that can happen during context processing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid context nullification")]
	InvalidContextNullification,

	#[error("Remote document loading failed")]
	LoadingDocumentFailed,

	#[error("Processing mode conflict")]
	ProcessingModeConflict,

	#[error("Invalid `@context` entry")]
	InvalidContextEntry,

	#[error("Invalid local context")]
	InvalidLocalContext,

	#[error("Invalid `@import` value")]
	InvalidImportValue,

	#[error("Invalid remote context")]
	InvalidRemoteContext,

	#[error("Invalid base IRI")]
	InvalidBaseIri,

	#[error("Invalid vocabulary mapping")]
	InvalidVocabMapping,

	#[error("Invalid default language")]
	InvalidDefaultLanguage,

	#[error("Invalid base direction")]
	InvalidBaseDirection,

	#[error("Invalid `@propagate` value")]
	InvalidPropagateValue,

	#[error("Invalid `@version` value")]
	InvalidVersionValue,

	#[error("Cyclic IRI mapping")]
	CyclicIriMapping,

	#[error("Invalid term definition")]
	InvalidTermDefinition,

	#[error("Keyword redefinition")]
	KeywordRedefinition,

	#[error("Invalid `@protected` value")]
	InvalidProtectedValue,

	#[error("Invalid type mapping")]
	InvalidTypeMapping,

	#[error("Invalid language mapping")]
	InvalidLanguageMapping,

	#[error("Invalid reverse property")]
	InvalidReverseProperty,

	#[error("Invalid IRI mapping")]
	InvalidIriMapping,

	#[error("Invalid keyword alias")]
	InvalidKeywordAlias,

	#[error("Invalid container mapping")]
	InvalidContainerMapping,

	#[error("Invalid `@nest` value")]
	InvalidNestValue,

	#[error("Invalid `@prefix` value")]
	InvalidPrefixValue,

	#[error("Invalid scoped context")]
	InvalidScopedContext,

	#[error("Protected term redefinition")]
	ProtectedTermRedefinition,

	#[error("Context overflow")]
	ContextOverflow,

	#[error("Duplicate key")]
	DuplicateKey,

	#[error(transparent)]
	ContextLoadingFailed(#[from] LoadError),

	#[error("Unable to extract JSON-LD context: {0}")]
	ContextExtractionFailed(ExtractContextError),
}

impl Error {
	pub fn code(&self) -> ErrorCode {
		match self {
			Self::InvalidContextNullification => ErrorCode::InvalidContextNullification,
			Self::LoadingDocumentFailed => ErrorCode::LoadingDocumentFailed,
			Self::ProcessingModeConflict => ErrorCode::ProcessingModeConflict,
			Self::InvalidContextEntry => ErrorCode::InvalidContextEntry,
			Self::InvalidLocalContext => ErrorCode::InvalidLocalContext,
			Self::InvalidImportValue => ErrorCode::InvalidImportValue,
			Self::InvalidRemoteContext => ErrorCode::InvalidRemoteContext,
			Self::InvalidBaseIri => ErrorCode::InvalidBaseIri,
			Self::InvalidVocabMapping => ErrorCode::InvalidVocabMapping,
			Self::InvalidDefaultLanguage => ErrorCode::InvalidDefaultLanguage,
			Self::InvalidBaseDirection => ErrorCode::InvalidBaseDirection,
			Self::InvalidPropagateValue => ErrorCode::InvalidPropagateValue,
			Self::InvalidVersionValue => ErrorCode::InvalidVersionValue,
			Self::CyclicIriMapping => ErrorCode::CyclicIriMapping,
			Self::InvalidTermDefinition => ErrorCode::InvalidTermDefinition,
			Self::KeywordRedefinition => ErrorCode::KeywordRedefinition,
			Self::InvalidProtectedValue => ErrorCode::InvalidProtectedValue,
			Self::InvalidTypeMapping => ErrorCode::InvalidTypeMapping,
			Self::InvalidLanguageMapping => ErrorCode::InvalidLanguageMapping,
			Self::InvalidReverseProperty => ErrorCode::InvalidReverseProperty,
			Self::InvalidIriMapping => ErrorCode::InvalidIriMapping,
			Self::InvalidKeywordAlias => ErrorCode::InvalidKeywordAlias,
			Self::InvalidContainerMapping => ErrorCode::InvalidContainerMapping,
			Self::InvalidNestValue => ErrorCode::InvalidNestValue,
			Self::InvalidPrefixValue => ErrorCode::InvalidPrefixValue,
			Self::InvalidScopedContext => ErrorCode::InvalidScopedContext,
			Self::ProtectedTermRedefinition => ErrorCode::ProtectedTermRedefinition,
			Self::ContextOverflow => ErrorCode::ContextOverflow,
			Self::DuplicateKey => ErrorCode::DuplicateKey,
			Self::ContextLoadingFailed(_) => ErrorCode::LoadingRemoteContextFailed,
			Self::ContextExtractionFailed(_) => ErrorCode::LoadingRemoteContextFailed,
		}
	}
}

/// Processing environment: the collaborators threaded through the
/// algorithms.
pub struct Environment<'a, L, W> {
	pub loader: &'a L,
	pub cache: &'a ContextCache,
	pub warnings: &'a mut W,
}

impl<'a, L, W> Environment<'a, L, W> {
	pub fn new(loader: &'a L, cache: &'a ContextCache, warnings: &'a mut W) -> Self {
		Self {
			loader,
			cache,
			warnings,
		}
	}
}

/// Options of the Context Processing Algorithm.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Options {
	/// The processing mode.
	pub processing_mode: ProcessingMode,

	/// Override protected definitions.
	pub override_protected: bool,

	/// Propagate the processed context.
	pub propagate: bool,
}

impl Options {
	/// Return the same set of options, but with `override_protected` set to `true`.
	#[must_use]
	pub fn with_override(&self) -> Options {
		let mut opt = *self;
		opt.override_protected = true;
		opt
	}

	/// Return the same set of options, but with `override_protected` set to `false`.
	#[must_use]
	pub fn with_no_override(&self) -> Options {
		let mut opt = *self;
		opt.override_protected = false;
		opt
	}

	/// Return the same set of options, but with `propagate` set to `false`.
	#[must_use]
	pub fn without_propagation(&self) -> Options {
		let mut opt = *self;
		opt.propagate = false;
		opt
	}
}

impl Default for Options {
	fn default() -> Options {
		Options {
			processing_mode: ProcessingMode::default(),
			override_protected: false,
			propagate: true,
		}
	}
}
