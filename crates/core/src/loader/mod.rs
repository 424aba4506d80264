//! Document loader contract.
//!
//! The processing algorithms never perform I/O themselves: every remote
//! document (including remote contexts) is fetched through a [`Loader`]
//! supplied by the caller, which is also the only suspension point of the
//! algorithms.

use iref::{Iri, IriBuf};

pub mod map;
pub mod none;

pub use map::MapLoader;
pub use none::NoLoader;

pub type LoadingResult = Result<RemoteDocument, LoadError>;

/// Remote document.
///
/// Content of a loaded remote document along with the retrieval metadata
/// the algorithms care about.
#[derive(Debug, Clone)]
pub struct RemoteDocument {
	/// Final URL of the loaded document, after eventual redirection.
	pub url: Option<IriBuf>,

	/// HTTP `Content-Type` header value of the loaded document, exclusive
	/// of any optional parameters.
	pub content_type: Option<String>,

	/// If available, the value of the HTTP Link Header using the
	/// `http://www.w3.org/ns/json-ld#context` link relation. Ignored when
	/// the content type is `application/ld+json`; a loader detecting more
	/// than one such header must fail with a
	/// [`multiple context link headers`](crate::ErrorCode::MultipleContextLinkHeaders)
	/// error instead of picking one.
	pub context_url: Option<IriBuf>,

	/// Value of any `profile` parameter retrieved as part of the original
	/// content type.
	pub profile: Option<String>,

	/// The retrieved document.
	pub document: json_syntax::Value,
}

impl RemoteDocument {
	pub fn new(
		url: Option<IriBuf>,
		content_type: Option<String>,
		document: json_syntax::Value,
	) -> Self {
		Self {
			url,
			content_type,
			context_url: None,
			profile: None,
			document,
		}
	}

	pub fn url(&self) -> Option<&IriBuf> {
		self.url.as_ref()
	}

	pub fn document(&self) -> &json_syntax::Value {
		&self.document
	}

	pub fn into_document(self) -> json_syntax::Value {
		self.document
	}
}

pub type LoadErrorCause = Box<dyn std::error::Error + Send + Sync>;

/// Loading error.
#[derive(Debug, thiserror::Error)]
#[error("loading document `{target}` failed: {cause}")]
pub struct LoadError {
	pub target: IriBuf,
	pub cause: LoadErrorCause,
}

impl LoadError {
	pub fn new(target: IriBuf, cause: impl 'static + std::error::Error + Send + Sync) -> Self {
		Self {
			target,
			cause: Box::new(cause),
		}
	}
}

/// Document loader.
///
/// This library provides two in-memory implementations:
///   - [`NoLoader`], which always fails. Perfect if you are certain that
///     processing will not require any loading.
///   - [`MapLoader`], mapping IRIs to pre-loaded documents, so that no
///     network call is performed and the loaded content can be trusted.
pub trait Loader {
	/// Loads the document behind the given IRI.
	#[allow(async_fn_in_trait)]
	async fn load(&self, url: &Iri) -> LoadingResult;
}

impl<'l, L: Loader> Loader for &'l L {
	async fn load(&self, url: &Iri) -> LoadingResult {
		L::load(self, url).await
	}
}

/// Context extraction error.
#[derive(Debug, thiserror::Error)]
pub enum ExtractContextError {
	/// Unexpected JSON value.
	#[error("unexpected {0}")]
	Unexpected(json_syntax::Kind),

	/// No context definition found.
	#[error("missing `@context` entry")]
	NoContext,

	/// Multiple context definitions found.
	#[error("duplicate `@context` entry")]
	DuplicateContext,
}

/// Extraction of the `@context` entry of a loaded document.
pub trait ExtractContext {
	fn into_ld_context(self) -> Result<json_syntax::Value, ExtractContextError>;
}

impl ExtractContext for json_syntax::Value {
	fn into_ld_context(self) -> Result<json_syntax::Value, ExtractContextError> {
		match self {
			Self::Object(mut o) => match o
				.remove_unique("@context")
				.map_err(|_| ExtractContextError::DuplicateContext)?
			{
				Some(context) => Ok(context.value),
				None => Err(ExtractContextError::NoContext),
			},
			other => Err(ExtractContextError::Unexpected(other.kind())),
		}
	}
}
