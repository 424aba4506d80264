use super::{LoadError, Loader, LoadingResult};
use iref::Iri;

/// Dummy loader that fails on every load attempt.
///
/// Can be useful when you know that the processed document does not
/// reference any remote context.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLoader;

#[derive(Debug, thiserror::Error)]
#[error("no loader")]
pub struct CannotLoad;

impl Loader for NoLoader {
	async fn load(&self, url: &Iri) -> LoadingResult {
		Err(LoadError::new(url.to_owned(), CannotLoad))
	}
}
