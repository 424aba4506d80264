//! Serialization of JSON-LD into RDF datasets and back.
//!
//! See <https://www.w3.org/TR/json-ld11-api/#rdf-serialization-deserialization-algorithms>.
use lod_core::ErrorCode;

mod from_rdf;
mod to_rdf;

pub use from_rdf::{from_rdf, FromRdfOptions};
pub use to_rdf::{canonical_json, to_rdf, ToRdfOptions};

/// Errors that can happen during RDF deserialization.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid JSON literal")]
	InvalidJsonLiteral,
}

impl Error {
	pub fn code(&self) -> ErrorCode {
		match self {
			Self::InvalidJsonLiteral => ErrorCode::InvalidJsonLiteral,
		}
	}
}
