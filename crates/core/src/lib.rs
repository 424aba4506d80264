//! JSON-LD core types.
//!
//! Shared model of the `lod` processor: keywords, containers, node
//! identifiers, active contexts, the RDF dataset model with its N-Quads
//! codec, blank node identifier issuance, and the document loader
//! contract.

pub mod container;
pub mod context;
mod direction;
mod error;
mod id;
mod issuer;
mod keyword;
mod lang;
pub mod loader;
mod mode;
mod nullable;
pub mod object;
pub mod rdf;
mod term;
mod ty;
pub mod warning;

pub use container::{Container, ContainerKind};
pub use context::{Context, InverseContext, TermDefinition};
pub use direction::Direction;
pub use error::ErrorCode;
pub use id::{Id, ValidId};
pub use issuer::IdentifierIssuer;
pub use keyword::{is_keyword_like, Keyword};
pub use lang::LenientLangTagBuf;
pub use loader::{
	ExtractContext, ExtractContextError, LoadError, Loader, MapLoader, NoLoader, RemoteDocument,
};
pub use mode::ProcessingMode;
pub use nullable::Nullable;
pub use rdf::{Dataset, RdfDirection};
pub use term::Term;
pub use ty::Type;
