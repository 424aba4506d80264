//! JSON-LD 1.1 processor.
//!
//! This library implements the algorithms of the [JSON-LD 1.1
//! Syntax](https://www.w3.org/TR/json-ld11/),
//! [API](https://www.w3.org/TR/json-ld11-api/) and
//! [Framing](https://www.w3.org/TR/json-ld11-framing/) specifications,
//! together with the URDNA2015 RDF dataset canonicalization algorithm.
//!
//! The entry point is the [`Processor`], which owns the document loader
//! and the remote context caches:
//!
//! ```
//! use lod::{Options, Processor};
//! use json_syntax::{json, Parse, Value};
//!
//! # async_std::task::block_on(async {
//! let processor = Processor::no_loader();
//!
//! let (document, _) = Value::parse_str(
//! 	r#"{
//! 		"@context": { "name": "http://schema.org/name" },
//! 		"name": "Manu"
//! 	}"#,
//! )
//! .unwrap();
//!
//! let expanded = processor
//! 	.expand(&document, &Options::default())
//! 	.await
//! 	.unwrap();
//!
//! assert_eq!(
//! 	expanded,
//! 	json!([ { "http://schema.org/name": [ { "@value": "Manu" } ] } ])
//! );
//! # });
//! ```
//!
//! Documents are [`json_syntax::Value`] trees at every stage; RDF
//! datasets use the [`Dataset`] type and its N-Quads codec.
pub use lod_canonicalization as canonicalization;
pub use lod_compaction as compaction;
pub use lod_context_processing as context_processing;
pub use lod_expansion as expansion;
pub use lod_flattening as flattening;
pub use lod_framing as framing;
pub use lod_rdf as rdf;

mod options;
mod processor;

pub use lod_canonicalization::{canonical_nquads, canonicalize};
pub use lod_core::{
	rdf::nquads, warning, Container, ContainerKind, Context, Dataset, Direction, ErrorCode, Id,
	IdentifierIssuer, Keyword, LenientLangTagBuf, LoadError, Loader, MapLoader, NoLoader,
	Nullable, ProcessingMode, RdfDirection, RemoteDocument, Term,
};
pub use lod_expansion::KeyDroppedCallback;
pub use lod_framing::Embed;
pub use options::Options;
pub use processor::{Error, Processor};
