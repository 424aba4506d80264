use crate::Embed;
use iref::IriBuf;
use lod_core::{ProcessingMode, RdfDirection};

/// Processing options, covering every operation of the [`Processor`](crate::Processor).
///
/// Options irrelevant to an operation are ignored by it.
#[derive(Clone, Debug)]
pub struct Options {
	/// Base IRI against which relative IRIs are resolved.
	pub base: Option<IriBuf>,

	/// Context prepended to the input's own context before expansion.
	pub expand_context: Option<json_syntax::Value>,

	/// JSON-LD processing mode.
	pub processing_mode: ProcessingMode,

	/// Process object entries by lexical key order.
	pub ordered: bool,

	/// Compaction: replace singleton arrays with their element.
	pub compact_arrays: bool,

	/// Compaction: compact IRIs relative to the base IRI.
	pub compact_to_relative: bool,

	/// Compaction: always wrap the output in a `@graph` entry.
	pub graph: bool,

	/// RDF serialization: keep quads with blank node predicates.
	pub produce_generalized_rdf: bool,

	/// Encoding of direction-tagged strings in RDF.
	pub rdf_direction: Option<RdfDirection>,

	/// RDF deserialization: produce native JSON numbers and booleans.
	pub use_native_types: bool,

	/// RDF deserialization: keep `rdf:type` as a regular property.
	pub use_rdf_type: bool,

	/// Framing: default `@embed` flag.
	pub embed: Embed,

	/// Framing: only include properties present in the frame.
	pub explicit: bool,

	/// Framing: require every frame property to match.
	pub require_all: bool,

	/// Framing: omit missing properties instead of emitting defaults.
	pub omit_default: bool,

	/// Framing: omit the top-level `@graph` wrapper for single-node
	/// results. Defaults to the processing mode behavior (`true` under
	/// JSON-LD 1.1).
	pub omit_graph: Option<bool>,

	/// Framing: remove blank node identifiers used only once. Defaults to
	/// the processing mode behavior (`true` under JSON-LD 1.1).
	pub prune_blank_node_identifiers: Option<bool>,
}

impl Default for Options {
	fn default() -> Options {
		Options {
			base: None,
			expand_context: None,
			processing_mode: ProcessingMode::default(),
			ordered: false,
			compact_arrays: true,
			compact_to_relative: true,
			graph: false,
			produce_generalized_rdf: false,
			rdf_direction: None,
			use_native_types: false,
			use_rdf_type: false,
			embed: Embed::default(),
			explicit: false,
			require_all: false,
			omit_default: false,
			omit_graph: None,
			prune_blank_node_identifiers: None,
		}
	}
}

impl Options {
	pub fn with_base(base: IriBuf) -> Options {
		Options {
			base: Some(base),
			..Options::default()
		}
	}

	pub(crate) fn expansion(&self, frame_expansion: bool) -> lod_expansion::Options {
		lod_expansion::Options {
			processing_mode: self.processing_mode,
			ordered: self.ordered,
			frame_expansion,
		}
	}

	pub(crate) fn context_processing(&self) -> lod_context_processing::Options {
		lod_context_processing::Options {
			processing_mode: self.processing_mode,
			..Default::default()
		}
	}

	pub(crate) fn compaction(&self) -> lod_compaction::Options {
		lod_compaction::Options {
			processing_mode: self.processing_mode,
			compact_to_relative: self.compact_to_relative,
			compact_arrays: self.compact_arrays,
			ordered: self.ordered,
		}
	}

	pub(crate) fn framing(&self) -> lod_framing::Options {
		let mut options = lod_framing::Options::new(self.processing_mode);
		options.embed = self.embed;
		options.explicit = self.explicit;
		options.require_all = self.require_all;
		options.omit_default = self.omit_default;

		if let Some(omit_graph) = self.omit_graph {
			options.omit_graph = omit_graph;
		}

		if let Some(prune) = self.prune_blank_node_identifiers {
			options.prune_blank_node_identifiers = prune;
		}

		options
	}

	pub(crate) fn to_rdf(&self) -> lod_rdf::ToRdfOptions {
		lod_rdf::ToRdfOptions {
			produce_generalized_rdf: self.produce_generalized_rdf,
			rdf_direction: self.rdf_direction,
		}
	}

	pub(crate) fn from_rdf(&self) -> lod_rdf::FromRdfOptions {
		lod_rdf::FromRdfOptions {
			use_native_types: self.use_native_types,
			use_rdf_type: self.use_rdf_type,
			rdf_direction: self.rdf_direction,
		}
	}
}
