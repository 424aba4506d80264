//! Implementation of the [JSON-LD framing algorithm](https://www.w3.org/TR/json-ld11-framing/).
//!
//! Framing operates on an expanded document and an expanded frame: the
//! node map of the document is matched against the frame pattern, and
//! matched nodes are embedded according to the frame shape. The framed
//! output is then compacted by the caller, and finished with
//! [`remove_preserve`] and (optionally) [`prune_blank_nodes`].
use json_syntax::{Object, Value};
use lod_core::{object, ErrorCode, IdentifierIssuer, ProcessingMode};
use lod_flattening::generate_node_map;
use std::collections::HashSet;

mod cleanup;
mod matching;

pub use cleanup::{prune_blank_nodes, remove_preserve};
use matching::{filter_subjects, get_frame_flag, single_frame, FrameFlag};

/// Value of the `@embed` framing flag.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Embed {
	/// A node is embedded the first time it appears per top-level match,
	/// and referenced afterwards.
	#[default]
	Once,

	/// A node object is embedded everywhere it appears, circular
	/// references excepted.
	Always,

	/// Node objects always appear as references.
	Never,
}

impl<'a> TryFrom<&'a str> for Embed {
	type Error = &'a str;

	fn try_from(name: &'a str) -> Result<Embed, &'a str> {
		match name {
			"@once" => Ok(Self::Once),
			"@always" => Ok(Self::Always),
			"@never" => Ok(Self::Never),
			_ => Err(name),
		}
	}
}

/// Errors that can happen during framing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid frame")]
	InvalidFrame,

	#[error("Invalid `@embed` value")]
	InvalidEmbedValue,

	#[error("Node map generation failed: {0}")]
	NodeMap(#[from] lod_flattening::Error),
}

impl Error {
	pub fn code(&self) -> ErrorCode {
		match self {
			Self::InvalidFrame => ErrorCode::InvalidFrame,
			Self::InvalidEmbedValue => ErrorCode::InvalidEmbedValue,
			Self::NodeMap(e) => e.code(),
		}
	}
}

/// Framing options.
#[derive(Clone, Copy, Debug)]
pub struct Options {
	/// Default `@embed` flag.
	pub embed: Embed,

	/// Only properties present in the frame are included in the output.
	pub explicit: bool,

	/// A node matches the frame only when every frame property matches.
	pub require_all: bool,

	/// Omit missing properties instead of filling them with `null` or the
	/// frame's `@default` value.
	pub omit_default: bool,

	/// Omit the top-level `@graph` wrapper when the result holds a single
	/// node. Defaults to `true` under JSON-LD 1.1.
	pub omit_graph: bool,

	/// Remove blank node identifiers that are used only once. Defaults to
	/// `true` under JSON-LD 1.1.
	pub prune_blank_node_identifiers: bool,

	/// Processing mode, governing the mode-dependent defaults.
	pub processing_mode: ProcessingMode,
}

impl Default for Options {
	fn default() -> Options {
		Options::new(ProcessingMode::default())
	}
}

impl Options {
	pub fn new(processing_mode: ProcessingMode) -> Options {
		let is_1_1 = processing_mode == ProcessingMode::JsonLd1_1;
		Options {
			embed: Embed::Once,
			explicit: false,
			require_all: false,
			omit_default: false,
			omit_graph: is_1_1,
			prune_blank_node_identifiers: is_1_1,
			processing_mode,
		}
	}
}

/// Framing state.
pub(crate) struct State<'a> {
	pub subjects: &'a lod_flattening::NodeMapGraph,
	pub embeds: HashSet<String>,
	pub subject_stack: Vec<String>,
	pub options: &'a Options,
}

/// Frames `expanded` with the expanded frame `expanded_frame`, returning
/// the framed output in expanded form (with `@preserve` wrappers for
/// preserved defaults).
pub fn frame(
	expanded: &Value,
	expanded_frame: &Value,
	options: &Options,
) -> Result<Value, Error> {
	// Produce the map of all subjects, merging every graph.
	let mut issuer = IdentifierIssuer::new("_:b");
	let node_map = generate_node_map(expanded, &mut issuer)?;
	let subjects = node_map.merged();

	let frame_object = single_frame(expanded_frame)?;

	let mut ids: Vec<&str> = subjects.iter().map(|(id, _)| id).collect();
	ids.sort_unstable();

	let mut state = State {
		subjects: &subjects,
		embeds: HashSet::new(),
		subject_stack: Vec::new(),
		options,
	};

	let framed = match_frame(&mut state, &ids, &frame_object, true, None)?;
	let mut framed = Value::Array(framed);

	if options.prune_blank_node_identifiers {
		prune_blank_nodes(&mut framed);
	}

	Ok(framed)
}

/// Matches `ids` against `frame`, producing the framed output of every
/// matching subject.
pub(crate) fn match_frame(
	state: &mut State,
	ids: &[&str],
	frame: &Object,
	top_level: bool,
	_property: Option<&str>,
) -> Result<Vec<Value>, Error> {
	let matches = filter_subjects(state, ids, frame)?;

	let embed_default = state.options.embed;
	let embed = match get_frame_flag(frame, "@embed") {
		Some(FrameFlag::String(s)) => {
			Embed::try_from(s.as_str()).map_err(|_| Error::InvalidEmbedValue)?
		}
		Some(FrameFlag::Boolean(true)) => Embed::Once,
		Some(FrameFlag::Boolean(false)) => Embed::Never,
		None => embed_default,
	};

	let explicit = match get_frame_flag(frame, "@explicit") {
		Some(FrameFlag::Boolean(b)) => b,
		_ => state.options.explicit,
	};

	let mut output = Vec::new();

	for id in matches {
		// Each top-level match is a compartmentalized result: embeds do
		// not carry from one top-level match to another.
		if top_level {
			state.embeds.clear();
		}

		let subject = state.subjects.get(&id).unwrap().clone();

		// A node is referenced instead of embedded when embedding is
		// disabled, when it was already embedded under `@once`, or when
		// embedding it would create a cycle.
		let reference_only = match embed {
			Embed::Never => true,
			Embed::Once => state.embeds.contains(&id),
			Embed::Always => false,
		} || state.subject_stack.contains(&id);

		if reference_only {
			let mut reference = Object::default();
			reference.insert("@id".into(), Value::String(id.as_str().into()));
			output.push(Value::Object(reference));
			continue;
		}

		state.embeds.insert(id.clone());
		state.subject_stack.push(id.clone());

		let mut node = Object::default();
		node.insert("@id".into(), Value::String(id.as_str().into()));

		// Keyword entries of the subject are copied verbatim.
		for entry in subject.entries() {
			let key = entry.key.as_str();
			if key != "@id" && lod_core::Keyword::try_from(key).is_ok() {
				node.insert(entry.key.clone(), entry.value.clone());
			}
		}

		// Properties named by the frame come first, in frame order.
		for frame_entry in frame.entries() {
			let prop = frame_entry.key.as_str();
			if lod_core::Keyword::try_from(prop).is_ok() {
				continue;
			}

			let Some(values) = object::entry(&subject, prop) else {
				continue;
			};

			let sub_frame = matching::sub_frame(&frame_entry.value)?;
			let mut framed_values = Vec::new();

			for value in Value::force_as_array(values) {
				if object::is_list_object(value) {
					// Lists are framed item by item, keeping non-node
					// items as they are.
					let list_sub_frame = matching::list_sub_frame(&sub_frame)?;
					let mut list_items = Vec::new();

					let list = value
						.as_object()
						.and_then(|o| object::entry(o, "@list"))
						.map(Value::force_as_array)
						.unwrap_or(&[]);

					for item in list {
						match object::node_id(item).filter(|_| object::is_node_reference(item))
						{
							Some(item_id) => {
								let framed = match_frame(
									state,
									&[item_id],
									&list_sub_frame,
									false,
									Some("@list"),
								)?;
								list_items.extend(framed)
							}
							None => list_items.push(item.clone()),
						}
					}

					let mut list_object = Object::default();
					list_object.insert("@list".into(), Value::Array(list_items));
					framed_values.push(Value::Object(list_object));
				} else if object::is_node_reference(value) {
					let value_id = object::node_id(value).unwrap();
					let framed =
						match_frame(state, &[value_id], &sub_frame, false, Some(prop))?;
					framed_values.extend(framed);
				} else {
					framed_values.push(value.clone());
				}
			}

			node.insert(prop.into(), Value::Array(framed_values));
		}

		// Remaining properties are embedded implicitly, unless explicit
		// inclusion was required.
		if !explicit {
			let mut remaining: Vec<&str> = subject
				.entries()
				.iter()
				.map(|e| e.key.as_str())
				.filter(|key| {
					lod_core::Keyword::try_from(*key).is_err()
						&& object::entry(frame, key).is_none()
				})
				.collect();
			remaining.sort_unstable();

			for prop in remaining {
				let values = object::entry(&subject, prop).unwrap();
				let mut embedded = Vec::new();
				embed_values(state, Value::force_as_array(values), &mut embedded);
				node.insert(prop.into(), Value::Array(embedded));
			}
		}

		// Defaults, in frame order: missing properties are preserved with
		// the frame's `@default` value, or `@null`.
		for frame_entry in frame.entries() {
			let prop = frame_entry.key.as_str();
			if lod_core::Keyword::try_from(prop).is_ok() {
				continue;
			}

			if object::entry(&node, prop).is_some() {
				continue;
			}

			let sub_frame = matching::sub_frame(&frame_entry.value)?;

			let omit_default = match get_frame_flag(&sub_frame, "@omitDefault") {
				Some(FrameFlag::Boolean(b)) => b,
				_ => state.options.omit_default,
			};

			if omit_default {
				continue;
			}

			let preserve = match object::entry(&sub_frame, "@default") {
				Some(default) => match default {
					Value::Array(items) => items.clone(),
					other => vec![other.clone()],
				},
				None => vec![Value::String("@null".into())],
			};

			let mut preserved = Object::default();
			preserved.insert("@preserve".into(), Value::Array(preserve));
			node.insert(prop.into(), Value::Array(vec![Value::Object(preserved)]));
		}

		state.subject_stack.pop();
		output.push(Value::Object(node));
	}

	Ok(output)
}

/// Implicit embedding of the values of a property absent from the frame.
fn embed_values(state: &mut State, values: &[Value], output: &mut Vec<Value>) {
	for value in values {
		if object::is_list_object(value) {
			let list = value
				.as_object()
				.and_then(|o| object::entry(o, "@list"))
				.map(Value::force_as_array)
				.unwrap_or(&[]);

			let mut list_items = Vec::new();
			embed_values(state, list, &mut list_items);

			let mut list_object = Object::default();
			list_object.insert("@list".into(), Value::Array(list_items));
			output.push(Value::Object(list_object));
		} else if object::is_node_reference(value) {
			let id = object::node_id(value).unwrap().to_string();

			if !state.embeds.contains(&id)
				&& !state.subject_stack.contains(&id)
				&& state.subjects.contains(&id)
			{
				// Embed the full subject on first use.
				state.embeds.insert(id.clone());
				state.subject_stack.push(id.clone());

				let subject = state.subjects.get(&id).unwrap().clone();
				let mut node = Object::default();

				for entry in subject.entries() {
					let key = entry.key.as_str();
					if lod_core::Keyword::try_from(key).is_ok() {
						node.insert(entry.key.clone(), entry.value.clone());
					} else {
						let mut embedded = Vec::new();
						embed_values(
							state,
							Value::force_as_array(&entry.value),
							&mut embedded,
						);
						node.insert(entry.key.clone(), Value::Array(embedded));
					}
				}

				state.subject_stack.pop();
				output.push(Value::Object(node));
			} else {
				output.push(value.clone());
			}
		} else {
			output.push(value.clone());
		}
	}
}
