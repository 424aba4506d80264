use crate::{
	expand_literal, expand_node, expand_value_object, Environment, Error, Options, Warning,
	WarningHandler,
};
use iref::IriBuf;
use json_syntax::{object::Entry, Value};
use lod_core::{ContainerKind, Context, Id, Keyword, Loader, Term};
use lod_context_processing::{algorithm::process_context, ProcessingStack};
use mown::Mown;
use std::borrow::Cow;

/// Object entry whose key has been IRI expanded.
pub(crate) struct ExpandedEntry<'a>(pub &'a str, pub Term, pub &'a Value);

/// Expand an element.
///
/// See <https://www.w3.org/TR/json-ld11-api/#expansion-algorithm>.
/// The default specified value for `from_map` is `false`.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn expand_element<L, W>(
	env: &mut Environment<'_, L, W>,
	active_context: &Context,
	active_property: Option<&str>,
	element: &Value,
	base_url: Option<&IriBuf>,
	mut options: Options,
	from_map: bool,
) -> Result<Value, Error>
where
	L: Loader,
	W: WarningHandler,
{
	// If `element` is null, return null.
	if element.is_null() {
		return Ok(Value::Null);
	}

	// If `active_property` is `@default`, initialize the `frame_expansion`
	// flag to `false`.
	if active_property == Some("@default") {
		options.frame_expansion = false;
	}

	// If `active_property` has a term definition in `active_context` with
	// a local context, initialize property-scoped context to that local
	// context.
	let active_property_definition = active_property.and_then(|p| active_context.get(p));
	let property_scoped_base_url =
		active_property_definition.and_then(|d| d.base_url.clone());
	let property_scoped_context =
		active_property_definition.and_then(|d| d.context.clone());

	match element {
		Value::Null => unreachable!(),
		Value::Array(items) => {
			// Initialize an empty array, and expand each item, flattening
			// resulting arrays.
			let container_list = active_property_definition
				.map(|d| d.container.contains(ContainerKind::List))
				.unwrap_or(false);

			let mut result = Vec::new();
			for item in items {
				let expanded_item = Box::pin(expand_element(
					env,
					active_context,
					active_property,
					item,
					base_url,
					options,
					from_map,
				))
				.await?;

				match expanded_item {
					Value::Null => (),
					Value::Array(expanded_items) => {
						if container_list {
							// If the container mapping of `active_property`
							// includes `@list`, and `expanded_item` is an
							// array, set it to a new map containing the
							// entry `@list` where the value is the
							// original expanded item (lists of lists).
							let mut list = json_syntax::Object::default();
							list.insert("@list".into(), Value::Array(expanded_items));
							result.push(Value::Object(list))
						} else {
							result.extend(expanded_items)
						}
					}
					expanded_item => result.push(expanded_item),
				}
			}

			Ok(Value::Array(result))
		}

		Value::Object(element_object) => {
			// Preliminary key expansions, used to decide whether the
			// term-scoped previous context applies.
			let mut preliminary_value_entry = false;
			let mut preliminary_id_entry = false;
			for Entry { key, .. } in element_object.entries() {
				match crate::expand_iri(env, active_context, key.as_str(), false, true) {
					Term::Keyword(Keyword::Value) => preliminary_value_entry = true,
					Term::Keyword(Keyword::Id) => preliminary_id_entry = true,
					_ => (),
				}
			}

			// If `active_context` has a `previous_context`, the active
			// context is not propagated. If `from_map` is false, and
			// `element` does not contain an entry expanding to `@value`,
			// and `element` does not consist of a single entry expanding
			// to `@id`, set active context to previous context from active
			// context, as the scope of a term-scoped context does not
			// apply when processing new node objects.
			let mut active_context = Mown::Borrowed(active_context);
			if let Some(previous_context) = active_context.previous_context() {
				if !from_map
					&& !preliminary_value_entry
					&& !(element_object.len() == 1 && preliminary_id_entry)
				{
					active_context = Mown::Owned(previous_context.clone())
				}
			}

			// If `property_scoped_context` is defined, set
			// `active_context` to the result of the Context Processing
			// algorithm, passing `property_scoped_context` as
			// `local_context`, `base_url` from the term definition for
			// `active_property` and `true` for `override_protected`.
			if let Some(property_scoped_context) = &property_scoped_context {
				let processing_options: lod_context_processing::Options = options.into();
				active_context = Mown::Owned(
					process_context(
						&mut env.context_env(),
						active_context.as_ref(),
						property_scoped_context,
						ProcessingStack::new(),
						property_scoped_base_url.as_ref(),
						processing_options.with_override(),
					)
					.await?,
				);
			}

			// If `element` contains the entry `@context`, set
			// `active_context` to the result of the Context Processing
			// algorithm, passing the value of the `@context` entry as
			// `local_context` and `base_url`.
			if let Some(local_context) = element_object
				.get_unique("@context")
				.map_err(|_| Error::DuplicateKey)?
			{
				active_context = Mown::Owned(
					process_context(
						&mut env.context_env(),
						active_context.as_ref(),
						local_context,
						ProcessingStack::new(),
						base_url,
						options.into(),
					)
					.await?,
				);
			}

			// Collect the entries expanding to `@type`, ordered
			// lexicographically by key.
			let mut type_entries: Vec<&Entry> = Vec::new();
			for entry in element_object.entries() {
				let expanded_key = crate::expand_iri(
					env,
					active_context.as_ref(),
					entry.key.as_str(),
					false,
					true,
				);

				if expanded_key == Keyword::Type {
					type_entries.push(entry);
				}
			}

			type_entries.sort_unstable_by_key(|entry| &entry.key);

			// Initialize `type_scoped_context` to `active_context`. This
			// is used for expanding values that may be relevant to any
			// previous type-scoped context.
			let type_scoped_context = active_context.as_ref();
			let mut active_context = Mown::Borrowed(active_context.as_ref());

			// For each `key` and `value` in `element` ordered
			// lexicographically by key where key IRI expands to `@type`:
			for Entry { value, .. } in &type_entries {
				// Convert `value` into an array, if necessary.
				let value = Value::force_as_array(value);

				// For each `term` which is a value of `value` ordered
				// lexicographically,
				let mut sorted_value = Vec::with_capacity(value.len());
				for term in value {
					if let Some(s) = term.as_string() {
						sorted_value.push(s);
					}
				}

				sorted_value.sort_unstable();

				// if `term` is a string, and `term`'s term definition in
				// `type_scoped_context` has a `local_context`, set
				// `active_context` to the result of the Context Processing
				// algorithm, passing the value of the `term`'s local
				// context as `local_context`, `base_url` from the term
				// definition for value in `active_context`, and `false`
				// for `propagate`.
				for term in sorted_value {
					if let Some(term_definition) = type_scoped_context.get(term) {
						if let Some(local_context) = &term_definition.context {
							let base_url = term_definition.base_url.clone();
							let processing_options: lod_context_processing::Options =
								options.into();
							active_context = Mown::Owned(
								process_context(
									&mut env.context_env(),
									active_context.as_ref(),
									local_context,
									ProcessingStack::new(),
									base_url.as_ref(),
									processing_options.without_propagation(),
								)
								.await?,
							);
						}
					}
				}
			}

			// Initialize `input_type` to expansion of the last value of
			// the first entry in `element` expanding to `@type` (if any),
			// ordering entries lexicographically by key. Both the key and
			// value of the matched entry are IRI expanded.
			let input_type = type_entries.first().and_then(|Entry { value, .. }| {
				Value::force_as_array(value)
					.last()
					.and_then(Value::as_string)
					.map(|input_type_str| {
						crate::expand_iri(
							env,
							active_context.as_ref(),
							input_type_str,
							false,
							true,
						)
					})
			});

			let entries: Cow<[Entry]> = if options.ordered {
				let mut entries = element_object.entries().to_vec();
				entries.sort_by(|a, b| a.key.cmp(&b.key));
				Cow::Owned(entries)
			} else {
				Cow::Borrowed(element_object.entries())
			};

			let mut expanded_entries: Vec<ExpandedEntry> =
				Vec::with_capacity(element_object.len());
			let mut list_entry = None;
			let mut set_entry = None;
			let mut value_entry = None;
			for Entry { key, value } in entries.iter() {
				if key.is_empty() {
					env.warnings.handle(Warning::EmptyTerm);
				}

				let expanded_key = crate::expand_iri(
					env,
					active_context.as_ref(),
					key.as_str(),
					false,
					true,
				);

				// Keys that expand neither to a keyword nor to an IRI-like
				// value are dropped, reporting each drop through the
				// callback.
				match &expanded_key {
					Term::Null => {
						env.key_dropped(key.as_str())?;
						continue;
					}
					Term::Id(Id::Invalid(s)) if !s.contains(':') => {
						env.key_dropped(key.as_str())?;
						continue;
					}
					Term::Keyword(Keyword::Value) => value_entry = Some(value),
					Term::Keyword(Keyword::List) => {
						if active_property.is_some() && active_property != Some("@graph") {
							list_entry = Some(value)
						}
					}
					Term::Keyword(Keyword::Set) => set_entry = Some(value),
					Term::Id(Id::Valid(rdf_types::Id::Blank(b))) => {
						env.warnings
							.handle(Warning::BlankNodeIdProperty(b.to_string()));
					}
					_ => (),
				}

				expanded_entries.push(ExpandedEntry(key.as_str(), expanded_key, value))
			}

			if let Some(list_value) = list_entry {
				// List objects.
				let mut index = None;
				for ExpandedEntry(_, expanded_key, value) in &expanded_entries {
					match expanded_key {
						Term::Keyword(Keyword::Index) => match value.as_string() {
							Some(value) => index = Some(value.to_string()),
							None => return Err(Error::InvalidIndexValue),
						},
						Term::Keyword(Keyword::List) => (),
						_ => return Err(Error::InvalidSetOrListObject),
					}
				}

				// Initialize expanded value to the result of using this
				// algorithm recursively passing active context, active
				// property and value for element, ensuring that the result
				// is an array.
				let expanded_value = Box::pin(expand_element(
					env,
					active_context.as_ref(),
					active_property,
					list_value,
					base_url,
					options,
					false,
				))
				.await?;

				let items = match expanded_value {
					Value::Null => Vec::new(),
					Value::Array(items) => items,
					other => vec![other],
				};

				let mut result = json_syntax::Object::default();
				result.insert("@list".into(), Value::Array(items));
				if let Some(index) = index {
					result.insert("@index".into(), Value::String(index.into()));
				}

				Ok(Value::Object(result))
			} else if let Some(set_value) = set_entry {
				// Set objects.
				for ExpandedEntry(_, expanded_key, _) in &expanded_entries {
					match expanded_key {
						Term::Keyword(Keyword::Index) => {
							// having an `@index` here is tolerated, but is
							// ignored.
						}
						Term::Keyword(Keyword::Set) => (),
						_ => return Err(Error::InvalidSetOrListObject),
					}
				}

				// Set expanded value to the result of using this algorithm
				// recursively, passing active context, active property and
				// value for element.
				Box::pin(expand_element(
					env,
					active_context.as_ref(),
					active_property,
					set_value,
					base_url,
					options,
					false,
				))
				.await
			} else if let Some(value_entry) = value_entry {
				// Value objects.
				expand_value_object(
					env,
					type_scoped_context,
					input_type,
					expanded_entries,
					value_entry,
					options,
				)
			} else {
				// Node objects.
				let result = expand_node(
					env,
					active_context.as_ref(),
					type_scoped_context,
					active_property,
					expanded_entries,
					base_url,
					options,
				)
				.await?;

				match result {
					Some(object) => Ok(Value::Object(object)),
					None => Ok(Value::Null),
				}
			}
		}

		scalar => {
			// If element is a scalar (bool, number, string): if
			// `active_property` is `null` or `@graph`, drop the
			// free-floating scalar by returning null.
			if active_property.is_none() || active_property == Some("@graph") {
				return Ok(Value::Null);
			}

			// If `property_scoped_context` is defined, set
			// `active_context` to the result of the Context Processing
			// algorithm.
			let active_context = match &property_scoped_context {
				Some(property_scoped_context) => Mown::Owned(
					process_context(
						&mut env.context_env(),
						active_context,
						property_scoped_context,
						ProcessingStack::new(),
						property_scoped_base_url.as_ref(),
						options.into(),
					)
					.await?,
				),
				None => Mown::Borrowed(active_context),
			};

			// Return the result of the Value Expansion algorithm, passing
			// the `active_context`, `active_property`, and `element` as
			// value.
			Ok(expand_literal(
				env,
				active_context.as_ref(),
				active_property,
				scalar,
			))
		}
	}
}

