use crate::{
	as_array, compact_fragment, compact_id, compact_iri, compact_type, iri::compact_key, Environment,
	Error, Options, WarningHandler,
};
use json_syntax::{object::Entry, Object, Value};
use lod_core::{object, ContainerKind, Context, Id, Keyword, Loader, Term};
use mown::Mown;
use std::borrow::Cow;

/// Compaction of a node object, list object or unreduced value object,
/// entry by entry.
pub(crate) async fn compact_node<L, W>(
	env: &mut Environment<'_, L, W>,
	element: &Object,
	active_context: &Context,
	active_property: Option<&str>,
	options: Options,
) -> Result<Value, Error>
where
	L: Loader,
	W: WarningHandler,
{
	// The context used to compact `@type` values: the one in effect before
	// any type-scoped context applies.
	let type_scoped_context = active_context;

	// If element has an `@type` entry, apply the local contexts of the
	// compacted types, in the lexicographic order of the compacted forms.
	let mut active_context = Mown::Borrowed(active_context);
	if let Some(types) = object::entry(element, "@type") {
		let mut compacted_types = Vec::new();
		for ty in as_array(types) {
			if let Some(ty) = ty.as_string() {
				if let Some(compacted) = compact_iri(
					type_scoped_context,
					&Term::Id(Id::from_string(ty.to_string())),
					None,
					true,
					false,
					options,
				)? {
					compacted_types.push(compacted)
				}
			}
		}

		compacted_types.sort_unstable();

		for term in &compacted_types {
			let scoped = active_context
				.get(term)
				.and_then(|d| d.context.clone().map(|c| (c, d.base_url.clone())));

			if let Some((local_context, base_url)) = scoped {
				let processing_options: lod_context_processing::Options = options.into();
				active_context = Mown::Owned(
					lod_context_processing::algorithm::process_context(
						&mut env.context_env(),
						active_context.as_ref(),
						&local_context,
						lod_context_processing::ProcessingStack::new(),
						base_url.as_ref(),
						processing_options.without_propagation(),
					)
					.await?,
				);
			}
		}
	}

	let inside_reverse = active_property == Some("@reverse");
	let mut result = Object::default();

	let entries: Cow<[Entry]> = if options.ordered {
		let mut entries = element.entries().to_vec();
		entries.sort_by(|a, b| a.key.cmp(&b.key));
		Cow::Owned(entries)
	} else {
		Cow::Borrowed(element.entries())
	};

	for Entry { key, value } in entries.iter() {
		match key.as_str() {
			"@id" => {
				let compacted = compact_id(active_context.as_ref(), value, options)?;
				let alias = compact_key(active_context.as_ref(), Keyword::Id, options)?;
				result.insert(alias.as_str().into(), compacted);
			}

			"@type" => {
				let compacted =
					compact_type(active_context.as_ref(), type_scoped_context, value, options)?;
				let alias = compact_key(active_context.as_ref(), Keyword::Type, options)?;
				result.insert(alias.as_str().into(), compacted);
			}

			"@reverse" => {
				let compacted = Box::pin(compact_fragment(
					env,
					value,
					active_context.as_ref(),
					active_context.as_ref(),
					Some("@reverse"),
					options,
				))
				.await?;

				// Properties mapped to reverse terms surface as forward
				// entries of the result; the rest stays under an aliased
				// `@reverse` entry.
				if let Value::Object(compacted) = compacted {
					let mut leftover = Object::default();
					for Entry { key, value } in compacted.entries().iter().cloned() {
						let reverse_term = active_context
							.get(key.as_str())
							.map(|d| d.reverse_property)
							.unwrap_or(false);

						if reverse_term {
							let as_array = !options.compact_arrays
								|| active_context
									.get(key.as_str())
									.map(|d| d.container.contains(ContainerKind::Set))
									.unwrap_or(false);
							object::add_value(&mut result, key.as_str(), value, as_array);
						} else {
							leftover.insert(key, value);
						}
					}

					if !leftover.is_empty() {
						let alias =
							compact_key(active_context.as_ref(), Keyword::Reverse, options)?;
						result.insert(alias.as_str().into(), Value::Object(leftover));
					}
				}
			}

			"@preserve" => {
				// Framing output: the preserved value is compacted in
				// place and unwrapped by the framing post-processing.
				let compacted = Box::pin(compact_fragment(
					env,
					value,
					active_context.as_ref(),
					active_context.as_ref(),
					active_property,
					options,
				))
				.await?;

				if !matches!(&compacted, Value::Array(a) if a.is_empty()) {
					result.insert("@preserve".into(), compacted);
				}
			}

			"@index" => {
				// An index carried by an index container becomes the map
				// key and is dropped here.
				let container = active_property
					.and_then(|p| active_context.get(p))
					.map(|d| d.container)
					.unwrap_or_default();

				if !container.contains(ContainerKind::Index) {
					let alias = compact_key(active_context.as_ref(), Keyword::Index, options)?;
					result.insert(alias.as_str().into(), value.clone());
				}
			}

			"@value" => {
				let alias = compact_key(active_context.as_ref(), Keyword::Value, options)?;
				result.insert(alias.as_str().into(), value.clone());
			}

			"@language" => {
				let alias = compact_key(active_context.as_ref(), Keyword::Language, options)?;
				result.insert(alias.as_str().into(), value.clone());
			}

			"@direction" => {
				let alias = compact_key(active_context.as_ref(), Keyword::Direction, options)?;
				result.insert(alias.as_str().into(), value.clone());
			}

			"@list" => {
				let compacted = Box::pin(compact_fragment(
					env,
					value,
					active_context.as_ref(),
					active_context.as_ref(),
					active_property,
					options,
				))
				.await?;

				let alias = compact_key(active_context.as_ref(), Keyword::List, options)?;
				result.insert(
					alias.as_str().into(),
					Value::Array(into_array(compacted)),
				);
			}

			"@graph" => {
				let compacted = Box::pin(compact_fragment(
					env,
					value,
					active_context.as_ref(),
					active_context.as_ref(),
					Some("@graph"),
					options,
				))
				.await?;

				let alias = compact_key(active_context.as_ref(), Keyword::Graph, options)?;
				result.insert(alias.as_str().into(), compacted);
			}

			"@included" => {
				let compacted = Box::pin(compact_fragment(
					env,
					value,
					active_context.as_ref(),
					active_context.as_ref(),
					Some("@included"),
					options,
				))
				.await?;

				let alias = compact_key(active_context.as_ref(), Keyword::Included, options)?;
				result.insert(alias.as_str().into(), compacted);
			}

			// An expanded property and its array of expanded items.
			property => {
				compact_property(
					env,
					&mut result,
					active_context.as_ref(),
					property,
					as_array(value),
					inside_reverse,
					options,
				)
				.await?
			}
		}
	}

	Ok(Value::Object(result))
}

fn into_array(value: Value) -> Vec<Value> {
	match value {
		Value::Null => Vec::new(),
		Value::Array(items) => items,
		other => vec![other],
	}
}

/// Returns the object stored at `key` in `target`, inserting an empty one
/// if needed.
fn object_entry_mut<'a>(target: &'a mut Object, key: &str) -> &'a mut Object {
	if object::entry(target, key).is_none() {
		target.insert(key.into(), Value::Object(Object::default()));
	}

	target
		.get_unique_mut(key)
		.ok()
		.flatten()
		.unwrap()
		.as_object_mut()
		.unwrap()
}

/// Checks that the `@nest` value of a term expands to the `@nest`
/// keyword, and returns the nest entry of `result`.
fn nest_target<'a>(
	active_context: &Context,
	result: &'a mut Object,
	nest_term: &str,
) -> Result<&'a mut Object, Error> {
	let valid = nest_term == "@nest"
		|| matches!(
			active_context.get(nest_term).and_then(|d| d.value.as_ref()),
			Some(Term::Keyword(Keyword::Nest))
		);

	if !valid {
		return Err(Error::InvalidNestValue);
	}

	Ok(object_entry_mut(result, nest_term))
}

/// Compaction of the items of an expanded property.
#[allow(clippy::too_many_arguments)]
async fn compact_property<L, W>(
	env: &mut Environment<'_, L, W>,
	result: &mut Object,
	active_context: &Context,
	property: &str,
	items: &[Value],
	inside_reverse: bool,
	options: Options,
) -> Result<(), Error>
where
	L: Loader,
	W: WarningHandler,
{
	let var = Term::Id(Id::from_string(property.to_string()));

	// An empty property array is preserved with an array form.
	if items.is_empty() {
		let term = compact_iri(
			active_context,
			&var,
			Some(&Value::Array(Vec::new())),
			true,
			inside_reverse,
			options,
		)?
		.unwrap_or_else(|| property.to_string());

		let nest = active_context.get(&term).and_then(|d| d.nest.clone());
		let target = match &nest {
			Some(nest_term) => nest_target(active_context, result, nest_term)?,
			None => &mut *result,
		};

		object::add_value(target, &term, Value::Array(Vec::new()), true);
		return Ok(());
	}

	for item in items {
		// Select the best fitted term for this item.
		let term = compact_iri(active_context, &var, Some(item), true, inside_reverse, options)?
			.unwrap_or_else(|| property.to_string());

		let definition = active_context.get(&term);
		let container = definition.map(|d| d.container).unwrap_or_default();
		let index_mapping = definition.and_then(|d| d.index.clone());
		let nest = definition.and_then(|d| d.nest.clone());

		let as_array = !options.compact_arrays || container.contains(ContainerKind::Set);

		if object::is_list_object(item) {
			compact_list_item(env, result, active_context, &term, item, as_array, &nest, options)
				.await?;
			continue;
		}

		if object::is_graph_object(item) {
			compact_graph_item(env, result, active_context, &term, item, as_array, &nest, options)
				.await?;
			continue;
		}

		let compacted_item = Box::pin(compact_fragment(
			env,
			item,
			active_context,
			active_context,
			Some(&term),
			options,
		))
		.await?;

		let target = match &nest {
			Some(nest_term) => nest_target(active_context, result, nest_term)?,
			None => &mut *result,
		};

		if container.contains(ContainerKind::Language) {
			// Language maps hold bare values.
			let compacted_item = item
				.as_object()
				.and_then(|o| object::entry(o, "@value"))
				.cloned()
				.unwrap_or(compacted_item);

			let key = item
				.as_object()
				.and_then(|o| object::entry(o, "@language"))
				.and_then(Value::as_string)
				.map(str::to_string)
				.unwrap_or(compact_key(active_context, Keyword::None, options)?);

			let map_object = object_entry_mut(target, &term);
			object::add_value(map_object, &key, compacted_item, as_array);
		} else if container.contains(ContainerKind::Index) {
			let (key, compacted_item) = index_map_entry(
				active_context,
				item,
				compacted_item,
				index_mapping.as_deref(),
				options,
			)?;

			let map_object = object_entry_mut(target, &term);
			object::add_value(map_object, &key, compacted_item, as_array);
		} else if container.contains(ContainerKind::Id) {
			let mut compacted_item = compacted_item;
			let id_alias = compact_key(active_context, Keyword::Id, options)?;

			let key = match compacted_item.as_object_mut() {
				Some(o) => o
					.remove_unique(id_alias.as_str())
					.ok()
					.flatten()
					.and_then(|e| e.value.as_string().map(str::to_string)),
				None => None,
			};

			let key = match key {
				Some(key) => key,
				None => compact_key(active_context, Keyword::None, options)?,
			};

			let map_object = object_entry_mut(target, &term);
			object::add_value(map_object, &key, compacted_item, as_array);
		} else if container.contains(ContainerKind::Type) {
			let mut compacted_item = compacted_item;
			let type_alias = compact_key(active_context, Keyword::Type, options)?;

			let key = match compacted_item.as_object_mut() {
				Some(o) => match o.remove_unique(type_alias.as_str()).ok().flatten() {
					Some(entry) => {
						let mut types = into_array(entry.value);
						let key = if types.is_empty() {
							None
						} else {
							types.remove(0).as_string().map(str::to_string)
						};

						// Remaining types stay on the item.
						if !types.is_empty() {
							let value = if types.len() == 1 && options.compact_arrays {
								types.into_iter().next().unwrap()
							} else {
								Value::Array(types)
							};
							o.insert(type_alias.as_str().into(), value);
						}

						key
					}
					None => None,
				},
				None => None,
			};

			// An item reduced to a lone @id entry compacts to its
			// identifier.
			if let Some(o) = compacted_item.as_object() {
				let id_alias = compact_key(active_context, Keyword::Id, options)?;
				if o.len() == 1 {
					if let Some(id) = object::entry(o, id_alias.as_str()) {
						let id = id.clone();
						compacted_item = compact_id(active_context, &id, options)?;
					}
				}
			}

			let key = match key {
				Some(key) => key,
				None => compact_key(active_context, Keyword::None, options)?,
			};

			let map_object = object_entry_mut(target, &term);
			object::add_value(map_object, &key, compacted_item, as_array);
		} else {
			object::add_value(target, &term, compacted_item, as_array);
		}
	}

	Ok(())
}

/// Index map entry for a compacted item: the map key and the item with
/// the index removed.
fn index_map_entry(
	active_context: &Context,
	item: &Value,
	mut compacted_item: Value,
	index_mapping: Option<&str>,
	options: Options,
) -> Result<(String, Value), Error> {
	match index_mapping {
		Some(index_property) if index_property != "@index" => {
			// Property-based index: the key is the first string value of
			// the index property, removed from the compacted item.
			let key = match compacted_item.as_object_mut() {
				Some(o) => match o.remove_unique(index_property).ok().flatten() {
					Some(entry) => {
						let mut values = into_array(entry.value);
						let key = if values.is_empty() {
							None
						} else if values[0].is_string() {
							Some(values.remove(0).as_string().unwrap().to_string())
						} else {
							None
						};

						if !values.is_empty() {
							let value = if values.len() == 1 && options.compact_arrays {
								values.into_iter().next().unwrap()
							} else {
								Value::Array(values)
							};
							o.insert(index_property.into(), value);
						}

						key
					}
					None => None,
				},
				None => None,
			};

			match key {
				Some(key) => Ok((key, compacted_item)),
				None => Ok((
					compact_key(active_context, Keyword::None, options)?,
					compacted_item,
				)),
			}
		}
		_ => {
			// Plain index container: the key is the item's @index entry,
			// removed from the compacted item where it appears under the
			// @index alias.
			let key = item
				.as_object()
				.and_then(|o| object::entry(o, "@index"))
				.and_then(Value::as_string)
				.map(str::to_string);

			if let Some(o) = compacted_item.as_object_mut() {
				let index_alias = compact_key(active_context, Keyword::Index, options)?;
				o.remove_unique(index_alias.as_str()).ok();
			}

			match key {
				Some(key) => Ok((key, compacted_item)),
				None => Ok((
					compact_key(active_context, Keyword::None, options)?,
					compacted_item,
				)),
			}
		}
	}
}

/// Compaction of a list object item.
#[allow(clippy::too_many_arguments)]
async fn compact_list_item<L, W>(
	env: &mut Environment<'_, L, W>,
	result: &mut Object,
	active_context: &Context,
	term: &str,
	item: &Value,
	as_array: bool,
	nest: &Option<String>,
	options: Options,
) -> Result<(), Error>
where
	L: Loader,
	W: WarningHandler,
{
	let item_object = item.as_object().unwrap();
	let list_value = object::entry(item_object, "@list").unwrap();

	let compacted = Box::pin(compact_fragment(
		env,
		list_value,
		active_context,
		active_context,
		Some(term),
		options,
	))
	.await?;

	let definition = active_context.get(term);
	let container = definition.map(|d| d.container).unwrap_or_default();

	let target = match nest {
		Some(nest_term) => nest_target(active_context, result, nest_term)?,
		None => result,
	};

	if container.contains(ContainerKind::List) {
		target.insert(term.into(), Value::Array(into_array(compacted)));
	} else {
		// Without a list container the list keeps its explicit form,
		// keyed by the aliases of @list and @index.
		let mut wrapper = Object::default();
		let list_alias = compact_key(active_context, Keyword::List, options)?;
		wrapper.insert(list_alias.as_str().into(), Value::Array(into_array(compacted)));

		if let Some(index) = object::entry(item_object, "@index") {
			let index_alias = compact_key(active_context, Keyword::Index, options)?;
			wrapper.insert(index_alias.as_str().into(), index.clone());
		}

		object::add_value(target, term, Value::Object(wrapper), as_array);
	}

	Ok(())
}

/// Compaction of a graph object item.
#[allow(clippy::too_many_arguments)]
async fn compact_graph_item<L, W>(
	env: &mut Environment<'_, L, W>,
	result: &mut Object,
	active_context: &Context,
	term: &str,
	item: &Value,
	as_array: bool,
	nest: &Option<String>,
	options: Options,
) -> Result<(), Error>
where
	L: Loader,
	W: WarningHandler,
{
	let item_object = item.as_object().unwrap();
	let graph_value = object::entry(item_object, "@graph").unwrap();
	let item_id = object::entry(item_object, "@id").and_then(Value::as_string);
	let item_index = object::entry(item_object, "@index").and_then(Value::as_string);

	let compacted = Box::pin(compact_fragment(
		env,
		graph_value,
		active_context,
		active_context,
		Some(term),
		options,
	))
	.await?;

	let definition = active_context.get(term);
	let container = definition.map(|d| d.container).unwrap_or_default();

	let target = match nest {
		Some(nest_term) => nest_target(active_context, result, nest_term)?,
		None => result,
	};

	if container.contains(ContainerKind::Graph) && container.contains(ContainerKind::Id) {
		// Map keyed by graph name.
		let key = match item_id {
			Some(id) => compact_iri(
				active_context,
				&Term::Id(Id::from_string(id.to_string())),
				None,
				false,
				false,
				options,
			)?
			.unwrap_or_else(|| id.to_string()),
			None => compact_key(active_context, Keyword::None, options)?,
		};

		let map_object = object_entry_mut(target, term);
		object::add_value(map_object, &key, compacted, as_array);
	} else if container.contains(ContainerKind::Graph)
		&& container.contains(ContainerKind::Index)
		&& item_id.is_none()
	{
		// Map keyed by index.
		let key = item_index
			.map(str::to_string)
			.unwrap_or(compact_key(active_context, Keyword::None, options)?);

		let map_object = object_entry_mut(target, term);
		object::add_value(map_object, &key, compacted, as_array);
	} else if container.contains(ContainerKind::Graph)
		&& item_id.is_none()
		&& item_index.is_none()
	{
		// A simple graph object under a graph container inlines its
		// content.
		object::add_value(target, term, compacted, as_array);
	} else {
		// Explicit graph object, keyed by the aliases of @graph, @id and
		// @index.
		let mut wrapper = Object::default();
		let graph_alias = compact_key(active_context, Keyword::Graph, options)?;
		wrapper.insert(graph_alias.as_str().into(), Value::Array(into_array(compacted)));

		if let Some(id) = item_id {
			let id_alias = compact_key(active_context, Keyword::Id, options)?;
			let compacted_id = compact_iri(
				active_context,
				&Term::Id(Id::from_string(id.to_string())),
				None,
				false,
				false,
				options,
			)?;
			wrapper.insert(
				id_alias.as_str().into(),
				Value::String(compacted_id.unwrap_or_default().into()),
			);
		}

		if let Some(index) = item_index {
			let index_alias = compact_key(active_context, Keyword::Index, options)?;
			wrapper.insert(index_alias.as_str().into(), Value::String(index.into()));
		}

		object::add_value(target, term, Value::Object(wrapper), as_array);
	}

	Ok(())
}
