use crate::element::{expand_element, ExpandedEntry};
use crate::{expand_literal, Environment, Error, Options, Warning, WarningHandler};
use iref::IriBuf;
use json_syntax::{object::Entry, Object, Value};
use lod_core::{object, ContainerKind, Context, Keyword, LenientLangTagBuf, Loader, Nullable, Term, Type};
use std::borrow::Cow;

/// Expansion of the entries of a node object.
///
/// Returns `None` when the node is dropped as a free-floating value.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn expand_node<L, W>(
	env: &mut Environment<'_, L, W>,
	active_context: &Context,
	type_scoped_context: &Context,
	active_property: Option<&str>,
	expanded_entries: Vec<ExpandedEntry<'_>>,
	base_url: Option<&IriBuf>,
	options: Options,
) -> Result<Option<Object>, Error>
where
	L: Loader,
	W: WarningHandler,
{
	let mut result = Object::default();

	expand_node_entries(
		env,
		&mut result,
		active_context,
		type_scoped_context,
		active_property,
		expanded_entries,
		base_url,
		options,
	)
	.await?;

	// If result contains only the entry @language, return null.
	if result.len() == 1 && object::entry(&result, "@language").is_some() {
		return Ok(None);
	}

	// If active property is null or @graph, drop free-floating values:
	// a result which is empty or contains only @id.
	if active_property.is_none() || active_property == Some("@graph") {
		if !options.frame_expansion
			&& (result.is_empty()
				|| (result.len() == 1 && object::entry(&result, "@id").is_some()))
		{
			return Ok(None);
		}
	}

	Ok(Some(result))
}

/// Sets a keyword entry, failing when two entries expand to the same
/// keyword.
fn set_keyword(result: &mut Object, key: &str, value: Value) -> Result<(), Error> {
	if object::entry(result, key).is_some() {
		return Err(Error::CollidingKeywords);
	}

	result.insert(key.into(), value);
	Ok(())
}

fn as_array_owned(value: Value) -> Vec<Value> {
	match value {
		Value::Null => Vec::new(),
		Value::Array(items) => items,
		other => vec![other],
	}
}

#[allow(clippy::too_many_arguments)]
async fn expand_node_entries<L, W>(
	env: &mut Environment<'_, L, W>,
	result: &mut Object,
	active_context: &Context,
	type_scoped_context: &Context,
	active_property: Option<&str>,
	expanded_entries: Vec<ExpandedEntry<'_>>,
	base_url: Option<&IriBuf>,
	options: Options,
) -> Result<(), Error>
where
	L: Loader,
	W: WarningHandler,
{
	for ExpandedEntry(key, expanded_key, value) in expanded_entries {
		match expanded_key {
			Term::Null => (),

			Term::Keyword(keyword) => match keyword {
				// Processed at the element level.
				Keyword::Context => (),

				Keyword::Id => {
					// The value of an entry expanding to @id MUST be a
					// string. When expanding a frame, an empty map or an
					// array of strings is also allowed.
					let expanded = match value {
						Value::String(s) => {
							let id =
								crate::expand_iri(env, active_context, s.as_str(), true, false);
							match id {
								Term::Null => Value::String(s.clone()),
								id => Value::String(id.as_str().into()),
							}
						}
						Value::Object(o) if options.frame_expansion && o.is_empty() => {
							value.clone()
						}
						Value::Array(items) if options.frame_expansion => {
							let mut ids = Vec::with_capacity(items.len());
							for item in items {
								let s = item.as_string().ok_or(Error::InvalidIdValue)?;
								let id = crate::expand_iri(env, active_context, s, true, false);
								ids.push(match id {
									Term::Null => Value::String(s.into()),
									id => Value::String(id.as_str().into()),
								})
							}
							Value::Array(ids)
						}
						_ => return Err(Error::InvalidIdValue),
					};

					set_keyword(result, "@id", expanded)?;
				}

				Keyword::Type => {
					// The value MUST be a string or an array of strings.
					// When expanding a frame, an empty map is also
					// allowed. Values are IRI expanded against the
					// type-scoped context.
					let mut types = Vec::new();
					match value {
						Value::String(s) => {
							types.push(expand_type(env, type_scoped_context, s.as_str())?)
						}
						Value::Array(items) => {
							for item in items {
								let s = item.as_string().ok_or(Error::InvalidTypeValue)?;
								types.push(expand_type(env, type_scoped_context, s)?)
							}
						}
						Value::Object(o) if options.frame_expansion && o.is_empty() => {
							types.push(value.clone())
						}
						_ => return Err(Error::InvalidTypeValue),
					}

					// When two entries expand to @type, their values are
					// merged.
					match result.get_unique_mut("@type").ok().flatten() {
						Some(Value::Array(existing)) => existing.extend(types),
						_ => {
							result.insert("@type".into(), Value::Array(types));
						}
					}
				}

				Keyword::Included => {
					// The value is expanded and MUST contain only node
					// objects.
					let expanded = Box::pin(expand_element(
						env,
						active_context,
						None,
						value,
						base_url,
						options,
						false,
					))
					.await?;

					let items = as_array_owned(expanded);
					for item in &items {
						if !object::is_node_object(item) {
							return Err(Error::InvalidIncludedValue);
						}
					}

					object::add_value(result, "@included", Value::Array(items), true);
				}

				Keyword::Graph => {
					let expanded = Box::pin(expand_element(
						env,
						active_context,
						Some("@graph"),
						value,
						base_url,
						options,
						false,
					))
					.await?;

					set_keyword(result, "@graph", Value::Array(as_array_owned(expanded)))?;
				}

				Keyword::Value => {
					// Value entries are handled by the value object
					// branch; reaching one here means it was nested under
					// `@nest`, which is forbidden.
					return Err(Error::InvalidNestValue);
				}

				Keyword::Language => {
					let expanded = match value {
						Value::String(s) => {
							let tag = LenientLangTagBuf::from(s.as_str());
							if !tag.is_well_formed() {
								env.warnings.handle(Warning::MalformedLanguageTag(
									s.as_str().to_string(),
								));
							}
							value.clone()
						}
						Value::Object(o) if options.frame_expansion && o.is_empty() => {
							value.clone()
						}
						Value::Array(_) if options.frame_expansion => value.clone(),
						_ => return Err(Error::InvalidLanguageTaggedString),
					};

					set_keyword(result, "@language", expanded)?;
				}

				Keyword::Direction => {
					let expanded = match value {
						Value::String(s)
							if lod_core::Direction::try_from(s.as_str()).is_ok() =>
						{
							value.clone()
						}
						Value::Object(o) if options.frame_expansion && o.is_empty() => {
							value.clone()
						}
						Value::Array(_) if options.frame_expansion => value.clone(),
						_ => return Err(Error::InvalidBaseDirection),
					};

					set_keyword(result, "@direction", expanded)?;
				}

				Keyword::Index => {
					let index = value.as_string().ok_or(Error::InvalidIndexValue)?;
					set_keyword(result, "@index", Value::String(index.into()))?;
				}

				Keyword::Reverse => {
					// The value of an entry expanding to @reverse MUST be
					// a map.
					if !matches!(value, Value::Object(_)) {
						return Err(Error::InvalidReverseValue);
					}

					let expanded = Box::pin(expand_element(
						env,
						active_context,
						Some("@reverse"),
						value,
						base_url,
						options,
						false,
					))
					.await?;

					if let Value::Object(expanded) = expanded {
						for Entry { key, value } in expanded.entries().iter().cloned() {
							if key == "@reverse" {
								// Double-reversed properties are forward
								// properties of the result.
								if let Value::Object(forward) = value {
									for Entry { key, value } in
										forward.entries().iter().cloned()
									{
										object::add_value(result, key.as_str(), value, true);
									}
								}
							} else {
								// Other properties are reverse properties,
								// whose values must be node objects.
								for item in as_array_owned(value) {
									if object::is_value_object(&item)
										|| object::is_list_object(&item)
									{
										return Err(Error::InvalidReversePropertyValue);
									}

									add_reverse_value(result, key.as_str(), item);
								}
							}
						}
					}
				}

				Keyword::Nest => {
					// Each value of the nesting entry is a map whose
					// entries are expanded as entries of this node. Keys
					// expanding to @value are forbidden.
					for item in Value::force_as_array(value) {
						let Value::Object(nested) = item else {
							return Err(Error::InvalidNestValue);
						};

						let mut nested_entries = Vec::with_capacity(nested.len());
						for Entry { key, value } in nested.entries() {
							let expanded_key = crate::expand_iri(
								env,
								active_context,
								key.as_str(),
								false,
								true,
							);

							match &expanded_key {
								Term::Keyword(Keyword::Value) => {
									return Err(Error::InvalidNestValue)
								}
								Term::Null => {
									env.key_dropped(key.as_str())?;
									continue;
								}
								Term::Id(lod_core::Id::Invalid(s)) if !s.contains(':') => {
									env.key_dropped(key.as_str())?;
									continue;
								}
								_ => (),
							}

							nested_entries.push(ExpandedEntry(
								key.as_str(),
								expanded_key,
								value,
							))
						}

						Box::pin(expand_node_entries(
							env,
							result,
							active_context,
							type_scoped_context,
							active_property,
							nested_entries,
							base_url,
							options,
						))
						.await?
					}
				}

				// Framing keywords are kept when expanding a frame and
				// ignored otherwise.
				Keyword::Default
				| Keyword::Embed
				| Keyword::Explicit
				| Keyword::OmitDefault
				| Keyword::RequireAll => {
					if options.frame_expansion {
						let expanded = Box::pin(expand_element(
							env,
							active_context,
							Some(keyword.into_str()),
							value,
							base_url,
							options,
							false,
						))
						.await?;

						set_keyword(result, keyword.into_str(), expanded)?;
					}
				}

				// A free-floating list or set (under a null or @graph
				// active property) is dropped.
				Keyword::List | Keyword::Set => (),

				// Other keywords are not valid node object entries and
				// are ignored.
				_ => (),
			},

			Term::Id(prop) => {
				let key_definition = active_context.get(key);
				let container = key_definition.map(|d| d.container).unwrap_or_default();
				let reverse_property = key_definition
					.map(|d| d.reverse_property)
					.unwrap_or(false);
				let is_json_type =
					matches!(key_definition.and_then(|d| d.typ.as_ref()), Some(Type::Json));
				let index_mapping = key_definition.and_then(|d| d.index.clone());

				let mut expanded_value = if is_json_type {
					// Terms with an `@json` type coercion keep their value
					// as an unprocessed JSON literal.
					let mut json = Object::default();
					json.insert("@value".into(), value.clone());
					json.insert("@type".into(), Value::String("@json".into()));
					Value::Object(json)
				} else if container.contains(ContainerKind::Language)
					&& matches!(value, Value::Object(_))
				{
					expand_language_map(env, active_context, key_definition, value, options)?
				} else if (container.contains(ContainerKind::Index)
					|| container.contains(ContainerKind::Id)
					|| container.contains(ContainerKind::Type))
					&& matches!(value, Value::Object(_))
				{
					expand_entry_map(
						env,
						active_context,
						key,
						container,
						index_mapping.as_deref(),
						value,
						base_url,
						options,
					)
					.await?
				} else {
					Box::pin(expand_element(
						env,
						active_context,
						Some(key),
						value,
						base_url,
						options,
						false,
					))
					.await?
				};

				// If expanded value is null, ignore the key by continuing.
				if expanded_value.is_null() {
					continue;
				}

				// If the container mapping includes @list and expanded
				// value is not already a list object, convert it to one.
				if container.contains(ContainerKind::List)
					&& !object::is_list_object(&expanded_value)
				{
					let mut list = Object::default();
					list.insert(
						"@list".into(),
						Value::Array(as_array_owned(expanded_value)),
					);
					expanded_value = Value::Object(list);
				}

				// If the container mapping includes @graph, and includes
				// neither @id nor @index, convert each item into a graph
				// object.
				if container.contains(ContainerKind::Graph)
					&& !container.contains(ContainerKind::Id)
					&& !container.contains(ContainerKind::Index)
				{
					let items = as_array_owned(expanded_value);
					let mut graphs = Vec::with_capacity(items.len());
					for item in items {
						let mut graph = Object::default();
						graph.insert("@graph".into(), Value::Array(vec![item]));
						graphs.push(Value::Object(graph))
					}
					expanded_value = Value::Array(graphs);
				}

				if reverse_property {
					// Reverse property values must be node objects.
					for item in as_array_owned(expanded_value) {
						if object::is_value_object(&item) || object::is_list_object(&item) {
							return Err(Error::InvalidReversePropertyValue);
						}

						add_reverse_value(result, prop.as_str(), item);
					}
				} else {
					object::add_value(result, prop.as_str(), expanded_value, true);
				}
			}
		}
	}

	Ok(())
}

/// Expands an `@type` entry value against the type-scoped context.
fn expand_type<L, W>(
	env: &mut Environment<'_, L, W>,
	type_scoped_context: &Context,
	value: &str,
) -> Result<Value, Error>
where
	L: Loader,
	W: WarningHandler,
{
	match crate::expand_iri(env, type_scoped_context, value, true, true) {
		Term::Null => Err(Error::InvalidTypeValue),
		term => Ok(Value::String(term.as_str().into())),
	}
}

/// Adds a value to the `@reverse` map of `result`.
fn add_reverse_value(result: &mut Object, property: &str, value: Value) {
	if object::entry(result, "@reverse").is_none() {
		result.insert("@reverse".into(), Value::Object(Object::default()));
	}

	let reverse_map = result
		.get_unique_mut("@reverse")
		.ok()
		.flatten()
		.unwrap()
		.as_object_mut()
		.unwrap();

	object::add_value(reverse_map, property, value, true);
}

/// Expansion of a language map.
fn expand_language_map<L, W>(
	env: &mut Environment<'_, L, W>,
	active_context: &Context,
	key_definition: Option<&lod_core::TermDefinition>,
	value: &Value,
	options: Options,
) -> Result<Value, Error>
where
	L: Loader,
	W: WarningHandler,
{
	let Value::Object(map) = value else {
		unreachable!()
	};

	// Direction of the produced language-tagged strings: the term's
	// direction mapping if any, the default base direction otherwise.
	let direction = match key_definition.and_then(|d| d.direction) {
		Some(Nullable::Some(direction)) => Some(direction),
		Some(Nullable::Null) => None,
		None => active_context.default_base_direction(),
	};

	let entries: Cow<[Entry]> = if options.ordered {
		let mut entries = map.entries().to_vec();
		entries.sort_by(|a, b| a.key.cmp(&b.key));
		Cow::Owned(entries)
	} else {
		Cow::Borrowed(map.entries())
	};

	let mut items = Vec::new();
	for Entry { key, value } in entries.iter() {
		// An entry whose key expands to @none (or is @none) carries
		// strings without a language tag.
		let language_term =
			crate::expand_iri(env, active_context, key.as_str(), false, true);
		let is_none = language_term == Term::Keyword(Keyword::None);

		if !is_none {
			let tag = LenientLangTagBuf::from(key.as_str());
			if !tag.is_well_formed() {
				env.warnings
					.handle(Warning::MalformedLanguageTag(key.as_str().to_string()));
			}
		}

		for item in Value::force_as_array(value) {
			match item {
				Value::Null => (),
				Value::String(_) => {
					let mut value_object = Object::default();
					value_object.insert("@value".into(), item.clone());
					if !is_none {
						value_object
							.insert("@language".into(), Value::String(key.as_str().into()));
					}
					if let Some(direction) = direction {
						value_object.insert(
							"@direction".into(),
							Value::String(direction.as_str().into()),
						);
					}
					items.push(Value::Object(value_object))
				}
				_ => return Err(Error::InvalidLanguageMapValue),
			}
		}
	}

	Ok(Value::Array(items))
}

/// Expansion of an index, id or type map.
#[allow(clippy::too_many_arguments)]
async fn expand_entry_map<L, W>(
	env: &mut Environment<'_, L, W>,
	active_context: &Context,
	key: &str,
	container: lod_core::Container,
	index_mapping: Option<&str>,
	value: &Value,
	base_url: Option<&IriBuf>,
	options: Options,
) -> Result<Value, Error>
where
	L: Loader,
	W: WarningHandler,
{
	let Value::Object(map) = value else {
		unreachable!()
	};

	let as_graph = container.contains(ContainerKind::Graph);

	let entries: Cow<[Entry]> = if options.ordered {
		let mut entries = map.entries().to_vec();
		entries.sort_by(|a, b| a.key.cmp(&b.key));
		Cow::Owned(entries)
	} else {
		Cow::Borrowed(map.entries())
	};

	let mut items = Vec::new();
	for Entry { key: index, value: index_value } in entries.iter() {
		// If the container mapping includes @id or @type, the map context
		// is the previous context when the active context is the result of
		// a non-propagated context.
		let mut map_context = active_context;
		if container.contains(ContainerKind::Id) || container.contains(ContainerKind::Type) {
			if let Some(previous) = active_context.previous_context() {
				map_context = previous;
			}
		}

		// If the container mapping includes @type and the index has a term
		// definition with a local context in map context, apply it.
		let processed_map_context;
		if container.contains(ContainerKind::Type) {
			if let Some(index_definition) = map_context.get(index.as_str()) {
				if let Some(local_context) = &index_definition.context {
					let index_base_url = index_definition.base_url.clone();
					processed_map_context = lod_context_processing::algorithm::process_context(
						&mut env.context_env(),
						map_context,
						local_context,
						lod_context_processing::ProcessingStack::new(),
						index_base_url.as_ref(),
						options.into(),
					)
					.await?;
					map_context = &processed_map_context;
				}
			}
		}

		// The index is IRI expanded with vocab to recognize @none.
		let expanded_index =
			crate::expand_iri(env, active_context, index.as_str(), false, true);
		let index_is_none = expanded_index == Term::Keyword(Keyword::None);

		let expanded_index_value = Box::pin(expand_element(
			env,
			map_context,
			Some(key),
			index_value,
			base_url,
			options,
			true,
		))
		.await?;

		for mut item in as_array_owned(expanded_index_value) {
			// Under a graph container, wrap the item in a graph object.
			if as_graph && !object::is_graph_object(&item) {
				let mut graph = Object::default();
				graph.insert("@graph".into(), Value::Array(vec![item]));
				item = Value::Object(graph);
			}

			if container.contains(ContainerKind::Index) {
				if let (Some(index_mapping), false) = (index_mapping, index_is_none) {
					// Property-based index: the index is re-expanded as a
					// value of the index property and prepended to the
					// item's values for it.
					let re_expanded_index = expand_literal(
						env,
						active_context,
						Some(index_mapping),
						&Value::String(index.as_str().into()),
					);

					let expanded_index_key = match crate::expand_iri(
						env,
						active_context,
						index_mapping,
						false,
						true,
					) {
						Term::Id(id) => id.into_string(),
						_ => return Err(Error::InvalidIndexValue),
					};

					let item_object =
						item.as_object_mut().ok_or(Error::InvalidValueObject)?;
					if object::entry(item_object, "@value").is_some() {
						// A value object cannot carry extra properties.
						return Err(Error::InvalidValueObject);
					}

					let mut values = vec![re_expanded_index];
					if let Some(existing) = item_object.remove_unique(expanded_index_key.as_str()).ok().flatten()
					{
						values.extend(as_array_owned(existing.value));
					}
					item_object
						.insert(expanded_index_key.as_str().into(), Value::Array(values));
				} else if !index_is_none {
					let item_object = item.as_object_mut().unwrap();
					if object::entry(item_object, "@index").is_none() {
						item_object
							.insert("@index".into(), Value::String(index.as_str().into()));
					}
				}
			} else if container.contains(ContainerKind::Id) {
				if !index_is_none {
					let item_object = item.as_object_mut().unwrap();
					if object::entry(item_object, "@id").is_none() {
						let expanded_id = crate::expand_iri(
							env,
							active_context,
							index.as_str(),
							true,
							false,
						);
						item_object.insert(
							"@id".into(),
							Value::String(expanded_id.as_str().into()),
						);
					}
				}
			} else if container.contains(ContainerKind::Type) {
				if !index_is_none {
					let item_object = item.as_object_mut().unwrap();
					let mut types = vec![Value::String(expanded_index.as_str().into())];
					if let Some(existing) = item_object.remove_unique("@type").ok().flatten() {
						types.extend(as_array_owned(existing.value));
					}
					item_object.insert("@type".into(), Value::Array(types));
				}
			}

			items.push(item)
		}
	}

	Ok(Value::Array(items))
}
