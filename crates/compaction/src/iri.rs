use crate::{Error, Options};
use iref::Iri;
use json_syntax::Value;
use lod_core::{
	context::inverse::{LangSelection, Selection, TypeSelection},
	object, Container, Context, Direction, Id, Keyword, Nullable, Term, Type,
};

/// IRI Compaction algorithm.
///
/// Compacts `var` (an IRI, blank node identifier or keyword) into the
/// shortest term or compact IRI available in `active_context`, using the
/// inverse context for term selection when `vocab` is set. `value` is the
/// expanded value associated with the IRI, used to select the best fitted
/// container and type/language mappings.
///
/// See <https://www.w3.org/TR/json-ld11-api/#iri-compaction>.
pub fn compact_iri(
	active_context: &Context,
	var: &Term,
	value: Option<&Value>,
	vocab: bool,
	reverse: bool,
	options: Options,
) -> Result<Option<String>, Error> {
	// 1) If var is null, return null.
	if var.is_null() {
		return Ok(None);
	}

	let var_str = var.as_str();

	// 2) If vocab is true and var is an entry of the inverse context, term
	// selection applies.
	if vocab && active_context.inverse().contains(var) {
		// 2.3) Initialize containers to an empty array. This array will be
		// used to keep track of an ordered list of preferred container
		// mapping for a term, based on what is compatible with value.
		let mut containers = Vec::new();

		// 2.4) Initialize type/language to @language, and type/language
		// value to @null. These two variables will keep track of the
		// preferred type mapping or language mapping for a term, based on
		// what is compatible with value.
		let mut type_language = TypeLanguage::Language;
		let mut type_language_value = "@null".to_string();

		let has_index = value.map(has_entry("@index")).unwrap_or(false);
		let is_graph = value.map(object::is_graph_object).unwrap_or(false);
		let is_list = value.map(object::is_list_object).unwrap_or(false);

		// 2.5) If value is a map containing an @index entry, and value is
		// not a graph object, append the values @index and @index@set to
		// containers.
		if has_index && !is_graph {
			containers.push(Container::Index);
			containers.push(Container::IndexSet);
		}

		if reverse {
			// 2.6) If reverse is true, set type/language to @type,
			// type/language value to @reverse, and append @set to
			// containers.
			type_language = TypeLanguage::Type;
			type_language_value = "@reverse".to_string();
			containers.push(Container::Set);
		} else if is_list {
			// 2.7) Otherwise, if value is a list object, then set
			// type/language and type/language value to the most specific
			// values that work for all items in the list.
			let list = value
				.and_then(|v| v.as_object())
				.and_then(|o| object::entry(o, "@list"))
				.map(Value::force_as_array)
				.unwrap_or(&[]);

			// If value has no @index entry, append @list to containers.
			if !has_index {
				containers.push(Container::List);
			}

			let mut common_type: Option<String> = None;
			let mut common_language: Option<String> = None;

			if list.is_empty() {
				common_language = Some(default_language(active_context));
			}

			for item in list {
				let (item_language, item_type) = item_type_language(item);

				match &common_language {
					None => common_language = Some(item_language),
					Some(l) if *l != item_language => {
						common_language = Some("@none".to_string())
					}
					_ => (),
				}

				match &common_type {
					None => common_type = Some(item_type),
					Some(t) if *t != item_type => common_type = Some("@none".to_string()),
					_ => (),
				}

				// If common language and common type are both @none, there
				// is no point in continuing.
				if common_language.as_deref() == Some("@none")
					&& common_type.as_deref() == Some("@none")
				{
					break;
				}
			}

			let common_language = common_language.unwrap_or_else(|| "@none".to_string());
			let common_type = common_type.unwrap_or_else(|| "@none".to_string());

			if common_type != "@none" {
				type_language = TypeLanguage::Type;
				type_language_value = common_type;
			} else {
				type_language_value = common_language;
			}
		} else if is_graph {
			// 2.8) Otherwise, if value is a graph object, prefer a mapping
			// most appropriate for the particular value.
			let has_id = value.map(has_entry("@id")).unwrap_or(false);

			if has_index {
				containers.push(Container::GraphIndex);
				containers.push(Container::GraphIndexSet);
			}

			if has_id {
				containers.push(Container::GraphId);
				containers.push(Container::GraphIdSet);
			}

			containers.push(Container::Graph);
			containers.push(Container::GraphSet);
			containers.push(Container::Set);

			if !has_index {
				containers.push(Container::GraphIndex);
				containers.push(Container::GraphIndexSet);
			}

			if !has_id {
				containers.push(Container::GraphId);
				containers.push(Container::GraphIdSet);
			}

			containers.push(Container::Index);
			containers.push(Container::IndexSet);

			type_language = TypeLanguage::Type;
			type_language_value = "@id".to_string();
		} else {
			// 2.9) Otherwise:
			if let Some(value_object) = value.and_then(|v| v.as_object()) {
				if object::entry(value_object, "@value").is_some() {
					// 2.9.1) If value is a value object, prefer language
					// and direction mappings.
					let language = object::entry(value_object, "@language")
						.and_then(Value::as_string);
					let direction = object::entry(value_object, "@direction")
						.and_then(Value::as_string);

					if !has_index {
						match (language, direction) {
							(Some(language), Some(direction)) => {
								type_language_value = format!("{language}_{direction}");
								containers.push(Container::Language);
								containers.push(Container::LanguageSet);
							}
							(Some(language), None) => {
								type_language_value = language.to_string();
								containers.push(Container::Language);
								containers.push(Container::LanguageSet);
							}
							(None, Some(direction)) => {
								type_language_value = format!("_{direction}");
								containers.push(Container::Language);
								containers.push(Container::LanguageSet);
							}
							(None, None) => (),
						}
					}

					if let Some(ty) =
						object::entry(value_object, "@type").and_then(Value::as_string)
					{
						type_language = TypeLanguage::Type;
						type_language_value = ty.to_string();
					}
				} else {
					// 2.9.2) Otherwise, value is a node object: set
					// type/language to @type and type/language value to
					// @id.
					type_language = TypeLanguage::Type;
					type_language_value = "@id".to_string();
					containers.push(Container::Id);
					containers.push(Container::IdSet);
					containers.push(Container::Type);
					containers.push(Container::TypeSet);
				}
			} else {
				type_language = TypeLanguage::Type;
				type_language_value = "@id".to_string();
				containers.push(Container::Id);
				containers.push(Container::IdSet);
				containers.push(Container::Type);
				containers.push(Container::TypeSet);
			}

			containers.push(Container::Set);
		}

		// 2.10) Append @none to containers. This represents the most
		// generic container mapping.
		containers.push(Container::None);

		// 2.11) If value has no @index entry, append @index and @index@set
		// to containers.
		if !has_index {
			containers.push(Container::Index);
			containers.push(Container::IndexSet);
		}

		// 2.12) If value is a value object with only a @value entry,
		// append @language and @language@set to containers.
		if let Some(value_object) = value.and_then(|v| v.as_object()) {
			if value_object.len() == 1 && object::entry(value_object, "@value").is_some() {
				containers.push(Container::Language);
				containers.push(Container::LanguageSet);
			}
		}

		// 2.14) Initialize preferred values to an empty array. This array
		// will be used to keep track of preferred values for the
		// type mapping or language mapping.
		let mut preferred_values: Vec<String> = Vec::new();

		// 2.15) If type/language value is @reverse, append @reverse to
		// preferred values.
		if type_language_value == "@reverse" {
			preferred_values.push("@reverse".to_string());
		}

		// 2.16) If type/language value is @id or @reverse and value has an
		// @id entry:
		let value_id = value
			.and_then(Value::as_object)
			.and_then(|o| object::entry(o, "@id"))
			.and_then(Value::as_string);

		if (type_language_value == "@id" || type_language_value == "@reverse")
			&& value_id.is_some()
		{
			let id = value_id.unwrap();

			// 2.16.1) If the result of IRI compacting the value of the @id
			// entry has a term definition in the active context with an
			// IRI mapping that equals that value, append @vocab, @id, and
			// @none, in that order, to preferred values.
			let compacted_id = compact_iri(
				active_context,
				&Term::Id(Id::from_string(id.to_string())),
				None,
				true,
				false,
				options,
			)?;

			let round_trips = compacted_id
				.as_deref()
				.and_then(|term| active_context.get(term))
				.and_then(|d| d.value.as_ref())
				.map(|mapping| mapping.as_str() == id)
				.unwrap_or(false);

			if round_trips {
				preferred_values.push("@vocab".to_string());
				preferred_values.push("@id".to_string());
				preferred_values.push("@none".to_string());
			} else {
				// 2.16.2) Otherwise, append @id, @vocab, and @none, in
				// that order, to preferred values.
				preferred_values.push("@id".to_string());
				preferred_values.push("@vocab".to_string());
				preferred_values.push("@none".to_string());
			}
		} else {
			// 2.17) Otherwise, append type/language value and @none, in
			// that order, to preferred values. If value is a list object
			// with an empty @list array, set type/language to @any.
			preferred_values.push(type_language_value.clone());
			preferred_values.push("@none".to_string());

			let empty_list = is_list
				&& value
					.and_then(Value::as_object)
					.and_then(|o| object::entry(o, "@list"))
					.map(|l| Value::force_as_array(l).is_empty())
					.unwrap_or(false);

			if empty_list {
				type_language = TypeLanguage::Any;
			}
		}

		// 2.18) Append @any to preferred values.
		preferred_values.push("@any".to_string());

		// 2.19) If any of the preferred values contain an underscore,
		// append the substring starting at the underscore: this way a
		// direction can be selected independently of the language.
		for i in 0..preferred_values.len() {
			if let Some(j) = preferred_values[i].find('_') {
				if j > 0 {
					let dir = preferred_values[i][j..].to_string();
					preferred_values.push(dir);
				}
			}
		}

		let selection = match type_language {
			TypeLanguage::Any => Selection::Any,
			TypeLanguage::Type => Selection::Type(
				preferred_values
					.iter()
					.filter_map(|v| type_selection(v))
					.collect(),
			),
			TypeLanguage::Language => Selection::Lang(
				preferred_values
					.iter()
					.map(|v| lang_selection(v))
					.collect(),
			),
		};

		// 2.20) Select a term from the inverse context.
		if let Some(term) = active_context.inverse().select(var, &containers, &selection) {
			return Ok(Some(term.to_string()));
		}
	}

	// 3) At this point, there is no simple term that var can be compacted
	// to. If vocab is true and active context has a vocabulary mapping:
	if vocab {
		if let Some(vocab_mapping) = active_context.vocabulary().and_then(Term::as_iri) {
			// If var begins with the vocabulary mapping's value but is
			// longer, then initialize suffix to the substring of var that
			// does not match. If suffix does not have a term definition in
			// active context, then return suffix.
			if let Some(suffix) = var_str.strip_prefix(vocab_mapping.as_str()) {
				if !suffix.is_empty() && !active_context.contains_term(suffix) {
					return Ok(Some(suffix.to_string()));
				}
			}
		}
	}

	// 4) The var could not be compacted using the active context's
	// vocabulary mapping. Try to create a compact IRI, starting by
	// initializing compact IRI to null.
	let mut compact_iri_candidate: Option<String> = None;

	// For each term definition in the active context:
	for (term, definition) in active_context.definitions() {
		// 4.2) If the term contains a colon (:), continue to the next
		// term, because terms with colons can't be used as prefixes.
		if term.contains(':') {
			continue;
		}

		// 4.3) If the term definition is not a prefix, or its IRI mapping
		// is not a substring at the beginning of var, the term cannot be
		// used as a prefix.
		if !definition.prefix {
			continue;
		}

		let Some(mapping) = definition.value.as_ref().and_then(Term::as_iri) else {
			continue;
		};

		let Some(suffix) = var_str.strip_prefix(mapping.as_str()) else {
			continue;
		};

		if suffix.is_empty() {
			continue;
		}

		// 4.4) Initialize candidate to the result of concatenating term, a
		// colon, and the substring of var that follows the IRI mapping.
		let candidate = format!("{term}:{suffix}");

		// 4.5) If either compact IRI is null, candidate is shorter or the
		// same length but lexicographically less than compact IRI, and
		// candidate does not have a term definition in active context, or
		// if that term definition has an IRI mapping that equals var and
		// value is null, set compact IRI to candidate.
		let is_better = match &compact_iri_candidate {
			None => true,
			Some(current) => {
				(candidate.len(), &candidate) < (current.len(), current)
			}
		};

		if is_better {
			let usable = match active_context.get(&candidate) {
				None => true,
				Some(candidate_definition) => {
					value.is_none()
						&& candidate_definition
							.value
							.as_ref()
							.map(|v| v.as_str() == var_str)
							.unwrap_or(false)
				}
			};

			if usable {
				compact_iri_candidate = Some(candidate);
			}
		}
	}

	// 5) If compact IRI is not null, return compact IRI.
	if let Some(candidate) = compact_iri_candidate {
		return Ok(Some(candidate));
	}

	// 6) To ensure that the IRI var is not confused with a compact IRI,
	// if the IRI scheme of var matches a term in active context with
	// prefix flag set to true, an IRI confused with prefix error has been
	// detected.
	if let Some(colon) = var_str.find(':') {
		let scheme = &var_str[..colon];
		if let Some(definition) = active_context.get(scheme) {
			if definition.prefix && !var_str[colon + 1..].starts_with("//") {
				return Err(Error::IriConfusedWithPrefix);
			}
		}
	}

	// 7) If vocab is false, transform var to a relative IRI reference
	// using the base IRI from active context, if it exists.
	if !vocab && options.compact_to_relative {
		if let (Some(base), Some(iri)) = (active_context.base_iri(), var.as_iri()) {
			if let Some(relative) = make_relative(base, iri) {
				return Ok(Some(relative));
			}
		}
	}

	// 8) Finally, return var as is.
	Ok(Some(var_str.to_string()))
}

enum TypeLanguage {
	Any,
	Type,
	Language,
}

fn has_entry(key: &'static str) -> impl Fn(&Value) -> bool {
	move |value| {
		value
			.as_object()
			.map(|o| object::entry(o, key).is_some())
			.unwrap_or(false)
	}
}

/// Default language/direction key of the active context, used for empty
/// lists.
fn default_language(active_context: &Context) -> String {
	match (
		active_context.default_language(),
		active_context.default_base_direction(),
	) {
		(Some(language), Some(direction)) => format!("{language}_{direction}"),
		(Some(language), None) => language.as_str().to_string(),
		(None, Some(direction)) => format!("_{direction}"),
		(None, None) => "@null".to_string(),
	}
}

/// Most specific type and language of a list item, as type selection and
/// language selection keys.
fn item_type_language(item: &Value) -> (String, String) {
	match item.as_object() {
		Some(o) => {
			if object::entry(o, "@value").is_some() {
				let language = object::entry(o, "@language").and_then(Value::as_string);
				let direction = object::entry(o, "@direction").and_then(Value::as_string);
				let item_language = match (language, direction) {
					(Some(language), Some(direction)) => format!("{language}_{direction}"),
					(Some(language), None) => language.to_string(),
					(None, Some(direction)) => format!("_{direction}"),
					(None, None) => "@null".to_string(),
				};

				let item_type = object::entry(o, "@type")
					.and_then(Value::as_string)
					.map(str::to_string)
					.unwrap_or_else(|| "@none".to_string());

				(item_language, item_type)
			} else {
				// Node objects prefer an @id type mapping.
				("@none".to_string(), "@id".to_string())
			}
		}
		None => ("@none".to_string(), "@none".to_string()),
	}
}

fn type_selection(value: &str) -> Option<TypeSelection> {
	match value {
		"@reverse" => Some(TypeSelection::Reverse),
		"@any" => Some(TypeSelection::Any),
		"@none" => Some(TypeSelection::Type(Type::None)),
		"@id" => Some(TypeSelection::Type(Type::Id)),
		"@vocab" => Some(TypeSelection::Type(Type::Vocab)),
		"@json" => Some(TypeSelection::Type(Type::Json)),
		iri => iref::IriBuf::new(iri.to_string())
			.ok()
			.map(|iri| TypeSelection::Type(Type::Iri(iri))),
	}
}

fn lang_selection(value: &str) -> LangSelection {
	match value {
		"@any" => LangSelection::Any,
		"@null" => LangSelection::Lang(Nullable::Null),
		"@none" => LangSelection::Lang(Nullable::Some((None, None))),
		lang_dir => match lang_dir.rfind('_') {
			Some(i) => {
				let language = &lang_dir[..i];
				let direction = Direction::try_from(&lang_dir[i + 1..]).ok();
				let language = if language.is_empty() {
					None
				} else {
					Some(language)
				};
				LangSelection::Lang(Nullable::Some((language, direction)))
			}
			None => LangSelection::Lang(Nullable::Some((Some(lang_dir), None))),
		},
	}
}

/// Transforms `iri` into an IRI reference relative to `base`.
///
/// Returns `None` when the two do not share a scheme and authority, in
/// which case the IRI is kept absolute.
fn make_relative(base: &Iri, iri: &Iri) -> Option<String> {
	if base.scheme() != iri.scheme() || base.authority() != iri.authority() {
		return None;
	}

	let base_path = base.path().as_str();
	let iri_path = iri.path().as_str();

	let base_segments: Vec<&str> = base_path.split('/').collect();
	let iri_segments: Vec<&str> = iri_path.split('/').collect();

	// Directory part of the base: every segment but the last.
	let base_dir = &base_segments[..base_segments.len().saturating_sub(1)];
	let (iri_dir, iri_last) = match iri_segments.split_last() {
		Some((last, dir)) => (dir, *last),
		None => (&[] as &[&str], ""),
	};

	let mut common = 0;
	while common < base_dir.len()
		&& common < iri_dir.len()
		&& base_dir[common] == iri_dir[common]
	{
		common += 1;
	}

	let mut result = String::new();
	for _ in common..base_dir.len() {
		result.push_str("../");
	}

	for segment in &iri_dir[common..] {
		result.push_str(segment);
		result.push('/');
	}

	result.push_str(iri_last);

	if let Some(query) = iri.query() {
		result.push('?');
		result.push_str(query.as_str());
	}

	if let Some(fragment) = iri.fragment() {
		result.push('#');
		result.push_str(fragment.as_str());
	}

	if result.is_empty() {
		result.push_str("./");
	}

	Some(result)
}

/// Compacts a keyword, using any alias defined in the context.
pub(crate) fn compact_key(
	active_context: &Context,
	keyword: Keyword,
	options: Options,
) -> Result<String, Error> {
	Ok(compact_iri(
		active_context,
		&Term::Keyword(keyword),
		None,
		true,
		false,
		options,
	)?
	.unwrap_or_else(|| keyword.into_str().to_string()))
}
