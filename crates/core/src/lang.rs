use std::fmt;

/// Language tag that may not be well-formed.
///
/// The API specification requires processors to keep malformed language
/// tags (with a warning) rather than reject them, so tags are stored
/// verbatim and checked on demand.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct LenientLangTagBuf(String);

impl LenientLangTagBuf {
	pub fn new(tag: String) -> Self {
		Self(tag)
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Checks well-formedness according to BCP47.
	pub fn is_well_formed(&self) -> bool {
		langtag::LangTag::new(&self.0).is_ok()
	}

	/// Lowercase form, used by the canonical N-Quads serializer.
	pub fn to_lowercase(&self) -> LenientLangTagBuf {
		Self(self.0.to_lowercase())
	}

	pub fn into_string(self) -> String {
		self.0
	}
}

impl From<String> for LenientLangTagBuf {
	fn from(tag: String) -> Self {
		Self(tag)
	}
}

impl<'a> From<&'a str> for LenientLangTagBuf {
	fn from(tag: &'a str) -> Self {
		Self(tag.to_string())
	}
}

impl fmt::Display for LenientLangTagBuf {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.0.fmt(f)
	}
}
