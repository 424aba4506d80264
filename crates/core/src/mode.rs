use std::fmt;

/// JSON-LD processing mode.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum ProcessingMode {
	/// JSON-LD 1.0.
	JsonLd1_0,

	/// JSON-LD 1.1.
	#[default]
	JsonLd1_1,
}

impl ProcessingMode {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::JsonLd1_0 => "json-ld-1.0",
			Self::JsonLd1_1 => "json-ld-1.1",
		}
	}
}

impl<'a> TryFrom<&'a str> for ProcessingMode {
	type Error = &'a str;

	fn try_from(name: &'a str) -> Result<ProcessingMode, &'a str> {
		match name {
			"json-ld-1.0" => Ok(Self::JsonLd1_0),
			"json-ld-1.1" => Ok(Self::JsonLd1_1),
			_ => Err(name),
		}
	}
}

impl fmt::Display for ProcessingMode {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.as_str().fmt(f)
	}
}
