use std::fmt;

/// Base direction of a string.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Direction {
	Ltr,
	Rtl,
}

impl Direction {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Ltr => "ltr",
			Self::Rtl => "rtl",
		}
	}
}

impl<'a> TryFrom<&'a str> for Direction {
	type Error = &'a str;

	fn try_from(name: &'a str) -> Result<Direction, &'a str> {
		match name {
			"ltr" => Ok(Self::Ltr),
			"rtl" => Ok(Self::Rtl),
			_ => Err(name),
		}
	}
}

impl fmt::Display for Direction {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.as_str().fmt(f)
	}
}
