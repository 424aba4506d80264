/// Either a value of type `T` or an explicit `null`.
///
/// Contexts distinguish an entry set to `null` (which clears an inherited
/// mapping) from an absent entry; `Option<Nullable<T>>` captures the three
/// states.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Nullable<T> {
	/// Explicit null.
	Null,

	/// Some value.
	Some(T),
}

impl<T> Nullable<T> {
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	pub fn as_ref(&self) -> Nullable<&T> {
		match self {
			Self::Null => Nullable::Null,
			Self::Some(t) => Nullable::Some(t),
		}
	}

	pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Nullable<U> {
		match self {
			Self::Null => Nullable::Null,
			Self::Some(t) => Nullable::Some(f(t)),
		}
	}

	/// Returns the value, or `None` if null.
	pub fn option(self) -> Option<T> {
		match self {
			Self::Null => None,
			Self::Some(t) => Some(t),
		}
	}
}

impl<T> From<Option<T>> for Nullable<T> {
	fn from(opt: Option<T>) -> Self {
		match opt {
			None => Self::Null,
			Some(t) => Self::Some(t),
		}
	}
}
