use std::fmt;

/// Static ranking a converter reports for a (source type, expected type) pair.
///
/// Candidates are probed in descending confidence; the per-value
/// [`can_convert`](crate::ValueConverter::can_convert) check stays
/// authoritative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Confidence(pub u32);

impl Confidence {
	pub const LOWEST: Self = Self(0);
	pub const LOW: Self = Self(250);
	pub const MEDIUM: Self = Self(500);
	pub const HIGH: Self = Self(750);
	pub const HIGHEST: Self = Self(1000);
}

impl fmt::Display for Confidence {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}
