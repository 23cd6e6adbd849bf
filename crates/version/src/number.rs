//! Dotted version numbers with trailing-zero equivalence.
//!
//! # Invariants
//!
//! - `1.2 == 1.2.0` and both hash identically.
//!   - Enforced in: [`VersionNumber::cmp`], [`VersionNumber::significant_parts`].
//!   - Tested by: `tests::prop_trailing_zeros_are_insignificant`.
//! - The first nonzero part past the shorter length decides between numbers
//!   with an equal shared prefix (`1.2.0.1 > 1.2`).
//!   - Enforced in: [`VersionNumber::cmp`].

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;

use crate::VersionError;

/// Ordered sequence of integer parts, parsed once from a dotted string.
#[derive(Clone)]
pub struct VersionNumber {
	parts: SmallVec<[i64; 4]>,
}

impl VersionNumber {
	/// Builds a version from already split parts.
	///
	/// Returns [`VersionError::Empty`] when `parts` is empty.
	pub fn from_parts(parts: impl IntoIterator<Item = i64>) -> Result<Self, VersionError> {
		let parts: SmallVec<[i64; 4]> = parts.into_iter().collect();
		if parts.is_empty() {
			return Err(VersionError::Empty);
		}
		Ok(Self { parts })
	}

	/// Parses a dotted version string such as `4.1.1.3`.
	pub fn parse(input: &str) -> Result<Self, VersionError> {
		let trimmed = input.trim();
		if trimmed.is_empty() {
			return Err(VersionError::Empty);
		}

		let mut parts = SmallVec::new();
		for part in trimmed.split('.') {
			let value = part.parse::<i64>().map_err(|_| VersionError::InvalidPart {
				input: input.to_string(),
				part: part.to_string(),
			})?;
			parts.push(value);
		}
		Ok(Self { parts })
	}

	/// Returns the raw parts, including trailing zeros.
	pub fn parts(&self) -> &[i64] {
		&self.parts
	}

	/// Returns the parts with trailing zeros removed.
	///
	/// Two versions are equal exactly when their significant parts are equal.
	pub fn significant_parts(&self) -> &[i64] {
		let len = self.parts.iter().rposition(|&part| part != 0).map_or(0, |idx| idx + 1);
		&self.parts[..len]
	}
}

/// Version `0`.
impl Default for VersionNumber {
	fn default() -> Self {
		Self {
			parts: SmallVec::from_slice(&[0]),
		}
	}
}

/// Compares two optional versions; an absent version sorts below any present one.
pub fn compare_versions(a: Option<&VersionNumber>, b: Option<&VersionNumber>) -> Ordering {
	match (a, b) {
		(None, None) => Ordering::Equal,
		(None, Some(_)) => Ordering::Less,
		(Some(_), None) => Ordering::Greater,
		(Some(a), Some(b)) => a.cmp(b),
	}
}

impl Ord for VersionNumber {
	fn cmp(&self, other: &Self) -> Ordering {
		let shared = self.parts.len().min(other.parts.len());
		for (a, b) in self.parts[..shared].iter().zip(&other.parts[..shared]) {
			match a.cmp(b) {
				Ordering::Equal => {}
				decided => return decided,
			}
		}

		// Equal prefix: the first nonzero extra part decides by its sign.
		let tail_sign = |tail: &[i64]| tail.iter().find(|&&part| part != 0).map_or(Ordering::Equal, |part| part.cmp(&0));
		match self.parts.len().cmp(&other.parts.len()) {
			Ordering::Equal => Ordering::Equal,
			Ordering::Greater => tail_sign(&self.parts[shared..]),
			Ordering::Less => tail_sign(&other.parts[shared..]).reverse(),
		}
	}
}

impl PartialOrd for VersionNumber {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl PartialEq for VersionNumber {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for VersionNumber {}

impl Hash for VersionNumber {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.significant_parts().hash(state);
	}
}

impl fmt::Display for VersionNumber {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (idx, part) in self.parts.iter().enumerate() {
			if idx > 0 {
				f.write_str(".")?;
			}
			write!(f, "{part}")?;
		}
		Ok(())
	}
}

impl fmt::Debug for VersionNumber {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "VersionNumber({self})")
	}
}

impl FromStr for VersionNumber {
	type Err = VersionError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl TryFrom<&str> for VersionNumber {
	type Error = VersionError;

	fn try_from(value: &str) -> Result<Self, Self::Error> {
		Self::parse(value)
	}
}

impl Serialize for VersionNumber {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for VersionNumber {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = String::deserialize(deserializer)?;
		Self::parse(&raw).map_err(serde::de::Error::custom)
	}
}
