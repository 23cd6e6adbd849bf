//! Version ranges with independently exclusive bounds.

use std::fmt;
use std::ops::Bound;

use crate::{BoundSide, RangeError, VersionNumber};

/// A span of versions; each end is inclusive, exclusive or open.
///
/// Built through [`VersionRange::between`] when both ends are known, or
/// [`VersionRange::from_flags`] for the optional-bound form used by
/// parameter maps and registration paths.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VersionRange {
	from: Bound<VersionNumber>,
	to: Bound<VersionNumber>,
}

impl VersionRange {
	/// A range that contains every version.
	pub fn unbounded() -> Self {
		Self {
			from: Bound::Unbounded,
			to: Bound::Unbounded,
		}
	}

	/// A closed-form range with both bounds present.
	pub fn between(from: VersionNumber, from_exclusive: bool, to: VersionNumber, to_exclusive: bool) -> Self {
		Self {
			from: bound(Some(from), from_exclusive),
			to: bound(Some(to), to_exclusive),
		}
	}

	/// Builds a range from optional bounds and their exclusivity flags.
	///
	/// An absent bound is open. Flagging an absent bound exclusive is malformed
	/// input and rejected.
	pub fn from_flags(
		from: Option<VersionNumber>,
		from_exclusive: bool,
		to: Option<VersionNumber>,
		to_exclusive: bool,
	) -> Result<Self, RangeError> {
		if from.is_none() && from_exclusive {
			return Err(RangeError::ExclusiveWithoutBound { side: BoundSide::Lower });
		}
		if to.is_none() && to_exclusive {
			return Err(RangeError::ExclusiveWithoutBound { side: BoundSide::Upper });
		}
		Ok(Self {
			from: bound(from, from_exclusive),
			to: bound(to, to_exclusive),
		})
	}

	/// Parses a registration path fragment such as `(4.0.0-4.1.1.3]`.
	///
	/// `[` and `]` mark an exclusive bound; `(`, `)` or no bracket mark an
	/// inclusive one. Either version may be omitted (`(4.2-`, `-5.0)`).
	pub fn parse_fragment(fragment: &str) -> Result<Self, RangeError> {
		let malformed = || RangeError::MalformedFragment(fragment.to_string());

		let (from_exclusive, rest) = match fragment.as_bytes().first() {
			Some(b'[') => (true, &fragment[1..]),
			Some(b'(') => (false, &fragment[1..]),
			_ => (false, fragment),
		};
		let (rest, to_exclusive) = match rest.as_bytes().last() {
			Some(b']') => (&rest[..rest.len() - 1], true),
			Some(b')') => (&rest[..rest.len() - 1], false),
			_ => (rest, false),
		};

		let (from_raw, to_raw) = rest.split_once('-').ok_or_else(malformed)?;
		if to_raw.contains('-') {
			return Err(malformed());
		}

		let parse_bound = |raw: &str| -> Result<Option<VersionNumber>, RangeError> {
			if raw.is_empty() {
				return Ok(None);
			}
			if !raw.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
				return Err(malformed());
			}
			VersionNumber::parse(raw).map(Some).map_err(|source| RangeError::InvalidBound {
				fragment: fragment.to_string(),
				source,
			})
		};
		let from = parse_bound(from_raw)?;
		let to = parse_bound(to_raw)?;

		// A bracket on an absent bound carries no meaning; treat it as open.
		let from_exclusive = from_exclusive && from.is_some();
		let to_exclusive = to_exclusive && to.is_some();
		Self::from_flags(from, from_exclusive, to, to_exclusive)
	}

	/// Returns the lower bound.
	pub fn from(&self) -> Bound<&VersionNumber> {
		self.from.as_ref()
	}

	/// Returns the upper bound.
	pub fn to(&self) -> Bound<&VersionNumber> {
		self.to.as_ref()
	}

	/// Returns the lower bound's version, if any.
	pub fn lower_version(&self) -> Option<&VersionNumber> {
		match &self.from {
			Bound::Included(v) | Bound::Excluded(v) => Some(v),
			Bound::Unbounded => None,
		}
	}

	/// Returns true when both ends are open.
	pub fn is_unbounded(&self) -> bool {
		matches!((&self.from, &self.to), (Bound::Unbounded, Bound::Unbounded))
	}

	/// Tests whether `version` lies within the range.
	pub fn contains(&self, version: &VersionNumber) -> bool {
		let above = match &self.from {
			Bound::Included(from) => version >= from,
			Bound::Excluded(from) => version > from,
			Bound::Unbounded => true,
		};
		let below = match &self.to {
			Bound::Included(to) => version <= to,
			Bound::Excluded(to) => version < to,
			Bound::Unbounded => true,
		};
		above && below
	}
}

impl Default for VersionRange {
	fn default() -> Self {
		Self::unbounded()
	}
}

fn bound(version: Option<VersionNumber>, exclusive: bool) -> Bound<VersionNumber> {
	match version {
		Some(v) if exclusive => Bound::Excluded(v),
		Some(v) => Bound::Included(v),
		None => Bound::Unbounded,
	}
}

impl fmt::Display for VersionRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.from {
			Bound::Included(v) => write!(f, "({v}")?,
			Bound::Excluded(v) => write!(f, "[{v}")?,
			Bound::Unbounded => {}
		}
		f.write_str("-")?;
		match &self.to {
			Bound::Included(v) => write!(f, "{v})"),
			Bound::Excluded(v) => write!(f, "{v}]"),
			Bound::Unbounded => Ok(()),
		}
	}
}
