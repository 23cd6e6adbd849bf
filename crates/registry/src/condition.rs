//! Predicates that pick a script variant among those sharing a name.
//!
//! # Invariants
//!
//! - An edition filter of `None` matches every variant; `Some(edition)`
//!   matches only variants of exactly that edition, so edition-agnostic
//!   variants need a `None` filter.
//!   - Enforced in: `edition_matches`.
//!   - Tested by: `tests::test_edition_filter`.
//! - A composite over zero conditions matches nothing.
//!   - Enforced in: [`CompositeCondition::matches`].
//!   - Tested by: `tests::test_empty_composite_matches_nothing`.
//! - Composite equality and hashing ignore member order.
//!   - Enforced in: `impl Hash for CompositeCondition`.

use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};

use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use scriptenv_version::{RangeError, VersionNumber, VersionRange};

use crate::{Edition, ScriptVariant};

/// Predicate over a [`ScriptVariant`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SelectionCondition {
	/// The variant's applicability range contains `version`.
	AppliesForVersion { version: VersionNumber, edition: Option<Edition> },
	/// The variant's own version lies in `range`.
	FallsInVersionRange { range: VersionRange, edition: Option<Edition> },
	/// Every member matches.
	Composite(CompositeCondition),
}

impl SelectionCondition {
	pub fn applies_for_version(version: VersionNumber, edition: Option<Edition>) -> Self {
		Self::AppliesForVersion { version, edition }
	}

	pub fn falls_in_range(range: VersionRange, edition: Option<Edition>) -> Self {
		Self::FallsInVersionRange { range, edition }
	}

	/// Range condition from optional bounds; see [`VersionRange::from_flags`].
	pub fn falls_in_version_range(
		from: Option<VersionNumber>,
		from_exclusive: bool,
		to: Option<VersionNumber>,
		to_exclusive: bool,
		edition: Option<Edition>,
	) -> Result<Self, RangeError> {
		let range = VersionRange::from_flags(from, from_exclusive, to, to_exclusive)?;
		Ok(Self::falls_in_range(range, edition))
	}

	/// Conjunction of `conditions`. Duplicates collapse.
	pub fn all(conditions: impl IntoIterator<Item = SelectionCondition>) -> Self {
		Self::Composite(conditions.into_iter().collect())
	}

	pub fn matches<S>(&self, variant: &ScriptVariant<S>) -> bool {
		match self {
			Self::AppliesForVersion { version, edition } => {
				edition_matches(*edition, variant.edition()) && variant.applies().contains(version)
			}
			Self::FallsInVersionRange { range, edition } => {
				edition_matches(*edition, variant.edition()) && range.contains(variant.version())
			}
			Self::Composite(composite) => composite.matches(variant),
		}
	}
}

fn edition_matches(filter: Option<Edition>, variant: Option<Edition>) -> bool {
	match filter {
		None => true,
		Some(filter) => variant == Some(filter),
	}
}

impl fmt::Display for SelectionCondition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::AppliesForVersion { version, edition } => {
				write!(f, "applies for {version}")?;
				write_edition(f, *edition)
			}
			Self::FallsInVersionRange { range, edition } => {
				write!(f, "falls in {range}")?;
				write_edition(f, *edition)
			}
			Self::Composite(composite) => write!(f, "{composite}"),
		}
	}
}

fn write_edition(f: &mut fmt::Formatter<'_>, edition: Option<Edition>) -> fmt::Result {
	match edition {
		Some(edition) => write!(f, " ({edition})"),
		None => Ok(()),
	}
}

/// Set of conditions that must all match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompositeCondition {
	conditions: IndexSet<SelectionCondition>,
}

impl CompositeCondition {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds `condition`; returns false when an equal one is already present.
	pub fn insert(&mut self, condition: SelectionCondition) -> bool {
		self.conditions.insert(condition)
	}

	pub fn len(&self) -> usize {
		self.conditions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.conditions.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &SelectionCondition> {
		self.conditions.iter()
	}

	pub fn matches<S>(&self, variant: &ScriptVariant<S>) -> bool {
		!self.conditions.is_empty() && self.conditions.iter().all(|condition| condition.matches(variant))
	}
}

impl FromIterator<SelectionCondition> for CompositeCondition {
	fn from_iter<I: IntoIterator<Item = SelectionCondition>>(iter: I) -> Self {
		Self {
			conditions: iter.into_iter().collect(),
		}
	}
}

impl Hash for CompositeCondition {
	fn hash<H: Hasher>(&self, state: &mut H) {
		let members = self
			.conditions
			.iter()
			.fold(0u64, |acc, condition| acc ^ FxBuildHasher.hash_one(condition));
		state.write_usize(self.conditions.len());
		state.write_u64(members);
	}
}

impl fmt::Display for CompositeCondition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("all of [")?;
		for (i, condition) in self.conditions.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{condition}")?;
		}
		f.write_str("]")
	}
}
