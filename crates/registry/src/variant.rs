use std::cmp::Ordering;
use std::fmt;

use scriptenv_version::{VersionNumber, VersionRange};

use crate::Edition;

/// One versioned, edition-tagged implementation of a named script.
///
/// `applies` is the span of host versions the script is written for;
/// `version` is the script's own version. An `edition` of `None` marks an
/// edition-agnostic variant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScriptVariant<S> {
	script: S,
	version: VersionNumber,
	applies: VersionRange,
	edition: Option<Edition>,
}

impl<S> ScriptVariant<S> {
	/// Variant applying to every host version and edition.
	pub fn new(script: S, version: VersionNumber) -> Self {
		Self {
			script,
			version,
			applies: VersionRange::unbounded(),
			edition: None,
		}
	}

	pub fn with_applies(mut self, applies: VersionRange) -> Self {
		self.applies = applies;
		self
	}

	pub fn with_edition(mut self, edition: Option<Edition>) -> Self {
		self.edition = edition;
		self
	}

	pub fn script(&self) -> &S {
		&self.script
	}

	pub fn into_script(self) -> S {
		self.script
	}

	pub fn version(&self) -> &VersionNumber {
		&self.version
	}

	pub fn applies(&self) -> &VersionRange {
		&self.applies
	}

	pub fn edition(&self) -> Option<Edition> {
		self.edition
	}
}

impl<S: Ord> ScriptVariant<S> {
	/// Selection priority; `Greater` wins.
	///
	/// Higher versions win, then the edition (agnostic below community below
	/// enterprise), then the script's own ordering.
	pub fn priority_cmp(&self, other: &Self) -> Ordering {
		self.version
			.cmp(&other.version)
			.then_with(|| self.edition.cmp(&other.edition))
			.then_with(|| self.script.cmp(&other.script))
	}
}

impl<S: fmt::Display> fmt::Display for ScriptVariant<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} v{}", self.script, self.version)?;
		if !self.applies.is_unbounded() {
			write!(f, " applies {}", self.applies)?;
		}
		match self.edition {
			Some(edition) => write!(f, " ({edition})"),
			None => Ok(()),
		}
	}
}
