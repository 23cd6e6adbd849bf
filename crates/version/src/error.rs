//! Error types for version and range parsing.

use thiserror::Error;

/// Errors raised while parsing a [`VersionNumber`](crate::VersionNumber).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
	/// The input contained no parts at all.
	#[error("empty version string")]
	Empty,

	/// One of the dot-separated parts is not an integer.
	#[error("invalid version part {part:?} in {input:?}")]
	InvalidPart {
		/// The full input string.
		input: String,
		/// The offending part.
		part: String,
	},
}

/// Errors raised while building a [`VersionRange`](crate::VersionRange).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
	/// An absent bound was flagged exclusive.
	#[error("{side} bound is absent but flagged exclusive")]
	ExclusiveWithoutBound {
		/// Which side of the range carried the flag.
		side: BoundSide,
	},

	/// A range fragment did not follow `[(\[]?<version>?-<version>?[)\]]?`.
	#[error("malformed range fragment {0:?}")]
	MalformedFragment(String),

	/// A bound inside a fragment failed to parse.
	#[error("invalid bound in range fragment {fragment:?}: {source}")]
	InvalidBound {
		/// The full fragment.
		fragment: String,
		/// The underlying version error.
		#[source]
		source: VersionError,
	},
}

/// Side of a [`VersionRange`](crate::VersionRange).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundSide {
	/// The `appliesFrom` end.
	Lower,
	/// The `appliesTo` end.
	Upper,
}

impl std::fmt::Display for BoundSide {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			Self::Lower => "lower",
			Self::Upper => "upper",
		})
	}
}
