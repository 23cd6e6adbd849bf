//! Version numbers and version ranges for script variant selection.
//!
//! [`VersionNumber`] is parsed once from a dotted string and ordered so that
//! trailing zero parts are insignificant. [`VersionRange`] pairs two optional
//! bounds, each independently inclusive or exclusive.

mod error;
mod number;
mod range;

pub use error::{BoundSide, RangeError, VersionError};
pub use number::{VersionNumber, compare_versions};
pub use range::VersionRange;
