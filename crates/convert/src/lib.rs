//! Bidirectional value conversion between host and script.
//!
//! Converters register against named types. For a value, the dispatcher
//! unions every converter registered under any type in the value's capability
//! set, ranks them by [`Confidence`], and hands the value to the first one
//! whose per-value check accepts it. Structural converters recurse into the
//! dispatcher through a [`Delegate`], so nested conversions compose without
//! converters knowing about each other.

mod confidence;
mod converter;
pub mod converters;
mod error;
mod registry;

pub use confidence::Confidence;
pub use converter::{Delegate, Direction, ValueConverter};
pub use error::ConvertError;
pub use registry::{ConverterIndex, ConverterRegistry, ConverterRegistryBuilder};

#[cfg(test)]
mod tests;
