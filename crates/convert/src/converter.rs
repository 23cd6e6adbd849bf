//! Converter contract and the recursion handle passed to converters.

use std::fmt;

use scriptenv_value::{TypeCatalog, TypeDescriptor, Value};

use crate::{Confidence, ConvertError, ConverterIndex};

/// Which side of the boundary the result is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
	/// Host value handed to a script.
	ForScript,
	/// Script value handed back to the host.
	ForHost,
}

impl fmt::Display for Direction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::ForScript => "for-script",
			Self::ForHost => "for-host",
		})
	}
}

/// A stateless unit that converts values of the types it is registered under.
///
/// The dispatcher ranks candidates by [`confidence`](Self::confidence), then
/// asks each in turn whether it [can convert](Self::can_convert) the actual
/// value. The first one that accepts performs the conversion.
pub trait ValueConverter: Send + Sync {
	/// Short name used in logs and errors.
	fn name(&self) -> &'static str;

	/// Coarse static ranking for converting `source` values to `expected`.
	fn confidence(&self, direction: Direction, source: &TypeDescriptor, expected: &TypeDescriptor, types: &TypeCatalog) -> Confidence;

	/// Authoritative per-value check.
	fn can_convert(&self, value: &Value, expected: &TypeDescriptor, delegate: &Delegate<'_>) -> bool;

	/// Converts `value`, recursing through `delegate` for contained values.
	///
	/// Only called after [`can_convert`](Self::can_convert) accepted the value.
	fn convert(&self, value: Value, expected: &TypeDescriptor, delegate: &Delegate<'_>) -> Result<Value, ConvertError>;
}

/// Handle through which converters recurse into the dispatcher.
///
/// Bound to one index snapshot and one direction for the whole conversion.
#[derive(Clone, Copy)]
pub struct Delegate<'a> {
	index: &'a ConverterIndex,
	direction: Direction,
}

impl<'a> Delegate<'a> {
	pub(crate) fn new(index: &'a ConverterIndex, direction: Direction) -> Self {
		Self { index, direction }
	}

	pub fn direction(&self) -> Direction {
		self.direction
	}

	pub fn types(&self) -> &'a TypeCatalog {
		self.index.types()
	}

	pub fn can_convert(&self, value: &Value, expected: &TypeDescriptor) -> bool {
		self.index.can_convert(self.direction, value, expected)
	}

	pub fn convert(&self, value: Value, expected: &TypeDescriptor) -> Result<Value, ConvertError> {
		self.index.convert(self.direction, value, expected)
	}

	/// Describes a value's runtime type for diagnostics.
	pub fn describe(&self, value: &Value) -> String {
		match value.runtime_type() {
			Some(ty) => self.types().describe(&ty),
			None => "null".to_string(),
		}
	}
}
