use thiserror::Error;

/// Errors raised by conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
	/// No converter claimed the value and it is not already assignable.
	#[error("can't convert {value_type} to {expected}")]
	Unsupported {
		/// Runtime type of the value.
		value_type: String,
		/// Requested type.
		expected: String,
	},

	/// A converter was handed a value it never claims.
	#[error("{converter} converter can't handle a {value_type} value")]
	UnexpectedValue {
		converter: &'static str,
		value_type: String,
	},

	/// A string did not parse as a floating-point literal.
	#[error("{input:?} is not a number")]
	InvalidNumber { input: String },
}
