use scriptenv_value::{TypeCatalog, TypeDescriptor, TypeId, Value};

use super::number::is_number_target;
use crate::{Confidence, ConvertError, Delegate, Direction, ValueConverter};

/// Parses numeric strings and hands the number back to the dispatcher.
///
/// Only claims expected types that are explicitly numeric (`number` or one of
/// the fixed numeric types); an untyped request leaves strings alone.
pub struct StringToNumberConverter;

fn numeric_target(expected: &TypeDescriptor, types: &TypeCatalog) -> bool {
	*expected != TypeDescriptor::OBJECT && is_number_target(expected, types)
}

fn parse(input: &str) -> Option<f64> {
	input.trim().parse::<f64>().ok()
}

impl ValueConverter for StringToNumberConverter {
	fn name(&self) -> &'static str {
		"string-to-number"
	}

	fn confidence(&self, _direction: Direction, source: &TypeDescriptor, expected: &TypeDescriptor, types: &TypeCatalog) -> Confidence {
		if *source == TypeDescriptor::Named(TypeId::STRING) && numeric_target(expected, types) {
			Confidence::MEDIUM
		} else {
			Confidence::LOWEST
		}
	}

	fn can_convert(&self, value: &Value, expected: &TypeDescriptor, delegate: &Delegate<'_>) -> bool {
		let Some(input) = value.as_str() else {
			return false;
		};
		numeric_target(expected, delegate.types()) && parse(input).is_some_and(|number| delegate.can_convert(&Value::Double(number), expected))
	}

	fn convert(&self, value: Value, expected: &TypeDescriptor, delegate: &Delegate<'_>) -> Result<Value, ConvertError> {
		let Value::String(input) = value else {
			return Err(ConvertError::UnexpectedValue {
				converter: self.name(),
				value_type: delegate.describe(&value),
			});
		};
		let number = parse(&input).ok_or(ConvertError::InvalidNumber { input })?;
		delegate.convert(Value::Double(number), expected)
	}
}
