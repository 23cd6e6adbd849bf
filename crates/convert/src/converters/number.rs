use scriptenv_value::{ScalarKind, TypeCatalog, TypeDescriptor, TypeId, Value};

use crate::{Confidence, ConvertError, Delegate, Direction, ValueConverter};

/// Widens or narrows numbers to the expected numeric type.
///
/// When any number is acceptable (`number` or one of its supertypes), whole
/// values become `long` and fractional values become `double`.
pub struct NumberConverter;

/// Returns true when `expected` accepts any number.
pub(crate) fn accepts_any_number(expected: &TypeDescriptor, types: &TypeCatalog) -> bool {
	matches!(expected, TypeDescriptor::Named(id) if types.is_subtype(TypeId::NUMBER, *id))
}

/// Returns true for "any number" or one of the fixed numeric types.
pub(crate) fn is_number_target(expected: &TypeDescriptor, types: &TypeCatalog) -> bool {
	accepts_any_number(expected, types) || types.is_numeric(expected)
}

enum Numeric {
	Integral(i64),
	Floating(f64),
}

fn numeric(value: &Value) -> Option<Numeric> {
	Some(match *value {
		Value::Byte(v) => Numeric::Integral(i64::from(v)),
		Value::Short(v) => Numeric::Integral(i64::from(v)),
		Value::Int(v) => Numeric::Integral(i64::from(v)),
		Value::Long(v) => Numeric::Integral(v),
		Value::Float(v) => Numeric::Floating(f64::from(v)),
		Value::Double(v) => Numeric::Floating(v),
		_ => return None,
	})
}

/// Natural cast: integers wrap, floating values saturate.
fn cast(number: Numeric, kind: ScalarKind) -> Option<Value> {
	Some(match (number, kind) {
		(Numeric::Integral(v), ScalarKind::I8) => Value::Byte(v as i8),
		(Numeric::Integral(v), ScalarKind::I16) => Value::Short(v as i16),
		(Numeric::Integral(v), ScalarKind::I32) => Value::Int(v as i32),
		(Numeric::Integral(v), ScalarKind::I64) => Value::Long(v),
		(Numeric::Integral(v), ScalarKind::F32) => Value::Float(v as f32),
		(Numeric::Integral(v), ScalarKind::F64) => Value::Double(v as f64),
		(Numeric::Floating(v), ScalarKind::I8) => Value::Byte(v as i32 as i8),
		(Numeric::Floating(v), ScalarKind::I16) => Value::Short(v as i32 as i16),
		(Numeric::Floating(v), ScalarKind::I32) => Value::Int(v as i32),
		(Numeric::Floating(v), ScalarKind::I64) => Value::Long(v as i64),
		(Numeric::Floating(v), ScalarKind::F32) => Value::Float(v as f32),
		(Numeric::Floating(v), ScalarKind::F64) => Value::Double(v),
		(_, ScalarKind::Bool | ScalarKind::Char) => return None,
	})
}

impl ValueConverter for NumberConverter {
	fn name(&self) -> &'static str {
		"number"
	}

	fn confidence(&self, _direction: Direction, source: &TypeDescriptor, expected: &TypeDescriptor, types: &TypeCatalog) -> Confidence {
		if types.is_assignable(&TypeDescriptor::Named(TypeId::NUMBER), source) && is_number_target(expected, types) {
			Confidence::MEDIUM
		} else {
			Confidence::LOWEST
		}
	}

	fn can_convert(&self, value: &Value, expected: &TypeDescriptor, delegate: &Delegate<'_>) -> bool {
		numeric(value).is_some() && is_number_target(expected, delegate.types())
	}

	fn convert(&self, value: Value, expected: &TypeDescriptor, delegate: &Delegate<'_>) -> Result<Value, ConvertError> {
		let unexpected = || ConvertError::UnexpectedValue {
			converter: "number",
			value_type: delegate.describe(&value),
		};
		let number = numeric(&value).ok_or_else(unexpected)?;

		if accepts_any_number(expected, delegate.types()) {
			let as_double = match number {
				Numeric::Integral(v) => return Ok(Value::Long(v)),
				Numeric::Floating(v) => v,
			};
			let floor = as_double.floor();
			return Ok(if as_double == floor {
				Value::Long(floor.round() as i64)
			} else {
				Value::Double(as_double)
			});
		}

		TypeCatalog::scalar_kind(expected)
			.and_then(|kind| cast(number, kind))
			.ok_or_else(|| ConvertError::Unsupported {
				value_type: delegate.describe(&value),
				expected: delegate.types().describe(expected),
			})
	}
}
