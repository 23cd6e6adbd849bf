use scriptenv_value::{TypeCatalog, TypeDescriptor, TypeId, Value};

use crate::{Confidence, ConvertError, Delegate, Direction, ValueConverter};

/// Converts arrays, collections and cursors into a new array of the expected
/// component type.
pub struct ArrayConverter;

fn is_array_source(source: &TypeDescriptor, types: &TypeCatalog) -> bool {
	source.is_array() || [TypeId::COLLECTION, TypeId::ITERABLE, TypeId::ITERATOR].iter().any(|&ty| types.capabilities(source).contains(&ty))
}

fn elements(value: &Value) -> Option<&[Value]> {
	match value {
		Value::Array { items, .. } => Some(items.as_slice()),
		Value::Seq(seq) => Some(seq.items()),
		_ => None,
	}
}

impl ValueConverter for ArrayConverter {
	fn name(&self) -> &'static str {
		"array"
	}

	fn confidence(&self, _direction: Direction, source: &TypeDescriptor, expected: &TypeDescriptor, types: &TypeCatalog) -> Confidence {
		if expected.is_array() && is_array_source(source, types) {
			Confidence::LOW
		} else {
			Confidence::LOWEST
		}
	}

	fn can_convert(&self, value: &Value, expected: &TypeDescriptor, delegate: &Delegate<'_>) -> bool {
		let Some(component) = expected.component() else {
			return false;
		};
		elements(value).is_some_and(|items| items.iter().all(|item| delegate.can_convert(item, component)))
	}

	fn convert(&self, value: Value, expected: &TypeDescriptor, delegate: &Delegate<'_>) -> Result<Value, ConvertError> {
		let Some(component) = expected.component() else {
			return Err(ConvertError::Unsupported {
				value_type: delegate.describe(&value),
				expected: delegate.types().describe(expected),
			});
		};
		let items = match value {
			Value::Array { items, .. } => items,
			Value::Seq(seq) => seq.into_items(),
			other => {
				return Err(ConvertError::UnexpectedValue {
					converter: self.name(),
					value_type: delegate.describe(&other),
				});
			}
		};

		let items = items.into_iter().map(|item| delegate.convert(item, component)).collect::<Result<Vec<_>, _>>()?;
		Ok(Value::Array {
			component: component.clone(),
			items,
		})
	}
}
