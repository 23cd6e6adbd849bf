use std::mem;

use scriptenv_value::{TypeCatalog, TypeDescriptor, TypeId, Value};

use crate::{Confidence, ConvertError, Delegate, Direction, ValueConverter};

/// Converts the elements of a list in place.
///
/// The container is moved in and handed back with the same element buffer;
/// each element is replaced by its converted form.
pub struct SequenceConverter;

fn claims(source: &TypeDescriptor, expected: &TypeDescriptor, types: &TypeCatalog) -> bool {
	let list = TypeDescriptor::Named(TypeId::LIST);
	types.is_assignable(&list, source) && (types.is_assignable(expected, &list) || expected == source)
}

impl ValueConverter for SequenceConverter {
	fn name(&self) -> &'static str {
		"sequence"
	}

	fn confidence(&self, _direction: Direction, source: &TypeDescriptor, expected: &TypeDescriptor, types: &TypeCatalog) -> Confidence {
		if claims(source, expected, types) { Confidence::LOW } else { Confidence::LOWEST }
	}

	fn can_convert(&self, value: &Value, expected: &TypeDescriptor, delegate: &Delegate<'_>) -> bool {
		let Value::Seq(seq) = value else {
			return false;
		};
		claims(&TypeDescriptor::Named(seq.ty()), expected, delegate.types())
			&& seq.items().iter().all(|item| delegate.can_convert(item, &TypeDescriptor::OBJECT))
	}

	fn convert(&self, value: Value, _expected: &TypeDescriptor, delegate: &Delegate<'_>) -> Result<Value, ConvertError> {
		let Value::Seq(mut seq) = value else {
			return Err(ConvertError::UnexpectedValue {
				converter: self.name(),
				value_type: delegate.describe(&value),
			});
		};

		for item in seq.items_mut().iter_mut() {
			let current = mem::take(item);
			*item = delegate.convert(current, &TypeDescriptor::OBJECT)?;
		}
		Ok(Value::Seq(seq))
	}
}
