use std::mem;

use scriptenv_value::{TypeCatalog, TypeDescriptor, TypeId, Value};

use crate::{Confidence, ConvertError, Delegate, Direction, ValueConverter};

/// Converts the keys and values of a keyed collection in place.
///
/// An entry whose key changes is removed and re-inserted under the converted
/// key, after all unchanged entries; it overwrites an entry already holding
/// that key.
pub struct MapConverter;

fn claims(source: &TypeDescriptor, expected: &TypeDescriptor, types: &TypeCatalog) -> bool {
	let map = TypeDescriptor::Named(TypeId::MAP);
	types.is_assignable(&map, source) && (types.is_assignable(expected, &map) || expected == source)
}

impl ValueConverter for MapConverter {
	fn name(&self) -> &'static str {
		"map"
	}

	fn confidence(&self, _direction: Direction, source: &TypeDescriptor, expected: &TypeDescriptor, types: &TypeCatalog) -> Confidence {
		if claims(source, expected, types) { Confidence::LOW } else { Confidence::LOWEST }
	}

	fn can_convert(&self, value: &Value, expected: &TypeDescriptor, delegate: &Delegate<'_>) -> bool {
		let Value::Map(map) = value else {
			return false;
		};
		claims(&TypeDescriptor::Named(map.ty()), expected, delegate.types())
			&& map
				.iter()
				.all(|(k, v)| delegate.can_convert(k, &TypeDescriptor::OBJECT) && delegate.can_convert(v, &TypeDescriptor::OBJECT))
	}

	fn convert(&self, value: Value, _expected: &TypeDescriptor, delegate: &Delegate<'_>) -> Result<Value, ConvertError> {
		let Value::Map(mut map) = value else {
			return Err(ConvertError::UnexpectedValue {
				converter: self.name(),
				value_type: delegate.describe(&value),
			});
		};

		let mut rekeyed = Vec::new();
		let entries = map.entries_mut();
		let mut idx = 0;
		while idx < entries.len() {
			let (key, val) = &mut entries[idx];
			*val = delegate.convert(mem::take(val), &TypeDescriptor::OBJECT)?;
			let converted_key = delegate.convert(key.clone(), &TypeDescriptor::OBJECT)?;
			if converted_key == *key {
				idx += 1;
			} else {
				let (_, val) = entries.remove(idx);
				rekeyed.push((converted_key, val));
			}
		}
		for (key, val) in rekeyed {
			map.insert(key, val);
		}
		Ok(Value::Map(map))
	}
}
