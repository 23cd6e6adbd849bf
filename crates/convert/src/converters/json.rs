use scriptenv_value::{Mapping, TypeCatalog, TypeDescriptor, TypeId, Value};

use crate::{Confidence, ConvertError, Delegate, Direction, ValueConverter};

/// Turns a foreign JSON object into a simple, map-backed JSON object.
///
/// Member values are lifted into host values and converted through the
/// dispatcher. Nested objects become simple JSON objects as well, including
/// objects held in arrays at any depth; arrays become lists.
pub struct JsonObjectConverter;

const SIMPLE: TypeDescriptor = TypeDescriptor::Named(TypeId::SIMPLE_JSON_OBJECT);

impl ValueConverter for JsonObjectConverter {
	fn name(&self) -> &'static str {
		"json-object"
	}

	fn confidence(&self, _direction: Direction, source: &TypeDescriptor, expected: &TypeDescriptor, types: &TypeCatalog) -> Confidence {
		if *expected == SIMPLE && types.is_assignable(&TypeDescriptor::Named(TypeId::JSON_OBJECT), source) {
			Confidence::HIGH
		} else {
			Confidence::LOWEST
		}
	}

	fn can_convert(&self, value: &Value, expected: &TypeDescriptor, _delegate: &Delegate<'_>) -> bool {
		matches!(value, Value::Json(_)) && *expected == SIMPLE
	}

	fn convert(&self, value: Value, _expected: &TypeDescriptor, delegate: &Delegate<'_>) -> Result<Value, ConvertError> {
		let Value::Json(members) = value else {
			return Err(ConvertError::UnexpectedValue {
				converter: self.name(),
				value_type: delegate.describe(&value),
			});
		};

		let mut result = Mapping::with_capacity(TypeId::SIMPLE_JSON_OBJECT, members.len());
		for (key, member) in members {
			result.insert(key, convert_member(member, delegate)?);
		}
		Ok(Value::Map(result))
	}
}

fn convert_member(member: serde_json::Value, delegate: &Delegate<'_>) -> Result<Value, ConvertError> {
	match member {
		serde_json::Value::Object(members) => delegate.convert(Value::Json(members), &SIMPLE),
		serde_json::Value::Array(items) => {
			let items = items
				.into_iter()
				.map(|item| convert_member(item, delegate))
				.collect::<Result<Vec<_>, _>>()?;
			Ok(Value::list(items))
		}
		scalar => delegate.convert(Value::from_json(scalar), &TypeDescriptor::OBJECT),
	}
}
