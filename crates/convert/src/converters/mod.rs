//! Standard converters.

use std::sync::Arc;

use scriptenv_value::TypeId;

use crate::ConverterRegistryBuilder;

mod array;
mod json;
mod map;
mod number;
mod sequence;
mod string_number;

pub use array::ArrayConverter;
pub use json::JsonObjectConverter;
pub use map::MapConverter;
pub use number::NumberConverter;
pub use sequence::SequenceConverter;
pub use string_number::StringToNumberConverter;

pub(crate) fn register_standard(builder: &mut ConverterRegistryBuilder) {
	builder
		.register_all(
			&[TypeId::ARRAY, TypeId::COLLECTION, TypeId::ITERABLE, TypeId::ITERATOR],
			Arc::new(ArrayConverter),
		)
		.register_all(&[TypeId::LIST], Arc::new(SequenceConverter))
		.register_all(&[TypeId::MAP], Arc::new(MapConverter))
		.register_all(&[TypeId::NUMBER], Arc::new(NumberConverter))
		.register_all(&[TypeId::STRING], Arc::new(StringToNumberConverter))
		.register_all(&[TypeId::JSON_OBJECT], Arc::new(JsonObjectConverter));
}
