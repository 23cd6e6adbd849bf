use std::sync::Arc;

use rstest::rstest;
use scriptenv_value::{HostObject, HostValue, Mapping, ScalarKind, Sequence, TypeCatalog, TypeCatalogBuilder, TypeDescriptor, TypeId, Value};

use super::*;

#[derive(Debug)]
struct Handle(TypeId);

impl HostValue for Handle {
	fn host_type(&self) -> TypeId {
		self.0
	}
}

/// Converts anything to a fixed string.
struct Tag {
	tag: &'static str,
	confidence: Confidence,
	accepts: bool,
}

impl Tag {
	fn new(tag: &'static str, confidence: Confidence) -> Arc<dyn ValueConverter> {
		Arc::new(Self {
			tag,
			confidence,
			accepts: true,
		})
	}

	fn declining(tag: &'static str, confidence: Confidence) -> Arc<dyn ValueConverter> {
		Arc::new(Self {
			tag,
			confidence,
			accepts: false,
		})
	}
}

impl ValueConverter for Tag {
	fn name(&self) -> &'static str {
		self.tag
	}

	fn confidence(&self, _: Direction, _: &TypeDescriptor, _: &TypeDescriptor, _: &TypeCatalog) -> Confidence {
		self.confidence
	}

	fn can_convert(&self, _: &Value, _: &TypeDescriptor, _: &Delegate<'_>) -> bool {
		self.accepts
	}

	fn convert(&self, _: Value, _: &TypeDescriptor, _: &Delegate<'_>) -> Result<Value, ConvertError> {
		Ok(Value::from(self.tag))
	}
}

fn number() -> TypeDescriptor {
	TypeDescriptor::Named(TypeId::NUMBER)
}

#[test]
fn test_null_passes_through() {
	let registry = ConverterRegistry::standard();
	assert!(registry.can_convert_for_script(&Value::Null, &TypeDescriptor::Named(TypeId::LIST)));
	assert_eq!(registry.convert_for_host(Value::Null, &number()), Ok(Value::Null));
}

/// A list converted to an array gets a new array with every element converted.
#[test]
fn test_list_to_array() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
	let registry = ConverterRegistry::standard();
	let list = Value::list(vec![Value::Int(1), Value::Short(2), Value::from("3")]);
	let expected = TypeDescriptor::array_of(ScalarKind::I64);

	assert!(registry.can_convert_for_script(&list, &expected));
	let converted = registry.convert_for_script(list, &expected).unwrap();
	assert_eq!(
		converted,
		Value::array(ScalarKind::I64, vec![Value::Long(1), Value::Long(2), Value::Long(3)])
	);
}

#[test]
fn test_cursor_and_array_sources() {
	let registry = ConverterRegistry::standard();
	let expected = TypeDescriptor::array_of(TypeId::DOUBLE);

	let cursor = Value::Seq(Sequence::cursor(vec![Value::Int(1), Value::Float(0.5)]));
	assert_eq!(
		registry.convert_for_host(cursor, &expected),
		Ok(Value::array(TypeId::DOUBLE, vec![Value::Double(1.0), Value::Double(0.5)]))
	);

	let array = Value::array(ScalarKind::I32, vec![Value::Int(7)]);
	assert_eq!(
		registry.convert_for_host(array, &expected),
		Ok(Value::array(TypeId::DOUBLE, vec![Value::Double(7.0)]))
	);
}

#[test]
fn test_array_rejects_unconvertible_element() {
	let registry = ConverterRegistry::standard();
	let list = Value::list(vec![Value::from("nope")]);
	let expected = TypeDescriptor::array_of(ScalarKind::I32);

	assert!(!registry.can_convert_for_script(&list, &expected));
	assert!(matches!(
		registry.convert_for_script(list, &expected),
		Err(ConvertError::Unsupported { .. })
	));
}

/// Converting a list to a list keeps the element buffer and untouched elements.
#[test]
fn test_list_converts_in_place() {
	let registry = ConverterRegistry::standard();
	let host = HostObject::new(Handle(TypeId::OBJECT));
	let items = vec![Value::Int(1), Value::from("a"), Value::Object(host.clone())];
	let buffer = items.as_ptr();

	let converted = registry.convert_any_for_script(Value::list(items)).unwrap();
	let Value::Seq(seq) = converted else {
		panic!("expected a sequence, got {converted:?}");
	};
	assert_eq!(seq.ty(), TypeId::VEC);
	assert_eq!(seq.items().as_ptr(), buffer);
	assert_eq!(seq.items()[0], Value::Long(1));
	assert_eq!(seq.items()[1], Value::from("a"));
	assert!(matches!(&seq.items()[2], Value::Object(obj) if obj.ptr_eq(&host)));
}

#[test]
fn test_map_rekeys_changed_keys() {
	let registry = ConverterRegistry::standard();
	let mut map = Mapping::new();
	map.insert(Value::Int(1), "a");
	map.insert("k", Value::Int(2));

	let converted = registry.convert_any_for_host(Value::Map(map)).unwrap();
	let Value::Map(map) = converted else {
		panic!("expected a map, got {converted:?}");
	};
	assert_eq!(
		map.entries(),
		&[(Value::from("k"), Value::Long(2)), (Value::Long(1), Value::from("a"))]
	);
}

#[test]
fn test_map_rekey_overwrites_collision() {
	let registry = ConverterRegistry::standard();
	let mut map = Mapping::new();
	map.insert(Value::Int(1), "from-int");
	map.insert(Value::Long(1), "from-long");

	let Ok(Value::Map(map)) = registry.convert_any_for_host(Value::Map(map)) else {
		panic!("map conversion failed");
	};
	assert_eq!(map.entries(), &[(Value::Long(1), Value::from("from-int"))]);
}

#[rstest]
#[case::integral("42", Value::Long(42))]
#[case::fractional("42.5", Value::Double(42.5))]
#[case::padded(" 7 ", Value::Long(7))]
#[case::exponent("1e3", Value::Long(1000))]
fn test_string_to_any_number(#[case] input: &str, #[case] expected: Value) {
	let registry = ConverterRegistry::standard();
	assert_eq!(registry.convert_for_script(Value::from(input), &number()), Ok(expected));
}

#[rstest]
#[case::to_int("12.9", TypeDescriptor::Named(TypeId::INT), Value::Int(12))]
#[case::to_scalar_short("5", TypeDescriptor::Scalar(ScalarKind::I16), Value::Short(5))]
#[case::to_float("0.25", TypeDescriptor::Named(TypeId::FLOAT), Value::Float(0.25))]
fn test_string_to_specific_number(#[case] input: &str, #[case] expected_type: TypeDescriptor, #[case] expected: Value) {
	let registry = ConverterRegistry::standard();
	assert_eq!(registry.convert_for_host(Value::from(input), &expected_type), Ok(expected));
}

#[test]
fn test_non_numeric_string_is_unsupported() {
	let registry = ConverterRegistry::standard();
	assert!(!registry.can_convert_for_script(&Value::from("abc"), &number()));
	assert_eq!(
		registry.convert_for_script(Value::from("abc"), &number()),
		Err(ConvertError::Unsupported {
			value_type: "string".into(),
			expected: "number".into(),
		})
	);
}

#[test]
fn test_untyped_string_stays_string() {
	let registry = ConverterRegistry::standard();
	assert_eq!(registry.convert_any_for_script(Value::from("42")), Ok(Value::from("42")));
}

#[rstest]
#[case::wrap_to_byte(Value::Int(300), TypeDescriptor::Scalar(ScalarKind::I8), Value::Byte(44))]
#[case::truncate_double(Value::Double(-3.9), TypeDescriptor::Named(TypeId::INT), Value::Int(-3))]
#[case::saturate(Value::Double(1e20), TypeDescriptor::Named(TypeId::INT), Value::Int(i32::MAX))]
#[case::widen(Value::Byte(9), TypeDescriptor::Named(TypeId::DOUBLE), Value::Double(9.0))]
#[case::whole_double_any(Value::Double(8.0), TypeDescriptor::Named(TypeId::NUMBER), Value::Long(8))]
#[case::float_any(Value::Float(1.5), TypeDescriptor::OBJECT, Value::Double(1.5))]
#[case::int_any(Value::Int(3), TypeDescriptor::OBJECT, Value::Long(3))]
fn test_number_casts(#[case] value: Value, #[case] expected_type: TypeDescriptor, #[case] expected: Value) {
	let registry = ConverterRegistry::standard();
	assert_eq!(registry.convert_for_script(value, &expected_type), Ok(expected));
}

#[test]
fn test_falls_back_to_assignable() {
	let registry = ConverterRegistry::standard();
	assert_eq!(
		registry.convert_for_host(Value::Bool(true), &TypeDescriptor::Scalar(ScalarKind::Bool)),
		Ok(Value::Bool(true))
	);
	assert!(registry.can_convert_for_host(&Value::from("s"), &TypeDescriptor::Named(TypeId::STRING)));
	assert_eq!(
		registry.convert_for_host(Value::from("s"), &TypeDescriptor::Named(TypeId::LIST)),
		Err(ConvertError::Unsupported {
			value_type: "string".into(),
			expected: "list".into(),
		})
	);
}

#[test]
fn test_json_object_to_simple_json_object() {
	let registry = ConverterRegistry::standard();
	let serde_json::Value::Object(members) = serde_json::json!({"a": 1, "b": {"c": "d"}, "l": [1.5]}) else {
		unreachable!();
	};
	let expected = TypeDescriptor::Named(TypeId::SIMPLE_JSON_OBJECT);

	assert!(registry.can_convert_for_host(&Value::Json(members.clone()), &expected));
	let Ok(Value::Map(map)) = registry.convert_for_host(Value::Json(members), &expected) else {
		panic!("json conversion failed");
	};
	assert_eq!(map.ty(), TypeId::SIMPLE_JSON_OBJECT);
	assert_eq!(map.get(&Value::from("a")), Some(&Value::Long(1)));
	assert_eq!(map.get(&Value::from("l")), Some(&Value::list(vec![Value::Double(1.5)])));

	let Some(Value::Map(nested)) = map.get(&Value::from("b")) else {
		panic!("nested object not converted");
	};
	assert_eq!(nested.ty(), TypeId::SIMPLE_JSON_OBJECT);
	assert_eq!(nested.get(&Value::from("c")), Some(&Value::from("d")));
}

#[test]
fn test_json_objects_inside_arrays_become_simple() {
	let registry = ConverterRegistry::standard();
	let serde_json::Value::Object(members) = serde_json::json!({"l": [{"x": 1}, 2, [{"y": "z"}]]}) else {
		unreachable!();
	};

	let Ok(Value::Map(map)) = registry.convert_for_host(Value::Json(members), &TypeDescriptor::Named(TypeId::SIMPLE_JSON_OBJECT)) else {
		panic!("json conversion failed");
	};
	let Some(Value::Seq(list)) = map.get(&Value::from("l")) else {
		panic!("array member not converted to a list");
	};
	assert_eq!(list.len(), 3);

	let Value::Map(first) = &list.items()[0] else {
		panic!("object in array left foreign: {:?}", list.items()[0]);
	};
	assert_eq!(first.ty(), TypeId::SIMPLE_JSON_OBJECT);
	assert_eq!(first.get(&Value::from("x")), Some(&Value::Long(1)));
	assert_eq!(list.items()[1], Value::Long(2));

	let Value::Seq(inner) = &list.items()[2] else {
		panic!("nested array not converted to a list");
	};
	assert!(matches!(&inner.items()[0], Value::Map(deep) if deep.ty() == TypeId::SIMPLE_JSON_OBJECT));
}

#[test]
fn test_equal_confidence_prefers_first_registered() {
	let mut builder = ConverterRegistryBuilder::default();
	builder.register(TypeId::STRING, Tag::new("first", Confidence::MEDIUM));
	builder.register(TypeId::OBJECT, Tag::new("second", Confidence::MEDIUM));
	let registry = builder.build();

	assert_eq!(registry.convert_any_for_script(Value::from("x")), Ok(Value::from("first")));
}

#[test]
fn test_declining_candidate_is_skipped() {
	let mut builder = ConverterRegistryBuilder::default();
	builder.register(TypeId::STRING, Tag::declining("picky", Confidence::HIGHEST));
	builder.register(TypeId::STRING, Tag::new("fallback", Confidence::LOW));
	let registry = builder.build();

	assert_eq!(registry.convert_any_for_host(Value::from("x")), Ok(Value::from("fallback")));
}

#[test]
fn test_higher_confidence_wins_regardless_of_order() {
	let mut builder = ConverterRegistryBuilder::default();
	builder.register(TypeId::STRING, Tag::new("low", Confidence::LOW));
	builder.register(TypeId::STRING, Tag::new("high", Confidence::HIGH));
	let registry = builder.build();

	assert_eq!(registry.convert_any_for_host(Value::from("x")), Ok(Value::from("high")));
}

#[test]
fn test_register_is_idempotent() {
	let converter = Tag::new("tag", Confidence::LOW);
	let mut builder = ConverterRegistryBuilder::default();
	assert!(builder.register(TypeId::STRING, converter.clone()));
	assert!(!builder.register(TypeId::STRING, converter.clone()));
	assert!(builder.register(TypeId::LIST, converter.clone()));

	let registry = builder.build();
	assert_eq!(registry.snapshot().len(), 1);
	assert!(!registry.register(TypeId::STRING, converter.clone()));
	assert!(registry.register(TypeId::MAP, converter));
}

/// Registration after publication swaps in a new snapshot; old readers keep theirs.
#[test]
fn test_late_registration_publishes_new_snapshot() {
	let registry = ConverterRegistry::standard();
	let before = registry.snapshot();

	assert!(registry.register(TypeId::BOOLEAN, Tag::new("bool", Confidence::HIGH)));
	assert_eq!(registry.convert_any_for_script(Value::Bool(true)), Ok(Value::from("bool")));
	assert_eq!(
		before.convert(Direction::ForScript, Value::Bool(true), &TypeDescriptor::OBJECT),
		Ok(Value::Bool(true))
	);
	assert_eq!(registry.snapshot().len(), before.len() + 1);
}

/// Converters registered under an interface see every class implementing it.
#[test]
fn test_capability_set_reaches_declared_interfaces() {
	let mut types = TypeCatalogBuilder::new();
	let scriptable = types.declare_interface("scriptable", &[]).unwrap();
	let base = types.declare_class("wrapper-base", TypeId::OBJECT, &[scriptable]).unwrap();
	let wrapper = types.declare_class("wrapper", base, &[]).unwrap();

	let mut builder = ConverterRegistryBuilder::new(Arc::new(types.build())).with_standard_converters();
	builder.register(scriptable, Tag::new("unwrapped", Confidence::MEDIUM));
	let registry = builder.build();

	let value = Value::Object(HostObject::new(Handle(wrapper)));
	assert_eq!(registry.convert_any_for_host(value), Ok(Value::from("unwrapped")));
	assert_eq!(
		registry.convert_any_for_host(Value::Object(HostObject::new(Handle(TypeId::OBJECT)))).map(|v| v.is_null()),
		Ok(false)
	);
}
