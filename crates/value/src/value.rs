//! Host-side runtime values.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::{TypeDescriptor, TypeId};

/// Opaque host object exposed to the conversion layer.
pub trait HostValue: Any + Send + Sync + fmt::Debug {
	/// Concrete named type of this object.
	fn host_type(&self) -> TypeId;
}

/// Shared handle to a [`HostValue`]. Equality is identity.
#[derive(Clone, Debug)]
pub struct HostObject(Arc<dyn HostValue>);

impl HostObject {
	pub fn new<T: HostValue>(value: T) -> Self {
		Self(Arc::new(value))
	}

	pub fn from_arc(value: Arc<dyn HostValue>) -> Self {
		Self(value)
	}

	pub fn host_type(&self) -> TypeId {
		self.0.host_type()
	}

	/// Returns true when both handles point at the same object.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}

	pub fn downcast_ref<T: HostValue>(&self) -> Option<&T> {
		let any: &dyn Any = &*self.0;
		any.downcast_ref::<T>()
	}
}

impl PartialEq for HostObject {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other)
	}
}

/// Ordered element container: a list, an ordered set or a cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
	ty: TypeId,
	items: Vec<Value>,
}

impl Sequence {
	/// Growable list ([`TypeId::VEC`]).
	pub fn list(items: Vec<Value>) -> Self {
		Self::with_type(TypeId::VEC, items)
	}

	/// Single-pass cursor ([`TypeId::CURSOR`]).
	pub fn cursor(items: Vec<Value>) -> Self {
		Self::with_type(TypeId::CURSOR, items)
	}

	/// Insertion-ordered set ([`TypeId::ORDERED_SET`]); duplicates are dropped.
	pub fn ordered_set(items: Vec<Value>) -> Self {
		let mut unique: Vec<Value> = Vec::with_capacity(items.len());
		for item in items {
			if !unique.contains(&item) {
				unique.push(item);
			}
		}
		Self::with_type(TypeId::ORDERED_SET, unique)
	}

	/// Sequence of a host-declared class.
	pub fn with_type(ty: TypeId, items: Vec<Value>) -> Self {
		Self { ty, items }
	}

	pub fn ty(&self) -> TypeId {
		self.ty
	}

	pub fn items(&self) -> &[Value] {
		&self.items
	}

	pub fn items_mut(&mut self) -> &mut Vec<Value> {
		&mut self.items
	}

	pub fn into_items(self) -> Vec<Value> {
		self.items
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}

/// Insertion-ordered keyed container with arbitrary value keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapping {
	ty: TypeId,
	entries: Vec<(Value, Value)>,
}

impl Default for Mapping {
	fn default() -> Self {
		Self::new()
	}
}

impl Mapping {
	/// Empty [`TypeId::RECORD`].
	pub fn new() -> Self {
		Self::with_type(TypeId::RECORD)
	}

	pub fn with_type(ty: TypeId) -> Self {
		Self { ty, entries: Vec::new() }
	}

	pub fn with_capacity(ty: TypeId, capacity: usize) -> Self {
		Self {
			ty,
			entries: Vec::with_capacity(capacity),
		}
	}

	pub fn ty(&self) -> TypeId {
		self.ty
	}

	pub fn get(&self, key: &Value) -> Option<&Value> {
		self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
	}

	/// Inserts or overwrites; a new key is appended.
	pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> Option<Value> {
		let key = key.into();
		let value = value.into();
		match self.entries.iter_mut().find(|(k, _)| *k == key) {
			Some((_, slot)) => Some(std::mem::replace(slot, value)),
			None => {
				self.entries.push((key, value));
				None
			}
		}
	}

	pub fn remove(&mut self, key: &Value) -> Option<Value> {
		let idx = self.entries.iter().position(|(k, _)| k == key)?;
		Some(self.entries.remove(idx).1)
	}

	pub fn entries(&self) -> &[(Value, Value)] {
		&self.entries
	}

	pub fn entries_mut(&mut self) -> &mut Vec<(Value, Value)> {
		&mut self.entries
	}

	pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
		self.entries.iter().map(|(k, v)| (k, v))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// A host value as seen by the conversion layer.
///
/// Numbers are boxed: `Int(3)` has runtime type [`TypeId::INT`], which an
/// expected scalar `i32` also accepts.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
	#[default]
	Null,
	Bool(bool),
	Char(char),
	Byte(i8),
	Short(i16),
	Int(i32),
	Long(i64),
	Float(f32),
	Double(f64),
	String(String),
	/// Fixed-length array of a declared component type.
	Array { component: TypeDescriptor, items: Vec<Value> },
	Seq(Sequence),
	Map(Mapping),
	/// JSON object owned by a foreign JSON library.
	Json(serde_json::Map<String, serde_json::Value>),
	Object(HostObject),
}

impl Value {
	pub fn array(component: impl Into<TypeDescriptor>, items: Vec<Value>) -> Self {
		Self::Array {
			component: component.into(),
			items,
		}
	}

	pub fn list(items: Vec<Value>) -> Self {
		Self::Seq(Sequence::list(items))
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	/// Concrete runtime type; `None` for [`Value::Null`].
	pub fn runtime_type(&self) -> Option<TypeDescriptor> {
		let id = match self {
			Self::Null => return None,
			Self::Bool(_) => TypeId::BOOLEAN,
			Self::Char(_) => TypeId::CHARACTER,
			Self::Byte(_) => TypeId::BYTE,
			Self::Short(_) => TypeId::SHORT,
			Self::Int(_) => TypeId::INT,
			Self::Long(_) => TypeId::LONG,
			Self::Float(_) => TypeId::FLOAT,
			Self::Double(_) => TypeId::DOUBLE,
			Self::String(_) => TypeId::STRING,
			Self::Array { component, .. } => return Some(TypeDescriptor::Array(Arc::new(component.clone()))),
			Self::Seq(seq) => seq.ty(),
			Self::Map(map) => map.ty(),
			Self::Json(_) => TypeId::JSON_OBJECT,
			Self::Object(obj) => obj.host_type(),
		};
		Some(TypeDescriptor::Named(id))
	}

	/// Numeric payload widened to `f64`, for numeric variants only.
	pub fn as_f64(&self) -> Option<f64> {
		Some(match *self {
			Self::Byte(v) => f64::from(v),
			Self::Short(v) => f64::from(v),
			Self::Int(v) => f64::from(v),
			Self::Long(v) => v as f64,
			Self::Float(v) => f64::from(v),
			Self::Double(v) => v,
			_ => return None,
		})
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(b) => Some(*b),
			_ => None,
		}
	}

	/// Lifts a JSON document into host values.
	///
	/// Objects stay foreign ([`Value::Json`]); arrays become lists.
	pub fn from_json(json: serde_json::Value) -> Self {
		match json {
			serde_json::Value::Null => Self::Null,
			serde_json::Value::Bool(b) => Self::Bool(b),
			serde_json::Value::Number(n) => match n.as_i64() {
				Some(i) => Self::Long(i),
				None => Self::Double(n.as_f64().unwrap_or(f64::NAN)),
			},
			serde_json::Value::String(s) => Self::String(s),
			serde_json::Value::Array(items) => Self::list(items.into_iter().map(Self::from_json).collect()),
			serde_json::Value::Object(map) => Self::Json(map),
		}
	}
}

macro_rules! impl_from {
	($($ty:ty => $variant:ident),* $(,)?) => {
		$(
			impl From<$ty> for Value {
				fn from(value: $ty) -> Self {
					Self::$variant(value)
				}
			}
		)*
	};
}

impl_from! {
	bool => Bool,
	char => Char,
	i8 => Byte,
	i16 => Short,
	i32 => Int,
	i64 => Long,
	f32 => Float,
	f64 => Double,
	String => String,
	Sequence => Seq,
	Mapping => Map,
	HostObject => Object,
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::String(value.to_string())
	}
}
