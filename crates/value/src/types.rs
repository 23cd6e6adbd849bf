//! Type identifiers and descriptors.

use std::fmt;
use std::sync::Arc;

/// Stable identifier of a named type in a [`TypeCatalog`](crate::TypeCatalog).
///
/// Builtin identifiers are fixed constants; host-declared types are
/// allocated sequentially after them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
	/// Universal root type.
	pub const OBJECT: Self = Self(0);
	/// Abstract parent of every boxed numeric type.
	pub const NUMBER: Self = Self(1);
	pub const BOOLEAN: Self = Self(2);
	pub const CHARACTER: Self = Self(3);
	pub const BYTE: Self = Self(4);
	pub const SHORT: Self = Self(5);
	pub const INT: Self = Self(6);
	pub const LONG: Self = Self(7);
	pub const FLOAT: Self = Self(8);
	pub const DOUBLE: Self = Self(9);
	pub const STRING: Self = Self(10);
	/// Anything that can be walked once, front to back.
	pub const ITERABLE: Self = Self(11);
	/// Finite iterable with a known size.
	pub const COLLECTION: Self = Self(12);
	/// Ordered, indexable collection.
	pub const LIST: Self = Self(13);
	pub const SET: Self = Self(14);
	/// Keyed collection.
	pub const MAP: Self = Self(15);
	/// Single-pass cursor over elements.
	pub const ITERATOR: Self = Self(16);
	/// Growable list; the default sequence class.
	pub const VEC: Self = Self(17);
	/// Insertion-ordered set.
	pub const ORDERED_SET: Self = Self(18);
	/// Concrete iterator class.
	pub const CURSOR: Self = Self(19);
	/// Insertion-ordered map; the default keyed class.
	pub const RECORD: Self = Self(20);
	/// JSON object produced by a foreign JSON library.
	pub const JSON_OBJECT: Self = Self(21);
	/// Map-backed JSON object understood by scripts.
	pub const SIMPLE_JSON_OBJECT: Self = Self(22);
	/// Marker under which converters claim every array type.
	pub const ARRAY: Self = Self(23);

	pub(crate) const BUILTIN_COUNT: u32 = 24;

	pub(crate) fn index(self) -> usize {
		self.0 as usize
	}

	/// Returns the raw identifier.
	pub fn as_u32(self) -> u32 {
		self.0
	}
}

/// Unboxed primitive types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
	Bool,
	Char,
	I8,
	I16,
	I32,
	I64,
	F32,
	F64,
}

impl ScalarKind {
	/// Named type that boxes this primitive.
	pub fn boxed(self) -> TypeId {
		match self {
			Self::Bool => TypeId::BOOLEAN,
			Self::Char => TypeId::CHARACTER,
			Self::I8 => TypeId::BYTE,
			Self::I16 => TypeId::SHORT,
			Self::I32 => TypeId::INT,
			Self::I64 => TypeId::LONG,
			Self::F32 => TypeId::FLOAT,
			Self::F64 => TypeId::DOUBLE,
		}
	}

	/// Primitive unboxed from `ty`, if `ty` is a boxed primitive.
	pub fn unboxed(ty: TypeId) -> Option<Self> {
		Some(match ty {
			TypeId::BOOLEAN => Self::Bool,
			TypeId::CHARACTER => Self::Char,
			TypeId::BYTE => Self::I8,
			TypeId::SHORT => Self::I16,
			TypeId::INT => Self::I32,
			TypeId::LONG => Self::I64,
			TypeId::FLOAT => Self::F32,
			TypeId::DOUBLE => Self::F64,
			_ => return None,
		})
	}

	pub fn is_numeric(self) -> bool {
		!matches!(self, Self::Bool | Self::Char)
	}

	pub fn name(self) -> &'static str {
		match self {
			Self::Bool => "bool",
			Self::Char => "char",
			Self::I8 => "i8",
			Self::I16 => "i16",
			Self::I32 => "i32",
			Self::I64 => "i64",
			Self::F32 => "f32",
			Self::F64 => "f64",
		}
	}
}

/// A type a value may have or a caller may expect.
///
/// Named types live in a [`TypeCatalog`](crate::TypeCatalog); scalars and
/// arrays are structural.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
	Named(TypeId),
	Scalar(ScalarKind),
	Array(Arc<TypeDescriptor>),
}

impl TypeDescriptor {
	pub const OBJECT: Self = Self::Named(TypeId::OBJECT);

	/// Array type with the given component type.
	pub fn array_of(component: impl Into<TypeDescriptor>) -> Self {
		Self::Array(Arc::new(component.into()))
	}

	/// Component type when this is an array type.
	pub fn component(&self) -> Option<&TypeDescriptor> {
		match self {
			Self::Array(component) => Some(component),
			_ => None,
		}
	}

	pub fn is_array(&self) -> bool {
		matches!(self, Self::Array(_))
	}

	/// Named type, if this descriptor is one.
	pub fn named(&self) -> Option<TypeId> {
		match self {
			Self::Named(id) => Some(*id),
			_ => None,
		}
	}
}

impl From<TypeId> for TypeDescriptor {
	fn from(id: TypeId) -> Self {
		Self::Named(id)
	}
}

impl From<ScalarKind> for TypeDescriptor {
	fn from(kind: ScalarKind) -> Self {
		Self::Scalar(kind)
	}
}

impl fmt::Display for ScalarKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}
