//! Type lattice: classes, interfaces and their capability closures.
//!
//! # Role
//!
//! Answers two questions for the conversion layer: which named types does a
//! runtime type satisfy (its capability set, used to look up converters), and
//! is a value of one type acceptable where another is expected.
//!
//! # Invariants
//!
//! - A capability set lists the concrete type first, then its class ancestors,
//!   then every interface reachable from any of them, with [`TypeId::OBJECT`]
//!   last.
//!   - Enforced in: [`TypeCatalogBuilder::declare_class`], [`TypeCatalogBuilder::declare_interface`].
//!   - Tested by: `tests::test_capabilities_order`.
//! - Declarations only reference already declared types, so the lattice is
//!   acyclic and each closure is computed once at declaration time.

use std::sync::Arc;

use indexmap::IndexSet;
use rustc_hash::FxHashMap;

use crate::{CatalogError, ScalarKind, TypeDescriptor, TypeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeKind {
	Class,
	Interface,
}

#[derive(Debug)]
struct TypeInfo {
	name: Arc<str>,
	kind: TypeKind,
	/// Concrete type, ancestors, interfaces, root last.
	closure: Box<[TypeId]>,
}

/// Immutable type lattice.
#[derive(Debug)]
pub struct TypeCatalog {
	types: Vec<TypeInfo>,
	by_name: FxHashMap<Arc<str>, TypeId>,
}

/// Accumulates host type declarations on top of the builtin lattice.
#[derive(Debug)]
pub struct TypeCatalogBuilder {
	catalog: TypeCatalog,
}

impl Default for TypeCatalogBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl TypeCatalogBuilder {
	/// Starts from the builtin lattice.
	pub fn new() -> Self {
		let mut catalog = TypeCatalog {
			types: Vec::with_capacity(TypeId::BUILTIN_COUNT as usize),
			by_name: FxHashMap::default(),
		};
		catalog.types.push(TypeInfo {
			name: Arc::from("object"),
			kind: TypeKind::Class,
			closure: Box::new([TypeId::OBJECT]),
		});
		catalog.by_name.insert(Arc::from("object"), TypeId::OBJECT);

		let mut builder = Self { catalog };
		for (id, name, kind, parent, interfaces) in BUILTINS {
			let declared = match kind {
				TypeKind::Class => builder.declare_class(name, *parent, interfaces),
				TypeKind::Interface => builder.declare_interface(name, interfaces),
			};
			debug_assert_eq!(declared.ok(), Some(*id), "builtin {name} out of order");
		}
		builder
	}

	/// Declares a class extending `parent` and implementing `interfaces`.
	pub fn declare_class(&mut self, name: &str, parent: TypeId, interfaces: &[TypeId]) -> Result<TypeId, CatalogError> {
		self.check_new_name(name)?;
		let parent_info = self.catalog.info(parent)?;
		if parent_info.kind != TypeKind::Class {
			return Err(CatalogError::NotAClass(parent_info.name.to_string()));
		}
		for &iface in interfaces {
			self.expect_interface(iface)?;
		}

		let id = self.next_id();
		let mut classes = vec![id];
		let mut ifaces = IndexSet::new();
		for &iface in interfaces {
			self.collect_interfaces(iface, &mut ifaces);
		}
		for &ancestor in parent_info.closure.iter() {
			match self.catalog.types[ancestor.index()].kind {
				TypeKind::Class if ancestor != TypeId::OBJECT => classes.push(ancestor),
				TypeKind::Interface => {
					ifaces.insert(ancestor);
				}
				TypeKind::Class => {}
			}
		}
		Ok(self.push(name, TypeKind::Class, classes, ifaces))
	}

	/// Declares an interface extending `extends`.
	pub fn declare_interface(&mut self, name: &str, extends: &[TypeId]) -> Result<TypeId, CatalogError> {
		self.check_new_name(name)?;
		for &iface in extends {
			self.expect_interface(iface)?;
		}

		let id = self.next_id();
		let mut ifaces = IndexSet::new();
		for &iface in extends {
			self.collect_interfaces(iface, &mut ifaces);
		}
		Ok(self.push(name, TypeKind::Interface, vec![id], ifaces))
	}

	pub fn build(self) -> TypeCatalog {
		self.catalog
	}

	fn next_id(&self) -> TypeId {
		TypeId(self.catalog.types.len() as u32)
	}

	fn check_new_name(&self, name: &str) -> Result<(), CatalogError> {
		if name.is_empty() {
			return Err(CatalogError::EmptyName);
		}
		if self.catalog.by_name.contains_key(name) {
			return Err(CatalogError::DuplicateName(name.to_string()));
		}
		Ok(())
	}

	fn expect_interface(&self, id: TypeId) -> Result<(), CatalogError> {
		let info = self.catalog.info(id)?;
		if info.kind != TypeKind::Interface {
			return Err(CatalogError::NotAnInterface(info.name.to_string()));
		}
		Ok(())
	}

	fn collect_interfaces(&self, iface: TypeId, out: &mut IndexSet<TypeId>) {
		for &ty in self.catalog.types[iface.index()].closure.iter() {
			if ty != TypeId::OBJECT {
				out.insert(ty);
			}
		}
	}

	fn push(&mut self, name: &str, kind: TypeKind, classes: Vec<TypeId>, ifaces: IndexSet<TypeId>) -> TypeId {
		let id = self.next_id();
		let mut closure = classes;
		closure.extend(ifaces);
		closure.push(TypeId::OBJECT);

		let name: Arc<str> = Arc::from(name);
		self.catalog.by_name.insert(name.clone(), id);
		self.catalog.types.push(TypeInfo {
			name,
			kind,
			closure: closure.into_boxed_slice(),
		});
		id
	}
}

type Builtin = (TypeId, &'static str, TypeKind, TypeId, &'static [TypeId]);

const BUILTINS: &[Builtin] = &[
	(TypeId::NUMBER, "number", TypeKind::Class, TypeId::OBJECT, &[]),
	(TypeId::BOOLEAN, "boolean", TypeKind::Class, TypeId::OBJECT, &[]),
	(TypeId::CHARACTER, "character", TypeKind::Class, TypeId::OBJECT, &[]),
	(TypeId::BYTE, "byte", TypeKind::Class, TypeId::NUMBER, &[]),
	(TypeId::SHORT, "short", TypeKind::Class, TypeId::NUMBER, &[]),
	(TypeId::INT, "int", TypeKind::Class, TypeId::NUMBER, &[]),
	(TypeId::LONG, "long", TypeKind::Class, TypeId::NUMBER, &[]),
	(TypeId::FLOAT, "float", TypeKind::Class, TypeId::NUMBER, &[]),
	(TypeId::DOUBLE, "double", TypeKind::Class, TypeId::NUMBER, &[]),
	(TypeId::STRING, "string", TypeKind::Class, TypeId::OBJECT, &[]),
	(TypeId::ITERABLE, "iterable", TypeKind::Interface, TypeId::OBJECT, &[]),
	(TypeId::COLLECTION, "collection", TypeKind::Interface, TypeId::OBJECT, &[TypeId::ITERABLE]),
	(TypeId::LIST, "list", TypeKind::Interface, TypeId::OBJECT, &[TypeId::COLLECTION]),
	(TypeId::SET, "set", TypeKind::Interface, TypeId::OBJECT, &[TypeId::COLLECTION]),
	(TypeId::MAP, "map", TypeKind::Interface, TypeId::OBJECT, &[]),
	(TypeId::ITERATOR, "iterator", TypeKind::Interface, TypeId::OBJECT, &[]),
	(TypeId::VEC, "vec", TypeKind::Class, TypeId::OBJECT, &[TypeId::LIST]),
	(TypeId::ORDERED_SET, "ordered-set", TypeKind::Class, TypeId::OBJECT, &[TypeId::SET]),
	(TypeId::CURSOR, "cursor", TypeKind::Class, TypeId::OBJECT, &[TypeId::ITERATOR]),
	(TypeId::RECORD, "record", TypeKind::Class, TypeId::OBJECT, &[TypeId::MAP]),
	(TypeId::JSON_OBJECT, "json-object", TypeKind::Class, TypeId::OBJECT, &[]),
	(TypeId::SIMPLE_JSON_OBJECT, "simple-json-object", TypeKind::Class, TypeId::RECORD, &[]),
	(TypeId::ARRAY, "array", TypeKind::Class, TypeId::OBJECT, &[]),
];

impl Default for TypeCatalog {
	fn default() -> Self {
		TypeCatalogBuilder::new().build()
	}
}

impl TypeCatalog {
	/// Catalog holding only the builtin types.
	pub fn builtin() -> Self {
		Self::default()
	}

	fn info(&self, id: TypeId) -> Result<&TypeInfo, CatalogError> {
		self.types.get(id.index()).ok_or(CatalogError::UnknownType(id))
	}

	/// Looks up a named type.
	pub fn lookup(&self, name: &str) -> Option<TypeId> {
		self.by_name.get(name).copied()
	}

	pub fn name(&self, id: TypeId) -> Option<&str> {
		self.types.get(id.index()).map(|info| &*info.name)
	}

	pub fn is_interface(&self, id: TypeId) -> bool {
		self.types.get(id.index()).is_some_and(|info| info.kind == TypeKind::Interface)
	}

	pub fn len(&self) -> usize {
		self.types.len()
	}

	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}

	/// Every named type `id` satisfies, concrete type first and root last.
	///
	/// Unknown identifiers satisfy only the root.
	pub fn closure(&self, id: TypeId) -> &[TypeId] {
		match self.types.get(id.index()) {
			Some(info) => &info.closure,
			None => std::slice::from_ref(&ROOT),
		}
	}

	/// Capability set of a runtime type: the named types converters may be
	/// registered under.
	pub fn capabilities(&self, ty: &TypeDescriptor) -> &[TypeId] {
		match ty {
			TypeDescriptor::Named(id) => self.closure(*id),
			TypeDescriptor::Scalar(kind) => self.closure(kind.boxed()),
			TypeDescriptor::Array(_) => &ARRAY_CAPABILITIES,
		}
	}

	/// Returns true when `sub` is `sup` or inherits from it.
	pub fn is_subtype(&self, sub: TypeId, sup: TypeId) -> bool {
		sup == TypeId::OBJECT || self.closure(sub).contains(&sup)
	}

	/// Returns true when a value of runtime type `actual` may be used where
	/// `expected` is required.
	///
	/// Scalars and their boxed counterparts are interchangeable. Arrays are
	/// covariant in reference component types and invariant in scalar ones.
	pub fn is_assignable(&self, expected: &TypeDescriptor, actual: &TypeDescriptor) -> bool {
		match (expected, actual) {
			(TypeDescriptor::Named(e), TypeDescriptor::Named(a)) => self.is_subtype(*a, *e),
			(TypeDescriptor::Named(e), TypeDescriptor::Scalar(k)) => self.is_subtype(k.boxed(), *e),
			(TypeDescriptor::Named(e), TypeDescriptor::Array(_)) => *e == TypeId::OBJECT || *e == TypeId::ARRAY,
			(TypeDescriptor::Scalar(k), TypeDescriptor::Named(a)) => k.boxed() == *a,
			(TypeDescriptor::Scalar(k), TypeDescriptor::Scalar(a)) => k == a,
			(TypeDescriptor::Array(e), TypeDescriptor::Array(a)) => match (&**e, &**a) {
				(TypeDescriptor::Scalar(ek), TypeDescriptor::Scalar(ak)) => ek == ak,
				(TypeDescriptor::Scalar(_), _) | (_, TypeDescriptor::Scalar(_)) => false,
				(e, a) => self.is_assignable(e, a),
			},
			_ => false,
		}
	}

	/// Human-readable name for diagnostics, e.g. `int[]`.
	pub fn describe(&self, ty: &TypeDescriptor) -> String {
		match ty {
			TypeDescriptor::Named(id) => match self.name(*id) {
				Some(name) => name.to_string(),
				None => format!("#{}", id.as_u32()),
			},
			TypeDescriptor::Scalar(kind) => kind.name().to_string(),
			TypeDescriptor::Array(component) => format!("{}[]", self.describe(component)),
		}
	}

	/// Returns true when `ty` is a numeric scalar or a boxed numeric type.
	pub fn is_numeric(&self, ty: &TypeDescriptor) -> bool {
		match ty {
			TypeDescriptor::Named(id) => *id != TypeId::NUMBER && self.is_subtype(*id, TypeId::NUMBER),
			TypeDescriptor::Scalar(kind) => kind.is_numeric(),
			TypeDescriptor::Array(_) => false,
		}
	}

	/// Primitive unboxed from a named boxed type, or the scalar itself.
	pub fn scalar_kind(ty: &TypeDescriptor) -> Option<ScalarKind> {
		match ty {
			TypeDescriptor::Named(id) => ScalarKind::unboxed(*id),
			TypeDescriptor::Scalar(kind) => Some(*kind),
			TypeDescriptor::Array(_) => None,
		}
	}
}

static ROOT: TypeId = TypeId::OBJECT;
static ARRAY_CAPABILITIES: [TypeId; 2] = [TypeId::ARRAY, TypeId::OBJECT];
