//! Converter registration, indexing and dispatch.
//!
//! # Role
//!
//! [`ConverterRegistryBuilder`] collects `(type, converter)` registrations
//! during wiring. [`ConverterRegistry`] publishes an immutable
//! [`ConverterIndex`] snapshot through `ArcSwap`; lookups never lock, and
//! late registrations replace the snapshot with a compare-and-swap loop.
//!
//! # Invariants
//!
//! - Registering the same converter instance twice under one type is a no-op.
//!   - Enforced in: [`ConverterIndex::contains`].
//!   - Tested by: `tests::test_register_is_idempotent`.
//! - Equal confidences are probed in registration order.
//!   - Enforced in: [`ConverterIndex::ranked`] (stable sort over ordinals).
//!   - Tested by: `tests::test_equal_confidence_prefers_first_registered`.
//! - Candidate sets are computed once per distinct runtime type and cached
//!   on the snapshot.

use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use scriptenv_value::{TypeCatalog, TypeDescriptor, TypeId, Value};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::converters;
use crate::{Confidence, ConvertError, Delegate, Direction, ValueConverter};

/// Immutable converter index over one type catalog.
pub struct ConverterIndex {
	types: Arc<TypeCatalog>,
	/// Unique converter instances, in first-registration order.
	converters: Vec<Arc<dyn ValueConverter>>,
	/// Indices into `converters`, per registered type.
	by_type: FxHashMap<TypeId, SmallVec<[usize; 2]>>,
	candidates: RwLock<FxHashMap<TypeDescriptor, Arc<[usize]>>>,
}

impl ConverterIndex {
	fn empty(types: Arc<TypeCatalog>) -> Self {
		Self {
			types,
			converters: Vec::new(),
			by_type: FxHashMap::default(),
			candidates: RwLock::new(FxHashMap::default()),
		}
	}

	pub fn types(&self) -> &TypeCatalog {
		&self.types
	}

	/// Number of distinct converter instances.
	pub fn len(&self) -> usize {
		self.converters.len()
	}

	pub fn is_empty(&self) -> bool {
		self.converters.is_empty()
	}

	fn ordinal_of(&self, converter: &Arc<dyn ValueConverter>) -> Option<usize> {
		self.converters.iter().position(|c| Arc::ptr_eq(c, converter))
	}

	/// Returns true when `converter` is already registered under `ty`.
	pub fn contains(&self, ty: TypeId, converter: &Arc<dyn ValueConverter>) -> bool {
		let Some(ordinal) = self.ordinal_of(converter) else {
			return false;
		};
		self.by_type.get(&ty).is_some_and(|slots| slots.contains(&ordinal))
	}

	fn insert(&mut self, ty: TypeId, converter: Arc<dyn ValueConverter>) -> bool {
		if self.contains(ty, &converter) {
			return false;
		}
		let ordinal = match self.ordinal_of(&converter) {
			Some(ordinal) => ordinal,
			None => {
				self.converters.push(converter);
				self.converters.len() - 1
			}
		};
		self.by_type.entry(ty).or_default().push(ordinal);
		self.candidates.get_mut().clear();
		true
	}

	fn with_registration(&self, ty: TypeId, converter: Arc<dyn ValueConverter>) -> Self {
		let mut next = Self {
			types: self.types.clone(),
			converters: self.converters.clone(),
			by_type: self.by_type.clone(),
			candidates: RwLock::new(FxHashMap::default()),
		};
		next.insert(ty, converter);
		next
	}

	/// Converters registered under any type in the capability set of `runtime`,
	/// in registration order.
	fn candidates(&self, runtime: &TypeDescriptor) -> Arc<[usize]> {
		if let Some(cached) = self.candidates.read().get(runtime) {
			return cached.clone();
		}

		let mut union: Vec<usize> = self
			.types
			.capabilities(runtime)
			.iter()
			.filter_map(|ty| self.by_type.get(ty))
			.flatten()
			.copied()
			.collect();
		union.sort_unstable();
		union.dedup();

		let union: Arc<[usize]> = union.into();
		self.candidates.write().insert(runtime.clone(), union.clone());
		union
	}

	/// Candidates sorted by descending confidence; ties keep registration order.
	fn ranked(&self, direction: Direction, runtime: &TypeDescriptor, expected: &TypeDescriptor) -> SmallVec<[(Confidence, usize); 8]> {
		let mut ranked: SmallVec<[(Confidence, usize); 8]> = self
			.candidates(runtime)
			.iter()
			.map(|&ordinal| (self.converters[ordinal].confidence(direction, runtime, expected, &self.types), ordinal))
			.collect();
		ranked.sort_by(|a, b| b.0.cmp(&a.0));
		ranked
	}

	fn best_fitting(
		&self,
		direction: Direction,
		value: &Value,
		runtime: &TypeDescriptor,
		expected: &TypeDescriptor,
	) -> Option<&Arc<dyn ValueConverter>> {
		let delegate = Delegate::new(self, direction);
		self.ranked(direction, runtime, expected).into_iter().find_map(|(confidence, ordinal)| {
			let converter = &self.converters[ordinal];
			let accepted = converter.can_convert(value, expected, &delegate);
			trace!(converter = converter.name(), %confidence, accepted, %direction, "probed converter");
			accepted.then_some(converter)
		})
	}

	/// Returns true when `value` converts to `expected`, either through a
	/// converter or because it already satisfies it. Null always converts.
	pub fn can_convert(&self, direction: Direction, value: &Value, expected: &TypeDescriptor) -> bool {
		let Some(runtime) = value.runtime_type() else {
			return true;
		};
		self.best_fitting(direction, value, &runtime, expected).is_some() || self.types.is_assignable(expected, &runtime)
	}

	/// Converts `value` to `expected`.
	///
	/// Null converts to null. When no converter accepts the value it is
	/// returned unchanged if already assignable, else
	/// [`ConvertError::Unsupported`] is returned.
	pub fn convert(&self, direction: Direction, value: Value, expected: &TypeDescriptor) -> Result<Value, ConvertError> {
		let Some(runtime) = value.runtime_type() else {
			return Ok(value);
		};

		if let Some(converter) = self.best_fitting(direction, &value, &runtime, expected) {
			debug!(
				converter = converter.name(),
				%direction,
				value_type = %self.types.describe(&runtime),
				expected = %self.types.describe(expected),
				"selected converter"
			);
			return converter.convert(value, expected, &Delegate::new(self, direction));
		}

		if self.types.is_assignable(expected, &runtime) {
			debug!(%direction, value_type = %self.types.describe(&runtime), "no converter, value already assignable");
			return Ok(value);
		}

		Err(ConvertError::Unsupported {
			value_type: self.types.describe(&runtime),
			expected: self.types.describe(expected),
		})
	}
}

/// Collects converter registrations before publication.
pub struct ConverterRegistryBuilder {
	index: ConverterIndex,
}

impl Default for ConverterRegistryBuilder {
	fn default() -> Self {
		Self::new(Arc::new(TypeCatalog::builtin()))
	}
}

impl ConverterRegistryBuilder {
	pub fn new(types: Arc<TypeCatalog>) -> Self {
		Self {
			index: ConverterIndex::empty(types),
		}
	}

	/// Registers `converter` for values whose capability set contains `ty`.
	///
	/// Returns false if this exact instance was already registered under `ty`.
	pub fn register(&mut self, ty: TypeId, converter: Arc<dyn ValueConverter>) -> bool {
		self.index.insert(ty, converter)
	}

	/// Registers one converter instance under several types.
	pub fn register_all(&mut self, types: &[TypeId], converter: Arc<dyn ValueConverter>) -> &mut Self {
		for &ty in types {
			self.register(ty, converter.clone());
		}
		self
	}

	/// Registers the standard structural and leaf converters.
	pub fn with_standard_converters(mut self) -> Self {
		converters::register_standard(&mut self);
		self
	}

	pub fn build(self) -> ConverterRegistry {
		debug!(converters = self.index.len(), "publishing converter registry");
		ConverterRegistry {
			snap: ArcSwap::from_pointee(self.index),
		}
	}
}

/// Published converter registry: lock-free reads over an `ArcSwap` snapshot.
pub struct ConverterRegistry {
	snap: ArcSwap<ConverterIndex>,
}

impl ConverterRegistry {
	/// Builtin catalog with the standard converters.
	pub fn standard() -> Self {
		ConverterRegistryBuilder::default().with_standard_converters().build()
	}

	/// Current snapshot.
	pub fn snapshot(&self) -> Arc<ConverterIndex> {
		self.snap.load_full()
	}

	/// Registers a converter after publication.
	///
	/// Readers holding the previous snapshot keep using it.
	pub fn register(&self, ty: TypeId, converter: Arc<dyn ValueConverter>) -> bool {
		loop {
			let cur = self.snap.load_full();
			if cur.contains(ty, &converter) {
				return false;
			}

			let next = Arc::new(cur.with_registration(ty, converter.clone()));
			let prev = self.snap.compare_and_swap(&cur, next);
			if Arc::ptr_eq(&prev, &cur) {
				debug!(converter = converter.name(), ty = ty.as_u32(), "registered converter");
				return true;
			}
		}
	}

	pub fn can_convert_for_script(&self, value: &Value, expected: &TypeDescriptor) -> bool {
		self.snap.load().can_convert(Direction::ForScript, value, expected)
	}

	pub fn can_convert_for_host(&self, value: &Value, expected: &TypeDescriptor) -> bool {
		self.snap.load().can_convert(Direction::ForHost, value, expected)
	}

	pub fn convert_for_script(&self, value: Value, expected: &TypeDescriptor) -> Result<Value, ConvertError> {
		self.snap.load().convert(Direction::ForScript, value, expected)
	}

	pub fn convert_for_host(&self, value: Value, expected: &TypeDescriptor) -> Result<Value, ConvertError> {
		self.snap.load().convert(Direction::ForHost, value, expected)
	}

	/// [`can_convert_for_script`](Self::can_convert_for_script) with the root type expected.
	pub fn can_convert_any_for_script(&self, value: &Value) -> bool {
		self.can_convert_for_script(value, &TypeDescriptor::OBJECT)
	}

	pub fn can_convert_any_for_host(&self, value: &Value) -> bool {
		self.can_convert_for_host(value, &TypeDescriptor::OBJECT)
	}

	/// [`convert_for_script`](Self::convert_for_script) with the root type expected.
	pub fn convert_any_for_script(&self, value: Value) -> Result<Value, ConvertError> {
		self.convert_for_script(value, &TypeDescriptor::OBJECT)
	}

	pub fn convert_any_for_host(&self, value: Value) -> Result<Value, ConvertError> {
		self.convert_for_host(value, &TypeDescriptor::OBJECT)
	}
}
