//! Named script variants with priority-ordered selection.
//!
//! # Role
//!
//! [`ScriptRegistry`] keeps every variant registered under a name, globally
//! or inside a named sub-registry, and selects the highest-priority variant
//! that satisfies an optional [`SelectionCondition`].
//!
//! # Invariants
//!
//! - Variants under a name are stored in descending priority; selection takes
//!   the first match.
//!   - Enforced in: `RegistrySnapshot::with_variant`.
//!   - Tested by: `tests::test_registry_prefers_highest_priority`.
//! - Registering an equal variant twice is a no-op; distinct variants under
//!   one name coexist.
//!   - Tested by: `tests::test_registry_keeps_variants_side_by_side`.
//! - Lookups never lock. Registration publishes a new snapshot with a
//!   compare-and-swap loop.

use std::sync::Arc;

use arc_swap::ArcSwap;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{RegistryError, ScriptVariant, SelectionCondition};

type Variants<S> = Arc<[Arc<ScriptVariant<S>>]>;

struct RegistrySnapshot<S> {
	global: FxHashMap<Arc<str>, Variants<S>>,
	/// Sub-registry name to script name to variants.
	scoped: FxHashMap<Arc<str>, FxHashMap<Arc<str>, Variants<S>>>,
}

impl<S> Default for RegistrySnapshot<S> {
	fn default() -> Self {
		Self {
			global: FxHashMap::default(),
			scoped: FxHashMap::default(),
		}
	}
}

// Not derived: cloning the maps clones `Arc`s, never `S`.
impl<S> Clone for RegistrySnapshot<S> {
	fn clone(&self) -> Self {
		Self {
			global: self.global.clone(),
			scoped: self.scoped.clone(),
		}
	}
}

impl<S: Ord> RegistrySnapshot<S> {
	fn variants(&self, name: &str, sub_registry: Option<&str>) -> Option<&Variants<S>> {
		match sub_registry {
			None => self.global.get(name),
			Some(sub) => self.scoped.get(sub)?.get(name),
		}
	}

	fn contains(&self, name: &str, sub_registry: Option<&str>, variant: &ScriptVariant<S>) -> bool {
		self.variants(name, sub_registry)
			.is_some_and(|variants| variants.iter().any(|v| **v == *variant))
	}

	fn with_variant(&self, name: &str, sub_registry: Option<&str>, variant: Arc<ScriptVariant<S>>) -> Self {
		let mut next = self.clone();
		let slot = match sub_registry {
			None => &mut next.global,
			Some(sub) => next.scoped.entry(Arc::from(sub)).or_default(),
		};

		let mut variants: Vec<_> = slot.get(name).map(|v| v.to_vec()).unwrap_or_default();
		variants.push(variant);
		variants.sort_by(|a, b| b.priority_cmp(a));
		slot.insert(Arc::from(name), variants.into());
		next
	}
}

/// Registry of script variants.
pub struct ScriptRegistry<S> {
	snap: ArcSwap<RegistrySnapshot<S>>,
}

impl<S> Default for ScriptRegistry<S> {
	fn default() -> Self {
		Self {
			snap: ArcSwap::from_pointee(RegistrySnapshot::default()),
		}
	}
}

impl<S: Ord> ScriptRegistry<S> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `variant` under the global `name`.
	///
	/// Returns `Ok(false)` when an equal variant is already registered.
	pub fn register_script(&self, name: &str, variant: ScriptVariant<S>) -> Result<bool, RegistryError> {
		self.register(name, None, variant)
	}

	/// Registers `variant` under `name` in `sub_registry`.
	pub fn register_script_in(
		&self,
		name: &str,
		sub_registry: &str,
		variant: ScriptVariant<S>,
	) -> Result<bool, RegistryError> {
		if sub_registry.is_empty() {
			return Err(RegistryError::EmptySubRegistry);
		}
		self.register(name, Some(sub_registry), variant)
	}

	fn register(&self, name: &str, sub_registry: Option<&str>, variant: ScriptVariant<S>) -> Result<bool, RegistryError> {
		if name.is_empty() {
			return Err(RegistryError::EmptyName);
		}

		let variant = Arc::new(variant);
		loop {
			let cur = self.snap.load_full();
			if cur.contains(name, sub_registry, &variant) {
				return Ok(false);
			}

			let next = Arc::new(cur.with_variant(name, sub_registry, variant.clone()));
			let prev = self.snap.compare_and_swap(&cur, next);
			if Arc::ptr_eq(&prev, &cur) {
				debug!(
					name,
					sub_registry,
					version = %variant.version(),
					edition = ?variant.edition(),
					"registered script variant"
				);
				return Ok(true);
			}
		}
	}

	/// Highest-priority global variant of `name`.
	pub fn get_script(&self, name: &str) -> Option<Arc<ScriptVariant<S>>> {
		self.find(name, None, None)
	}

	/// Highest-priority variant of `name` in `sub_registry`.
	pub fn get_script_in(&self, name: &str, sub_registry: &str) -> Option<Arc<ScriptVariant<S>>> {
		self.find(name, Some(sub_registry), None)
	}

	/// Highest-priority global variant of `name` matching `condition`.
	pub fn get_script_matching(&self, name: &str, condition: &SelectionCondition) -> Option<Arc<ScriptVariant<S>>> {
		self.find(name, None, Some(condition))
	}

	pub fn get_script_in_matching(
		&self,
		name: &str,
		sub_registry: &str,
		condition: &SelectionCondition,
	) -> Option<Arc<ScriptVariant<S>>> {
		self.find(name, Some(sub_registry), Some(condition))
	}

	/// Highest-priority variant of `name`, optionally scoped and filtered.
	pub fn find(
		&self,
		name: &str,
		sub_registry: Option<&str>,
		condition: Option<&SelectionCondition>,
	) -> Option<Arc<ScriptVariant<S>>> {
		let snap = self.snap.load();
		let Some(variants) = snap.variants(name, sub_registry) else {
			debug!(name, sub_registry, "no script registered");
			return None;
		};

		debug!(name, sub_registry, candidates = variants.len(), condition = ?condition, "selecting script variant");
		let selected = variants
			.iter()
			.find(|variant| condition.is_none_or(|condition| condition.matches::<S>(variant)))
			.cloned();

		match &selected {
			Some(variant) => debug!(
				name,
				sub_registry,
				version = %variant.version(),
				edition = ?variant.edition(),
				"selected script variant"
			),
			None => debug!(name, sub_registry, "no script variant matches"),
		}
		selected
	}

	/// Every variant of `name`, highest priority first.
	pub fn variants(&self, name: &str, sub_registry: Option<&str>) -> Vec<Arc<ScriptVariant<S>>> {
		self.snap
			.load()
			.variants(name, sub_registry)
			.map(|variants| variants.to_vec())
			.unwrap_or_default()
	}

	/// Number of registered variants across all names.
	pub fn len(&self) -> usize {
		let snap = self.snap.load();
		let scoped: usize = snap.scoped.values().flat_map(|names| names.values()).map(|v| v.len()).sum();
		snap.global.values().map(|v| v.len()).sum::<usize>() + scoped
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
