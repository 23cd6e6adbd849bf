use std::sync::Arc;

use tracing::info;

use crate::params::{Parameters, extract_condition};
use crate::{EditionAuthority, ResolveError, ScriptLocation, ScriptRegistry, ScriptVariant};

/// Resolves location strings against a [`ScriptRegistry`].
pub struct RegisteredScriptLocator<S> {
	registry: Arc<ScriptRegistry<S>>,
	edition: Arc<dyn EditionAuthority>,
}

impl<S> Clone for RegisteredScriptLocator<S> {
	fn clone(&self) -> Self {
		Self {
			registry: self.registry.clone(),
			edition: self.edition.clone(),
		}
	}
}

impl<S: Ord> RegisteredScriptLocator<S> {
	pub fn new(registry: Arc<ScriptRegistry<S>>, edition: Arc<dyn EditionAuthority>) -> Self {
		Self { registry, edition }
	}

	pub fn registry(&self) -> &ScriptRegistry<S> {
		&self.registry
	}

	/// Highest-priority variant at `location`, ignoring conditions.
	pub fn resolve(&self, location: &str) -> Result<Option<Arc<ScriptVariant<S>>>, ResolveError> {
		self.resolve_with(location, None)
	}

	/// Highest-priority variant at `location` matching the condition built
	/// from `params`.
	///
	/// Parameters that describe no condition fall back to [`Self::resolve`].
	pub fn resolve_with(
		&self,
		location: &str,
		params: Option<&Parameters>,
	) -> Result<Option<Arc<ScriptVariant<S>>>, ResolveError> {
		let parsed = ScriptLocation::parse(location)?;
		let condition = match params {
			Some(params) => {
				let condition = extract_condition(params, self.edition.as_ref())?;
				if condition.is_none() {
					info!(location, ?params, "no selection condition in resolution parameters, resolving unconditionally");
				}
				condition
			}
			None => None,
		};
		Ok(self.registry.find(parsed.name, parsed.sub_registry, condition.as_ref()))
	}
}
