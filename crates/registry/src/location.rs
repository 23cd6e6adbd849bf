use std::fmt;

use crate::ResolveError;

/// Parsed `name` or `name@sub-registry` location string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScriptLocation<'a> {
	pub name: &'a str,
	pub sub_registry: Option<&'a str>,
}

impl<'a> ScriptLocation<'a> {
	/// Splits `location` on its single optional `@`.
	///
	/// # Errors
	///
	/// [`ResolveError::TooManySeparators`] for more than one `@`, and
	/// [`ResolveError::EmptyLocationPart`] when either side is empty.
	pub fn parse(location: &'a str) -> Result<Self, ResolveError> {
		let mut parts = location.split('@');
		let name = parts.next().unwrap_or_default();
		let sub_registry = parts.next();
		if parts.next().is_some() {
			return Err(ResolveError::TooManySeparators(location.to_string()));
		}
		if name.is_empty() || sub_registry.is_some_and(str::is_empty) {
			return Err(ResolveError::EmptyLocationPart(location.to_string()));
		}
		Ok(Self { name, sub_registry })
	}
}

impl fmt::Display for ScriptLocation<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.sub_registry {
			Some(sub) => write!(f, "{}@{sub}", self.name),
			None => f.write_str(self.name),
		}
	}
}
