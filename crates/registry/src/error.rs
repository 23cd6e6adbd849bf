use scriptenv_config::ConfigError;
use scriptenv_version::{RangeError, VersionError};
use thiserror::Error;

/// Errors raised by script registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
	#[error("script name must not be empty")]
	EmptyName,
	#[error("sub-registry name must not be empty")]
	EmptySubRegistry,
}

/// Malformed resolution input. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
	#[error("too many occurrences of '@' in location {0:?}")]
	TooManySeparators(String),

	#[error("location {0:?} has an empty name or sub-registry")]
	EmptyLocationPart(String),

	#[error("invalid version in parameter {key:?}: {source}")]
	InvalidVersion {
		key: &'static str,
		#[source]
		source: VersionError,
	},

	#[error("invalid version range: {0}")]
	InvalidRange(#[from] RangeError),

	/// `conditions` held something other than a map or an array.
	#[error("condition object not supported: {0}")]
	UnsupportedConditions(String),

	/// A `conditions` array held something other than a map.
	#[error("condition collection element not supported: {0}")]
	UnsupportedConditionElement(String),
}

/// Errors raised while decoding a registration path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
	#[error("path {0:?} does not end in a .js script file")]
	NotAScript(String),

	#[error("path {path:?} repeats the {fragment} fragment")]
	DuplicateFragment { path: String, fragment: &'static str },

	#[error("path {path:?} has unexpected directory {directory:?}")]
	UnexpectedDirectory { path: String, directory: String },

	#[error("path {path:?} has an invalid version directory: {source}")]
	InvalidVersion {
		path: String,
		#[source]
		source: VersionError,
	},
}

/// Errors raised while registering a configured manifest.
#[derive(Debug, Error)]
pub enum BootstrapError {
	#[error(transparent)]
	Layout(#[from] LayoutError),

	#[error(transparent)]
	Config(#[from] ConfigError),

	#[error(transparent)]
	Registry(#[from] RegistryError),

	#[error("failed to load script {script:?}: {source}")]
	Load {
		script: String,
		#[source]
		source: Box<dyn std::error::Error + Send + Sync>,
	},
}
