//! Error types for configuration parsing.

use std::path::PathBuf;

use scriptenv_version::RangeError;
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A manifest entry's `applies` fragment is malformed.
	#[error("invalid applies range for script {script:?}: {source}")]
	InvalidRange {
		/// The entry's script reference.
		script: String,
		#[source]
		source: RangeError,
	},

	/// A value is well-formed TOML but not acceptable.
	#[error("invalid configuration: {0}")]
	Invalid(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
