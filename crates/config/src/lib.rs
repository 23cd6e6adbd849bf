//! Configuration for the script environment.
//!
//! Configuration is written in TOML and has two sections:
//!
//! - **`[edition]`**: the fallback edition and the timing of the cached
//!   edition lookup.
//! - **`[[scripts]]`**: a manifest of script variants to register at startup.
//!
//! ```toml
//! [edition]
//! default = "community"
//! refresh-interval-secs = 86400
//! retry-interval-secs = 60
//!
//! [[scripts]]
//! name = "filters.lib"
//! sub-registry = "documentlibrary-v2"
//! script = "documentlibrary-v2/enterprise/filters.lib.js"
//! version = "4.2"
//! applies = "(4.0.1-4.2.4]"
//! edition = "enterprise"
//! ```
//!
//! Manifest entries may omit every field but `script`; the registration
//! layout encoded in the script path fills in the rest.

pub mod error;

use std::path::Path;
use std::time::Duration;

pub use error::{ConfigError, Result};
use scriptenv_version::{VersionNumber, VersionRange};
use serde::{Deserialize, Serialize};

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// Edition authority settings.
	pub edition: EditionSettings,
	/// Script manifest, in registration order.
	pub scripts: Vec<ScriptEntry>,
}

/// Edition tag as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditionName {
	Community,
	Enterprise,
	/// Edition-agnostic; valid on manifest entries only.
	General,
}

/// Timing and fallback of the edition lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct EditionSettings {
	/// Edition assumed until the first successful lookup.
	pub default: EditionName,
	/// Lifetime of a successful lookup.
	pub refresh_interval_secs: u64,
	/// Lifetime of a failed lookup before retrying.
	pub retry_interval_secs: u64,
}

impl Default for EditionSettings {
	fn default() -> Self {
		Self {
			default: EditionName::Community,
			refresh_interval_secs: 24 * 60 * 60,
			retry_interval_secs: 60,
		}
	}
}

impl EditionSettings {
	pub fn refresh_interval(&self) -> Duration {
		Duration::from_secs(self.refresh_interval_secs)
	}

	pub fn retry_interval(&self) -> Duration {
		Duration::from_secs(self.retry_interval_secs)
	}
}

/// One script variant in the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ScriptEntry {
	/// Registry name; derived from the script path when absent.
	#[serde(default)]
	pub name: Option<String>,
	/// Sub-registry to register under.
	#[serde(default)]
	pub sub_registry: Option<String>,
	/// Script reference handed to the loader.
	pub script: String,
	#[serde(default)]
	pub version: Option<VersionNumber>,
	/// Applicability range fragment, e.g. `(4.0.1-4.2.4]`.
	#[serde(default)]
	pub applies: Option<String>,
	#[serde(default)]
	pub edition: Option<EditionName>,
}

impl ScriptEntry {
	/// Entry for `script` with every other field left to the path layout.
	pub fn new(script: impl Into<String>) -> Self {
		Self {
			name: None,
			sub_registry: None,
			script: script.into(),
			version: None,
			applies: None,
			edition: None,
		}
	}

	/// Parses the `applies` fragment.
	pub fn applies_range(&self) -> Result<Option<VersionRange>> {
		self.applies
			.as_deref()
			.map(VersionRange::parse_fragment)
			.transpose()
			.map_err(|source| ConfigError::InvalidRange {
				script: self.script.clone(),
				source,
			})
	}
}

impl Config {
	/// Parse and validate a TOML string.
	pub fn from_toml_str(input: &str) -> Result<Self> {
		let config: Config = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Load configuration from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		Self::from_toml_str(&content)
	}

	/// Load and merge every `*.toml` file in `dir`, in file name order.
	///
	/// Files that fail to load are skipped with a warning.
	pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
		let dir = dir.as_ref();
		let entries = std::fs::read_dir(dir).map_err(|e| ConfigError::Io {
			path: dir.to_path_buf(),
			error: e,
		})?;

		let mut paths: Vec<_> = entries
			.flatten()
			.map(|entry| entry.path())
			.filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
			.collect();
		paths.sort();

		let mut config = Config::default();
		for path in paths {
			match Self::load(&path) {
				Ok(other) => config.merge(other),
				Err(error) => tracing::warn!(path = %path.display(), %error, "skipping configuration file"),
			}
		}
		Ok(config)
	}

	/// Merge another config into this one.
	///
	/// Edition settings from `other` replace these when they differ from the
	/// defaults; script entries are appended.
	pub fn merge(&mut self, other: Config) {
		if other.edition != EditionSettings::default() {
			self.edition = other.edition;
		}
		self.scripts.extend(other.scripts);
	}

	fn validate(&self) -> Result<()> {
		if self.edition.default == EditionName::General {
			return Err(ConfigError::Invalid("edition.default must be community or enterprise".into()));
		}
		if self.edition.refresh_interval_secs == 0 || self.edition.retry_interval_secs == 0 {
			return Err(ConfigError::Invalid("edition intervals must be positive".into()));
		}
		for entry in &self.scripts {
			if entry.script.trim().is_empty() {
				return Err(ConfigError::Invalid("script entries need a non-empty script reference".into()));
			}
			if entry.name.as_deref().is_some_and(str::is_empty) {
				return Err(ConfigError::Invalid(format!("script {:?} has an empty name", entry.script)));
			}
			entry.applies_range()?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests;
