//! Startup registration from a configured script manifest.

use scriptenv_config::{Config, ScriptEntry};
use tracing::{debug, info};

use crate::layout::RegistrationPath;
use crate::{BootstrapError, Edition, ScriptRegistry};

/// Registers every `[[scripts]]` entry of `config` in `registry`.
///
/// Entry fields override what the script path encodes; see [`RegistrationPath`].
/// `loader` turns an entry into the host's script handle. Returns the number of
/// newly registered variants.
///
/// # Errors
///
/// Stops at the first entry whose path, range or loader fails.
pub fn register_manifest<S, E, F>(registry: &ScriptRegistry<S>, config: &Config, mut loader: F) -> Result<usize, BootstrapError>
where
	S: Ord,
	E: Into<Box<dyn std::error::Error + Send + Sync>>,
	F: FnMut(&ScriptEntry) -> Result<S, E>,
{
	let mut registered = 0;
	for entry in &config.scripts {
		let layout = entry_layout(entry)?;
		let script = loader(entry).map_err(|source| BootstrapError::Load {
			script: entry.script.clone(),
			source: source.into(),
		})?;

		let name = layout.name.clone();
		let sub_registry = layout.sub_registry.clone();
		let variant = layout.into_variant(script);
		let added = match sub_registry.as_deref() {
			Some(sub) => registry.register_script_in(&name, sub, variant)?,
			None => registry.register_script(&name, variant)?,
		};
		if added {
			registered += 1;
		} else {
			debug!(script = %entry.script, "duplicate manifest entry ignored");
		}
	}

	info!(registered, entries = config.scripts.len(), "registered script manifest");
	Ok(registered)
}

fn entry_layout(entry: &ScriptEntry) -> Result<RegistrationPath, BootstrapError> {
	let mut layout = match (RegistrationPath::parse(&entry.script), &entry.name) {
		(Ok(layout), _) => layout,
		(Err(error), Some(name)) => {
			debug!(script = %entry.script, %error, "script reference carries no layout");
			RegistrationPath {
				name: name.clone(),
				sub_registry: None,
				version: None,
				applies: None,
				edition: None,
			}
		}
		(Err(error), None) => return Err(error.into()),
	};

	if let Some(name) = &entry.name {
		layout.name.clone_from(name);
	}
	if let Some(sub) = &entry.sub_registry {
		layout.sub_registry = Some(sub.clone());
	}
	if let Some(version) = &entry.version {
		layout.version = Some(version.clone());
	}
	if let Some(applies) = entry.applies_range()? {
		layout.applies = Some(applies);
	}
	if let Some(edition) = entry.edition {
		layout.edition = Edition::from_name(edition);
	}
	Ok(layout)
}
