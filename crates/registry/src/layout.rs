//! Registration metadata encoded in a script's path.
//!
//! A script path is a sequence of directories followed by `<name>.js`. Each
//! directory is one of:
//!
//! - an edition: `community`, `enterprise` or `general` (edition-agnostic);
//! - a version: `4.2`, the script's own version;
//! - a range: `(4.0.1-4.2.4]`, the host versions the script applies to (see
//!   [`VersionRange::parse_fragment`]);
//! - anything else, once: the sub-registry.
//!
//! A path carries a version or a range, not both. Each kind appears at most
//! once, in any order:
//!
//! ```text
//! documentlibrary-v2/enterprise/(4.0.1-/filters.lib.js
//! ```

use scriptenv_version::{VersionNumber, VersionRange};

use crate::{Edition, LayoutError, ScriptVariant};

const SCRIPT_SUFFIX: &str = ".js";

/// Decoded registration path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistrationPath {
	pub name: String,
	pub sub_registry: Option<String>,
	pub version: Option<VersionNumber>,
	pub applies: Option<VersionRange>,
	pub edition: Option<Edition>,
}

enum Fragment {
	Edition(Option<Edition>),
	Version(VersionNumber),
	Range(VersionRange),
	Other,
}

impl RegistrationPath {
	pub fn parse(path: &str) -> Result<Self, LayoutError> {
		let path = path.trim_matches('/');
		let (dirs, file) = match path.rsplit_once('/') {
			Some((dirs, file)) => (Some(dirs), file),
			None => (None, path),
		};
		let name = file
			.strip_suffix(SCRIPT_SUFFIX)
			.filter(|name| !name.is_empty())
			.ok_or_else(|| LayoutError::NotAScript(path.to_string()))?;

		let mut decoded = Self {
			name: name.to_string(),
			sub_registry: None,
			version: None,
			applies: None,
			edition: None,
		};
		let mut edition_seen = false;

		for dir in dirs.into_iter().flat_map(|dirs| dirs.split('/')).filter(|dir| !dir.is_empty()) {
			let duplicate = |fragment| LayoutError::DuplicateFragment {
				path: path.to_string(),
				fragment,
			};
			match classify(dir).map_err(|source| LayoutError::InvalidVersion {
				path: path.to_string(),
				source,
			})? {
				Fragment::Edition(_) if edition_seen => return Err(duplicate("edition")),
				Fragment::Edition(edition) => {
					edition_seen = true;
					decoded.edition = edition;
				}
				Fragment::Version(_) | Fragment::Range(_) if decoded.version.is_some() || decoded.applies.is_some() => {
					return Err(duplicate("version or range"));
				}
				Fragment::Version(version) => decoded.version = Some(version),
				Fragment::Range(range) => decoded.applies = Some(range),
				Fragment::Other if decoded.sub_registry.is_none() => decoded.sub_registry = Some(dir.to_string()),
				Fragment::Other => {
					return Err(LayoutError::UnexpectedDirectory {
						path: path.to_string(),
						directory: dir.to_string(),
					});
				}
			}
		}
		Ok(decoded)
	}

	/// Wraps `script` as a variant carrying this path's metadata.
	///
	/// Without a version directory the variant takes the range's lower bound,
	/// or `0`.
	pub fn into_variant<S>(self, script: S) -> ScriptVariant<S> {
		let applies = self.applies.unwrap_or_default();
		let version = self
			.version
			.or_else(|| applies.lower_version().cloned())
			.unwrap_or_default();
		ScriptVariant::new(script, version)
			.with_applies(applies)
			.with_edition(self.edition)
	}
}

fn classify(dir: &str) -> Result<Fragment, scriptenv_version::VersionError> {
	if dir.eq_ignore_ascii_case("community") {
		return Ok(Fragment::Edition(Some(Edition::Community)));
	}
	if dir.eq_ignore_ascii_case("enterprise") {
		return Ok(Fragment::Edition(Some(Edition::Enterprise)));
	}
	if dir.eq_ignore_ascii_case("general") {
		return Ok(Fragment::Edition(None));
	}
	if is_version_like(dir) {
		return VersionNumber::parse(dir).map(Fragment::Version);
	}
	if dir.contains('-')
		&& let Ok(range) = VersionRange::parse_fragment(dir)
	{
		return Ok(Fragment::Range(range));
	}
	Ok(Fragment::Other)
}

fn is_version_like(dir: &str) -> bool {
	dir.split('.')
		.all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
}
