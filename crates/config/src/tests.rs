use std::io::Write;
use std::time::Duration;

use rstest::rstest;

use super::*;

const MANIFEST: &str = r#"
[edition]
default = "enterprise"
refresh-interval-secs = 3600

[[scripts]]
name = "filters.lib"
sub-registry = "documentlibrary-v2"
script = "documentlibrary-v2/enterprise/filters.lib.js"
version = "4.2"
applies = "(4.0.1-4.2.4]"
edition = "enterprise"

[[scripts]]
script = "documentlibrary-v2/community/(4.0.1-/filters.lib.js"
"#;

#[test]
fn test_parse_manifest() {
	let config = Config::from_toml_str(MANIFEST).unwrap();
	assert_eq!(config.edition.default, EditionName::Enterprise);
	assert_eq!(config.edition.refresh_interval(), Duration::from_secs(3600));
	assert_eq!(config.edition.retry_interval(), Duration::from_secs(60));
	assert_eq!(config.scripts.len(), 2);

	let first = &config.scripts[0];
	assert_eq!(first.name.as_deref(), Some("filters.lib"));
	assert_eq!(first.sub_registry.as_deref(), Some("documentlibrary-v2"));
	assert_eq!(first.version, Some("4.2".parse().unwrap()));
	assert_eq!(first.edition, Some(EditionName::Enterprise));
	assert!(first.applies_range().unwrap().is_some());

	assert_eq!(config.scripts[1], ScriptEntry::new("documentlibrary-v2/community/(4.0.1-/filters.lib.js"));
}

#[test]
fn test_empty_config_uses_defaults() {
	let config = Config::from_toml_str("").unwrap();
	assert_eq!(config, Config::default());
	assert_eq!(config.edition.refresh_interval(), Duration::from_secs(86_400));
}

#[rstest]
#[case::general_default("[edition]\ndefault = \"general\"")]
#[case::zero_retry("[edition]\nretry-interval-secs = 0")]
#[case::empty_script("[[scripts]]\nscript = \" \"")]
#[case::empty_name("[[scripts]]\nscript = \"a.js\"\nname = \"\"")]
fn test_rejects_invalid_values(#[case] input: &str) {
	assert!(matches!(Config::from_toml_str(input), Err(ConfigError::Invalid(_))));
}

#[rstest]
#[case::bad_version("[[scripts]]\nscript = \"a.js\"\nversion = \"4.x\"")]
#[case::unknown_key("[[scripts]]\nscript = \"a.js\"\nflavour = \"x\"")]
#[case::unknown_edition("[[scripts]]\nscript = \"a.js\"\nedition = \"team\"")]
fn test_rejects_malformed_toml(#[case] input: &str) {
	assert!(matches!(Config::from_toml_str(input), Err(ConfigError::Toml(_))));
}

#[test]
fn test_rejects_bad_range() {
	let err = Config::from_toml_str("[[scripts]]\nscript = \"a.js\"\napplies = \"4.2\"").unwrap_err();
	assert!(matches!(err, ConfigError::InvalidRange { ref script, .. } if script == "a.js"));
}

#[test]
fn test_load_reports_path() {
	let dir = tempfile::tempdir().unwrap();
	let missing = dir.path().join("missing.toml");
	let err = Config::load(&missing).unwrap_err();
	assert!(matches!(err, ConfigError::Io { ref path, .. } if *path == missing));
}

#[test]
fn test_load_dir_merges_in_name_order() {
	let dir = tempfile::tempdir().unwrap();
	let write = |name: &str, body: &str| {
		let mut file = std::fs::File::create(dir.path().join(name)).unwrap();
		file.write_all(body.as_bytes()).unwrap();
	};
	write("b.toml", "[[scripts]]\nscript = \"b.js\"");
	write("a.toml", "[edition]\ndefault = \"enterprise\"\n[[scripts]]\nscript = \"a.js\"");
	write("broken.toml", "[[scripts]]\nname = 1");
	write("notes.txt", "ignored");

	let config = Config::load_dir(dir.path()).unwrap();
	let scripts: Vec<_> = config.scripts.iter().map(|s| s.script.as_str()).collect();
	assert_eq!(scripts, ["a.js", "b.js"]);
	assert_eq!(config.edition.default, EditionName::Enterprise);
}
