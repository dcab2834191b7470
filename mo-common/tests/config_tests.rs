//! Integration tests for config file resolution and graceful degradation
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate MO_SEARCH_CONFIG are marked with #[serial].

use mo_common::config::{load_config, ConfigResolver, ConfigSource, TomlConfig, CONFIG_ENV_VAR};
use mo_common::Error;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_compiled_defaults() {
    env::remove_var(CONFIG_ENV_VAR);

    let resolver = ConfigResolver::new().with_platform_file(None);
    assert_eq!(resolver.resolve(None), ConfigSource::CompiledDefaults);

    let config = resolver.load(None).unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
#[serial]
fn test_cli_argument_beats_environment() {
    let dir = TempDir::new().unwrap();
    let cli = write_config(&dir, "cli.toml", "[logging]\nlevel = \"debug\"\n");
    let from_env = write_config(&dir, "env.toml", "[logging]\nlevel = \"warn\"\n");
    env::set_var(CONFIG_ENV_VAR, &from_env);

    let resolver = ConfigResolver::new().with_platform_file(None);
    let config = resolver.load(Some(&cli)).unwrap();
    assert_eq!(config.logging.level, "debug");

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_environment_beats_platform_file() {
    let dir = TempDir::new().unwrap();
    let platform = write_config(&dir, "search.toml", "[inat]\nmax_id_list_length = 10\n");
    let from_env = write_config(&dir, "env.toml", "[inat]\nmax_id_list_length = 20\n");
    env::set_var(CONFIG_ENV_VAR, &from_env);

    let resolver = ConfigResolver::new().with_platform_file(Some(platform));
    assert_eq!(
        resolver.resolve(None),
        ConfigSource::Environment(from_env.clone())
    );
    assert_eq!(resolver.load(None).unwrap().inat.max_id_list_length, 20);

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_platform_file_used_when_present() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let platform = write_config(
        &dir,
        "search.toml",
        "[search]\ndeprecation_notices = false\n\n[inat]\nsite = \"https://inat.example.org\"\n",
    );

    let config = ConfigResolver::new()
        .with_platform_file(Some(platform))
        .load(None)
        .unwrap();
    assert!(!config.search.deprecation_notices);
    assert_eq!(config.inat.site, "https://inat.example.org");
    assert_eq!(config.inat.max_id_list_length, 255);
}

#[test]
#[serial]
fn test_missing_platform_file_falls_back_to_defaults() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist.toml");

    let resolver = ConfigResolver::new().with_platform_file(Some(missing));
    assert_eq!(resolver.resolve(None), ConfigSource::CompiledDefaults);
    assert_eq!(resolver.load(None).unwrap(), TomlConfig::default());
}

#[test]
fn test_broken_platform_file_warns_and_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let broken = write_config(&dir, "search.toml", "[search\n");

    let config = load_config(&ConfigSource::PlatformFile(broken)).unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_explicit_missing_file_is_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");

    let err = load_config(&ConfigSource::CommandLine(missing)).unwrap_err();
    match err {
        Error::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected an I/O error, got {:?}", other),
    }
}

#[test]
fn test_explicit_broken_file_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let broken = write_config(&dir, "bad.toml", "[inat]\nmax_id_list_length = \"lots\"\n");

    let err = load_config(&ConfigSource::Environment(broken)).unwrap_err();
    assert!(matches!(err, Error::ConfigParse(_)));
}
