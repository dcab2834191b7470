//! Configuration loading and config file resolution
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`MO_SEARCH_CONFIG`)
//! 3. Platform config file (`<config dir>/mushroom-observer/search.toml`)
//! 4. Compiled defaults (fallback)
//!
//! A file named on the command line or in the environment must exist and
//! parse. The platform file is optional: if it is missing or broken we log a
//! warning and continue with compiled defaults.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "MO_SEARCH_CONFIG";

/// Canonical iNaturalist site, used to build observation URLs
pub const DEFAULT_INAT_SITE: &str = "https://www.inaturalist.org";

/// Longest accepted iNat id list (characters)
pub const DEFAULT_MAX_ID_LIST_LENGTH: usize = 255;

/// Top-level configuration file
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct TomlConfig {
    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Search form assembly settings (optional)
    #[serde(default)]
    pub search: SearchConfig,

    /// iNaturalist import settings (optional)
    #[serde(default)]
    pub inat: InatConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Search form settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Log a warning whenever a deprecated search parameter is used
    #[serde(default = "default_true")]
    pub deprecation_notices: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            deprecation_notices: true,
        }
    }
}

/// iNaturalist import settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct InatConfig {
    /// Base URL of the iNaturalist site (no trailing slash)
    #[serde(default = "default_inat_site")]
    pub site: String,

    /// Maximum length of the submitted id list, in characters
    #[serde(default = "default_max_id_list_length")]
    pub max_id_list_length: usize,
}

impl Default for InatConfig {
    fn default() -> Self {
        Self {
            site: default_inat_site(),
            max_id_list_length: default_max_id_list_length(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_inat_site() -> String {
    DEFAULT_INAT_SITE.to_string()
}

fn default_max_id_list_length() -> usize {
    DEFAULT_MAX_ID_LIST_LENGTH
}

/// Where the effective configuration comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    CommandLine(PathBuf),
    Environment(PathBuf),
    PlatformFile(PathBuf),
    CompiledDefaults,
}

/// Resolves the config file location following the priority order above
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    env_var_name: String,
    platform_file: Option<PathBuf>,
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigResolver {
    pub fn new() -> Self {
        Self {
            env_var_name: CONFIG_ENV_VAR.to_string(),
            platform_file: platform_config_path(),
        }
    }

    /// Override the platform config file location (tests, packaging)
    pub fn with_platform_file(mut self, path: Option<PathBuf>) -> Self {
        self.platform_file = path;
        self
    }

    /// Override the environment variable consulted in step 2
    pub fn with_env_var(mut self, name: &str) -> Self {
        self.env_var_name = name.to_string();
        self
    }

    pub fn resolve(&self, cli_arg: Option<&Path>) -> ConfigSource {
        // Priority 1: Command-line argument
        if let Some(path) = cli_arg {
            return ConfigSource::CommandLine(path.to_path_buf());
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(&self.env_var_name) {
            if !path.trim().is_empty() {
                return ConfigSource::Environment(PathBuf::from(path));
            }
        }

        // Priority 3: Platform config file, only if it exists
        if let Some(path) = &self.platform_file {
            if path.exists() {
                return ConfigSource::PlatformFile(path.clone());
            }
        }

        // Priority 4: Compiled defaults
        ConfigSource::CompiledDefaults
    }

    /// Resolve and load in one step
    pub fn load(&self, cli_arg: Option<&Path>) -> Result<TomlConfig> {
        load_config(&self.resolve(cli_arg))
    }
}

impl TomlConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reject values that parse but cannot be used
    pub fn validate(&self) -> Result<()> {
        if self.inat.site.trim().is_empty() {
            return Err(Error::Config("inat.site must not be empty".to_string()));
        }
        if self.inat.max_id_list_length == 0 {
            return Err(Error::Config(
                "inat.max_id_list_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load the configuration described by `source`
pub fn load_config(source: &ConfigSource) -> Result<TomlConfig> {
    match source {
        ConfigSource::CommandLine(path) | ConfigSource::Environment(path) => {
            let config = TomlConfig::from_file(path)?;
            info!("Configuration loaded from {}", path.display());
            Ok(config)
        }
        ConfigSource::PlatformFile(path) => match TomlConfig::from_file(path) {
            Ok(config) => {
                info!("Configuration loaded from {}", path.display());
                Ok(config)
            }
            Err(e) => {
                warn!("{}; using compiled defaults", e);
                Ok(TomlConfig::default())
            }
        },
        ConfigSource::CompiledDefaults => {
            info!("No configuration file found, using compiled defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Platform config file path (`~/.config/mushroom-observer/search.toml` on Linux)
pub fn platform_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mushroom-observer").join("search.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config, TomlConfig::default());
        assert_eq!(config.logging.level, "info");
        assert!(config.search.deprecation_notices);
        assert_eq!(config.inat.site, DEFAULT_INAT_SITE);
        assert_eq!(config.inat.max_id_list_length, 255);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = TomlConfig::from_toml_str(
            r#"
            [inat]
            max_id_list_length = 100
            "#,
        )
        .unwrap();
        assert_eq!(config.inat.max_id_list_length, 100);
        assert_eq!(config.inat.site, DEFAULT_INAT_SITE);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = TomlConfig::from_toml_str("[inat\nsite = ").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_unusable_values_are_config_errors() {
        let err = TomlConfig::from_toml_str("[inat]\nmax_id_list_length = 0\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = TomlConfig::from_toml_str("[inat]\nsite = \"  \"\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_compiled_defaults_source() {
        let config = load_config(&ConfigSource::CompiledDefaults).unwrap();
        assert_eq!(config, TomlConfig::default());
    }
}
