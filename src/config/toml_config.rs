use crate::utils::error::{ConfigError, ConfigResult};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

pub const DEFAULT_STORAGE_URI: &str = "memory://";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const STORAGE_URI_ENV: &str = "PHONEBOOK_STORAGE_URI";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhonebookConfig {
    pub storage: Option<StorageConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<LogFormat>,
}

impl PhonebookConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML after replacing `${VAR}` references with environment values.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ConfigError::Parse {
            message: format!("TOML parsing error: {}", e),
        })
    }

    // Unset variables are left as-is so validation reports them.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    /// Applies `PHONEBOOK_STORAGE_URI` when it is set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(uri) = std::env::var(STORAGE_URI_ENV) {
            self.set_storage_uri(uri);
        }
        self
    }

    pub fn set_storage_uri(&mut self, uri: String) {
        self.storage = Some(StorageConfig { uri: Some(uri) });
    }

    pub fn storage_uri(&self) -> &str {
        self.storage
            .as_ref()
            .and_then(|s| s.uri.as_deref())
            .unwrap_or(DEFAULT_STORAGE_URI)
    }

    pub fn storage_url(&self) -> ConfigResult<Url> {
        validation::validate_storage_uri("storage.uri", self.storage_uri())
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_format(&self) -> LogFormat {
        self.logging
            .as_ref()
            .and_then(|l| l.format)
            .unwrap_or_default()
    }
}

impl Validate for PhonebookConfig {
    fn validate(&self) -> ConfigResult<()> {
        if let Some(storage) = &self.storage {
            validation::validate_required_field("storage.uri", &storage.uri)?;
        }
        self.storage_url()?;
        validation::validate_one_of("logging.level", self.log_level(), &LOG_LEVELS)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_file() {
        let config = PhonebookConfig::default();

        assert_eq!(config.storage_uri(), "memory://");
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.log_format(), LogFormat::Compact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[storage]
uri = "file:///var/lib/phonebook/persons.json"

[logging]
level = "debug"
format = "json"
"#;

        let config = PhonebookConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.storage_uri(), "file:///var/lib/phonebook/persons.json");
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.log_format(), LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PHONEBOOK_TEST_DATA_PATH", "/tmp/phonebook-test.json");

        let toml_content = r#"
[storage]
uri = "file://${PHONEBOOK_TEST_DATA_PATH}"
"#;

        let config = PhonebookConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.storage_uri(), "file:///tmp/phonebook-test.json");

        std::env::remove_var("PHONEBOOK_TEST_DATA_PATH");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let config = PhonebookConfig::from_toml_str("[storage]\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingConfig { .. })
        ));

        let config =
            PhonebookConfig::from_toml_str("[storage]\nuri = \"mongodb://localhost/db\"\n").unwrap();
        assert!(config.validate().is_err());

        let config = PhonebookConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_format_fails_to_parse() {
        let result = PhonebookConfig::from_toml_str("[logging]\nformat = \"xml\"\n");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[logging]\nlevel = \"warn\"\n")
            .unwrap();

        let config = PhonebookConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.log_level(), "warn");
    }
}
