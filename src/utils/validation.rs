use crate::utils::error::{ConfigError, ConfigResult};
use url::Url;

pub trait Validate {
    fn validate(&self) -> ConfigResult<()>;
}

pub const STORAGE_SCHEMES: [&str; 2] = ["memory", "file"];

/// Checks a storage URI and returns it parsed.
pub fn validate_storage_uri(field_name: &str, uri: &str) -> ConfigResult<Url> {
    if uri.trim().is_empty() {
        return Err(ConfigError::InvalidConfigValue {
            field: field_name.to_string(),
            value: uri.to_string(),
            reason: "URI cannot be empty".to_string(),
        });
    }

    let url = Url::parse(uri).map_err(|e| ConfigError::InvalidConfigValue {
        field: field_name.to_string(),
        value: uri.to_string(),
        reason: format!("Invalid URI format: {}", e),
    })?;

    match url.scheme() {
        "memory" => Ok(url),
        "file" => {
            validate_path(field_name, url.path())?;
            Ok(url)
        }
        scheme => Err(ConfigError::InvalidConfigValue {
            field: field_name.to_string(),
            value: uri.to_string(),
            reason: format!(
                "Unsupported storage scheme: {}. Supported schemes: {}",
                scheme,
                STORAGE_SCHEMES.join(", ")
            ),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> ConfigResult<()> {
    if path.is_empty() || path == "/" {
        return Err(ConfigError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> ConfigResult<()> {
    if !allowed.contains(&value) {
        return Err(ConfigError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be one of: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> ConfigResult<&'a T> {
    value.as_ref().ok_or_else(|| ConfigError::MissingConfig {
        field: field_name.to_string(),
    })
}
