use std::{collections::HashMap, fs, io, path::Path, time::Duration};

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const SETTINGS_FILE: &str = "advisor.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_url: String,
    pub request_timeout: Duration,
    pub advice_model: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            advice_model: None,
        }
    }
}

impl ClientSettings {
    /// Parsed base url; a trailing slash on the configured value is tolerated.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        parse_api_url(&self.api_url)
    }
}

/// Defaults, then `advisor.toml` in the working directory, then environment.
pub fn load_settings() -> Result<ClientSettings, ConfigError> {
    load_settings_with(None)
}

/// Like [`load_settings`], with an explicit api url (e.g. a command-line flag)
/// taking precedence over every other source. The url is validated only after
/// all sources are merged, so a bad value that ends up overridden is harmless.
pub fn load_settings_with(api_url: Option<String>) -> Result<ClientSettings, ConfigError> {
    resolve_settings(
        Path::new(SETTINGS_FILE),
        |key| std::env::var(key).ok(),
        api_url,
    )
}

fn resolve_settings(
    path: &Path,
    var: impl Fn(&str) -> Option<String>,
    api_url: Option<String>,
) -> Result<ClientSettings, ConfigError> {
    let mut settings = ClientSettings::default();
    apply_file(&mut settings, path)?;
    apply_env(&mut settings, var)?;
    if let Some(api_url) = api_url {
        settings.api_url = api_url;
    }
    settings.base_url()?;
    Ok(settings)
}

/// A missing file is fine; one that exists but cannot be read or parsed is an
/// error, the same as a bad value inside it.
fn apply_file(settings: &mut ClientSettings, path: &Path) -> Result<(), ConfigError> {
    let file_error = |reason: String| ConfigError::SettingsFile {
        path: path.display().to_string(),
        reason,
    };
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(file_error(err.to_string())),
    };
    let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(&raw)
        .map_err(|err| file_error(err.to_string()))?;
    tracing::debug!(path = %path.display(), "applying settings file");

    if let Some(v) = file_cfg.get("api_url").and_then(toml::Value::as_str) {
        settings.api_url = v.to_string();
    }
    if let Some(v) = file_cfg.get("request_timeout_secs") {
        let raw = match v {
            toml::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        settings.request_timeout = parse_timeout(&raw)?;
    }
    if let Some(v) = file_cfg.get("advice_model").and_then(toml::Value::as_str) {
        settings.advice_model = non_empty(v);
    }
    Ok(())
}

fn apply_env(
    settings: &mut ClientSettings,
    var: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if let Some(v) = var("ADVISOR_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = var("APP__API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = var("APP__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout = parse_timeout(&v)?;
    }
    if let Some(v) = var("APP__ADVICE_MODEL") {
        settings.advice_model = non_empty(&v);
    }
    Ok(())
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |reason: String| ConfigError::InvalidApiUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https".into()));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("url cannot be used as a base".into()));
    }
    Ok(url)
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
