// src/core/config_manager.rs
//! Configuration for both flows, built once and handed to their constructors

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;

pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
    #[error("base URL '{0}' is not a valid URL")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub locale: String,
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub pages: PageConfig,
    pub job: JobDefaults,
}

/// Backend location and endpoint paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub jobs_endpoint: String,
    pub create_business_account_endpoint: String,
    pub update_business_account_endpoint: String,
    pub business_log_in_endpoint: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub api_key: String,
    pub identity_base_url: String,
    pub min_password_length: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub home: String,
    pub business_account_info: String,
}

/// Placeholder coordinates until addresses are geocoded.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JobDefaults {
    pub lat: f64,
    pub lon: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            api: ApiConfig::default(),
            auth: AuthConfig::default(),
            pages: PageConfig::default(),
            job: JobDefaults::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            jobs_endpoint: "/jobs".to_string(),
            create_business_account_endpoint: "/business-account".to_string(),
            update_business_account_endpoint: "/business-account/update".to_string(),
            business_log_in_endpoint: "/business-log-in".to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            identity_base_url: "https://identitytoolkit.googleapis.com/v1".to_string(),
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            home: "/index.html".to_string(),
            business_account_info: "/account/create-account/business/account-info/index.html"
                .to_string(),
        }
    }
}

impl Default for JobDefaults {
    fn default() -> Self {
        Self {
            lat: 1.3039,
            lon: 103.8358,
        }
    }
}

impl AppConfig {
    /// Load `config.yaml` from the working directory when present, then apply
    /// environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.yaml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;

        info!(
            "Loaded configuration: backend {} (locale {})",
            config.api.base_url, config.locale
        );
        Ok(config)
    }

    fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No {} found, using built-in defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Environment lookups are injected so tests don't touch process state.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("WALKIN_API_URL") {
            self.api.base_url = url;
        }
        if let Some(key) = lookup("FIREBASE_API_KEY") {
            self.auth.api_key = key;
        }
        if let Some(locale) = lookup("WALKIN_LOCALE") {
            self.locale = locale;
        }
        if let Some(value) = lookup("WALKIN_MIN_PASSWORD_LENGTH") {
            self.auth.min_password_length =
                parse_positive("WALKIN_MIN_PASSWORD_LENGTH", &value)? as usize;
        }
        if let Some(value) = lookup("WALKIN_TIMEOUT_SECS") {
            self.api.timeout_seconds = parse_positive("WALKIN_TIMEOUT_SECS", &value)?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        reqwest::Url::parse(&self.api.base_url)
            .map_err(|_| ConfigError::InvalidBaseUrl(self.api.base_url.clone()))?;
        Ok(())
    }

    /// Absolute URL of a backend endpoint.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api.base_url.trim_end_matches('/'), endpoint)
    }
}

fn parse_positive(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.auth.min_password_length, 6);
        assert_eq!(config.api.jobs_endpoint, "/jobs");
        assert_eq!(config.locale, "en");
        assert_eq!(config.job.lat, 1.3039);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_env(lookup(&[
                ("WALKIN_API_URL", "https://jobs.example.com/"),
                ("WALKIN_MIN_PASSWORD_LENGTH", "8"),
                ("FIREBASE_API_KEY", "key-123"),
            ]))
            .unwrap();

        assert_eq!(config.auth.min_password_length, 8);
        assert_eq!(config.auth.api_key, "key-123");
        assert_eq!(
            config.endpoint_url("/jobs"),
            "https://jobs.example.com/jobs"
        );
    }

    #[test]
    fn test_invalid_number_override() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(lookup(&[("WALKIN_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("WALKIN_TIMEOUT_SECS"));

        let err = config
            .apply_env(lookup(&[("WALKIN_MIN_PASSWORD_LENGTH", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { .. }));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: AppConfig = serde_yaml::from_str(
            "locale: en\napi:\n  base_url: http://backend:9000\nauth:\n  min_password_length: 10\n",
        )
        .unwrap();

        assert_eq!(config.api.base_url, "http://backend:9000");
        assert_eq!(config.api.jobs_endpoint, "/jobs");
        assert_eq!(config.auth.min_password_length, 10);
        assert_eq!(config.pages.home, "/index.html");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load_file(Path::new("/nonexistent/walkin.yaml")).unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8080");
    }
}
