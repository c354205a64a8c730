use crate::errors::{Result, WhoisApiError};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_URL: &str = "https://www.whoisxmlapi.com/whoisserver/WhoisService";
pub const DEFAULT_TIMEOUT_SECONDS: f64 = 30.0;
pub const DEFAULT_CONNECT_TIMEOUT_SECONDS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub api_key: String,
    pub url: String,
    pub timeout_seconds: f64,
    pub connect_timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            url: DEFAULT_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            connect_timeout_seconds: DEFAULT_CONNECT_TIMEOUT_SECONDS,
        }
    }
}

impl Config {
    /// Defaults, then `.env`, then process environment.
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }

        let mut settings = config::Config::builder()
            .set_default("api_key", "")?
            .set_default("url", DEFAULT_URL)?
            .set_default("timeout_seconds", DEFAULT_TIMEOUT_SECONDS)?
            .set_default("connect_timeout_seconds", DEFAULT_CONNECT_TIMEOUT_SECONDS)?;

        settings = Self::apply_env_overrides(settings)?;

        let config: Config = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_url(&self.url)?;
        validate_timeout(self.timeout_seconds)?;
        Ok(())
    }

    fn apply_env_overrides(
        mut settings: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> std::result::Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError>
    {
        // Later entries win over earlier ones for the same key.
        let env_mappings = [
            ("API_KEY", "api_key"),
            ("WHOIS_API_KEY", "api_key"),
            ("WHOIS_API_URL", "url"),
            ("WHOIS_TIMEOUT_SECONDS", "timeout_seconds"),
            ("WHOIS_API_TIMEOUT", "timeout_seconds"),
            ("WHOIS_API_CONNECT_TIMEOUT", "connect_timeout_seconds"),
        ];

        for (env_var, config_key) in env_mappings {
            if let Ok(value) = std::env::var(env_var) {
                settings = settings.set_override(config_key, value)?;
            }
        }

        Ok(settings)
    }
}

/// Base URLs must look like `http(s)://host...`.
pub fn validate_url(url: &str) -> Result<()> {
    if url.len() <= 8 || !url.starts_with("http") {
        return Err(WhoisApiError::InvalidUrl(url.to_string()));
    }
    url::Url::parse(url).map_err(|e| WhoisApiError::InvalidUrl(format!("{}: {}", url, e)))?;
    Ok(())
}

pub fn validate_timeout(seconds: f64) -> Result<()> {
    if (1.0..=60.0).contains(&seconds) {
        Ok(())
    } else {
        Err(WhoisApiError::InvalidTimeout(seconds))
    }
}
