use std::path::PathBuf;
use thiserror::Error;

use crate::store::DedupPolicy;

pub const DEFAULT_ENDPOINT: &str = "https://openapi.naver.com/v1/search/news.json";
pub const DEFAULT_QUERY: &str = "sk하이닉스";
pub const DEFAULT_DISPLAY: u32 = 100;
pub const MAX_DISPLAY: u32 = 100;
pub const DEFAULT_OUTPUT_PATH: &str = "news_data/news_data.csv";

pub const ENV_CLIENT_ID: &str = "NAVER_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "NAVER_CLIENT_SECRET";
pub const ENV_ENDPOINT: &str = "NAVER_NEWS_ENDPOINT";
pub const ENV_QUERY: &str = "NEWS_QUERY";
pub const ENV_DISPLAY: &str = "NEWS_DISPLAY";
pub const ENV_OUTPUT_PATH: &str = "NEWS_OUTPUT_PATH";
pub const ENV_DEDUP_WITHIN_BATCH: &str = "NEWS_DEDUP_WITHIN_BATCH";

/// Configuration errors, raised before any network call is made.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing environment variable: {name}")]
    MissingEnvironmentVariable { name: String },

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

impl ConfigError {
    pub fn missing_env_var<N: Into<String>>(name: N) -> Self {
        Self::MissingEnvironmentVariable { name: name.into() }
    }

    pub fn invalid_value<N: Into<String>, R: Into<String>>(name: N, reason: R) -> Self {
        Self::InvalidValue {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

// Keep the secret out of debug logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct NewsConfig {
    pub credentials: Credentials,
    pub query: String,
    pub display: u32,
    pub endpoint: String,
    pub output_path: PathBuf,
    pub dedup: DedupPolicy,
}

impl NewsConfig {
    /// Compiled-in defaults around the given credentials.
    pub fn with_credentials(client_id: &str, client_secret: &str) -> Self {
        Self {
            credentials: Credentials {
                client_id: client_id.to_string(),
                client_secret: client_secret.to_string(),
            },
            query: DEFAULT_QUERY.to_string(),
            display: DEFAULT_DISPLAY,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            dedup: DedupPolicy::default(),
        }
    }

    /// Reads the process environment. Call `dotenvy::dotenv()` first so `.env` values are visible.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset or blank keys fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let client_id = get(ENV_CLIENT_ID).ok_or_else(|| ConfigError::missing_env_var(ENV_CLIENT_ID))?;
        let client_secret =
            get(ENV_CLIENT_SECRET).ok_or_else(|| ConfigError::missing_env_var(ENV_CLIENT_SECRET))?;

        let mut config = Self::with_credentials(&client_id, &client_secret);
        if let Some(query) = get(ENV_QUERY) {
            config.query = query;
        }
        if let Some(display) = get(ENV_DISPLAY) {
            config.display = display.trim().parse().map_err(|_| {
                ConfigError::invalid_value(ENV_DISPLAY, format!("{:?} is not a number", display))
            })?;
        }
        if let Some(endpoint) = get(ENV_ENDPOINT) {
            config.endpoint = endpoint;
        }
        if let Some(path) = get(ENV_OUTPUT_PATH) {
            config.output_path = PathBuf::from(path);
        }
        if let Some(flag) = get(ENV_DEDUP_WITHIN_BATCH) {
            config.dedup = if parse_bool(ENV_DEDUP_WITHIN_BATCH, &flag)? {
                DedupPolicy::PerRow
            } else {
                DedupPolicy::StartOfRun
            };
        }
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.query.trim().is_empty() {
            return Err(ConfigError::invalid_value("query", "search term must not be empty"));
        }
        if self.display == 0 || self.display > MAX_DISPLAY {
            return Err(ConfigError::invalid_value(
                "display",
                format!("{} is outside 1..={}", self.display, MAX_DISPLAY),
            ));
        }
        Ok(())
    }
}

fn parse_bool(name: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::invalid_value(name, format!("{:?} is not a boolean", other))),
    }
}
