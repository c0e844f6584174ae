use std::fmt;

use reqwest::Url;
use thiserror::Error;

use crate::hub_client::{HubCredentials, DEFAULT_API_URL};

pub const LANGSMITH_API_KEY: &str = "LANGSMITH_API_KEY";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const LANGSMITH_ENDPOINT: &str = "LANGSMITH_ENDPOINT";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} environment variable is required")]
    Missing { key: &'static str },

    #[error("{key} is not a valid URL: {value}")]
    InvalidEndpoint { key: &'static str, value: String },
}

/// Secrets and endpoint needed to publish to the hub.
/// Built once at startup; nothing is defaulted except the endpoint.
#[derive(Clone)]
pub struct Config {
    pub hub_api_key: String,
    /// Absent only when the published object carries no model.
    pub model_api_key: Option<String>,
    pub hub_api_url: String,
}

impl Config {
    /// Reads configuration from the process environment, loading `.env` first.
    pub fn from_env(require_model_key: bool) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok(), require_model_key)
    }

    /// Validates configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F, require_model_key: bool) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let hub_api_key = require_env(&lookup, LANGSMITH_API_KEY)?;
        let model_api_key = if require_model_key {
            Some(require_env(&lookup, OPENAI_API_KEY)?)
        } else {
            non_empty(&lookup, OPENAI_API_KEY)
        };

        let hub_api_url = match non_empty(&lookup, LANGSMITH_ENDPOINT) {
            Some(value) => {
                Url::parse(&value).map_err(|_| ConfigError::InvalidEndpoint {
                    key: LANGSMITH_ENDPOINT,
                    value: value.clone(),
                })?;
                value.trim_end_matches('/').to_string()
            }
            None => DEFAULT_API_URL.to_string(),
        };

        Ok(Config {
            hub_api_key,
            model_api_key,
            hub_api_url,
        })
    }

    pub fn credentials(&self) -> HubCredentials {
        HubCredentials {
            api_key: self.hub_api_key.clone(),
            api_url: self.hub_api_url.clone(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("hub_api_key", &"<redacted>")
            .field(
                "model_api_key",
                &self.model_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("hub_api_url", &self.hub_api_url)
            .finish()
    }
}

fn require_env<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, key).ok_or(ConfigError::Missing { key })
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.trim().is_empty())
}
