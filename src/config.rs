//! Process configuration read from the environment

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::error;

use crate::llm::{Endpoint, GenerationConfig};
use crate::llm::openai::DEFAULT_OPENAI_BASE_URL;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_AZURE_API_VERSION: &str = "2024-06-01";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:3000"];

/// Errors raised while reading configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable not set.")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Everything the server needs at startup
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Credential for the model service
    pub api_key: String,
    /// Address to listen on
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Model identifier (Azure deployment name in Azure mode)
    pub model: String,
    /// Target completion service
    pub endpoint: Endpoint,
    /// Transport timeout for the model call
    pub request_timeout: Duration,
    /// Optional sampling parameters
    pub generation: GenerationConfig,
    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Startup variant of [`AppConfig::from_env`]: a failure is logged at
    /// critical severity before being returned
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|name| std::env::var(name).ok())
    }

    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup(lookup).inspect_err(|err| error!(severity = "critical", "{}", err))
    }

    /// Read configuration through an arbitrary lookup function
    ///
    /// Empty and whitespace-only values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = get(API_KEY_VAR).ok_or(ConfigError::Missing(API_KEY_VAR))?;

        let host = parse_or("HOST", get("HOST"), || {
            IpAddr::from_str(DEFAULT_HOST).map_err(|e| e.to_string())
        })?;
        let port = parse_or("PORT", get("PORT"), || Ok(DEFAULT_PORT))?;
        let timeout_secs = parse_or("MODEL_TIMEOUT_SECS", get("MODEL_TIMEOUT_SECS"), || {
            Ok(DEFAULT_TIMEOUT_SECS)
        })?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "MODEL_TIMEOUT_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        let model = get("MODEL_DEPLOYMENT").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let endpoint = match get("AZURE_OPENAI_ENDPOINT") {
            Some(endpoint) => Endpoint::Azure {
                endpoint,
                api_version: get("AZURE_OPENAI_API_VERSION")
                    .unwrap_or_else(|| DEFAULT_AZURE_API_VERSION.to_string()),
            },
            None => Endpoint::OpenAi {
                base_url: get("OPENAI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            },
        };

        let mut generation = GenerationConfig::new();
        if let Some(value) = get("MODEL_MAX_TOKENS") {
            generation = generation.with_max_tokens(parse("MODEL_MAX_TOKENS", &value)?);
        }
        if let Some(value) = get("MODEL_TEMPERATURE") {
            generation = generation.with_temperature(parse("MODEL_TEMPERATURE", &value)?);
        }

        let cors_origins = match get("CORS_ORIGINS") {
            Some(value) => parse_origins(&value)?,
            None => DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            api_key,
            host,
            port,
            model,
            endpoint,
            request_timeout: Duration::from_secs(timeout_secs),
            generation,
            cors_origins,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| ConfigError::Invalid {
        name,
        reason: format!("{:?}: {}", value, e),
    })
}

fn parse_or<T, D>(name: &'static str, value: Option<String>, default: D) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    D: FnOnce() -> Result<T, String>,
{
    match value {
        Some(value) => parse(name, &value),
        None => default().map_err(|reason| ConfigError::Invalid { name, reason }),
    }
}

// Browsers always send the scheme in `Origin`, so an entry without one could
// never match.
fn parse_origins(value: &str) -> Result<Vec<String>, ConfigError> {
    let origins: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| origin.trim_end_matches('/').to_string())
        .collect();

    if let Some(bad) = origins
        .iter()
        .find(|origin| !(origin.starts_with("http://") || origin.starts_with("https://")))
    {
        return Err(ConfigError::Invalid {
            name: "CORS_ORIGINS",
            reason: format!("origin {:?} must include an http:// or https:// scheme", bad),
        });
    }

    Ok(origins)
}
