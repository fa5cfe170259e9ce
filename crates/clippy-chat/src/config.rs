//! Configuration loaded from environment variables.
//!
//! - `OPENAI_API_KEY`: bearer token, optional
//! - `OPENAI_BASE_URL`: endpoint, defaults to the OpenAI API
//! - `OPENAI_MODEL`: model name
//! - `CLIPPY_MAX_TOKENS`: max-token budget per reply
//! - `CLIPPY_TIMEOUT_SECS`: request timeout, `0` disables it

use std::env;
use std::error::Error;
use std::fmt::{self, Display};
use std::time::Duration;

use clippy_chat_core::DEFAULT_TIMEOUT;
use clippy_chat_core::settings::DEFAULT_MAX_TOKENS;
use clippy_chat_openai_model::{OpenAIConfig, OpenAIConfigBuilder};

#[derive(Debug)]
pub struct Config {
    pub openai: OpenAIConfig,
    pub max_tokens: u32,
    pub timeout: Option<Duration>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    InvalidNumber { var: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { var, value } => {
                write!(f, "{var} must be a non-negative integer, got {value:?}")
            }
        }
    }
}

impl Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        // Blank values count as unset.
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut builder = OpenAIConfigBuilder::new();
        if let Some(api_key) = lookup("OPENAI_API_KEY") {
            builder = builder.with_api_key(api_key);
        }
        if let Some(base_url) = lookup("OPENAI_BASE_URL") {
            builder = builder.with_base_url(base_url);
        }
        if let Some(model) = lookup("OPENAI_MODEL") {
            builder = builder.with_model(model);
        }

        let max_tokens = match lookup("CLIPPY_MAX_TOKENS") {
            Some(value) => parse_number("CLIPPY_MAX_TOKENS", value)?,
            None => DEFAULT_MAX_TOKENS,
        };
        let timeout = match lookup("CLIPPY_TIMEOUT_SECS") {
            Some(value) => match parse_number("CLIPPY_TIMEOUT_SECS", value)? {
                0 => None,
                secs => Some(Duration::from_secs(secs.into())),
            },
            None => Some(DEFAULT_TIMEOUT),
        };

        Ok(Self {
            openai: builder.build(),
            max_tokens,
            timeout,
        })
    }
}

fn parse_number(var: &'static str, value: String) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { var, value })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use clippy_chat_openai_model::{DEFAULT_BASE_URL, DEFAULT_MODEL};

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.openai.model(), DEFAULT_MODEL);
        assert_eq!(config.openai.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.timeout, Some(DEFAULT_TIMEOUT));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("OPENAI_BASE_URL", "http://localhost:11434/v1/"),
            ("OPENAI_MODEL", "llama3"),
            ("CLIPPY_MAX_TOKENS", " 64 "),
            ("CLIPPY_TIMEOUT_SECS", "0"),
        ])
        .unwrap();
        assert_eq!(config.openai.base_url(), "http://localhost:11434/v1");
        assert_eq!(config.openai.model(), "llama3");
        assert_eq!(config.max_tokens, 64);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = load(&[("OPENAI_MODEL", "  "), ("CLIPPY_MAX_TOKENS", "")])
            .unwrap();
        assert_eq!(config.openai.model(), DEFAULT_MODEL);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_invalid_number() {
        let err = load(&[("CLIPPY_MAX_TOKENS", "lots")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                var: "CLIPPY_MAX_TOKENS",
                value: "lots".to_owned(),
            }
        );
        assert!(load(&[("CLIPPY_TIMEOUT_SECS", "-1")]).is_err());
    }
}
