//! Runtime configuration.
//!
//! Everything the binary needs to talk to its collaborators lives in
//! [`Settings`], read once from the environment at startup and passed down
//! explicitly. Nothing in the library reads environment variables after
//! construction, which is what lets tests swap in fakes freely.

use miette::Diagnostic;
use std::str::FromStr;
use thiserror::Error;

/// Loop caps enforced by the workflow engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunLimits {
    /// Hard ceiling on node executions per run. A safety valve against
    /// wiring bugs; the generation caps below trip first in normal use.
    pub max_steps: u32,
    /// Total times the generate station may run in one run.
    pub max_generations: u32,
    /// Extra generate passes allowed while the evidence has not changed
    /// since the previous pass (the regenerate-on-ungrounded loop).
    pub max_stale_regenerations: u32,
}

impl Default for RunLimits {
    fn default() -> Self {
        Self {
            max_steps: 24,
            max_generations: 8,
            max_stale_regenerations: 2,
        }
    }
}

/// Where the oracle lives and which model answers.
#[derive(Clone, Debug)]
pub struct OracleSettings {
    pub base_url: String,
    pub model: String,
}

/// Evidence store endpoint and retrieval depth.
#[derive(Clone, Debug)]
pub struct RetrieverSettings {
    pub base_url: String,
    pub top_k: usize,
}

/// Web search provider credentials and bounds.
#[derive(Clone, Debug)]
pub struct SearchSettings {
    pub base_url: String,
    pub api_key: String,
    pub max_results: usize,
}

/// Mail provider endpoint and credentials.
#[derive(Clone, Debug)]
pub struct MailSettings {
    pub base_url: String,
    pub access_token: String,
}

/// Full application configuration.
#[derive(Clone, Debug)]
pub struct Settings {
    pub oracle: OracleSettings,
    pub retriever: RetrieverSettings,
    pub search: SearchSettings,
    pub mail: MailSettings,
    pub limits: RunLimits,
}

/// Problems assembling [`Settings`] from the environment.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("missing required environment variable {name}")]
    #[diagnostic(
        code(draftsmith::config::missing_var),
        help("Set {name} in the environment or in a .env file next to the binary.")
    )]
    MissingVar { name: &'static str },

    /// A variable is set but does not parse as the expected type.
    #[error("environment variable {name} has unusable value {value:?}")]
    #[diagnostic(code(draftsmith::config::invalid))]
    Invalid { name: &'static str, value: String },
}

impl Settings {
    /// Reads configuration from the process environment.
    ///
    /// Optional endpoints fall back to local-development defaults; API
    /// credentials are required. Callers wanting `.env` support load it
    /// before calling this (the binary does).
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            oracle: OracleSettings {
                base_url: var_or("OLLAMA_BASE_URL", "http://localhost:11434"),
                model: var_or("OLLAMA_MODEL", "llama3"),
            },
            retriever: RetrieverSettings {
                base_url: var_or("RETRIEVER_BASE_URL", "http://localhost:8000"),
                top_k: parsed_var_or("RETRIEVER_TOP_K", 4)?,
            },
            search: SearchSettings {
                base_url: var_or("TAVILY_BASE_URL", "https://api.tavily.com"),
                api_key: required_var("TAVILY_API_KEY")?,
                max_results: parsed_var_or("TAVILY_MAX_RESULTS", 3)?,
            },
            mail: MailSettings {
                base_url: var_or("GMAIL_BASE_URL", "https://gmail.googleapis.com"),
                access_token: required_var("GMAIL_ACCESS_TOKEN")?,
            },
            limits: RunLimits {
                max_steps: parsed_var_or("MAX_STEPS", RunLimits::default().max_steps)?,
                max_generations: parsed_var_or(
                    "MAX_GENERATIONS",
                    RunLimits::default().max_generations,
                )?,
                max_stale_regenerations: parsed_var_or(
                    "MAX_STALE_REGENERATIONS",
                    RunLimits::default().max_stale_regenerations,
                )?,
            },
        })
    }
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    require(name, std::env::var(name).ok())
}

fn parsed_var_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    parse_or(name, std::env::var(name).ok(), default)
}

fn require(name: &'static str, raw: Option<String>) -> Result<String, ConfigError> {
    raw.filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::MissingVar { name })
}

fn parse_or<T: FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
