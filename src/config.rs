//! YAML configuration loading and validation.
//!
//! The file is deserialized into a permissive [`RawConfig`] (every key
//! optional, unknown keys ignored) and then validated once into an
//! [`AlertConfig`]. Search filters fall back to defaults; mail settings are
//! required, so a missing `sender` or `smtp_host` stops the run before any
//! network activity instead of surfacing later at send time.
//!
//! # Example
//!
//! ```yaml
//! categories: [cs.LG, cs.AI]
//! keywords: ["large language model", RLHF]
//! authors: []
//! max_results: 10
//! sender: alerts@example.com
//! sender_password: hunter2
//! receivers: [you@example.com]
//! smtp_host: smtp.example.com
//! smtp_port: 465
//! ```

use crate::query::ARXIV_API_URL;
use lettre::message::Mailbox;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, instrument};
use url::Url;

/// Number of papers requested when `max_results` is absent.
pub const DEFAULT_MAX_RESULTS: u32 = 10;

/// Configuration loading or validation failure. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("missing required config key `{0}`")]
    MissingField(&'static str),

    #[error("invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// The configuration file as written, before validation.
///
/// Lists are `Option` so that an empty YAML key (`authors:`) reads as
/// absent rather than failing to deserialize.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub categories: Option<Vec<String>>,
    pub keywords: Option<Vec<String>>,
    pub authors: Option<Vec<String>>,
    pub max_results: Option<u32>,
    pub sender: Option<String>,
    pub sender_password: Option<String>,
    pub receivers: Option<Vec<String>>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub api_url: Option<String>,
}

/// What to search for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilters {
    pub categories: Vec<String>,
    pub keywords: Vec<String>,
    pub authors: Vec<String>,
    pub max_results: u32,
}

/// Where and how to deliver the digest.
#[derive(Clone)]
pub struct MailSettings {
    pub sender: Mailbox,
    pub sender_password: String,
    pub receivers: Vec<Mailbox>,
    pub smtp_host: String,
    pub smtp_port: u16,
}

impl fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailSettings")
            .field("sender", &self.sender.to_string())
            .field("sender_password", &"<redacted>")
            .field("receivers", &self.receivers.len())
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .finish()
    }
}

/// Validated configuration for one run.
#[derive(Debug, Clone)]
pub struct AlertConfig {
    pub search: SearchFilters,
    pub mail: MailSettings,
    /// Search endpoint; defaults to [`ARXIV_API_URL`].
    pub api_url: Url,
}

impl AlertConfig {
    /// Read and validate the YAML file at `path`.
    ///
    /// `sender_password`, when given, replaces the file's value; the CLI
    /// passes it from `ARXIV_ALERT_SENDER_PASSWORD` so the secret need not
    /// live in the file.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path, sender_password: Option<String>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut raw: RawConfig =
            serde_yaml::from_str(&text).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;
        if sender_password.is_some() {
            raw.sender_password = sender_password;
        }
        let config = raw.validate()?;
        info!(
            categories = config.search.categories.len(),
            keywords = config.search.keywords.len(),
            authors = config.search.authors.len(),
            max_results = config.search.max_results,
            receivers = config.mail.receivers.len(),
            "Loaded configuration"
        );
        Ok(config)
    }
}

fn required<T>(value: Option<T>, key: &'static str) -> Result<T, ConfigError> {
    value.ok_or(ConfigError::MissingField(key))
}

fn mailbox(value: &str, key: &'static str) -> Result<Mailbox, ConfigError> {
    value.trim().parse().map_err(|e| ConfigError::Invalid {
        key,
        reason: format!("{value:?} is not an email address ({e})"),
    })
}

impl RawConfig {
    /// Apply defaults and check the mail settings.
    pub fn validate(self) -> Result<AlertConfig, ConfigError> {
        let max_results = self.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
        if max_results == 0 {
            return Err(ConfigError::Invalid {
                key: "max_results",
                reason: "must be a positive integer".to_string(),
            });
        }

        let sender = mailbox(&required(self.sender, "sender")?, "sender")?;
        let sender_password = required(self.sender_password, "sender_password")?;
        let receivers = required(self.receivers, "receivers")?
            .iter()
            .map(|r| mailbox(r, "receivers"))
            .collect::<Result<Vec<_>, _>>()?;
        if receivers.is_empty() {
            return Err(ConfigError::Invalid {
                key: "receivers",
                reason: "at least one receiver is required".to_string(),
            });
        }
        let smtp_host = required(self.smtp_host, "smtp_host")?;
        let smtp_port = required(self.smtp_port, "smtp_port")?;

        let api_url = self.api_url.as_deref().unwrap_or(ARXIV_API_URL);
        let api_url = Url::parse(api_url).map_err(|e| ConfigError::Invalid {
            key: "api_url",
            reason: e.to_string(),
        })?;

        Ok(AlertConfig {
            search: SearchFilters {
                categories: self.categories.unwrap_or_default(),
                keywords: self.keywords.unwrap_or_default(),
                authors: self.authors.unwrap_or_default(),
                max_results,
            },
            mail: MailSettings {
                sender,
                sender_password,
                receivers,
                smtp_host,
                smtp_port,
            },
            api_url,
        })
    }
}
