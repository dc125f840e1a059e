//! Configuration loaded from the environment.
//!
//! | variable | default | meaning |
//! |---|---|---|
//! | `RUST_LOG` | `info` | tracing filter directives |
//! | `FEEDBACK_LOG_FORMAT` | `json` | `json` or `pretty` |
//! | `FEEDBACK_EVENT_HANDLERS` | `user,role,idea` | handler sets to register; empty for none |

use core::str::FromStr;

use feedback_observability::{LogConfig, LogFormat, ParseLogFormatError};
use thiserror::Error;

pub const LOG_FILTER_VAR: &str = "RUST_LOG";
pub const LOG_FORMAT_VAR: &str = "FEEDBACK_LOG_FORMAT";
pub const EVENT_HANDLERS_VAR: &str = "FEEDBACK_EVENT_HANDLERS";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("FEEDBACK_LOG_FORMAT: {0}")]
    LogFormat(#[from] ParseLogFormatError),

    #[error("FEEDBACK_EVENT_HANDLERS: unknown handler set '{0}' (expected user, role or idea)")]
    UnknownHandlerSet(String),
}

/// Per-domain consumer handler sets that can be enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerSetKind {
    User,
    Role,
    Idea,
}

impl HandlerSetKind {
    pub const ALL: [HandlerSetKind; 3] = [
        HandlerSetKind::User,
        HandlerSetKind::Role,
        HandlerSetKind::Idea,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerSetKind::User => "user",
            HandlerSetKind::Role => "role",
            HandlerSetKind::Idea => "idea",
        }
    }
}

impl core::fmt::Display for HandlerSetKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HandlerSetKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(HandlerSetKind::User),
            "role" => Ok(HandlerSetKind::Role),
            "idea" => Ok(HandlerSetKind::Idea),
            other => Err(ConfigError::UnknownHandlerSet(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log: LogConfig,
    /// Enabled handler sets, in registration order, without duplicates.
    pub handler_sets: Vec<HandlerSetKind>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            handler_sets: HandlerSetKind::ALL.to_vec(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();

        let filter = lookup(LOG_FILTER_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.log.filter);

        let format = match lookup(LOG_FORMAT_VAR) {
            Some(raw) => raw.parse::<LogFormat>()?,
            None => defaults.log.format,
        };

        let handler_sets = match lookup(EVENT_HANDLERS_VAR) {
            Some(raw) => parse_handler_sets(&raw)?,
            None => defaults.handler_sets,
        };

        Ok(Self {
            log: LogConfig { filter, format },
            handler_sets,
        })
    }
}

fn parse_handler_sets(raw: &str) -> Result<Vec<HandlerSetKind>, ConfigError> {
    let mut sets = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let kind: HandlerSetKind = part.parse()?;
        if !sets.contains(&kind) {
            sets.push(kind);
        }
    }
    Ok(sets)
}
