//! Event bus error model.

use thiserror::Error;

use crate::bus::SubscriptionId;
use crate::event::EventId;

/// Event bus error.
#[derive(Debug, Error)]
pub enum BusError {
    /// Malformed call (empty event type, event without a type tag).
    /// Detected before any lock is taken; nothing changed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Unsubscribe for an event type or subscription that is not registered.
    #[error("not found: {0}")]
    NotFound(String),

    /// One or more handlers failed during publish. Every handler still ran.
    #[error(transparent)]
    HandlerFailure(#[from] HandlerFailures),

    /// The registry lock was poisoned.
    #[error("event bus registry lock poisoned")]
    Poisoned,
}

impl BusError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_handler_failure(&self) -> bool {
        matches!(self, Self::HandlerFailure(_))
    }

    /// The aggregated handler failures, if this is a publish failure.
    pub fn handler_failures(&self) -> Option<&HandlerFailures> {
        match self {
            Self::HandlerFailure(failures) => Some(failures),
            _ => None,
        }
    }
}

/// A single handler's failure during a dispatch.
#[derive(Debug)]
pub struct HandlerFailure {
    pub subscription_id: SubscriptionId,
    pub handler: String,
    pub error: anyhow::Error,
}

impl core::fmt::Display for HandlerFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "handler '{}' ({}): {:#}", self.handler, self.subscription_id, self.error)
    }
}

/// All handler failures of one publish, in invocation order.
#[derive(Debug, Error)]
#[error(
    "{} of {} handler(s) failed for event {event_id} ({event_type}): {}",
    .failures.len(),
    .handlers_invoked,
    join_failures(.failures)
)]
pub struct HandlerFailures {
    pub event_type: String,
    pub event_id: EventId,
    pub handlers_invoked: usize,
    pub failures: Vec<HandlerFailure>,
}

impl HandlerFailures {
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HandlerFailure> {
        self.failures.iter()
    }
}

fn join_failures(failures: &[HandlerFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
