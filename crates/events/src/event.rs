//! Event record: identity and metadata shared by every domain event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::event_types;

/// Identifier of a single event instance.
///
/// Uses UUIDv7 (time-ordered), so ids generated within one process sort by
/// creation time and never collide.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for EventId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for EventId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<EventId> for Uuid {
    fn from(value: EventId) -> Self {
        value.0
    }
}

/// A domain-agnostic event.
///
/// Events are:
/// - **immutable** (treat them as facts that already happened)
/// - **tagged** with a dot-separated `domain.action` type used as the dispatch key
/// - **versioned** with the caller-supplied logical version of their aggregate
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Unique id of this event instance.
    fn event_id(&self) -> EventId;

    /// Stable event type tag (e.g. "user.created").
    fn event_type(&self) -> &'static str;

    /// Identity of the entity that produced the event. Observability only;
    /// the bus never routes on it.
    fn aggregate_id(&self) -> &str;

    /// When the event was constructed.
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Logical version of the aggregate at event creation.
    ///
    /// Not validated: monotonicity is the producer's responsibility.
    fn version(&self) -> u64;
}

/// Metadata embedded in every concrete event.
///
/// On deserialization the type tag must be one of [`event_types::ALL`]; it is
/// mapped back to the catalog constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventMetadata {
    event_id: EventId,
    event_type: &'static str,
    aggregate_id: String,
    occurred_at: DateTime<Utc>,
    version: u64,
}

impl EventMetadata {
    /// Capture metadata for a new event: fresh id, current time, version 1.
    pub fn new(event_type: &'static str, aggregate_id: impl Into<String>) -> Self {
        Self {
            event_id: EventId::new(),
            event_type,
            aggregate_id: aggregate_id.into(),
            occurred_at: Utc::now(),
            version: 1,
        }
    }

    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    pub fn event_type(&self) -> &'static str {
        self.event_type
    }

    pub fn aggregate_id(&self) -> &str {
        &self.aggregate_id
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

/// Wire form of [`EventMetadata`] before the type tag is resolved.
#[derive(Deserialize)]
struct MetadataRecord {
    event_id: EventId,
    event_type: String,
    aggregate_id: String,
    occurred_at: DateTime<Utc>,
    version: u64,
}

#[derive(Debug, Error)]
#[error("unknown event type '{0}'")]
pub struct UnknownEventType(String);

// Equivalent to `#[serde(try_from = "MetadataRecord")]`, written by hand because
// the derive adds a `'de: 'static` bound (from the `&'static str` field) that
// breaks `#[serde(flatten)]` in the concrete events.
impl<'de> Deserialize<'de> for EventMetadata {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let record = MetadataRecord::deserialize(deserializer)?;
        Self::try_from(record).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<MetadataRecord> for EventMetadata {
    type Error = UnknownEventType;

    fn try_from(record: MetadataRecord) -> Result<Self, Self::Error> {
        let event_type =
            event_types::lookup(&record.event_type).ok_or(UnknownEventType(record.event_type))?;
        Ok(Self {
            event_id: record.event_id,
            event_type,
            aggregate_id: record.aggregate_id,
            occurred_at: record.occurred_at,
            version: record.version,
        })
    }
}
