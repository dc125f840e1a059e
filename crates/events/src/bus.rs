//! Event publishing/subscription abstraction.
//!
//! The bus is an in-process, synchronous fan-out dispatcher:
//!
//! ```text
//! service mutation commits
//!   → EventPublisher::publish_event
//!     → EventBus::publish
//!       → every handler subscribed to event.event_type(), in subscription order
//! ```
//!
//! ## Delivery
//!
//! - **Synchronous**: `publish` returns only after every handler has returned.
//! - **Ordered per type**: handlers of one event type run in subscription order.
//! - **Best effort**: no persistence, no retry, no replay. A failing handler does not
//!   stop the others; all failures come back as one aggregated error.
//! - **No subscribers is fine**: publishing an event nobody listens to succeeds.
//!
//! Producers call `publish` after their own mutation has committed and must not undo
//! that mutation when publishing fails (see [`crate::EventPublisher::publish_best_effort`]).

use std::sync::Arc;

use serde::Serialize;

use crate::context::EventContext;
use crate::error::BusError;
use crate::handler::SharedHandler;

/// Identifier of one registration, unique within the process.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl core::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Handle returned by [`EventBus::subscribe`].
///
/// Pass it back to [`EventBus::unsubscribe`] to remove exactly this registration,
/// without needing to keep the original handler value around.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription {
    id: SubscriptionId,
    event_type: String,
}

impl Subscription {
    pub fn new(id: SubscriptionId, event_type: impl Into<String>) -> Self {
        Self {
            id,
            event_type: event_type.into(),
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }
}

/// Domain-agnostic event bus (registry + dispatcher).
///
/// ## Thread Safety
///
/// The trait requires `Send + Sync`: one bus instance is shared by every producer and
/// consumer of a process. Implementations serialize registry changes against each other
/// and against the handler lookup of `publish`, while concurrent publishes proceed in
/// parallel.
pub trait EventBus<E>: Send + Sync {
    /// Dispatch `event` to every handler subscribed to its type.
    ///
    /// Fails with `InvalidArgument` if the event carries no type tag, and with
    /// `HandlerFailure` if any handler failed (after all of them ran).
    fn publish(&self, ctx: &EventContext, event: &E) -> Result<(), BusError>;

    /// Append `handler` to the list for `event_type`.
    ///
    /// Registering the same handler twice is allowed; it then runs twice.
    fn subscribe(
        &self,
        event_type: &str,
        handler: SharedHandler<E>,
    ) -> Result<Subscription, BusError>;

    /// Remove the registration behind `subscription`.
    fn unsubscribe(&self, subscription: &Subscription) -> Result<(), BusError>;

    /// Remove the first registration of this exact handler value (pointer identity)
    /// for `event_type`, preserving the order of the rest.
    fn unsubscribe_handler(
        &self,
        event_type: &str,
        handler: &SharedHandler<E>,
    ) -> Result<(), BusError>;
}

impl<E, B> EventBus<E> for Arc<B>
where
    B: EventBus<E> + ?Sized,
{
    fn publish(&self, ctx: &EventContext, event: &E) -> Result<(), BusError> {
        (**self).publish(ctx, event)
    }

    fn subscribe(
        &self,
        event_type: &str,
        handler: SharedHandler<E>,
    ) -> Result<Subscription, BusError> {
        (**self).subscribe(event_type, handler)
    }

    fn unsubscribe(&self, subscription: &Subscription) -> Result<(), BusError> {
        (**self).unsubscribe(subscription)
    }

    fn unsubscribe_handler(
        &self,
        event_type: &str,
        handler: &SharedHandler<E>,
    ) -> Result<(), BusError> {
        (**self).unsubscribe_handler(event_type, handler)
    }
}

/// Reject blank event types before touching any lock.
pub(crate) fn validate_event_type(event_type: &str) -> Result<(), BusError> {
    if event_type.trim().is_empty() {
        return Err(BusError::invalid_argument("event type cannot be empty"));
    }
    Ok(())
}
