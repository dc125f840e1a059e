//! In-process event bus: a handler registry behind a read/write lock.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::bus::{EventBus, Subscription, SubscriptionId, validate_event_type};
use crate::context::EventContext;
use crate::error::{BusError, HandlerFailure, HandlerFailures};
use crate::event::Event;
use crate::handler::{EventHandler, HandlerResult, SharedHandler, same_handler};

/// Shared by every bus in the process: a handle never names a registration on
/// another bus.
static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(1);

struct Registration<E> {
    id: SubscriptionId,
    handler: SharedHandler<E>,
}

impl<E> Clone for Registration<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            handler: self.handler.clone(),
        }
    }
}

/// In-memory pub/sub bus.
///
/// - No IO / no async / no background workers
/// - Handlers run inline on the publishing thread, in subscription order
/// - Publish clones the handler list under the read lock and dispatches after
///   releasing it, so handlers may (un)subscribe without deadlocking; such changes
///   apply from the next publish on
/// - Registry changes take the write lock
pub struct InMemoryEventBus<E> {
    handlers: RwLock<HashMap<String, Vec<Registration<E>>>>,
}

impl<E> InMemoryEventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registrations for `event_type`.
    pub fn handler_count(&self, event_type: &str) -> Result<usize, BusError> {
        let handlers = self.handlers.read().map_err(|_| BusError::Poisoned)?;
        Ok(handlers.get(event_type).map_or(0, Vec::len))
    }

    /// Event types with at least one registration, sorted.
    pub fn event_types(&self) -> Result<Vec<String>, BusError> {
        let handlers = self.handlers.read().map_err(|_| BusError::Poisoned)?;
        let mut types: Vec<String> = handlers.keys().cloned().collect();
        types.sort();
        Ok(types)
    }

    /// Total registrations across all event types.
    pub fn subscription_count(&self) -> Result<usize, BusError> {
        let handlers = self.handlers.read().map_err(|_| BusError::Poisoned)?;
        Ok(handlers.values().map(Vec::len).sum())
    }

    fn snapshot(&self, event_type: &str) -> Result<Vec<Registration<E>>, BusError> {
        let handlers = self.handlers.read().map_err(|_| BusError::Poisoned)?;
        Ok(handlers.get(event_type).cloned().unwrap_or_default())
    }

    fn remove_first<P>(&self, event_type: &str, matches: P) -> Result<Registration<E>, BusError>
    where
        P: Fn(&Registration<E>) -> bool,
    {
        let mut handlers = self.handlers.write().map_err(|_| BusError::Poisoned)?;

        let Some(list) = handlers.get_mut(event_type) else {
            return Err(BusError::not_found(format!(
                "no handlers registered for event type '{event_type}'"
            )));
        };
        let Some(position) = list.iter().position(matches) else {
            return Err(BusError::not_found(format!(
                "handler not registered for event type '{event_type}'"
            )));
        };

        let removed = list.remove(position);
        if list.is_empty() {
            handlers.remove(event_type);
        }
        Ok(removed)
    }
}

impl<E> Default for InMemoryEventBus<E> {
    fn default() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }
}

impl<E> core::fmt::Debug for InMemoryEventBus<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut dbg = f.debug_struct("InMemoryEventBus");
        match self.handlers.read() {
            Ok(handlers) => {
                let counts: HashMap<&str, usize> =
                    handlers.iter().map(|(k, v)| (k.as_str(), v.len())).collect();
                dbg.field("handlers", &counts)
            }
            Err(_) => dbg.field("handlers", &"<poisoned>"),
        };
        dbg.finish()
    }
}

impl<E> EventBus<E> for InMemoryEventBus<E>
where
    E: Event,
{
    fn publish(&self, ctx: &EventContext, event: &E) -> Result<(), BusError> {
        let event_type = event.event_type();
        if event_type.trim().is_empty() {
            return Err(BusError::invalid_argument(
                "cannot publish an event without an event type",
            ));
        }

        let registrations = self.snapshot(event_type)?;
        if registrations.is_empty() {
            tracing::trace!(event_type, event_id = %event.event_id(), "no handlers registered");
            return Ok(());
        }

        tracing::trace!(
            event_type,
            event_id = %event.event_id(),
            handlers = registrations.len(),
            "dispatching event"
        );

        let mut failures = Vec::new();
        for registration in &registrations {
            let handler = registration.handler.as_ref();
            if let Err(error) = invoke(handler, ctx, event) {
                tracing::warn!(
                    event_type,
                    event_id = %event.event_id(),
                    aggregate_id = event.aggregate_id(),
                    subscription_id = %registration.id,
                    handler = handler.name(),
                    error = %format!("{error:#}"),
                    "event handler failed"
                );
                failures.push(HandlerFailure {
                    subscription_id: registration.id,
                    handler: handler.name().to_string(),
                    error,
                });
            }
        }

        if failures.is_empty() {
            return Ok(());
        }

        Err(HandlerFailures {
            event_type: event_type.to_string(),
            event_id: event.event_id(),
            handlers_invoked: registrations.len(),
            failures,
        }
        .into())
    }

    fn subscribe(
        &self,
        event_type: &str,
        handler: SharedHandler<E>,
    ) -> Result<Subscription, BusError> {
        validate_event_type(event_type)?;

        let id = SubscriptionId::from_raw(NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed));
        let handler_name = handler.name().to_string();

        {
            let mut handlers = self.handlers.write().map_err(|_| BusError::Poisoned)?;
            handlers
                .entry(event_type.to_string())
                .or_default()
                .push(Registration { id, handler });
        }

        tracing::debug!(
            event_type,
            subscription_id = %id,
            handler = %handler_name,
            "handler subscribed"
        );
        Ok(Subscription::new(id, event_type))
    }

    fn unsubscribe(&self, subscription: &Subscription) -> Result<(), BusError> {
        validate_event_type(subscription.event_type())?;

        let id = subscription.id();
        self.remove_first(subscription.event_type(), |r| r.id == id)?;

        tracing::debug!(
            event_type = subscription.event_type(),
            subscription_id = %id,
            "handler unsubscribed"
        );
        Ok(())
    }

    fn unsubscribe_handler(
        &self,
        event_type: &str,
        handler: &SharedHandler<E>,
    ) -> Result<(), BusError> {
        validate_event_type(event_type)?;

        let removed = self.remove_first(event_type, |r| same_handler(&r.handler, handler))?;

        tracing::debug!(
            event_type,
            subscription_id = %removed.id,
            handler = removed.handler.name(),
            "handler unsubscribed"
        );
        Ok(())
    }
}

/// Run one handler, turning a panic into a handler error.
fn invoke<E>(handler: &dyn EventHandler<E>, ctx: &EventContext, event: &E) -> HandlerResult {
    match panic::catch_unwind(AssertUnwindSafe(|| handler.handle(ctx, event))) {
        Ok(result) => result,
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
                .unwrap_or("panic");
            Err(anyhow::anyhow!("handler panicked: {msg}"))
        }
    }
}
