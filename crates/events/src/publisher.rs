//! Publish-only facade handed to application services.

use std::sync::Arc;

use crate::bus::EventBus;
use crate::context::EventContext;
use crate::error::BusError;
use crate::event::Event;

/// Narrow "publish capability" for producers.
///
/// Services depend on this instead of [`EventBus`] so they cannot subscribe or
/// unsubscribe anything.
pub trait EventPublisher<E>: Send + Sync {
    fn publish_event(&self, ctx: &EventContext, event: &E) -> Result<(), BusError>;

    /// Publish after a committed mutation: a failure is logged and swallowed,
    /// never propagated into the business operation that triggered it.
    fn publish_best_effort(&self, ctx: &EventContext, event: &E)
    where
        E: Event,
    {
        if let Err(err) = self.publish_event(ctx, event) {
            tracing::warn!(
                event_type = event.event_type(),
                event_id = %event.event_id(),
                aggregate_id = event.aggregate_id(),
                correlation_id = ctx.correlation_id(),
                error = %err,
                "failed to publish event"
            );
        }
    }
}

/// [`EventPublisher`] that delegates 1:1 to a shared bus.
pub struct BusPublisher<E> {
    bus: Arc<dyn EventBus<E>>,
}

impl<E> BusPublisher<E> {
    pub fn new(bus: Arc<dyn EventBus<E>>) -> Self {
        Self { bus }
    }
}

impl<E> Clone for BusPublisher<E> {
    fn clone(&self) -> Self {
        Self {
            bus: Arc::clone(&self.bus),
        }
    }
}

impl<E> core::fmt::Debug for BusPublisher<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BusPublisher").finish_non_exhaustive()
    }
}

impl<E> EventPublisher<E> for BusPublisher<E> {
    fn publish_event(&self, ctx: &EventContext, event: &E) -> Result<(), BusError> {
        self.bus.publish(ctx, event)
    }
}

impl<E, P> EventPublisher<E> for Arc<P>
where
    P: EventPublisher<E> + ?Sized,
{
    fn publish_event(&self, ctx: &EventContext, event: &E) -> Result<(), BusError> {
        (**self).publish_event(ctx, event)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::catalog::{DomainEvent, OrganizationDeletedEvent, event_types};
    use crate::handler::handler_fn;
    use crate::in_memory_bus::InMemoryEventBus;

    fn org_deleted() -> DomainEvent {
        OrganizationDeletedEvent::new("org-1", "Acme").into()
    }

    #[test]
    fn publish_event_delegates_to_bus() {
        let bus = Arc::new(InMemoryEventBus::<DomainEvent>::new());
        let seen: Arc<Mutex<Vec<String>>> = Arc::default();
        let sink = Arc::clone(&seen);
        bus.subscribe(
            event_types::ORGANIZATION_DELETED,
            handler_fn("sink", move |_ctx, event: &DomainEvent| {
                sink.lock().unwrap().push(event.aggregate_id().to_string());
                Ok(())
            }),
        )
        .unwrap();

        let publisher = BusPublisher::new(bus.clone());
        publisher
            .publish_event(&EventContext::new(), &org_deleted())
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), ["org-1"]);
    }

    #[test]
    fn publish_event_surfaces_handler_failure() {
        let bus = Arc::new(InMemoryEventBus::<DomainEvent>::new());
        bus.subscribe(
            event_types::ORGANIZATION_DELETED,
            handler_fn("broken", |_ctx, _event: &DomainEvent| anyhow::bail!("store offline")),
        )
        .unwrap();

        let publisher = BusPublisher::new(bus);
        let err = publisher
            .publish_event(&EventContext::new(), &org_deleted())
            .unwrap_err();

        assert!(err.is_handler_failure());
    }

    #[test]
    fn best_effort_swallows_failures_after_running_handlers() {
        let bus = Arc::new(InMemoryEventBus::<DomainEvent>::new());
        let ran: Arc<Mutex<u32>> = Arc::default();
        bus.subscribe(
            event_types::ORGANIZATION_DELETED,
            handler_fn("broken", |_ctx, _event: &DomainEvent| anyhow::bail!("store offline")),
        )
        .unwrap();
        let counter = Arc::clone(&ran);
        bus.subscribe(
            event_types::ORGANIZATION_DELETED,
            handler_fn("counter", move |_ctx, _event: &DomainEvent| {
                *counter.lock().unwrap() += 1;
                Ok(())
            }),
        )
        .unwrap();

        let publisher: Arc<dyn EventPublisher<DomainEvent>> = Arc::new(BusPublisher::new(bus));
        publisher.publish_best_effort(&EventContext::new(), &org_deleted());

        assert_eq!(*ran.lock().unwrap(), 1);
    }
}
