//! Builds one bus per process and injects it into producers and consumers.

use std::collections::BTreeMap;
use std::sync::Arc;

use feedback_events::{
    BusError, BusPublisher, DomainEvent, EventBus, EventPublisher, InMemoryEventBus, Subscription,
};

use crate::config::AppConfig;

/// The event bus plus the consumer subscriptions registered on it.
///
/// There is no global bus: every `EventSystem` owns its own, so tests get
/// isolated instances.
#[derive(Debug)]
pub struct EventSystem {
    bus: Arc<InMemoryEventBus<DomainEvent>>,
    subscriptions: Vec<Subscription>,
}

impl EventSystem {
    /// Create the bus and register the handler sets enabled in `config`.
    pub fn new(config: &AppConfig) -> Result<Self, BusError> {
        let bus = Arc::new(InMemoryEventBus::<DomainEvent>::new());
        let mut subscriptions = Vec::new();

        for kind in &config.handler_sets {
            let set = kind.handler_set();
            let registered = set.register(bus.as_ref())?;
            tracing::info!(
                handler_set = set.name(),
                subscriptions = registered.len(),
                "registered event handlers"
            );
            subscriptions.extend(registered);
        }

        Ok(Self { bus, subscriptions })
    }

    /// Full bus access, for consumers that subscribe on their own.
    pub fn bus(&self) -> Arc<InMemoryEventBus<DomainEvent>> {
        Arc::clone(&self.bus)
    }

    /// Publish-only handle for application services.
    pub fn publisher(&self) -> Arc<dyn EventPublisher<DomainEvent>> {
        let bus: Arc<dyn EventBus<DomainEvent>> = self.bus.clone();
        Arc::new(BusPublisher::new(bus))
    }

    /// Subscriptions registered by the enabled handler sets.
    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    /// Event type → number of handlers currently registered.
    pub fn routing_table(&self) -> Result<BTreeMap<String, usize>, BusError> {
        let mut table = BTreeMap::new();
        for event_type in self.bus.event_types()? {
            let count = self.bus.handler_count(&event_type)?;
            table.insert(event_type, count);
        }
        Ok(table)
    }

    /// Remove every subscription this system registered. Handlers subscribed
    /// directly on [`EventSystem::bus`] are left alone.
    ///
    /// Every subscription is attempted. One that is already gone counts as
    /// removed; any other failure is logged and the first one is returned once
    /// the rest have been tried.
    pub fn shutdown(self) -> Result<(), BusError> {
        let mut removed = 0;
        let mut first_error = None;

        for subscription in &self.subscriptions {
            match self.bus.unsubscribe(subscription) {
                Ok(()) => removed += 1,
                Err(err) if err.is_not_found() => {
                    tracing::debug!(
                        event_type = subscription.event_type(),
                        subscription_id = %subscription.id(),
                        "subscription already removed"
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        event_type = subscription.event_type(),
                        subscription_id = %subscription.id(),
                        error = %err,
                        "failed to unsubscribe event handler"
                    );
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        tracing::info!(
            subscriptions = self.subscriptions.len(),
            removed,
            "event handlers unsubscribed"
        );
        first_error.map_or(Ok(()), Err)
    }
}
