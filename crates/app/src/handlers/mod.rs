//! Per-domain consumer handler sets.
//!
//! Each domain reacts to lifecycle events of the others (e.g. `organization.deleted`)
//! through the bus, so no domain imports another directly.

use feedback_events::{
    BusError, DomainEvent, Event, EventBus, EventContext, HandlerResult, Subscription, handler_fn,
};

use crate::config::HandlerSetKind;

pub mod idea;
pub mod role;
pub mod user;

pub use idea::IdeaEventHandlers;
pub use role::RoleEventHandlers;
pub use user::UserEventHandlers;

/// Handler function signature used by the sets.
pub type HandlerFnPtr = fn(&EventContext, &DomainEvent) -> HandlerResult;

/// One subscription of a handler set.
#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub event_type: &'static str,
    /// `{set}.{reaction}`, shows up in logs and failure reports.
    pub handler: &'static str,
    pub f: HandlerFnPtr,
}

/// A group of handlers owned by one domain.
pub trait HandlerSet: Send + Sync {
    fn name(&self) -> &'static str;

    /// Routes in registration order.
    fn routes(&self) -> Vec<Route>;

    /// Subscribe every route. All-or-nothing: on failure the routes registered so
    /// far are removed again.
    fn register(&self, bus: &dyn EventBus<DomainEvent>) -> Result<Vec<Subscription>, BusError> {
        let mut subscriptions = Vec::new();
        for route in self.routes() {
            match bus.subscribe(route.event_type, handler_fn(route.handler, route.f)) {
                Ok(subscription) => subscriptions.push(subscription),
                Err(err) => {
                    for subscription in &subscriptions {
                        if let Err(rollback) = bus.unsubscribe(subscription) {
                            tracing::warn!(
                                handler_set = self.name(),
                                event_type = subscription.event_type(),
                                subscription_id = %subscription.id(),
                                error = %rollback,
                                "failed to roll back handler registration"
                            );
                        }
                    }
                    return Err(err);
                }
            }
        }
        Ok(subscriptions)
    }
}

impl HandlerSetKind {
    pub fn handler_set(&self) -> Box<dyn HandlerSet> {
        match self {
            HandlerSetKind::User => Box::new(UserEventHandlers),
            HandlerSetKind::Role => Box::new(RoleEventHandlers),
            HandlerSetKind::Idea => Box::new(IdeaEventHandlers),
        }
    }
}

/// Handlers only receive the types they subscribed to; anything else means a
/// routing mistake, which is logged and skipped.
pub(crate) fn ignore_unexpected(handler: &str, event: &DomainEvent) -> HandlerResult {
    tracing::debug!(
        handler,
        event_type = event.event_type(),
        event_id = %event.event_id(),
        "ignoring unexpected event"
    );
    Ok(())
}
