//! `feedback-events`: in-process domain event bus.
//!
//! Services publish [`DomainEvent`]s after a committed mutation; per-domain handler
//! sets subscribe to event types and react without the producing service knowing
//! about them.

pub mod bus;
pub mod catalog;
pub mod context;
pub mod error;
pub mod event;
pub mod handler;
pub mod in_memory_bus;
pub mod publisher;

pub use bus::{EventBus, Subscription, SubscriptionId};
pub use catalog::{
    DomainEvent, OrganizationCreatedEvent, OrganizationDeletedEvent, OrganizationUpdatedEvent,
    RoleCreatedEvent, RoleDeletedEvent, RoleUpdatedEvent, UserAddedToOrganizationEvent,
    UserCreatedEvent, UserDeletedEvent, UserRemovedFromOrganizationEvent,
    UserRoleChangedInOrganizationEvent, UserUpdatedEvent, event_types,
};
pub use context::EventContext;
pub use error::{BusError, HandlerFailure, HandlerFailures};
pub use event::{Event, EventId, EventMetadata};
pub use handler::{EventHandler, FnHandler, HandlerResult, SharedHandler, handler_fn, same_handler};
pub use in_memory_bus::InMemoryEventBus;
pub use publisher::{BusPublisher, EventPublisher};
