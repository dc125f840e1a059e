//! End-to-end: producers publish through the facade, handler sets and ad-hoc
//! subscribers react, failures never undo the producer's mutation.

use std::sync::{Arc, Mutex};

use feedback_app::{AppConfig, EventSystem, HandlerSetKind};
use feedback_events::{
    DomainEvent, Event, EventBus, EventContext, EventPublisher, OrganizationDeletedEvent,
    UserCreatedEvent, UserDeletedEvent, event_types, handler_fn,
};

/// Minimal producer: commits to its own store, then publishes best-effort.
struct OrganizationService {
    organizations: Mutex<Vec<String>>,
    publisher: Arc<dyn EventPublisher<DomainEvent>>,
}

impl OrganizationService {
    fn delete(&self, ctx: &EventContext, organization_id: &str) {
        self.organizations
            .lock()
            .unwrap()
            .retain(|id| id != organization_id);

        let deleted = OrganizationDeletedEvent::new(organization_id, "Acme").with_version(2);
        let event = DomainEvent::from(deleted);
        self.publisher.publish_best_effort(ctx, &event);
    }
}

#[test]
fn default_configuration_wires_every_handler_set() {
    let config = AppConfig::from_lookup(|_| None).unwrap();
    let system = EventSystem::new(&config).unwrap();

    let table = system.routing_table().unwrap();

    assert_eq!(table.get(event_types::ORGANIZATION_DELETED), Some(&3));
    assert_eq!(table.get(event_types::ROLE_DELETED), Some(&1));
    assert_eq!(table.get(event_types::USER_DELETED), Some(&1));
    assert_eq!(table.get(event_types::USER_ROLE_CHANGED_IN_ORGANIZATION), Some(&1));
    assert_eq!(table.get(event_types::USER_CREATED), None);
}

#[test]
fn publishing_to_registered_handler_sets_succeeds() {
    let system = EventSystem::new(&AppConfig::default()).unwrap();
    let publisher = system.publisher();
    let ctx = EventContext::new().with_correlation_id("req-42");

    let event = DomainEvent::from(OrganizationDeletedEvent::new("org-1", "Acme"));
    publisher.publish_event(&ctx, &event).unwrap();

    // Nobody listens to user.created by default: still fine.
    let event = DomainEvent::from(UserCreatedEvent::new("u", "u@example.com", "U", "r", "Member"));
    publisher.publish_event(&ctx, &event).unwrap();
}

#[test]
fn handler_failure_does_not_roll_back_the_mutation() {
    let system = EventSystem::new(&AppConfig::default()).unwrap();
    let bus = system.bus();

    let observed: Arc<Mutex<Vec<(String, u64)>>> = Arc::default();
    bus.subscribe(
        event_types::ORGANIZATION_DELETED,
        handler_fn("flaky", |_ctx, _event: &DomainEvent| anyhow::bail!("search index unavailable")),
    )
    .unwrap();
    let sink = Arc::clone(&observed);
    bus.subscribe(
        event_types::ORGANIZATION_DELETED,
        handler_fn("observer", move |_ctx, event: &DomainEvent| {
            sink.lock()
                .unwrap()
                .push((event.aggregate_id().to_string(), event.version()));
            Ok(())
        }),
    )
    .unwrap();

    let service = OrganizationService {
        organizations: Mutex::new(vec!["org-1".to_string(), "org-2".to_string()]),
        publisher: system.publisher(),
    };
    service.delete(&EventContext::new(), "org-1");

    assert_eq!(*service.organizations.lock().unwrap(), ["org-2"]);
    // Publish returned only after every handler ran, including the one after the failure.
    assert_eq!(*observed.lock().unwrap(), [("org-1".to_string(), 2)]);
}

#[test]
fn publish_surfaces_aggregated_failure_to_direct_callers() {
    let system = EventSystem::new(&AppConfig {
        handler_sets: vec![HandlerSetKind::Idea],
        ..AppConfig::default()
    })
    .unwrap();
    system
        .bus()
        .subscribe(
            event_types::USER_DELETED,
            handler_fn("strict", |_ctx, _event: &DomainEvent| anyhow::bail!("rejected")),
        )
        .unwrap();

    let event = DomainEvent::from(UserDeletedEvent::new("user-1", "a@example.com"));
    let err = system
        .publisher()
        .publish_event(&EventContext::new(), &event)
        .unwrap_err();

    let failures = err.handler_failures().unwrap();
    assert_eq!(failures.handlers_invoked, 2);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures.failures[0].handler, "strict");
}

#[test]
fn shutdown_removes_only_the_systems_own_subscriptions() {
    let system = EventSystem::new(&AppConfig::default()).unwrap();
    let bus = system.bus();
    bus.subscribe(
        event_types::USER_CREATED,
        handler_fn("external", |_ctx, _event: &DomainEvent| Ok(())),
    )
    .unwrap();

    system.shutdown().unwrap();

    assert_eq!(bus.event_types().unwrap(), ["user.created"]);
    assert_eq!(bus.subscription_count().unwrap(), 1);
}
