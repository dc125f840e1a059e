//! User-domain reactions to other domains' lifecycle events.

use feedback_events::{DomainEvent, EventContext, HandlerResult, event_types};

use super::{HandlerSet, Route, ignore_unexpected};

#[derive(Debug, Clone, Copy, Default)]
pub struct UserEventHandlers;

impl HandlerSet for UserEventHandlers {
    fn name(&self) -> &'static str {
        "user"
    }

    fn routes(&self) -> Vec<Route> {
        vec![
            Route {
                event_type: event_types::ORGANIZATION_DELETED,
                handler: "user.on_organization_deleted",
                f: on_organization_deleted,
            },
            Route {
                event_type: event_types::ROLE_DELETED,
                handler: "user.on_role_deleted",
                f: on_role_deleted,
            },
        ]
    }
}

/// Memberships in a deleted organization are gone.
fn on_organization_deleted(ctx: &EventContext, event: &DomainEvent) -> HandlerResult {
    let DomainEvent::OrganizationDeleted(e) = event else {
        return ignore_unexpected("user.on_organization_deleted", event);
    };

    tracing::info!(
        organization_id = %e.organization_id,
        organization_name = %e.name,
        correlation_id = ctx.correlation_id(),
        "removing user memberships of deleted organization"
    );
    Ok(())
}

/// Users holding a deleted role need a new one.
fn on_role_deleted(ctx: &EventContext, event: &DomainEvent) -> HandlerResult {
    let DomainEvent::RoleDeleted(e) = event else {
        return ignore_unexpected("user.on_role_deleted", event);
    };

    tracing::info!(
        role_id = %e.role_id,
        organization_id = %e.organization_id,
        correlation_id = ctx.correlation_id(),
        "users assigned to deleted role need reassignment"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use feedback_events::{
        InMemoryEventBus, OrganizationDeletedEvent, RoleDeletedEvent, UserDeletedEvent,
    };

    use super::*;

    #[test]
    fn reacts_to_subscribed_events() {
        let ctx = EventContext::new().with_correlation_id("req-1");

        let org_deleted = DomainEvent::from(OrganizationDeletedEvent::new("org-1", "Acme"));
        let role_deleted = DomainEvent::from(RoleDeletedEvent::new("role-1", "org-1", "Editor"));

        assert!(on_organization_deleted(&ctx, &org_deleted).is_ok());
        assert!(on_role_deleted(&ctx, &role_deleted).is_ok());
    }

    #[test]
    fn unexpected_event_is_skipped() {
        let event = DomainEvent::from(UserDeletedEvent::new("user-1", "a@example.com"));

        assert!(on_organization_deleted(&EventContext::new(), &event).is_ok());
    }

    #[test]
    fn registers_on_organization_and_role_deletion() {
        let bus = InMemoryEventBus::<DomainEvent>::new();

        UserEventHandlers.register(&bus).unwrap();

        assert_eq!(bus.event_types().unwrap(), ["organization.deleted", "role.deleted"]);
    }
}
