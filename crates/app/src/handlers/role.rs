//! Role-domain reactions.

use feedback_events::{DomainEvent, Event, EventContext, HandlerResult, event_types};

use super::{HandlerSet, Route, ignore_unexpected};

#[derive(Debug, Clone, Copy, Default)]
pub struct RoleEventHandlers;

impl HandlerSet for RoleEventHandlers {
    fn name(&self) -> &'static str {
        "role"
    }

    fn routes(&self) -> Vec<Route> {
        vec![
            Route {
                event_type: event_types::ORGANIZATION_DELETED,
                handler: "role.on_organization_deleted",
                f: on_organization_deleted,
            },
            Route {
                event_type: event_types::USER_ROLE_CHANGED_IN_ORGANIZATION,
                handler: "role.on_user_role_changed",
                f: on_user_role_changed,
            },
        ]
    }
}

fn on_organization_deleted(ctx: &EventContext, event: &DomainEvent) -> HandlerResult {
    let DomainEvent::OrganizationDeleted(e) = event else {
        return ignore_unexpected("role.on_organization_deleted", event);
    };

    tracing::info!(
        organization_id = %e.organization_id,
        correlation_id = ctx.correlation_id(),
        "dropping roles scoped to deleted organization"
    );
    Ok(())
}

/// Audit trail of role changes.
fn on_user_role_changed(ctx: &EventContext, event: &DomainEvent) -> HandlerResult {
    let DomainEvent::UserRoleChangedInOrganization(e) = event else {
        return ignore_unexpected("role.on_user_role_changed", event);
    };

    tracing::info!(
        user_id = %e.user_id,
        organization_id = %e.organization_id,
        old_role_id = %e.old_role_id,
        new_role_id = %e.new_role_id,
        new_role_name = %e.new_role_name,
        version = event.version(),
        correlation_id = ctx.correlation_id(),
        "user role changed"
    );
    Ok(())
}
