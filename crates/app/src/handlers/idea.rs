//! Idea-domain reactions. Ideas belong to an organization and have an author.

use feedback_events::{DomainEvent, EventContext, HandlerResult, event_types};

use super::{HandlerSet, Route, ignore_unexpected};

#[derive(Debug, Clone, Copy, Default)]
pub struct IdeaEventHandlers;

impl HandlerSet for IdeaEventHandlers {
    fn name(&self) -> &'static str {
        "idea"
    }

    fn routes(&self) -> Vec<Route> {
        vec![
            Route {
                event_type: event_types::ORGANIZATION_DELETED,
                handler: "idea.on_organization_deleted",
                f: on_organization_deleted,
            },
            Route {
                event_type: event_types::USER_DELETED,
                handler: "idea.on_user_deleted",
                f: on_user_deleted,
            },
        ]
    }
}

fn on_organization_deleted(ctx: &EventContext, event: &DomainEvent) -> HandlerResult {
    let DomainEvent::OrganizationDeleted(e) = event else {
        return ignore_unexpected("idea.on_organization_deleted", event);
    };

    tracing::info!(
        organization_id = %e.organization_id,
        correlation_id = ctx.correlation_id(),
        "archiving ideas of deleted organization"
    );
    Ok(())
}

/// Ideas outlive their author; they are kept and marked orphaned.
fn on_user_deleted(ctx: &EventContext, event: &DomainEvent) -> HandlerResult {
    let DomainEvent::UserDeleted(e) = event else {
        return ignore_unexpected("idea.on_user_deleted", event);
    };

    tracing::info!(
        user_id = %e.user_id,
        organization_id = ctx.organization_id(),
        correlation_id = ctx.correlation_id(),
        "orphaning ideas authored by deleted user"
    );
    Ok(())
}
