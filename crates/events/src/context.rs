//! Per-call context handed to every handler during a dispatch.

use tokio_util::sync::CancellationToken;

/// Advisory context for a publish call.
///
/// The bus forwards the context untouched: it never checks cancellation itself,
/// and a handler that ignores it runs to completion. Cloning is cheap and clones
/// share the same cancellation state.
#[derive(Debug, Clone, Default)]
pub struct EventContext {
    cancellation: CancellationToken,
    correlation_id: Option<String>,
    organization_id: Option<String>,
}

impl EventContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an existing cancellation token (e.g. a request or shutdown token).
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Tenant the triggering request acted within.
    pub fn with_organization_id(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    /// Derive a context that is cancelled with this one but can also be
    /// cancelled on its own.
    pub fn child(&self) -> Self {
        Self {
            cancellation: self.cancellation.child_token(),
            correlation_id: self.correlation_id.clone(),
            organization_id: self.organization_id.clone(),
        }
    }

    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn organization_id(&self) -> Option<&str> {
        self.organization_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_cancellation() {
        let ctx = EventContext::new().with_correlation_id("req-1");
        let clone = ctx.clone();

        ctx.cancel();

        assert!(clone.is_cancelled());
        assert_eq!(clone.correlation_id(), Some("req-1"));
    }

    #[test]
    fn attached_token_cancels_the_context() {
        let shutdown = CancellationToken::new();
        let ctx = EventContext::new().with_cancellation(shutdown.child_token());

        assert!(!ctx.is_cancelled());
        shutdown.cancel();
        assert!(ctx.is_cancelled());
    }

    #[test]
    fn child_follows_parent_but_not_the_reverse() {
        let parent = EventContext::new().with_organization_id("org-1");
        let child = parent.child();

        child.cancel();
        assert!(!parent.is_cancelled());

        let other = parent.child();
        parent.cancel();
        assert!(other.is_cancelled());
        assert_eq!(other.organization_id(), Some("org-1"));
    }
}
