//! Handler contract: a unit of behaviour the bus invokes for each matching event.

use std::sync::Arc;

use crate::context::EventContext;

/// Result of a single handler invocation.
pub type HandlerResult = anyhow::Result<()>;

/// Handles published events of type `E`.
///
/// Handlers run synchronously on the publishing thread, so they must return
/// promptly; slow work belongs on a queue the handler feeds. The event is shared
/// read-only by every handler of one dispatch: copy what you need to keep.
pub trait EventHandler<E>: Send + Sync {
    fn handle(&self, ctx: &EventContext, event: &E) -> HandlerResult;

    /// Name used in logs and failure reports.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// A registered handler value. Identity is the `Arc` allocation, not behaviour:
/// two clones of one `SharedHandler` are the same handler, two equal closures
/// are not.
pub type SharedHandler<E> = Arc<dyn EventHandler<E>>;

/// Whether two handler values are the same allocation.
pub fn same_handler<E>(a: &SharedHandler<E>, b: &SharedHandler<E>) -> bool {
    // Compare data pointers only; vtable pointers are not unique per type.
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

/// Closure-backed handler, see [`handler_fn`].
pub struct FnHandler<F> {
    name: String,
    f: F,
}

impl<E, F> EventHandler<E> for FnHandler<F>
where
    F: Fn(&EventContext, &E) -> HandlerResult + Send + Sync,
{
    fn handle(&self, ctx: &EventContext, event: &E) -> HandlerResult {
        (self.f)(ctx, event)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Wrap a closure as a named, shareable handler.
pub fn handler_fn<E, F>(name: impl Into<String>, f: F) -> SharedHandler<E>
where
    E: 'static,
    F: Fn(&EventContext, &E) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(FnHandler {
        name: name.into(),
        f,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    impl EventHandler<u32> for Noop {
        fn handle(&self, _ctx: &EventContext, _event: &u32) -> HandlerResult {
            Ok(())
        }
    }

    #[test]
    fn identity_is_per_allocation() {
        let a: SharedHandler<u32> = Arc::new(Noop);
        let a_clone = Arc::clone(&a);
        let b: SharedHandler<u32> = Arc::new(Noop);

        assert!(same_handler(&a, &a_clone));
        assert!(!same_handler(&a, &b));
    }

    #[test]
    fn closure_handler_reports_its_name() {
        let h = handler_fn("audit", |_ctx: &EventContext, event: &u32| {
            anyhow::ensure!(*event < 10, "value {event} too large");
            Ok(())
        });

        assert_eq!(h.name(), "audit");
        assert!(h.handle(&EventContext::new(), &3).is_ok());
        let err = h.handle(&EventContext::new(), &42).unwrap_err();
        assert_eq!(err.to_string(), "value 42 too large");
    }

    #[test]
    fn default_name_is_type_name() {
        let h: SharedHandler<u32> = Arc::new(Noop);
        assert!(h.name().ends_with("Noop"));
    }
}
