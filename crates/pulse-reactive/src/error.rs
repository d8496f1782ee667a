#![forbid(unsafe_code)]

//! Process-wide error channel for notification failures.
//!
//! Failures inside a notification pass (a panicking subscriber, a panicking
//! projection, a rejected reentrant write) never abort the pass. Each one
//! is wrapped in a [`NotifyError`] and handed to the installed hook, or to
//! `tracing::error!` when no hook is installed.
//!
//! The channel is thread-local: stores are single-threaded, and a per-thread
//! hook keeps parallel test runs isolated.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::store::StoreId;

/// What failed during a notification pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOrigin {
    /// A subscriber callback panicked.
    Subscriber,
    /// A derived store's projection panicked; the derived store keeps its
    /// last successfully computed value.
    Projection,
    /// A subscriber attempted to write into a store that was notifying it.
    /// The write was rejected before touching the value.
    Cycle,
}

impl FailureOrigin {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FailureOrigin::Subscriber => "subscriber",
            FailureOrigin::Projection => "projection",
            FailureOrigin::Cycle => "cycle",
        }
    }
}

/// One failure observed during a notification pass.
#[derive(Debug, Clone)]
pub struct NotifyError {
    /// Store on whose notification pass the failure surfaced.
    pub store: StoreId,
    pub origin: FailureOrigin,
    /// Panic payload rendered as text, best effort.
    pub message: String,
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "store {} {} failure: {}",
            self.store.raw(),
            self.origin.as_str(),
            self.message
        )
    }
}

type Hook = Rc<dyn Fn(&NotifyError)>;

thread_local! {
    static HOOK: RefCell<Option<Hook>> = const { RefCell::new(None) };
}

/// Install the error hook for the current thread, replacing any previous
/// one. The hook observes every notification failure on this thread.
pub fn set_error_hook(hook: impl Fn(&NotifyError) + 'static) {
    HOOK.with(|slot| *slot.borrow_mut() = Some(Rc::new(hook)));
}

/// Remove the current thread's error hook. Subsequent failures fall back
/// to `tracing::error!`.
pub fn clear_error_hook() {
    HOOK.with(|slot| slot.borrow_mut().take());
}

pub(crate) fn report(error: &NotifyError) {
    // Clone the hook out of the slot so the hook itself may install or
    // clear hooks without hitting a reentrant borrow.
    let hook = HOOK.with(|slot| slot.borrow().clone());
    match hook {
        Some(hook) => hook.as_ref()(error),
        None => tracing::error!(
            store = error.store.raw(),
            origin = error.origin.as_str(),
            "{}",
            error.message
        ),
    }
}

pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("panic payload of unknown type")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    fn error_for(store: StoreId) -> NotifyError {
        NotifyError {
            store,
            origin: FailureOrigin::Subscriber,
            message: String::from("boom"),
        }
    }

    #[test]
    fn hook_observes_reports() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        set_error_hook(move |error| sink.borrow_mut().push(error.clone()));

        let id = Store::new(0u8).id();
        report(&error_for(id));

        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].store, id);
        clear_error_hook();
    }

    #[test]
    fn set_replaces_previous_hook() {
        let first = Rc::new(RefCell::new(0usize));
        let second = Rc::new(RefCell::new(0usize));

        let sink = Rc::clone(&first);
        set_error_hook(move |_| *sink.borrow_mut() += 1);
        let sink = Rc::clone(&second);
        set_error_hook(move |_| *sink.borrow_mut() += 1);

        report(&error_for(Store::new(0u8).id()));

        assert_eq!(*first.borrow(), 0);
        assert_eq!(*second.borrow(), 1);
        clear_error_hook();
    }

    #[test]
    fn cleared_hook_no_longer_fires() {
        let seen = Rc::new(RefCell::new(0usize));
        let sink = Rc::clone(&seen);
        set_error_hook(move |_| *sink.borrow_mut() += 1);
        clear_error_hook();

        // Falls back to tracing; the hook must not fire.
        report(&error_for(Store::new(0u8).id()));
        assert_eq!(*seen.borrow(), 0);
    }

    #[test]
    fn panic_message_extracts_common_payloads() {
        let as_str: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(as_str), "static message");

        let as_string: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_message(as_string), "owned message");

        let opaque: Box<dyn Any + Send> = Box::new(42u32);
        assert_eq!(panic_message(opaque), "panic payload of unknown type");
    }

    #[test]
    fn display_includes_origin_and_store() {
        let id = Store::new(0u8).id();
        let rendered = error_for(id).to_string();
        assert!(rendered.contains("subscriber failure"));
        assert!(rendered.contains(&id.raw().to_string()));
    }
}
