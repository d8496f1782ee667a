#![forbid(unsafe_code)]

//! Subscription handles and the unsubscribe capability.
//!
//! A [`Subscription`] pairs a registered callback with the store that holds
//! it. Teardown is always explicit: dropping the handle keeps the callback
//! registered, which is what fire-and-forget side-effect subscribers rely
//! on. [`Subscription::unsubscribe`] is idempotent and is a no-op once the
//! owning store has been dropped.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_subscription_id() -> SubscriptionId {
    SubscriptionId(NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed))
}

/// Unique identifier for one live subscription.
///
/// Ids come from a process-wide counter and are never reused, so no two
/// subscriptions ever share a handle, even across stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Raw id value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Capability to remove a subscriber from its store.
pub struct Subscription {
    id: SubscriptionId,
    detach: Rc<dyn Fn(SubscriptionId)>,
    active: Cell<bool>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, detach: Rc<dyn Fn(SubscriptionId)>) -> Self {
        Self {
            id,
            detach,
            active: Cell::new(true),
        }
    }

    /// Id of the subscription this handle controls.
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Whether [`unsubscribe`](Self::unsubscribe) has not been called yet.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Remove the callback from the store's registry.
    ///
    /// Safe to call any number of times; calls after the first (or after
    /// the store itself is gone) do nothing.
    pub fn unsubscribe(&self) {
        if self.active.replace(false) {
            self.detach.as_ref()(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active.get())
            .finish()
    }
}
