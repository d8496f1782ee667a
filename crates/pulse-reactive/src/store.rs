#![forbid(unsafe_code)]

//! Writable stores with synchronous, eager subscriber notification.
//!
//! # Design
//!
//! [`Store<T>`] wraps a value and an ordered subscriber registry in shared,
//! reference-counted storage. Cloning a `Store` clones the handle, not the
//! value. Every write through [`set()`](Store::set) or
//! [`update()`](Store::update) replaces the value and notifies all current
//! subscribers in-line on the calling thread, in registration order, before
//! control returns to the writer. There is no equality short-circuit: the
//! store is deliberately eager and notifies on every write.
//!
//! # Invariants
//!
//! 1. A new subscriber receives the current value synchronously before
//!    `subscribe` returns (replay-on-subscribe).
//! 2. Subscribers are notified in registration order on every write.
//! 3. A notification pass iterates a snapshot of the registry: subscribers
//!    added or removed mid-pass do not affect the in-progress pass.
//! 4. Subscribers always observe committed state; the value can only change
//!    through `set`/`update`, never in place.
//!
//! # Failure Modes
//!
//! - **Subscriber panics**: caught per-subscriber, reported on the error
//!   channel (see [`crate::error`]), delivery continues with the next
//!   subscriber.
//! - **Reentrant write**: a subscriber writing into the store that is
//!   notifying it would form a cycle in the synchronous, depth-first
//!   propagation graph. The write is rejected before the value is touched
//!   and surfaces on the error channel as a
//!   [`FailureOrigin::Cycle`](crate::error::FailureOrigin) failure.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{self, FailureOrigin, NotifyError};
use crate::registry::{Callback, Registry};
use crate::subscription::Subscription;

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

fn next_store_id() -> StoreId {
    StoreId(NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed))
}

thread_local! {
    // Set when a reentrant write is rejected, so the enclosing notification
    // pass can attribute the caught panic to a cycle rather than an
    // ordinary subscriber failure.
    static CYCLE_REJECTED: Cell<bool> = const { Cell::new(false) };
}

/// Unique identifier for a store instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreId(u64);

impl StoreId {
    /// Raw id value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Read capability shared by writable and derived stores.
///
/// Both [`Store<T>`] and [`crate::derived::Derived<T>`] expose the same
/// read/subscribe contract through this trait, so consumers and derived
/// constructors can accept either.
pub trait Readable<T> {
    /// Identifier of the underlying store instance.
    fn id(&self) -> StoreId;

    /// Clone of the current value.
    fn get(&self) -> T
    where
        T: Clone;

    /// Access the current value by reference without cloning.
    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R;

    /// Register a subscriber. The current value is replayed synchronously
    /// before this returns.
    fn subscribe(&self, subscriber: impl Fn(&T) + 'static) -> Subscription;
}

struct Shared<T> {
    id: StoreId,
    value: RefCell<T>,
    subscribers: RefCell<Registry<T>>,
    /// True while a notification pass runs on this store.
    notifying: Cell<bool>,
}

/// A mutable, observable holder of a value.
pub struct Store<T> {
    shared: Rc<Shared<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("id", &self.shared.id)
            .field("value", &self.shared.value.borrow())
            .field("subscribers", &self.shared.subscribers.borrow().len())
            .finish()
    }
}

impl<T: 'static> Store<T> {
    /// Create a store holding `initial` with no subscribers.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            shared: Rc::new(Shared {
                id: next_store_id(),
                value: RefCell::new(initial),
                subscribers: RefCell::new(Registry::new()),
                notifying: Cell::new(false),
            }),
        }
    }

    /// Identifier of this store instance.
    #[must_use]
    pub fn id(&self) -> StoreId {
        self.shared.id
    }

    /// Number of currently registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.borrow().len()
    }

    /// Access the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let value = self.shared.value.borrow();
        f(&value)
    }

    /// Register `subscriber` and replay the current value to it
    /// synchronously before returning.
    ///
    /// The returned [`Subscription`] is the only way to unregister;
    /// dropping it keeps the subscriber in place.
    pub fn subscribe(&self, subscriber: impl Fn(&T) + 'static) -> Subscription {
        let callback: Callback<T> = Rc::new(subscriber);
        let id = self
            .shared
            .subscribers
            .borrow_mut()
            .insert(Rc::clone(&callback));
        self.invoke_guarded(&callback);

        let weak = Rc::downgrade(&self.shared);
        Subscription::new(
            id,
            Rc::new(move |sub_id| {
                if let Some(shared) = weak.upgrade() {
                    shared.subscribers.borrow_mut().remove(sub_id);
                }
            }),
        )
    }

    /// Replace the value and notify every current subscriber.
    ///
    /// # Panics
    ///
    /// Panics when called from a subscriber of this same store while its
    /// notification pass is running (a reactive cycle). The value is left
    /// untouched in that case.
    pub fn set(&self, value: T) {
        if self.shared.notifying.get() {
            CYCLE_REJECTED.with(|flag| flag.set(true));
            panic!(
                "store {} written during its own notification pass (reactive cycle)",
                self.shared.id.raw()
            );
        }
        *self.shared.value.borrow_mut() = value;
        self.notify_all();
    }

    /// Replace the value with `f(current)`; equivalent to
    /// `set(f(current))`, including the notification pass.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = self.with(f);
        self.set(next);
    }

    fn notify_all(&self) {
        let snapshot = self.shared.subscribers.borrow().snapshot();
        tracing::trace!(
            store = self.shared.id.raw(),
            subscribers = snapshot.len(),
            "notify"
        );
        for (_, callback) in snapshot {
            self.invoke_guarded(&callback);
        }
    }

    /// Run one callback against the current value with panic isolation.
    ///
    /// The notifying flag is held for the duration of the call so that
    /// reentrant writes are rejected with a cycle diagnostic; it nests
    /// (replay inside a pass keeps the outer flag).
    fn invoke_guarded(&self, callback: &Callback<T>) {
        let callback: &dyn Fn(&T) = &**callback;
        let was_notifying = self.shared.notifying.replace(true);
        let result = {
            let value = self.shared.value.borrow();
            catch_unwind(AssertUnwindSafe(|| callback(&value)))
        };
        self.shared.notifying.set(was_notifying);

        if let Err(payload) = result {
            let origin = if CYCLE_REJECTED.with(|flag| flag.take()) {
                FailureOrigin::Cycle
            } else {
                FailureOrigin::Subscriber
            };
            error::report(&NotifyError {
                store: self.shared.id,
                origin,
                message: error::panic_message(payload),
            });
        }
    }
}

impl<T: Clone + 'static> Store<T> {
    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.shared.value.borrow().clone()
    }
}

impl<T: 'static> Readable<T> for Store<T> {
    fn id(&self) -> StoreId {
        Store::id(self)
    }

    fn get(&self) -> T
    where
        T: Clone,
    {
        Store::get(self)
    }

    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        Store::with(self, f)
    }

    fn subscribe(&self, subscriber: impl Fn(&T) + 'static) -> Subscription {
        Store::subscribe(self, subscriber)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
