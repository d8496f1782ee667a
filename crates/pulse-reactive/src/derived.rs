#![forbid(unsafe_code)]

//! Read-only stores computed from upstream stores.
//!
//! # Design
//!
//! [`Derived<T>`] owns a private writable store and one internal
//! subscription per upstream. Construction seeds the projected value from
//! the upstreams' current values, then every upstream notification
//! recomputes the projection over the latest values of all upstreams and
//! pushes the result through the private store's notification pass. The
//! whole chain runs synchronously and depth-first: a derived store's own
//! subscribers hear about a root write before control returns to the root
//! writer.
//!
//! The write path is not exposed: consumers only see the read capability
//! set ([`get`](Derived::get) / [`with`](Derived::with) /
//! [`subscribe`](Derived::subscribe)).
//!
//! # Invariants
//!
//! 1. The exposed value is the projection of the latest values of all
//!    upstreams, recomputed once per upstream notification.
//! 2. Upstream subscriptions are never torn down, even with zero
//!    subscribers of its own; an unobserved derived store keeps
//!    recomputing.
//! 3. Upstream handlers hold a strong handle to the derived interior, so a
//!    derived pipeline stays live as long as its upstreams do, even after
//!    every external `Derived` handle is dropped.
//!
//! # Failure Modes
//!
//! - **Projection panics after construction**: reported on the error
//!   channel as a `Projection` failure; the derived store retains its last
//!   successfully computed value.
//! - **Projection panics during seeding**: `map*` constructors propagate
//!   the panic (a construction-time programmer error surfaces eagerly);
//!   `seeded*` constructors retain the supplied placeholder instead and
//!   report the failure.

use std::cell::RefCell;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use crate::error::{self, FailureOrigin, NotifyError};
use crate::store::{Readable, Store, StoreId};
use crate::subscription::Subscription;

/// A read-only store whose value is a pure function of its upstreams.
pub struct Derived<T> {
    inner: Store<T>,
    // Held for the lifetime of the derived store; intentionally never
    // unsubscribed (see module docs, invariant 2).
    _upstream: Rc<Vec<Subscription>>,
}

impl<T> Clone for Derived<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _upstream: Rc::clone(&self._upstream),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Derived<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Derived").field("store", &self.inner).finish()
    }
}

impl<T: 'static> Derived<T> {
    /// Derive from a single upstream.
    ///
    /// # Panics
    ///
    /// Propagates a panic from the seeding projection.
    pub fn map<U: 'static>(
        upstream: &impl Readable<U>,
        project: impl Fn(&U) -> T + 'static,
    ) -> Self {
        let seed = upstream.with(|value| project(value));
        Self::wire1(Store::new(seed), upstream, project)
    }

    /// Derive from a single upstream with a placeholder value, used when
    /// the seeding projection fails.
    pub fn seeded<U: 'static>(
        initial: T,
        upstream: &impl Readable<U>,
        project: impl Fn(&U) -> T + 'static,
    ) -> Self {
        Self::wire1(Store::new(initial), upstream, project)
    }

    /// Derive from two upstreams.
    ///
    /// # Panics
    ///
    /// Propagates a panic from the seeding projection.
    pub fn map2<U1, U2>(
        first: &impl Readable<U1>,
        second: &impl Readable<U2>,
        project: impl Fn(&U1, &U2) -> T + 'static,
    ) -> Self
    where
        U1: Clone + 'static,
        U2: Clone + 'static,
    {
        let seed = first.with(|a| second.with(|b| project(a, b)));
        Self::wire2(Store::new(seed), first, second, Rc::new(project))
    }

    /// Two-upstream variant of [`seeded`](Self::seeded).
    pub fn seeded2<U1, U2>(
        initial: T,
        first: &impl Readable<U1>,
        second: &impl Readable<U2>,
        project: impl Fn(&U1, &U2) -> T + 'static,
    ) -> Self
    where
        U1: Clone + 'static,
        U2: Clone + 'static,
    {
        Self::wire2(Store::new(initial), first, second, Rc::new(project))
    }

    /// Derive from three upstreams.
    ///
    /// # Panics
    ///
    /// Propagates a panic from the seeding projection.
    pub fn map3<U1, U2, U3>(
        first: &impl Readable<U1>,
        second: &impl Readable<U2>,
        third: &impl Readable<U3>,
        project: impl Fn(&U1, &U2, &U3) -> T + 'static,
    ) -> Self
    where
        U1: Clone + 'static,
        U2: Clone + 'static,
        U3: Clone + 'static,
    {
        let seed = first.with(|a| second.with(|b| third.with(|c| project(a, b, c))));
        Self::wire3(Store::new(seed), first, second, third, Rc::new(project))
    }

    /// Three-upstream variant of [`seeded`](Self::seeded).
    pub fn seeded3<U1, U2, U3>(
        initial: T,
        first: &impl Readable<U1>,
        second: &impl Readable<U2>,
        third: &impl Readable<U3>,
        project: impl Fn(&U1, &U2, &U3) -> T + 'static,
    ) -> Self
    where
        U1: Clone + 'static,
        U2: Clone + 'static,
        U3: Clone + 'static,
    {
        Self::wire3(Store::new(initial), first, second, third, Rc::new(project))
    }

    fn wire1<U: 'static>(
        inner: Store<T>,
        upstream: &impl Readable<U>,
        project: impl Fn(&U) -> T + 'static,
    ) -> Self {
        let target = inner.clone();
        let sub = upstream.subscribe(move |value| {
            // Replay-on-subscribe makes this run once during wiring, which
            // (re)seeds the value through the same path as later updates.
            let next = catch_unwind(AssertUnwindSafe(|| project(value)));
            apply(&target, next);
        });
        Self {
            inner,
            _upstream: Rc::new(vec![sub]),
        }
    }

    fn wire2<U1, U2>(
        inner: Store<T>,
        first: &impl Readable<U1>,
        second: &impl Readable<U2>,
        project: Rc<dyn Fn(&U1, &U2) -> T>,
    ) -> Self
    where
        U1: Clone + 'static,
        U2: Clone + 'static,
    {
        let latest = Rc::new(RefCell::new((first.get(), second.get())));

        let target = inner.clone();
        let cache = Rc::clone(&latest);
        let projection = Rc::clone(&project);
        let sub_first = first.subscribe(move |value| {
            cache.borrow_mut().0 = value.clone();
            let next = {
                let cached = cache.borrow();
                let project = projection.as_ref();
                catch_unwind(AssertUnwindSafe(|| project(&cached.0, &cached.1)))
            };
            apply(&target, next);
        });

        let target = inner.clone();
        let cache = Rc::clone(&latest);
        let projection = Rc::clone(&project);
        let sub_second = second.subscribe(move |value| {
            cache.borrow_mut().1 = value.clone();
            let next = {
                let cached = cache.borrow();
                let project = projection.as_ref();
                catch_unwind(AssertUnwindSafe(|| project(&cached.0, &cached.1)))
            };
            apply(&target, next);
        });

        Self {
            inner,
            _upstream: Rc::new(vec![sub_first, sub_second]),
        }
    }

    fn wire3<U1, U2, U3>(
        inner: Store<T>,
        first: &impl Readable<U1>,
        second: &impl Readable<U2>,
        third: &impl Readable<U3>,
        project: Rc<dyn Fn(&U1, &U2, &U3) -> T>,
    ) -> Self
    where
        U1: Clone + 'static,
        U2: Clone + 'static,
        U3: Clone + 'static,
    {
        let latest = Rc::new(RefCell::new((first.get(), second.get(), third.get())));
        let mut subs = Vec::with_capacity(3);

        let target = inner.clone();
        let cache = Rc::clone(&latest);
        let projection = Rc::clone(&project);
        subs.push(first.subscribe(move |value| {
            cache.borrow_mut().0 = value.clone();
            let next = {
                let cached = cache.borrow();
                let project = projection.as_ref();
                catch_unwind(AssertUnwindSafe(|| project(&cached.0, &cached.1, &cached.2)))
            };
            apply(&target, next);
        }));

        let target = inner.clone();
        let cache = Rc::clone(&latest);
        let projection = Rc::clone(&project);
        subs.push(second.subscribe(move |value| {
            cache.borrow_mut().1 = value.clone();
            let next = {
                let cached = cache.borrow();
                let project = projection.as_ref();
                catch_unwind(AssertUnwindSafe(|| project(&cached.0, &cached.1, &cached.2)))
            };
            apply(&target, next);
        }));

        let target = inner.clone();
        let cache = Rc::clone(&latest);
        let projection = Rc::clone(&project);
        subs.push(third.subscribe(move |value| {
            cache.borrow_mut().2 = value.clone();
            let next = {
                let cached = cache.borrow();
                let project = projection.as_ref();
                catch_unwind(AssertUnwindSafe(|| project(&cached.0, &cached.1, &cached.2)))
            };
            apply(&target, next);
        }));

        Self {
            inner,
            _upstream: Rc::new(subs),
        }
    }

    /// Identifier of the underlying store instance.
    #[must_use]
    pub fn id(&self) -> StoreId {
        self.inner.id()
    }

    /// Number of currently registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscriber_count()
    }

    /// Access the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.inner.with(f)
    }

    /// Register a subscriber; the current value is replayed synchronously
    /// before this returns.
    pub fn subscribe(&self, subscriber: impl Fn(&T) + 'static) -> Subscription {
        self.inner.subscribe(subscriber)
    }
}

impl<T: Clone + 'static> Derived<T> {
    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.get()
    }
}

impl<T: 'static> Readable<T> for Derived<T> {
    fn id(&self) -> StoreId {
        Derived::id(self)
    }

    fn get(&self) -> T
    where
        T: Clone,
    {
        Derived::get(self)
    }

    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        Derived::with(self, f)
    }

    fn subscribe(&self, subscriber: impl Fn(&T) + 'static) -> Subscription {
        Derived::subscribe(self, subscriber)
    }
}

/// Push a recomputed value into the derived store, or report a projection
/// failure and keep the previous value.
fn apply<T: 'static>(target: &Store<T>, outcome: Result<T, Box<dyn std::any::Any + Send>>) {
    match outcome {
        Ok(next) => target.set(next),
        Err(payload) => error::report(&NotifyError {
            store: target.id(),
            origin: FailureOrigin::Projection,
            message: error::panic_message(payload),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
