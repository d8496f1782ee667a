#![forbid(unsafe_code)]

//! Eager, synchronous reactive stores for Pulse.
//!
//! This crate provides the state-propagation primitives the dashboard
//! layer is built on:
//!
//! - [`Store`]: a shared, mutable value holder with subscription-based
//!   change notification and replay-on-subscribe.
//! - [`Derived`]: a read-only store whose value is a pure function of one
//!   to three upstream stores, recomputed on every upstream write.
//! - [`Subscription`]: an explicit, idempotent unsubscribe capability.
//! - an error channel ([`set_error_hook`]) that observes subscriber and
//!   projection failures without aborting a notification pass.
//!
//! # Architecture
//!
//! `Store<T>` uses `Rc<RefCell<..>>` for single-threaded shared ownership.
//! Writes notify synchronously, depth-first and in registration order: a
//! derived store recomputes and notifies its own subscribers before
//! control returns to the original writer. There is no equality
//! short-circuit and no batching; every write is a notification pass.
//!
//! # Invariants
//!
//! 1. A new subscriber receives the current value before `subscribe`
//!    returns.
//! 2. Notification order is registration order; a pass iterates a
//!    snapshot, so mid-pass subscribe/unsubscribe never affects the pass
//!    in flight.
//! 3. A panicking subscriber or projection is isolated and reported; the
//!    pass continues and store state stays committed.
//! 4. A derived store's value is never stale beyond the current
//!    notification call.
//!
//! # Example
//!
//! ```
//! use pulse_reactive::{Derived, Store};
//!
//! let sales = Store::new(vec![10u64, 20, 30]);
//! let total = Derived::map(&sales, |rows| rows.iter().sum::<u64>());
//! assert_eq!(total.get(), 60);
//!
//! sales.update(|rows| {
//!     let mut next = rows.clone();
//!     next.push(40);
//!     next
//! });
//! assert_eq!(total.get(), 100);
//! ```

pub mod derived;
pub mod error;
mod registry;
pub mod store;
pub mod subscription;

pub use derived::Derived;
pub use error::{FailureOrigin, NotifyError, clear_error_hook, set_error_hook};
pub use store::{Readable, Store, StoreId};
pub use subscription::{Subscription, SubscriptionId};
