#![forbid(unsafe_code)]

//! Ordered subscriber bookkeeping for a single store.
//!
//! Invariants:
//!
//! 1. Iteration order is registration order.
//! 2. Removal by id is O(1) expected; the order vector keeps tombstones and
//!    is compacted once they outnumber the live entries.
//! 3. Removing an unknown id is a no-op.

use std::rc::Rc;

use ahash::AHashMap;

use crate::subscription::{SubscriptionId, next_subscription_id};

pub(crate) type Callback<T> = Rc<dyn Fn(&T)>;

pub(crate) struct Registry<T> {
    order: Vec<SubscriptionId>,
    callbacks: AHashMap<SubscriptionId, Callback<T>>,
}

impl<T> Registry<T> {
    pub(crate) fn new() -> Self {
        Self {
            order: Vec::new(),
            callbacks: AHashMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, callback: Callback<T>) -> SubscriptionId {
        let id = next_subscription_id();
        self.order.push(id);
        self.callbacks.insert(id, callback);
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) {
        self.callbacks.remove(&id);
        if self.order.len() > 8 && self.order.len() >= self.callbacks.len() * 2 {
            self.order.retain(|entry| self.callbacks.contains_key(entry));
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Live subscribers in registration order, detached from the registry
    /// so the caller can invoke them without holding any borrow.
    pub(crate) fn snapshot(&self) -> Vec<(SubscriptionId, Callback<T>)> {
        self.order
            .iter()
            .filter_map(|id| self.callbacks.get(id).map(|cb| (*id, Rc::clone(cb))))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn noop() -> Callback<u32> {
        Rc::new(|_| {})
    }

    #[test]
    fn snapshot_preserves_registration_order() {
        let mut registry = Registry::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut ids = Vec::new();
        for tag in 0..5u32 {
            let log = Rc::clone(&log);
            ids.push(registry.insert(Rc::new(move |_: &u32| log.borrow_mut().push(tag))));
        }

        for (id, callback) in registry.snapshot() {
            assert!(ids.contains(&id));
            callback.as_ref()(&0);
        }
        assert_eq!(*log.borrow(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn removed_entries_are_skipped() {
        let mut registry = Registry::new();
        let first = registry.insert(noop());
        let second = registry.insert(noop());
        let third = registry.insert(noop());

        registry.remove(second);

        let ids: Vec<_> = registry.snapshot().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![first, third]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let mut registry: Registry<u32> = Registry::new();
        let id = registry.insert(noop());
        registry.remove(id);
        registry.remove(id);
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn compaction_keeps_survivors_in_order() {
        let mut registry = Registry::new();
        let ids: Vec<_> = (0..32).map(|_| registry.insert(noop())).collect();
        for id in &ids[..24] {
            registry.remove(*id);
        }

        let live: Vec<_> = registry.snapshot().into_iter().map(|(id, _)| id).collect();
        assert_eq!(live, ids[24..].to_vec());
        assert_eq!(registry.len(), 8);
    }
}
