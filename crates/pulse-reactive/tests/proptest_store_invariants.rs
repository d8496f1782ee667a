#![forbid(unsafe_code)]

//! Property tests for store invariants: value convergence, notification
//! order, and notification counts under arbitrary write sequences.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use proptest::prelude::*;
use pulse_reactive::Store;

#[derive(Debug, Clone)]
enum Op {
    Set(i64),
    Add(i64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<i64>().prop_map(Op::Set),
        (-1_000i64..1_000).prop_map(Op::Add),
    ]
}

proptest! {
    #[test]
    fn final_value_matches_fold(
        initial in any::<i64>(),
        ops in prop::collection::vec(op_strategy(), 0..64),
    ) {
        let store = Store::new(initial);
        let mut expected = initial;
        for op in &ops {
            match op {
                Op::Set(value) => {
                    store.set(*value);
                    expected = *value;
                }
                Op::Add(delta) => {
                    store.update(|current| current.wrapping_add(*delta));
                    expected = expected.wrapping_add(*delta);
                }
            }
        }
        prop_assert_eq!(store.get(), expected);
    }

    #[test]
    fn notification_order_is_registration_order(
        subscriber_count in 1usize..24,
        writes in 1usize..8,
    ) {
        let store = Store::new(0usize);
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut subscriptions = Vec::new();
        for tag in 0..subscriber_count {
            let log = Rc::clone(&log);
            subscriptions.push(store.subscribe(move |_| log.borrow_mut().push(tag)));
        }
        log.borrow_mut().clear();

        for write in 0..writes {
            store.set(write);
        }

        let expected: Vec<usize> = (0..writes).flat_map(|_| 0..subscriber_count).collect();
        prop_assert_eq!(log.borrow().clone(), expected);
    }

    #[test]
    fn one_replay_plus_one_notification_per_write(writes in 0usize..32) {
        let store = Store::new(0usize);
        let calls = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&calls);
        let _sub = store.subscribe(move |_| counter.set(counter.get() + 1));

        for write in 0..writes {
            store.set(write);
        }

        prop_assert_eq!(calls.get(), writes + 1);
    }
}
