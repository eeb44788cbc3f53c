//! Property tests for list persistence.
//!
//! 1. After any sequence of add/toggle/delete, reloading the to-do list
//!    from the same backend yields the in-memory list.
//! 2. The same holds for the alarm list.
//! 3. The alarm list stays sorted by time after every add, with ties in
//!    insertion order.
//! 4. Arbitrary bytes in a namespace never panic a load.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use prodhub_core::alarm::AlarmBook;
use prodhub_core::store::{ALARMS_NAMESPACE, InMemoryStore, KvStore, TODOS_NAMESPACE};
use prodhub_core::todo::TodoList;
use proptest::prelude::*;

/// One user action on a list. Indexes are taken modulo the list length.
#[derive(Debug, Clone)]
enum Op {
    Add(String),
    Toggle(usize),
    Delete(usize),
}

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,24}"
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => arb_text().prop_map(Op::Add),
        2 => any::<usize>().prop_map(Op::Toggle),
        1 => any::<usize>().prop_map(Op::Delete),
    ]
}

fn arb_time() -> impl Strategy<Value = String> {
    (0u32..24, 0u32..60).prop_map(|(h, m)| format!("{h:02}:{m:02}"))
}

fn backend() -> Arc<dyn KvStore> {
    Arc::new(InMemoryStore::new())
}

proptest! {
    #[test]
    fn todo_list_survives_reload(ops in prop::collection::vec(arb_op(), 0..40)) {
        let store = backend();
        let mut list = TodoList::load(Arc::clone(&store));
        let mut clock = 1_000u64;

        for op in ops {
            clock += 1;
            match op {
                Op::Add(text) => {
                    let _ = list.add_at(&text, clock);
                }
                Op::Toggle(i) if !list.is_empty() => {
                    let id = list.tasks()[i % list.len()].id;
                    list.toggle(id).unwrap();
                }
                Op::Delete(i) if !list.is_empty() => {
                    let id = list.tasks()[i % list.len()].id;
                    list.delete(id).unwrap();
                }
                _ => {}
            }
        }

        let reloaded = TodoList::load(store);
        prop_assert_eq!(reloaded.tasks(), list.tasks());
    }

    #[test]
    fn todo_ids_stay_unique(texts in prop::collection::vec("[a-z]{1,8}", 1..30)) {
        let mut list = TodoList::load(backend());
        // Every task created in the same millisecond.
        for text in &texts {
            list.add_at(text, 42).unwrap();
        }
        let mut ids: Vec<u64> = list.tasks().iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), texts.len());
    }

    #[test]
    fn alarm_book_survives_reload(
        adds in prop::collection::vec((arb_time(), arb_text()), 0..20),
        toggles in prop::collection::vec(any::<usize>(), 0..10),
        deletes in prop::collection::vec(any::<usize>(), 0..5),
    ) {
        let store = backend();
        let mut book = AlarmBook::load(Arc::clone(&store));
        for (n, (time, name)) in adds.iter().enumerate() {
            book.add_at(time, name, n as u64).unwrap();
        }
        for i in toggles {
            if !book.alarms().is_empty() {
                let id = book.alarms()[i % book.alarms().len()].id;
                book.toggle(id).unwrap();
            }
        }
        for i in deletes {
            if !book.alarms().is_empty() {
                let id = book.alarms()[i % book.alarms().len()].id;
                book.delete(id).unwrap();
            }
        }

        let reloaded = AlarmBook::load(store);
        prop_assert_eq!(reloaded.alarms(), book.alarms());
    }

    #[test]
    fn alarms_sorted_after_every_add(times in prop::collection::vec(arb_time(), 1..30)) {
        let mut book = AlarmBook::load(backend());
        for (n, time) in times.iter().enumerate() {
            book.add_at(time, &format!("#{n}"), n as u64).unwrap();
            let alarms = book.alarms();
            for pair in alarms.windows(2) {
                prop_assert!(pair[0].time <= pair[1].time);
                if pair[0].time == pair[1].time {
                    // Ties keep insertion order; ids grow with insertion.
                    prop_assert!(pair[0].id < pair[1].id);
                }
            }
        }
    }

    #[test]
    fn garbage_never_panics_load(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let store = backend();
        store.put(TODOS_NAMESPACE, &bytes).unwrap();
        store.put(ALARMS_NAMESPACE, &bytes).unwrap();
        let _ = TodoList::load(Arc::clone(&store));
        let _ = AlarmBook::load(store);
    }
}
