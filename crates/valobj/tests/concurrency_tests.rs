//! Concurrency tests: uniquing and mutable-class declaration under threads.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::sync::{Arc, Barrier};
use std::thread;

use valobj::{
    FieldDescriptor, FieldValue, MutableClass, ScalarKind, Symbol, ValueClass, ValueObject,
};

const THREADS: usize = 8;

fn counter_class(name: &str) -> Arc<ValueClass> {
    ValueClass::builder(name)
        .field(FieldDescriptor::object("name"))
        .field(FieldDescriptor::scalar("count", ScalarKind::U32))
        .build()
        .unwrap()
}

#[test]
fn test_concurrent_construction_yields_one_instance() {
    let class = counter_class("ConcurrentUnique");
    let barrier = Barrier::new(THREADS);

    let built: Vec<ValueObject> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    class
                        .construct_pairs([
                            ("name", FieldValue::from("shared")),
                            ("count", FieldValue::from(1_u32)),
                        ])
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(built.windows(2).all(|w| ValueObject::ptr_eq(&w[0], &w[1])));
}

#[test]
fn test_concurrent_distinct_values_stay_distinct() {
    let class = counter_class("ConcurrentDistinct");

    let built: Vec<Vec<ValueObject>> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    (0..64_u32)
                        .map(|count| {
                            class
                                .construct_pairs([("count", count)])
                                .unwrap()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for row in &built[1..] {
        for (mine, theirs) in row.iter().zip(&built[0]) {
            assert!(ValueObject::ptr_eq(mine, theirs));
        }
    }
    for pair in built[0].windows(2) {
        assert!(!ValueObject::ptr_eq(&pair[0], &pair[1]));
    }
}

#[test]
fn test_concurrent_mutable_class_declaration_runs_once() {
    let class = counter_class("ConcurrentDeclare");
    let barrier = Barrier::new(THREADS);

    let declared: Vec<Arc<MutableClass>> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    MutableClass::builder(&class, "ConcurrentMutableDeclare")
                        .all_setters()
                        .build()
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(declared.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert_eq!(
        valobj::variants().registered_names(&class),
        vec![Symbol::intern("ConcurrentMutableDeclare")]
    );
}

#[test]
fn test_concurrent_freeze_converges() {
    let class = counter_class("ConcurrentFreeze");
    MutableClass::builder(&class, "ConcurrentMutableFreeze")
        .all_setters()
        .build()
        .unwrap();
    let seed = class.construct_pairs([("name", "seed")]).unwrap();

    let frozen: Vec<ValueObject> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    let mut draft = seed.mutable_copy().unwrap();
                    draft.invoke("setCount", 99_u32).unwrap();
                    draft.freeze().unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(frozen.windows(2).all(|w| ValueObject::ptr_eq(&w[0], &w[1])));
    assert_eq!(frozen[0].get_as::<u32>("count"), Some(99));
}
