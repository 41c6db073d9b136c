//! Bulk scan and streaming tests.

mod common;

use common::TestDb;
use corral::{DocumentStream, Error};

/// Populate a collection with the keys a1, a2, b1 mapping to 1, 2, 3.
fn seed_numbers(test_db: &TestDb) {
    let c = test_db.collections();
    c.put("nums", "a1", &1u32).unwrap();
    c.put("nums", "a2", &2u32).unwrap();
    c.put("nums", "b1", &3u32).unwrap();
}

// ============================================================================
// collect
// ============================================================================

#[test]
fn collect_filters_by_key_before_decode() {
    let test_db = TestDb::with_collection("nums");
    seed_numbers(&test_db);

    let mut values: Vec<u32> = test_db
        .collections()
        .collect("nums", |key| key.starts_with('a'), |_| true)
        .unwrap();
    values.sort();
    assert_eq!(values, vec![1, 2]);
}

#[test]
fn collect_applies_value_filter_after_decode() {
    let test_db = TestDb::with_collection("nums");
    seed_numbers(&test_db);

    let mut values: Vec<u32> = test_db
        .collections()
        .collect("nums", |_| true, |v| *v >= 2)
        .unwrap();
    values.sort();
    assert_eq!(values, vec![2, 3]);
}

#[test]
fn collect_drops_undecodable_records() {
    let test_db = TestDb::with_collection("mixed");
    let c = test_db.collections();

    c.put("mixed", "good", &7u32).unwrap();
    c.put("mixed", "bad", &"not a number".to_string()).unwrap();

    let values: Vec<u32> = c.collect("mixed", |_| true, |_| true).unwrap();
    assert_eq!(values, vec![7]);
}

#[test]
fn collect_on_empty_collection_is_empty() {
    let test_db = TestDb::with_collection("empty");

    let values: Vec<u32> = test_db
        .collections()
        .collect("empty", |_| true, |_| true)
        .unwrap();
    assert!(values.is_empty());
}

// ============================================================================
// stream
// ============================================================================

#[test]
fn stream_yields_every_document_exactly_once() {
    let test_db = TestDb::with_collection("nums");
    seed_numbers(&test_db);

    let mut values: Vec<u32> = test_db
        .collections()
        .stream("nums", |_| true, |docs: &mut DocumentStream<u32>| {
            docs.map(|doc| doc.unwrap()).collect()
        })
        .unwrap();
    values.sort();
    assert_eq!(values, vec![1, 2, 3]);
}

#[test]
fn stream_twice_reproduces_the_same_multiset() {
    let test_db = TestDb::with_collection("nums");
    seed_numbers(&test_db);
    let c = test_db.collections();

    let run = || {
        let mut values: Vec<u32> = c
            .stream("nums", |_| true, |docs: &mut DocumentStream<u32>| {
                docs.map(|doc| doc.unwrap()).collect()
            })
            .unwrap();
        values.sort();
        values
    };

    assert_eq!(run(), run());
}

#[test]
fn stream_applies_the_key_filter() {
    let test_db = TestDb::with_collection("nums");
    seed_numbers(&test_db);

    let count = test_db
        .collections()
        .stream("nums", |key| key.starts_with('b'), |docs: &mut DocumentStream<u32>| {
            docs.count()
        })
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn stream_surfaces_decode_failures_as_items() {
    let test_db = TestDb::with_collection("mixed");
    let c = test_db.collections();

    c.put("mixed", "good", &7u32).unwrap();
    c.put("mixed", "bad", &"not a number".to_string()).unwrap();

    let (ok, err): (Vec<_>, Vec<_>) = c
        .stream("mixed", |_| true, |docs: &mut DocumentStream<u32>| {
            docs.partition(Result::is_ok)
        })
        .unwrap();

    assert_eq!(ok.into_iter().map(Result::unwrap).collect::<Vec<_>>(), vec![7]);
    assert_eq!(err.len(), 1);
    assert!(matches!(
        err.into_iter().next().unwrap().unwrap_err(),
        Error::Json { .. }
    ));
}

#[test]
fn stream_returns_the_consumer_value() {
    let test_db = TestDb::with_collection("nums");
    seed_numbers(&test_db);

    let sum: u32 = test_db
        .collections()
        .stream("nums", |_| true, |docs: &mut DocumentStream<u32>| {
            docs.map(|doc| doc.unwrap()).sum()
        })
        .unwrap();
    assert_eq!(sum, 6);
}

#[test]
fn stream_terminates_on_a_finite_collection() {
    let test_db = TestDb::with_collection("nums");
    seed_numbers(&test_db);

    let steps = test_db
        .collections()
        .stream("nums", |_| true, |docs: &mut DocumentStream<u32>| {
            let mut steps = 0;
            while docs.next().is_some() {
                steps += 1;
            }
            // Exhausted iterators stay exhausted.
            assert!(docs.next().is_none());
            steps
        })
        .unwrap();
    assert_eq!(steps, 3);
}
