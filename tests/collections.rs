//! Collection lifecycle tests: create, allocate, list, clear.

mod common;

use common::{note, Note, TestDb};
use corral::{Corral, Error};

// ============================================================================
// Allocation
// ============================================================================

#[test]
fn allocate_twice_fails() {
    let test_db = TestDb::new();
    let c = test_db.collections();

    c.allocate("x").unwrap();
    let err = c.allocate("x").unwrap_err();
    assert!(matches!(err, Error::CollectionAlreadyExists(_)));
}

#[test]
fn allocated_collection_is_listed() {
    let test_db = TestDb::new();
    let c = test_db.collections();

    c.allocate("x").unwrap();
    assert!(c.names().unwrap().contains(&"x".to_string()));
}

#[test]
fn create_is_idempotent() {
    let test_db = TestDb::new();
    let c = test_db.collections();

    c.create("x").unwrap();
    c.create("x").unwrap();
    assert_eq!(c.names().unwrap(), vec!["x".to_string()]);
}

#[test]
fn exists_reflects_creation() {
    let test_db = TestDb::new();
    let c = test_db.collections();

    assert!(!c.exists("x").unwrap());
    c.create("x").unwrap();
    assert!(c.exists("x").unwrap());
}

#[test]
fn open_requires_an_existing_collection() {
    let test_db = TestDb::new();
    let c = test_db.collections();

    let err = c.open("x").unwrap_err();
    assert!(matches!(err, Error::CollectionNotFound(_)));

    c.create("x").unwrap();
    c.open("x").unwrap();
}

#[test]
fn names_lists_every_collection() {
    let test_db = TestDb::new();
    let c = test_db.collections();

    c.create("alpha").unwrap();
    c.create("beta").unwrap();
    c.create("gamma").unwrap();

    let mut names = c.names().unwrap();
    names.sort();
    assert_eq!(names, vec!["alpha", "beta", "gamma"]);
}

// ============================================================================
// Operations on unknown collections
// ============================================================================

#[test]
fn operations_on_unknown_collection_fail() {
    let test_db = TestDb::new();
    let c = test_db.collections();

    assert!(matches!(
        c.get::<Note>("nope", "k").unwrap_err(),
        Error::CollectionNotFound(_)
    ));
    assert!(matches!(
        c.delete::<Note>("nope", "k").unwrap_err(),
        Error::CollectionNotFound(_)
    ));
    assert!(matches!(
        c.len("nope").unwrap_err(),
        Error::CollectionNotFound(_)
    ));
    assert!(matches!(
        c.clear("nope").unwrap_err(),
        Error::CollectionNotFound(_)
    ));
    assert!(matches!(
        c.collect::<Note, _, _>("nope", |_| true, |_| true).unwrap_err(),
        Error::CollectionNotFound(_)
    ));
}

// ============================================================================
// Size and clearing
// ============================================================================

#[test]
fn len_counts_documents() {
    let test_db = TestDb::with_collection("notes");
    let c = test_db.collections();

    assert_eq!(c.len("notes").unwrap(), 0);
    assert!(c.is_empty("notes").unwrap());

    c.put("notes", "a", &note("a", 1)).unwrap();
    c.put("notes", "b", &note("b", 2)).unwrap();
    assert_eq!(c.len("notes").unwrap(), 2);

    // Overwrite does not grow the collection.
    c.put("notes", "a", &note("a2", 3)).unwrap();
    assert_eq!(c.len("notes").unwrap(), 2);
}

#[test]
fn clear_empties_but_keeps_the_collection() {
    let test_db = TestDb::with_collection("notes");
    let c = test_db.collections();

    c.put("notes", "a", &note("a", 1)).unwrap();
    c.put("notes", "b", &note("b", 2)).unwrap();

    c.clear("notes").unwrap();

    assert_eq!(c.len("notes").unwrap(), 0);
    assert!(c.names().unwrap().contains(&"notes".to_string()));
    assert_eq!(c.get::<Note>("notes", "a").unwrap(), None);
}

// ============================================================================
// Lazy handle resolution across reopen
// ============================================================================

#[test]
fn collections_resolve_lazily_after_reopen() {
    let dir = tempfile::TempDir::new().unwrap();

    {
        let db = Corral::open(dir.path()).unwrap();
        db.collections.create("notes").unwrap();
        db.collections.put("notes", "k", &note("kept", 1)).unwrap();
        db.close().unwrap();
    }

    // No explicit create: the handle is registered on first access.
    let db = Corral::open(dir.path()).unwrap();
    assert!(db.collections.exists("notes").unwrap());
    let found: Option<Note> = db.collections.get("notes", "k").unwrap();
    assert_eq!(found, Some(note("kept", 1)));
}

// ============================================================================
// Platform check
// ============================================================================

#[test]
fn check_passes_on_a_populated_database() {
    let test_db = TestDb::new();
    let c = test_db.collections();

    c.create("a").unwrap();
    c.create("b").unwrap();
    c.put("a", "k", &note("x", 1)).unwrap();

    test_db.db.check().unwrap();
}

#[test]
fn check_passes_on_an_empty_database() {
    let test_db = TestDb::new();
    test_db.db.check().unwrap();
}
