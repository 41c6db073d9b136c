//! Shared helpers for integration tests.
#![allow(dead_code)]

use corral::{Collections, Corral};
use serde::{Deserialize, Serialize};

/// A database in a fresh temporary directory.
pub struct TestDb {
    pub db: Corral,
}

impl TestDb {
    pub fn new() -> Self {
        let db = Corral::builder()
            .map_size(64 * 1024 * 1024)
            .open_temp()
            .unwrap();
        TestDb { db }
    }

    pub fn collections(&self) -> &Collections {
        &self.db.collections
    }

    /// A database with one ready-made collection.
    pub fn with_collection(name: &str) -> Self {
        let test_db = Self::new();
        test_db.collections().create(name).unwrap();
        test_db
    }
}

/// Sample document type used across tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub title: String,
    pub stars: u32,
}

pub fn note(title: &str, stars: u32) -> Note {
    Note {
        title: title.to_string(),
        stars,
    }
}
