//! # Corral
//!
//! Typed, concurrency-safe document collections over an embedded LMDB
//! environment.
//!
//! Corral exposes named collections of JSON documents addressed by string
//! keys, with atomic read-modify-write, bulk scanning and lazy streaming.
//! The engine is opened with its own locking disabled; Corral supplies the
//! single-writer/many-reader discipline itself, so any number of threads can
//! share one database handle.
//!
//! ## Quick Start
//!
//! ```ignore
//! use corral::prelude::*;
//!
//! let db = Corral::open("./my-db")?;
//!
//! db.collections.create("accounts")?;
//! db.collections.put("accounts", "alice", &Account { balance: 10 })?;
//!
//! // Atomic read-modify-write: no concurrent writer can interleave.
//! db.collections.update("accounts", "alice", |prev: Option<Account>| {
//!     let mut acct = prev.unwrap_or_default();
//!     acct.balance += 1;
//!     acct
//! })?;
//!
//! let acct: Option<Account> = db.collections.get("accounts", "alice")?;
//! db.close()?;
//! ```
//!
//! ## Blocking
//!
//! Every operation performs blocking memory-mapped I/O. From an async
//! runtime, dispatch calls through its blocking-thread facility instead of
//! running them on the reactor.

#![warn(missing_docs)]

mod collections;
mod database;

pub mod prelude;

// Re-export main entry points
pub use collections::Collections;
pub use database::{Corral, CorralBuilder};

// Re-export the shared types callers interact with
pub use corral_core::{DurabilityMode, Error, Result, StoreOptions, MAX_KEY_BYTES};
pub use corral_engine::{DocumentStream, Upserted};
