//! The opened storage environment.
//!
//! An [`Environment`] wraps the memory-mapped LMDB environment together with
//! the coordination lock and the collection registry. The engine is opened
//! with its internal locking disabled (`NO_LOCK`), so every concurrency
//! guarantee of this layer comes from the coordination lock:
//!
//! - the write side serializes all write transactions and all collection
//!   registration;
//! - the read side is taken only by streaming scans, so a live cursor can
//!   never race a structural registry mutation;
//! - point reads take no side at all once the handle exists, relying on the
//!   engine's snapshot isolation.

use std::fs;
use std::path::{Path, PathBuf};

use corral_core::{DurabilityMode, Error, Result, StoreOptions};
use dashmap::DashMap;
use heed::types::{Bytes, DecodeIgnore, Str};
use heed::{Database, Env, EnvFlags, EnvOpenOptions, RoTxn};
use parking_lot::RwLock;
use tracing::debug;

/// Opaque handle to a named collection inside the engine.
///
/// Handles are cheap copies of an engine slot id; once registered they live
/// for the lifetime of the environment.
pub(crate) type CollectionHandle = Database<Str, Bytes>;

/// The opened storage environment shared by all collections.
///
/// One instance per directory per process. All coordination state (lock and
/// registry) lives here; there are no globals.
pub struct Environment {
    pub(crate) env: Env,
    path: PathBuf,
    /// Coordination lock: single writer, many readers.
    pub(crate) lock: RwLock<()>,
    /// Name -> handle registry. Lookup is lock-free; insertion happens only
    /// under the coordination lock's write side.
    pub(crate) registry: DashMap<String, CollectionHandle>,
    options: StoreOptions,
}

impl Environment {
    /// Open (or create) the environment at `path`.
    pub fn open(path: impl AsRef<Path>, options: StoreOptions) -> Result<Environment> {
        let path = path.as_ref().to_path_buf();
        fs::create_dir_all(&path)?;

        let mut builder = EnvOpenOptions::new();
        builder
            .map_size(options.map_size)
            .max_dbs(options.max_collections)
            .max_readers(options.max_readers);

        let mut flags = EnvFlags::NO_LOCK;
        if options.durability == DurabilityMode::Relaxed {
            flags |= EnvFlags::NO_SYNC;
        }
        // SAFETY: NO_LOCK disables the engine's locking; the coordination
        // lock on this struct supplies the single-writer/many-reader
        // discipline the engine then requires from its caller.
        unsafe { builder.flags(flags) };

        // SAFETY: the environment directory is opened at most once per
        // process; `Environment` is the only owner of this map.
        let env = unsafe { builder.open(&path) }.map_err(|e| {
            Error::engine(format!("opening environment at `{}`", path.display()), e)
        })?;

        debug!(path = %path.display(), "opened environment");

        Ok(Environment {
            env,
            path,
            lock: RwLock::new(()),
            registry: DashMap::new(),
            options,
        })
    }

    /// Directory the environment lives in.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Settings the environment was opened with.
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Force all buffered writes to stable storage.
    pub fn sync(&self) -> Result<()> {
        self.env
            .force_sync()
            .map_err(|e| Error::engine("syncing environment", e))
    }

    /// Integrity self-check of the environment.
    ///
    /// Takes the write side of the coordination lock so neither a write
    /// transaction nor a registration is in flight, then walks every named
    /// collection, stats it within a single read transaction, and forces a
    /// sync. Intended for startup diagnostics.
    pub fn check(&self) -> Result<()> {
        let _guard = self.lock.write();
        let rtxn = self
            .env
            .read_txn()
            .map_err(|e| Error::engine("beginning read transaction for platform check", e))?;
        let names = self.names_in(&rtxn)?;
        let mut entries = 0u64;
        for name in &names {
            let db: Option<CollectionHandle> = self
                .env
                .open_database(&rtxn, Some(name))
                .map_err(|e| Error::engine(format!("opening `{name}` during platform check"), e))?;
            if let Some(db) = db {
                entries += db
                    .len(&rtxn)
                    .map_err(|e| Error::engine(format!("stat of `{name}` during platform check"), e))?;
            }
        }
        drop(rtxn);
        self.sync()?;
        debug!(collections = names.len(), entries, "platform check passed");
        Ok(())
    }

    /// List collection names from the engine namespace.
    ///
    /// Must run inside a transaction opened while engine-global state cannot
    /// change; callers hold the coordination lock's write side.
    pub(crate) fn names_in(&self, rtxn: &RoTxn) -> Result<Vec<String>> {
        let root: Option<Database<Str, DecodeIgnore>> = self
            .env
            .open_database(rtxn, None)
            .map_err(|e| Error::engine("opening the root namespace", e))?;
        let Some(root) = root else {
            return Ok(Vec::new());
        };
        let mut names = Vec::new();
        let iter = root
            .iter(rtxn)
            .map_err(|e| Error::engine("scanning the root namespace", e))?;
        for entry in iter {
            let (name, ()) = entry.map_err(|e| Error::engine("scanning the root namespace", e))?;
            names.push(name.to_string());
        }
        Ok(names)
    }
}
