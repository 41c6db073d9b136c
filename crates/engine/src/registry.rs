//! Collection registry: lazy, race-free handle creation.
//!
//! At most one handle exists per collection name for the lifetime of the
//! environment. The fast path is a lock-free registry lookup; the slow path
//! re-checks under the coordination lock's write side before asking the
//! engine to open or create the handle (creating a handle while readers are
//! active is not safe in the engine, so registration shares the same
//! exclusion as write transactions).
//!
//! The coordination lock is not reentrant: public entry points acquire it at
//! most once, and the `*_locked` functions run only with it already held.

use corral_core::{Error, Result};
use tracing::debug;

use crate::environment::{CollectionHandle, Environment};

impl Environment {
    /// Resolve the handle for an existing collection.
    ///
    /// Opens the handle lazily if the collection exists in the engine
    /// namespace but was not accessed yet; fails with
    /// [`Error::CollectionNotFound`] otherwise.
    pub fn resolve(&self, name: &str) -> Result<CollectionHandle> {
        if let Some(handle) = self.registry.get(name) {
            return Ok(*handle);
        }
        let _guard = self.lock.write();
        self.open_locked(name, false)
    }

    /// Open the collection, creating it if missing. Idempotent.
    pub fn create_collection(&self, name: &str) -> Result<()> {
        let _guard = self.lock.write();
        self.open_locked(name, true)?;
        Ok(())
    }

    /// Create a collection that must not exist yet.
    pub fn allocate_collection(&self, name: &str) -> Result<()> {
        let _guard = self.lock.write();
        if self.exists_locked(name)? {
            return Err(Error::CollectionAlreadyExists(name.to_string()));
        }
        self.open_locked(name, true)?;
        Ok(())
    }

    /// Whether the collection is registered or present in the engine
    /// namespace.
    pub fn collection_exists(&self, name: &str) -> Result<bool> {
        if self.registry.contains_key(name) {
            return Ok(true);
        }
        let _guard = self.lock.write();
        self.exists_locked(name)
    }

    /// All collection names known to the engine.
    pub fn collection_names(&self) -> Result<Vec<String>> {
        // Namespace enumeration touches engine-global state.
        let _guard = self.lock.write();
        let rtxn = self
            .env
            .read_txn()
            .map_err(|e| Error::engine("beginning read transaction for namespace listing", e))?;
        self.names_in(&rtxn)
    }

    /// Double-checked open/create. Requires the write lock.
    fn open_locked(&self, name: &str, create: bool) -> Result<CollectionHandle> {
        if let Some(handle) = self.registry.get(name) {
            return Ok(*handle);
        }
        let handle = if create {
            let mut wtxn = self.env.write_txn().map_err(|e| {
                Error::engine(format!("beginning write transaction to create `{name}`"), e)
            })?;
            let db = self
                .env
                .create_database(&mut wtxn, Some(name))
                .map_err(|e| Error::engine(format!("creating collection `{name}`"), e))?;
            wtxn.commit()
                .map_err(|e| Error::engine(format!("committing creation of `{name}`"), e))?;
            db
        } else {
            let rtxn = self.env.read_txn().map_err(|e| {
                Error::engine(format!("beginning read transaction to open `{name}`"), e)
            })?;
            self.env
                .open_database(&rtxn, Some(name))
                .map_err(|e| Error::engine(format!("opening collection `{name}`"), e))?
                .ok_or_else(|| Error::CollectionNotFound(name.to_string()))?
        };
        self.registry.insert(name.to_string(), handle);
        debug!(collection = name, created = create, "registered collection handle");
        Ok(handle)
    }

    /// Existence check against registry and engine namespace. Requires the
    /// write lock.
    fn exists_locked(&self, name: &str) -> Result<bool> {
        if self.registry.contains_key(name) {
            return Ok(true);
        }
        let rtxn = self.env.read_txn().map_err(|e| {
            Error::engine(format!("beginning read transaction to probe `{name}`"), e)
        })?;
        let found: Option<CollectionHandle> = self
            .env
            .open_database(&rtxn, Some(name))
            .map_err(|e| Error::engine(format!("probing collection `{name}`"), e))?;
        Ok(found.is_some())
    }
}
