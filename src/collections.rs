//! Document collection operations.
//!
//! The public operation surface: collection lifecycle plus typed document
//! CRUD, scanning and streaming. All methods delegate to the engine layer,
//! which supplies the locking discipline and transaction scoping.

use std::sync::Arc;

use corral_core::Result;
use corral_engine::{DocumentStream, Environment, Upserted};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Document collection operations.
///
/// Access via `db.collections`.
pub struct Collections {
    env: Arc<Environment>,
}

impl Collections {
    pub(crate) fn new(env: Arc<Environment>) -> Self {
        Self { env }
    }

    // =========================================================================
    // Collection lifecycle
    // =========================================================================

    /// Check whether a collection exists.
    pub fn exists(&self, name: &str) -> Result<bool> {
        self.env.collection_exists(name)
    }

    /// Open an existing collection, failing with
    /// [`Error::CollectionNotFound`](corral_core::Error::CollectionNotFound)
    /// if it does not exist.
    ///
    /// Opening is lazy and happens automatically on first access; calling
    /// this up front surfaces a missing collection early.
    pub fn open(&self, name: &str) -> Result<()> {
        self.env.resolve(name)?;
        Ok(())
    }

    /// Create a collection if it does not exist yet. Idempotent.
    ///
    /// # Example
    ///
    /// ```ignore
    /// db.collections.create("accounts")?;
    /// db.collections.create("accounts")?; // fine
    /// ```
    pub fn create(&self, name: &str) -> Result<()> {
        self.env.create_collection(name)
    }

    /// Create a collection that must not exist yet.
    ///
    /// Fails with
    /// [`Error::CollectionAlreadyExists`](corral_core::Error::CollectionAlreadyExists)
    /// on a second call for the same name.
    pub fn allocate(&self, name: &str) -> Result<()> {
        self.env.allocate_collection(name)
    }

    /// List all collection names known to the environment.
    pub fn names(&self) -> Result<Vec<String>> {
        self.env.collection_names()
    }

    /// Number of documents in a collection.
    pub fn len(&self, name: &str) -> Result<u64> {
        self.env.collection_len(name)
    }

    /// Check whether a collection holds no documents.
    pub fn is_empty(&self, name: &str) -> Result<bool> {
        Ok(self.len(name)? == 0)
    }

    /// Remove every document from a collection.
    ///
    /// The collection itself stays allocated and keeps its name.
    pub fn clear(&self, name: &str) -> Result<()> {
        self.env.clear_collection(name)
    }

    // =========================================================================
    // Documents
    // =========================================================================

    /// Fetch the document stored under `key`.
    ///
    /// Returns `None` if the key is unset.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let acct: Option<Account> = db.collections.get("accounts", "alice")?;
    /// ```
    pub fn get<T>(&self, collection: &str, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        self.env.fetch(collection, key)
    }

    /// Atomically read-modify-write the document under `key`.
    ///
    /// `modify` receives the current value (or `None`) and returns the value
    /// to store; the whole read-modify-write runs in one transaction, so
    /// concurrent updates never lose writes. Returns both the previous and
    /// the committed value.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let result = db.collections.update("counters", "hits", |prev: Option<u64>| {
    ///     prev.unwrap_or(0) + 1
    /// })?;
    /// println!("{:?} -> {}", result.previous, result.current);
    /// ```
    pub fn update<T, F>(&self, collection: &str, key: &str, modify: F) -> Result<Upserted<T>>
    where
        T: Serialize + DeserializeOwned + Clone,
        F: FnOnce(Option<T>) -> T,
    {
        self.env.update(collection, key, modify)
    }

    /// Store `doc` under `key`, replacing whatever was there.
    ///
    /// Returns the previous value alongside the stored one.
    pub fn put<T>(&self, collection: &str, key: &str, doc: &T) -> Result<Upserted<T>>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        self.env.put(collection, key, doc)
    }

    /// Delete the document under `key`, returning it if one existed.
    ///
    /// Deleting an absent key is a no-op and returns `None`.
    pub fn delete<T>(&self, collection: &str, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        self.env.delete(collection, key)
    }

    /// Materialize every document matching the filters.
    ///
    /// `key_filter` runs before decode, `value_filter` after. Records that
    /// fail to decode are dropped from the result (and logged); use
    /// [`stream`](Self::stream) to observe them instead. Scans the whole
    /// collection into memory, so reserve it for small or bounded
    /// collections and admin use.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let overdrawn: Vec<Account> = db.collections.collect(
    ///     "accounts",
    ///     |key| key.starts_with("user:"),
    ///     |acct| acct.balance < 0,
    /// )?;
    /// ```
    pub fn collect<T, K, V>(
        &self,
        collection: &str,
        key_filter: K,
        value_filter: V,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        K: Fn(&str) -> bool,
        V: Fn(&T) -> bool,
    {
        self.env.collect(collection, key_filter, value_filter)
    }

    /// Stream matching documents lazily through `consume`.
    ///
    /// `consume` receives a [`DocumentStream`]: a finite, single-pass
    /// iterator of `Result<T>` that decodes records on demand and surfaces
    /// decode failures as `Err` items. The backing read transaction lives
    /// exactly as long as `consume` runs. Do not issue write operations from
    /// inside `consume`; they would wait on coordination state this call
    /// holds.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let total: i64 = db.collections.stream(
    ///     "accounts",
    ///     |_key| true,
    ///     |docs: &mut DocumentStream<Account>| {
    ///         docs.filter_map(|doc| doc.ok()).map(|a| a.balance).sum()
    ///     },
    /// )?;
    /// ```
    pub fn stream<T, K, R, F>(&self, collection: &str, key_filter: K, consume: F) -> Result<R>
    where
        T: DeserializeOwned,
        K: Fn(&str) -> bool,
        F: for<'s> FnOnce(&mut DocumentStream<'s, T>) -> R,
    {
        self.env.stream(collection, key_filter, consume)
    }
}
