//! Main database entry point for Corral.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use corral_core::{DurabilityMode, Result, StoreOptions};
use corral_engine::Environment;

use crate::collections::Collections;

/// The Corral database.
///
/// This is the main entry point. Create one with [`Corral::open`] or
/// [`Corral::builder`], then operate on documents through
/// [`collections`](Self::collections). A `Corral` can be shared freely
/// between threads by reference.
///
/// # Example
///
/// ```ignore
/// use corral::prelude::*;
///
/// let db = Corral::open("./my-db")?;
/// db.collections.create("notes")?;
/// db.collections.put("notes", "first", &note)?;
/// db.close()?;
/// ```
pub struct Corral {
    inner: Arc<Environment>,

    /// Document collection operations.
    pub collections: Collections,

    /// Keeps the backing directory alive for databases opened with
    /// [`CorralBuilder::open_temp`].
    _temp: Option<tempfile::TempDir>,
}

impl Corral {
    /// Open a database at the given path with default settings.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder().path(path).open()
    }

    /// Create a builder for database configuration.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let db = Corral::builder()
    ///     .path("./my-db")
    ///     .map_size(4 * 1024 * 1024 * 1024)
    ///     .relaxed()
    ///     .open()?;
    /// ```
    pub fn builder() -> CorralBuilder {
        CorralBuilder::new()
    }

    /// Directory the database lives in.
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Force all buffered writes to stable storage.
    ///
    /// Only meaningful in relaxed durability mode; strict mode syncs on
    /// every commit.
    pub fn sync(&self) -> Result<()> {
        self.inner.sync()
    }

    /// Integrity self-check of the environment.
    ///
    /// Walks and stats every collection under exclusive coordination.
    /// Intended for startup diagnostics.
    pub fn check(&self) -> Result<()> {
        self.inner.check()
    }

    /// Gracefully close the database.
    ///
    /// Syncs pending writes, then releases the environment. The map itself
    /// is unmapped once the last clone of the handle is dropped.
    pub fn close(self) -> Result<()> {
        self.inner.sync()
    }

    fn from_environment(env: Arc<Environment>, temp: Option<tempfile::TempDir>) -> Self {
        Self {
            collections: Collections::new(env.clone()),
            inner: env,
            _temp: temp,
        }
    }
}

/// Builder for database configuration.
///
/// # Example
///
/// ```ignore
/// // Production: strict durability at a fixed path
/// let db = Corral::builder().path("./my-db").open()?;
///
/// // Testing: temp directory, relaxed durability
/// let db = Corral::builder().relaxed().open_temp()?;
/// ```
pub struct CorralBuilder {
    path: Option<PathBuf>,
    options: StoreOptions,
}

impl CorralBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            path: None,
            options: StoreOptions::default(),
        }
    }

    /// Set the database directory path.
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Upper bound on total data size in bytes. The map is sparse.
    pub fn map_size(mut self, bytes: usize) -> Self {
        self.options.map_size = bytes;
        self
    }

    /// Maximum number of named collections.
    pub fn max_collections(mut self, n: u32) -> Self {
        self.options.max_collections = n;
        self
    }

    /// Maximum number of concurrently active read transactions.
    pub fn max_readers(mut self, n: u32) -> Self {
        self.options.max_readers = n;
        self
    }

    /// Fsync on every commit (default). Zero data loss on crash.
    pub fn strict(mut self) -> Self {
        self.options.durability = DurabilityMode::Strict;
        self
    }

    /// Defer fsync to the operating system. Faster writes; a crash may lose
    /// the most recent commits.
    pub fn relaxed(mut self) -> Self {
        self.options.durability = DurabilityMode::Relaxed;
        self
    }

    /// Open the database.
    ///
    /// Uses the configured path, or a temporary directory if none was set.
    pub fn open(self) -> Result<Corral> {
        match self.path {
            Some(path) => {
                let env = Arc::new(Environment::open(path, self.options)?);
                Ok(Corral::from_environment(env, None))
            }
            None => self.open_temp_inner(),
        }
    }

    /// Open a database in a fresh temporary directory.
    ///
    /// The directory is removed when the database is dropped. Useful for
    /// tests.
    pub fn open_temp(self) -> Result<Corral> {
        self.open_temp_inner()
    }

    fn open_temp_inner(self) -> Result<Corral> {
        let temp = tempfile::TempDir::new()?;
        let env = Arc::new(Environment::open(temp.path(), self.options)?);
        Ok(Corral::from_environment(env, Some(temp)))
    }
}

impl Default for CorralBuilder {
    fn default() -> Self {
        Self::new()
    }
}
