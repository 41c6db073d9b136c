//! Scoped transaction acquisition.
//!
//! Both helpers guarantee release on every exit path. A transaction that is
//! not committed is aborted when dropped, so caller failures and panics can
//! never leak a transaction or leave a half-committed write behind. Dropping
//! a read transaction cannot fail, which is why read cleanup never surfaces
//! an error to the caller.

use corral_core::{Error, Result};
use heed::{RoTxn, RwTxn};

use crate::environment::Environment;

impl Environment {
    /// Run `f` inside a snapshot-consistent read transaction.
    ///
    /// Any number of read scopes may be active concurrently.
    pub(crate) fn with_read<T, F>(&self, collection: &str, f: F) -> Result<T>
    where
        F: FnOnce(&RoTxn) -> Result<T>,
    {
        let rtxn = self.env.read_txn().map_err(|e| {
            Error::engine(format!("beginning read transaction for `{collection}`"), e)
        })?;
        f(&rtxn)
    }

    /// Run `f` inside an exclusive write transaction, committing on success.
    ///
    /// Callers must hold the coordination lock's write side; every call site
    /// in this crate acquires it immediately before calling. If `f` fails
    /// the transaction is dropped and all its mutations are discarded.
    pub(crate) fn with_write<T, F>(&self, collection: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut RwTxn) -> Result<T>,
    {
        let mut wtxn = self.env.write_txn().map_err(|e| {
            Error::engine(format!("beginning write transaction for `{collection}`"), e)
        })?;
        let value = f(&mut wtxn)?;
        wtxn.commit().map_err(|e| {
            Error::engine(format!("committing write transaction for `{collection}`"), e)
        })?;
        Ok(value)
    }
}
