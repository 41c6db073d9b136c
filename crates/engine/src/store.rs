//! Typed document operations.
//!
//! Every operation resolves the collection handle through the registry, runs
//! inside a scoped transaction, and moves documents through the JSON codec.
//! Write operations hold the coordination lock's write side for the whole
//! transaction; point reads rely on snapshot isolation and take no lock.

use std::marker::PhantomData;

use corral_core::{decode_document, encode_document, Error, Result, MAX_KEY_BYTES};
use heed::types::{Bytes, Str};
use heed::RoIter;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::environment::Environment;

/// Outcome of an atomic upsert.
///
/// Pairs the value observed before the operation with the value committed by
/// it. Both snapshots are taken within the same write transaction, so no
/// other writer can interleave between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upserted<T> {
    /// Value stored under the key before the operation, if any.
    pub previous: Option<T>,
    /// Value committed by the operation.
    pub current: T,
}

/// Reject keys whose byte encoding exceeds the engine maximum before any
/// transaction is opened, so an oversized key never causes a mutation.
fn check_key(key: &str) -> Result<()> {
    let len = key.len();
    if len > MAX_KEY_BYTES {
        return Err(Error::OversizedKey {
            len,
            max: MAX_KEY_BYTES,
        });
    }
    Ok(())
}

impl Environment {
    /// Fetch the document stored under `key`, if any.
    pub fn fetch<T>(&self, collection: &str, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        check_key(key)?;
        let handle = self.resolve(collection)?;
        self.with_read(collection, |rtxn| {
            match handle
                .get(rtxn, key)
                .map_err(|e| Error::engine(format!("reading `{key}` from `{collection}`"), e))?
            {
                Some(bytes) => Ok(Some(decode_document(collection, bytes)?)),
                None => Ok(None),
            }
        })
    }

    /// Atomically read-modify-write the document under `key`.
    ///
    /// `modify` receives the current value (or `None`) and returns the value
    /// to store. Read, modifier application and write all happen within one
    /// write transaction under the coordination lock, so increment-like
    /// updates never lose concurrent writes.
    pub fn update<T, F>(&self, collection: &str, key: &str, modify: F) -> Result<Upserted<T>>
    where
        T: Serialize + DeserializeOwned + Clone,
        F: FnOnce(Option<T>) -> T,
    {
        check_key(key)?;
        let handle = self.resolve(collection)?;
        let _guard = self.lock.write();
        self.with_write(collection, |wtxn| {
            let previous = match handle
                .get(wtxn, key)
                .map_err(|e| Error::engine(format!("reading `{key}` from `{collection}`"), e))?
            {
                Some(bytes) => Some(decode_document::<T>(collection, bytes)?),
                None => None,
            };
            let current = modify(previous.clone());
            let bytes = encode_document(collection, &current)?;
            handle
                .put(wtxn, key, bytes.as_slice())
                .map_err(|e| Error::engine(format!("writing `{key}` to `{collection}`"), e))?;
            Ok(Upserted { previous, current })
        })
    }

    /// Store `doc` under `key`, replacing whatever was there.
    ///
    /// An upsert whose modifier ignores the previous value.
    pub fn put<T>(&self, collection: &str, key: &str, doc: &T) -> Result<Upserted<T>>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        self.update(collection, key, |_| doc.clone())
    }

    /// Delete the document under `key`, returning it if one existed.
    ///
    /// Deleting an absent key is a no-op and returns `None`.
    pub fn delete<T>(&self, collection: &str, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        check_key(key)?;
        let handle = self.resolve(collection)?;
        let _guard = self.lock.write();
        self.with_write(collection, |wtxn| {
            let previous = match handle
                .get(wtxn, key)
                .map_err(|e| Error::engine(format!("reading `{key}` from `{collection}`"), e))?
            {
                Some(bytes) => Some(decode_document::<T>(collection, bytes)?),
                None => None,
            };
            if previous.is_some() {
                handle
                    .delete(wtxn, key)
                    .map_err(|e| Error::engine(format!("deleting `{key}` from `{collection}`"), e))?;
            }
            Ok(previous)
        })
    }

    /// Materialize every document matching the filters.
    ///
    /// `key_filter` runs before decode, `value_filter` after. Records that
    /// fail to decode are excluded from the result rather than failing the
    /// scan; use [`Environment::stream`] to observe them. The whole
    /// collection is scanned and matches are held in memory, so this is
    /// intended for small or bounded collections.
    pub fn collect<T, K, V>(&self, collection: &str, key_filter: K, value_filter: V) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        K: Fn(&str) -> bool,
        V: Fn(&T) -> bool,
    {
        let handle = self.resolve(collection)?;
        self.with_read(collection, |rtxn| {
            let iter = handle
                .iter(rtxn)
                .map_err(|e| Error::engine(format!("scanning `{collection}`"), e))?;
            let mut docs = Vec::new();
            for entry in iter {
                let (key, bytes) =
                    entry.map_err(|e| Error::engine(format!("scanning `{collection}`"), e))?;
                if !key_filter(key) {
                    continue;
                }
                match decode_document::<T>(collection, bytes) {
                    Ok(doc) => {
                        if value_filter(&doc) {
                            docs.push(doc);
                        }
                    }
                    Err(err) => {
                        warn!(collection, key, %err, "dropping undecodable record from scan");
                    }
                }
            }
            Ok(docs)
        })
    }

    /// Stream the documents whose keys match `key_filter` through `consume`.
    ///
    /// The stream is lazy, finite and single-pass; records that fail to
    /// decode surface as `Err` items instead of being dropped. The read
    /// transaction, the cursor and the coordination lock's read side are
    /// held exactly for the duration of `consume`, so the cursor cannot
    /// outlive its scope and no collection registration can run while it is
    /// live. Do not issue write operations from inside `consume`; they would
    /// wait on the lock this call holds.
    pub fn stream<T, K, R, F>(&self, collection: &str, key_filter: K, consume: F) -> Result<R>
    where
        T: DeserializeOwned,
        K: Fn(&str) -> bool,
        F: for<'s> FnOnce(&mut DocumentStream<'s, T>) -> R,
    {
        let handle = self.resolve(collection)?;
        let _guard = self.lock.read();
        let rtxn = self.env.read_txn().map_err(|e| {
            Error::engine(format!("beginning read transaction for `{collection}`"), e)
        })?;
        let iter = handle
            .iter(&rtxn)
            .map_err(|e| Error::engine(format!("scanning `{collection}`"), e))?;
        let mut stream = DocumentStream {
            collection,
            iter,
            key_filter: &key_filter,
            _doc: PhantomData,
        };
        Ok(consume(&mut stream))
    }

    /// Number of documents in the collection, from engine statistics.
    pub fn collection_len(&self, collection: &str) -> Result<u64> {
        let handle = self.resolve(collection)?;
        self.with_read(collection, |rtxn| {
            handle
                .len(rtxn)
                .map_err(|e| Error::engine(format!("reading entry count of `{collection}`"), e))
        })
    }

    /// Remove every document from the collection.
    ///
    /// The collection itself remains allocated.
    pub fn clear_collection(&self, collection: &str) -> Result<()> {
        let handle = self.resolve(collection)?;
        let _guard = self.lock.write();
        self.with_write(collection, |wtxn| {
            handle
                .clear(wtxn)
                .map_err(|e| Error::engine(format!("clearing `{collection}`"), e))
        })
    }
}

/// Lazy, single-pass sequence of decoded documents.
///
/// Yielded by [`Environment::stream`]; borrows the read transaction owned by
/// the enclosing scope.
pub struct DocumentStream<'s, T> {
    collection: &'s str,
    iter: RoIter<'s, Str, Bytes>,
    key_filter: &'s dyn Fn(&str) -> bool,
    _doc: PhantomData<fn() -> T>,
}

impl<'s, T> Iterator for DocumentStream<'s, T>
where
    T: DeserializeOwned,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.iter.next()? {
                Ok((key, bytes)) => {
                    if !(self.key_filter)(key) {
                        continue;
                    }
                    return Some(decode_document(self.collection, bytes));
                }
                Err(e) => {
                    return Some(Err(Error::engine(
                        format!("scanning `{}`", self.collection),
                        e,
                    )))
                }
            }
        }
    }
}
