//! Core types for Corral.
//!
//! This crate holds the pieces shared by every layer: the error taxonomy,
//! environment options, and the document codec. It knows nothing about the
//! storage engine beyond the opaque cause carried inside [`Error::Engine`].

#![warn(missing_docs)]

pub mod codec;
pub mod error;
pub mod options;

pub use codec::{decode_document, encode_document};
pub use error::{Error, Result};
pub use options::{DurabilityMode, StoreOptions, MAX_KEY_BYTES};
