//! Convenient imports for Corral.
//!
//! ```ignore
//! use corral::prelude::*;
//! ```

pub use crate::{
    Collections, Corral, CorralBuilder, DocumentStream, DurabilityMode, Error, Result,
    StoreOptions, Upserted,
};
