//! Environment options.
//!
//! Construction of the environment (directory layout, capacity limits,
//! durability) is configured here; loading these values from external
//! configuration is the caller's concern.

/// Maximum key size in bytes accepted by the engine.
///
/// LMDB's compile-time default. Keys are validated against this limit before
/// any transaction is opened, so an oversized key never causes a mutation.
pub const MAX_KEY_BYTES: usize = 511;

/// Durability mode for the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurabilityMode {
    /// Fsync on every commit. Zero data loss on crash.
    #[default]
    Strict,
    /// Defer fsync to the operating system. Faster writes; a crash may lose
    /// the most recent commits.
    Relaxed,
}

/// Capacity and durability settings for an environment.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Size of the memory map in bytes. The map is sparse; this is an upper
    /// bound on total data size, not an allocation.
    pub map_size: usize,
    /// Maximum number of named collections the environment can hold.
    pub max_collections: u32,
    /// Maximum number of concurrently active read transactions.
    pub max_readers: u32,
    /// Durability mode.
    pub durability: DurabilityMode,
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreOptions {
            map_size: 1024 * 1024 * 1024,
            max_collections: 128,
            max_readers: 126,
            durability: DurabilityMode::Strict,
        }
    }
}
