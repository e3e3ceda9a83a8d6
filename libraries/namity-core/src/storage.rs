//! Durable key/value persistence surface
//!
//! Queue state survives application restarts through a small string-keyed
//! store. The trait abstracts the concrete backend so the playback crate can
//! be tested against an in-memory map while `namity-storage` provides the
//! on-disk implementation.

use crate::error::Result;

/// String-keyed durable store
///
/// Implementations must be callable from a background writer thread; writes
/// are best-effort from the caller's point of view and must not assume any
/// ordering guarantees beyond per-key last-write-wins.
pub trait StateStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value
    fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Fetch the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Remove the value stored under `key`
    ///
    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
