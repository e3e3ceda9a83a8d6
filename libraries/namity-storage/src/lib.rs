//! Namity Storage
//!
//! Durable key/value state storage for the Namity player.
//!
//! Backs the `namity_core::StateStore` trait with an embedded redb database
//! (one string-keyed table), plus an in-memory implementation for tests and
//! volatile sessions. Player convenience state (queue, cursor) lives here;
//! losing it is acceptable, corrupting playback is not, so all failures stay
//! inside the `StorageError` boundary.
//!
//! # Example
//!
//! ```rust,no_run
//! use namity_core::StateStore;
//! use namity_storage::KvStateStore;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = KvStateStore::open("namity-state.redb")?;
//! store.put("namity.player.cursor", "2")?;
//! assert_eq!(store.get("namity.player.cursor")?.as_deref(), Some("2"));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod kv;
mod memory;

pub use error::StorageError;
pub use kv::KvStateStore;
pub use memory::MemoryStateStore;
