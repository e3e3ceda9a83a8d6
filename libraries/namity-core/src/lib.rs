//! Namity Core
//!
//! Shared vocabulary for the Namity player: domain types, collaborator
//! traits, and error handling.
//!
//! This crate is platform-agnostic and dependency-light. It defines:
//! - **Domain Types**: `TrackRef`, `TrackId`, `StreamUrl`
//! - **Collaborator Traits**: `StreamResolver` (track id → playable stream),
//!   `StateStore` (durable key/value persistence surface)
//! - **Error Handling**: `CoreError` and the crate `Result` alias
//!
//! # Example
//!
//! ```rust
//! use namity_core::types::{TrackId, TrackRef};
//!
//! let track = TrackRef::new(TrackId::new("t-42"), "Morning Rain");
//! assert_eq!(track.id.as_str(), "t-42");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod resolver;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use resolver::StreamResolver;
pub use storage::StateStore;
pub use types::{StreamUrl, TrackId, TrackRef};
