//! Stream resolution trait
//!
//! The playback controller does not know how playable streams are addressed;
//! it asks a resolver, keyed by track id. In the full application the
//! resolver is backed by the track catalog's REST client; tests substitute a
//! table lookup.

use crate::error::Result;
use crate::types::{StreamUrl, TrackId};

/// Maps a track id to its playable stream locator
///
/// Resolution is expected to be cheap and local (URL construction or a cache
/// lookup). Callers do not retry: a failed resolution is reported to the
/// caller as a load failure.
pub trait StreamResolver: Send + Sync {
    /// Resolve the playable stream locator for a track
    ///
    /// # Errors
    /// Returns `CoreError::TrackNotFound` when the id is unknown.
    fn stream_url(&self, id: &TrackId) -> Result<StreamUrl>;
}
