//! Track reference type
//!
//! A `TrackRef` identifies a playable item independent of its position in
//! any queue. It is the unit of queue membership and of queue persistence.

use super::TrackId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a playable track
///
/// Immutable once placed in a queue entry. The same track may appear at
/// several queue positions; the entries are positionally distinct but
/// compare equal. The playable stream locator is not stored here; it is
/// looked up from the catalog by id when the track is loaded.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct TrackRef {
    /// Catalog identifier
    pub id: TrackId,

    /// Display title
    pub title: String,
}

impl TrackRef {
    /// Create a new track reference
    pub fn new(id: TrackId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

// Equality is by id: two references to the same catalog track are the same
// track, whatever metadata they were fetched with.
impl PartialEq for TrackRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Playable stream locator
///
/// Opaque locator produced by a `StreamResolver` and consumed by the audio
/// engine. Typically a URL on the streaming endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamUrl(String);

impl StreamUrl {
    /// Create a new stream locator
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StreamUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_id() {
        let a = TrackRef::new(TrackId::new("t1"), "Title A");
        let b = TrackRef::new(TrackId::new("t1"), "Retitled");
        let c = TrackRef::new(TrackId::new("t2"), "Title A");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn serde_roundtrip() {
        let track = TrackRef::new(TrackId::new("t1"), "Title");
        let json = serde_json::to_string(&track).unwrap();
        let back: TrackRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, track.id);
        assert_eq!(back.title, "Title");
    }
}
