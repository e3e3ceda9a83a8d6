//! Domain types for the Namity player

mod ids;
mod track;

pub use ids::TrackId;
pub use track::{StreamUrl, TrackRef};
