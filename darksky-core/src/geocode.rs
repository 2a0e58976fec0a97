use async_trait::async_trait;
use std::fmt::Debug;

use crate::Location;

pub mod google;

pub use google::GoogleGeocoder;

/// Turns free text into a place with coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// The first match for `query`; an error when nothing matches.
    async fn find(&self, query: &str) -> anyhow::Result<Location>;
}
