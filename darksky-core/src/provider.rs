use async_trait::async_trait;
use std::fmt::Debug;

use crate::{ForecastReport, Location, Units};

pub mod darksky;

pub use darksky::DarkSkyProvider;

/// Fetches a forecast for an already geocoded place.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn forecast(&self, location: &Location, units: Units) -> anyhow::Result<ForecastReport>;
}
