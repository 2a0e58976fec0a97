//! Core library for the `darksky` CLI.
//!
//! This crate defines:
//! - The quantile sparkline encoder and its color decoration
//! - The forecast domain model and the text report built from it
//! - Geocoding and forecast API clients behind small traits
//! - Configuration & credentials handling
//!
//! It is used by `darksky-cli`, but the encoder and formatter have no I/O and
//! can be reused on their own.

pub mod color;
pub mod config;
pub mod error;
pub mod geocode;
pub mod http;
pub mod model;
pub mod provider;
pub mod report;
pub mod sparkline;

pub use color::Style;
pub use config::{Config, ServiceConfig};
pub use error::SparklineError;
pub use geocode::{Geocoder, GoogleGeocoder};
pub use http::ServiceSettings;
pub use model::{Block, DataPoint, ForecastReport, Location, Units};
pub use provider::{DarkSkyProvider, ForecastProvider};
pub use report::{ReportOptions, format_report};
pub use sparkline::{Palette, Sparkline};
