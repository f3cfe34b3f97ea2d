//! Core library for the `kma-weather` CLI.
//!
//! This crate defines:
//! - Conversion of latitude/longitude to forecast grid cells
//! - Selection of the current forecast base time
//! - Shaping of raw forecast items into a display snapshot
//! - Configuration & credentials handling
//! - The forecast provider that ties these to the HTTP endpoint
//!
//! It is used by `kma-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod forecast;
pub mod grid;
pub mod model;
pub mod provider;
pub mod schedule;

pub use config::Config;
pub use forecast::{ForecastError, PrecipitationSlot, RawForecastItem, SkyState, WeatherSnapshot, shape};
pub use grid::{GeoPoint, GridCell, convert};
pub use model::{ForecastQuery, WeatherReport, WeatherRequest};
pub use provider::{ForecastProvider, provider_from_config};
pub use schedule::{BaseTime, base_date, base_time_for_hour, current_base_time};
