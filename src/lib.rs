//! Personal-site backend that greets each visitor with their approximate
//! location and current weather.
//!
//! Every `GET /` resolves the caller's IP through a geolocation service, looks
//! up current conditions for those coordinates and renders `static/index.html`.
//! Lookup failures degrade the page instead of failing the request.

pub mod config;
pub mod constants;
pub mod error;
pub mod fetch;
pub mod formatters;
pub mod geo;
pub mod ip;
pub mod models;
pub mod server;
pub mod service;
pub mod telemetry;
pub mod template;
pub mod weather;

pub use config::{Config, LogFormat, WeatherProvider};
pub use error::{LookupError, RenderError, StartupError};
pub use geo::GeoClient;
pub use models::{LocationData, ViewModel, WeatherData};
pub use service::Enricher;
pub use weather::WeatherClient;
