//! Core library for the `cep-weather` service.
//!
//! This crate defines:
//! - Configuration & credential loading
//! - Upstream resolvers (ViaCEP for localities, WeatherAPI.com for temperatures)
//! - The CEP → temperature lookup pipeline and its error taxonomy
//!
//! It has no knowledge of HTTP status codes; `cep-weather-server` maps
//! [`LookupFailure`] onto responses.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod service;

pub use config::{Config, LogFormat, LoggingConfig, ServerConfig, UpstreamConfig};
pub use error::{LookupError, LookupFailure};
pub use model::{Temperature, ZipCode};
pub use provider::{LocationResolver, TemperatureResolver};
pub use service::TemperatureService;
