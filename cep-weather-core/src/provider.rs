use crate::{UpstreamConfig, ZipCode, error::LookupError};
use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};

pub mod viacep;
pub mod weatherapi;

pub use viacep::ViaCepResolver;
pub use weatherapi::WeatherApiResolver;

/// Resolves a postal code to a locality name.
#[async_trait]
pub trait LocationResolver: Send + Sync + Debug {
    /// `Ok(None)` means the upstream had nothing for this code.
    async fn locate(&self, zip: &ZipCode) -> Result<Option<String>, LookupError>;
}

/// Resolves a locality name to its current temperature in Celsius.
#[async_trait]
pub trait TemperatureResolver: Send + Sync + Debug {
    /// `Ok(None)` means the upstream answered without usable data.
    async fn current_celsius(&self, location: &str) -> Result<Option<f64>, LookupError>;
}

/// Build the HTTP client shared by both resolvers.
pub fn build_http_client(config: &UpstreamConfig) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(concat!("cep-weather/", env!("CARGO_PKG_VERSION")))
        .build()
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
