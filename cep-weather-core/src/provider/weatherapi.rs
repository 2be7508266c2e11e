use async_trait::async_trait;
use reqwest::{
    Client,
    header::{ACCEPT, CONTENT_TYPE},
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::LookupError;

use super::{TemperatureResolver, truncate_body};

const SERVICE: &str = "WeatherAPI";

/// Current weather lookup backed by WeatherAPI.com (`/v1/current.json`).
#[derive(Debug, Clone)]
pub struct WeatherApiResolver {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiResolver {
    pub fn new(api_key: String, base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { api_key, base_url, http }
    }
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    current: WaCurrent,
}

/// A body that is not a JSON object is an error; an object without a
/// numeric `current.temp_c` is "no data".
fn parse_celsius(body: &str) -> Result<Option<f64>, LookupError> {
    let fields: serde_json::Map<String, Value> = serde_json::from_str(body)
        .map_err(|source| LookupError::Decode { service: SERVICE, source })?;

    match serde_json::from_value::<WaResponse>(Value::Object(fields)) {
        Ok(parsed) => Ok(Some(parsed.current.temp_c)),
        Err(e) => {
            tracing::warn!(error = %e, "WeatherAPI response has no usable current.temp_c");
            Ok(None)
        }
    }
}

#[async_trait]
impl TemperatureResolver for WeatherApiResolver {
    async fn current_celsius(&self, location: &str) -> Result<Option<f64>, LookupError> {
        let url = format!("{}/v1/current.json", self.base_url);

        let res = self
            .http
            .get(url)
            .query(&[("q", location)])
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header("key", self.api_key.as_str())
            .send()
            .await
            .map_err(|source| LookupError::Request { service: SERVICE, source })?;

        let status = res.status();
        if !status.is_success() {
            // Body is only for the log line; a failed read still means "no data".
            let body = res.text().await.unwrap_or_default();
            tracing::warn!(
                %location,
                %status,
                body = %truncate_body(&body),
                "WeatherAPI current request failed, no temperature available"
            );
            return Ok(None);
        }

        let body = res
            .text()
            .await
            .map_err(|source| LookupError::Request { service: SERVICE, source })?;

        parse_celsius(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_current_temp_c() {
        let body = r#"{"location":{"name":"Sao Paulo"},"current":{"temp_c":25.0,"temp_f":77.0}}"#;
        assert_eq!(parse_celsius(body).unwrap(), Some(25.0));
    }

    #[test]
    fn reported_zero_is_not_missing() {
        assert_eq!(parse_celsius(r#"{"current":{"temp_c":0}}"#).unwrap(), Some(0.0));
    }

    #[test]
    fn missing_current_is_no_data() {
        assert_eq!(parse_celsius(r#"{"location":{}}"#).unwrap(), None);
    }

    #[test]
    fn wrong_typed_temp_is_no_data() {
        assert_eq!(parse_celsius(r#"{"current":{"temp_c":"hot"}}"#).unwrap(), None);
        assert_eq!(parse_celsius(r#"{"current":[]}"#).unwrap(), None);
    }

    #[test]
    fn invalid_json_is_decode_error() {
        let err = parse_celsius("not json").unwrap_err();
        assert!(err.to_string().starts_with("failed to decode WeatherAPI response"));
    }

    #[test]
    fn non_object_body_is_decode_error() {
        assert!(parse_celsius("[1, 2]").is_err());
    }
}
