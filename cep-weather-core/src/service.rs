use anyhow::Context;
use std::sync::Arc;

use crate::{
    Config, Temperature, ZipCode,
    error::LookupFailure,
    provider::{
        LocationResolver, TemperatureResolver, ViaCepResolver, WeatherApiResolver,
        build_http_client,
    },
};

/// CEP → locality → current temperature.
#[derive(Debug, Clone)]
pub struct TemperatureService {
    locations: Arc<dyn LocationResolver>,
    temperatures: Arc<dyn TemperatureResolver>,
}

impl TemperatureService {
    pub fn new(
        locations: Arc<dyn LocationResolver>,
        temperatures: Arc<dyn TemperatureResolver>,
    ) -> Self {
        Self { locations, temperatures }
    }

    /// Wire the ViaCEP and WeatherAPI resolvers from config.
    ///
    /// Fails when no WeatherAPI key is configured.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.weather_api_key()?.to_owned();
        config.upstream.validate()?;
        let http =
            build_http_client(&config.upstream).context("Failed to build upstream HTTP client")?;

        let locations = ViaCepResolver::new(config.upstream.viacep_base_url.as_str(), http.clone());
        let temperatures =
            WeatherApiResolver::new(api_key, config.upstream.weatherapi_base_url.as_str(), http);

        Ok(Self::new(Arc::new(locations), Arc::new(temperatures)))
    }

    pub async fn lookup(&self, cep: Option<&str>) -> Result<Temperature, LookupFailure> {
        let zip = ZipCode::parse(cep).ok_or(LookupFailure::InvalidZipCode)?;

        let location = self.locations.locate(&zip).await?.ok_or(LookupFailure::NotFound)?;

        let celsius = match self.temperatures.current_celsius(&location).await? {
            Some(celsius) => celsius,
            None => {
                tracing::warn!(%zip, %location, "No temperature data, answering with 0 °C");
                0.0
            }
        };

        tracing::info!(%zip, %location, celsius, "Temperature resolved");
        Ok(Temperature::from_celsius(celsius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct FakeLocations {
        answer: Option<&'static str>,
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LocationResolver for FakeLocations {
        async fn locate(&self, _zip: &ZipCode) -> Result<Option<String>, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(decode_error("ViaCEP"));
            }
            Ok(self.answer.map(str::to_owned))
        }
    }

    #[derive(Debug, Default)]
    struct FakeTemperatures {
        answer: Option<f64>,
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TemperatureResolver for FakeTemperatures {
        async fn current_celsius(&self, _location: &str) -> Result<Option<f64>, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(decode_error("WeatherAPI"));
            }
            Ok(self.answer)
        }
    }

    fn decode_error(service: &'static str) -> LookupError {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        LookupError::Decode { service, source }
    }

    fn service(
        locations: FakeLocations,
        temperatures: FakeTemperatures,
    ) -> (TemperatureService, Arc<FakeLocations>, Arc<FakeTemperatures>) {
        let locations = Arc::new(locations);
        let temperatures = Arc::new(temperatures);
        let svc = TemperatureService::new(locations.clone(), temperatures.clone());
        (svc, locations, temperatures)
    }

    #[tokio::test]
    async fn invalid_codes_make_no_calls() {
        let (svc, locations, temperatures) = service(
            FakeLocations { answer: Some("São Paulo"), ..Default::default() },
            FakeTemperatures { answer: Some(25.0), ..Default::default() },
        );

        for cep in [None, Some(""), Some("123"), Some("0131010"), Some("013101000")] {
            let err = svc.lookup(cep).await.unwrap_err();
            assert!(matches!(err, LookupFailure::InvalidZipCode), "cep {cep:?}");
        }

        assert_eq!(locations.calls.load(Ordering::SeqCst), 0);
        assert_eq!(temperatures.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_location_is_not_found() {
        let (svc, _, temperatures) = service(FakeLocations::default(), FakeTemperatures::default());

        let err = svc.lookup(Some("00000000")).await.unwrap_err();

        assert!(matches!(err, LookupFailure::NotFound));
        assert_eq!(err.to_string(), "cannot find zipcode");
        assert_eq!(temperatures.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn location_failure_is_upstream_error() {
        let (svc, _, temperatures) = service(
            FakeLocations { fail: true, ..Default::default() },
            FakeTemperatures::default(),
        );

        let err = svc.lookup(Some("01310100")).await.unwrap_err();

        assert!(matches!(err, LookupFailure::Upstream(_)));
        assert!(err.to_string().contains("ViaCEP"));
        assert_eq!(temperatures.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn temperature_failure_is_upstream_error() {
        let (svc, _, _) = service(
            FakeLocations { answer: Some("São Paulo"), ..Default::default() },
            FakeTemperatures { fail: true, ..Default::default() },
        );

        let err = svc.lookup(Some("01310100")).await.unwrap_err();

        assert!(matches!(err, LookupFailure::Upstream(_)));
        assert!(err.to_string().contains("WeatherAPI"));
    }

    #[tokio::test]
    async fn resolves_temperature_in_three_units() {
        let (svc, locations, temperatures) = service(
            FakeLocations { answer: Some("São Paulo"), ..Default::default() },
            FakeTemperatures { answer: Some(25.0), ..Default::default() },
        );

        let temp = svc.lookup(Some("01310100")).await.unwrap();

        assert_eq!(temp, Temperature::from_celsius(25.0));
        assert_eq!(temp.kelvin, 298.15);
        assert_eq!(temp.fahrenheit, 77.0);
        assert_eq!(locations.calls.load(Ordering::SeqCst), 1);
        assert_eq!(temperatures.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_temperature_falls_back_to_zero() {
        let (svc, _, _) = service(
            FakeLocations { answer: Some("São Paulo"), ..Default::default() },
            FakeTemperatures::default(),
        );

        let temp = svc.lookup(Some("01310100")).await.unwrap();

        assert_eq!(temp, Temperature::from_celsius(0.0));
    }

    #[test]
    fn from_config_requires_api_key() {
        let err = TemperatureService::from_config(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("No WeatherAPI key configured"));
    }

    #[test]
    fn from_config_rejects_zero_timeout() {
        let mut cfg = Config::default();
        cfg.set_weather_api_key("KEY".to_string());
        cfg.upstream.timeout_secs = 0;

        let err = TemperatureService::from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("Invalid UPSTREAM_TIMEOUT_SECS"));
    }

    #[test]
    fn from_config_builds_with_api_key() {
        let mut cfg = Config::default();
        cfg.set_weather_api_key("KEY".to_string());

        assert!(TemperatureService::from_config(&cfg).is_ok());
    }
}
