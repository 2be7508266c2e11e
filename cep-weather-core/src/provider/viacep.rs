use async_trait::async_trait;
use reqwest::{Client, header::ACCEPT};
use serde::Deserialize;
use serde_json::Value;

use crate::{ZipCode, error::LookupError};

use super::LocationResolver;

const SERVICE: &str = "ViaCEP";

/// Location lookup backed by ViaCEP (`/ws/{cep}/json/`).
#[derive(Debug, Clone)]
pub struct ViaCepResolver {
    base_url: String,
    http: Client,
}

impl ViaCepResolver {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    fn url_for(&self, zip: &ZipCode) -> String {
        format!("{}/ws/{}/json/", self.base_url, urlencoding::encode(zip.as_str()))
    }
}

/// ViaCEP answers with a flat object of strings. Unknown but well-formed
/// codes come back as `{"erro": true}` (newer deployments send `"true"`).
#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    localidade: Option<String>,
    erro: Option<Value>,
}

impl ViaCepResponse {
    fn is_error_marker(&self) -> bool {
        match &self.erro {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

fn parse_locality(body: &str) -> Result<Option<String>, LookupError> {
    let fields: serde_json::Map<String, Value> = serde_json::from_str(body)
        .map_err(|source| LookupError::Decode { service: SERVICE, source })?;

    // Everything except the error marker has to be a string.
    if let Some((name, _)) =
        fields.iter().find(|(name, value)| *name != "erro" && !value.is_string())
    {
        return Err(LookupError::Decode {
            service: SERVICE,
            source: serde::de::Error::custom(format!("field '{name}' is not a string")),
        });
    }

    let parsed: ViaCepResponse = serde_json::from_value(Value::Object(fields))
        .map_err(|source| LookupError::Decode { service: SERVICE, source })?;

    if parsed.is_error_marker() {
        return Ok(None);
    }

    Ok(parsed.localidade.filter(|name| !name.is_empty()))
}

#[async_trait]
impl LocationResolver for ViaCepResolver {
    async fn locate(&self, zip: &ZipCode) -> Result<Option<String>, LookupError> {
        let res = self
            .http
            .get(self.url_for(zip))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| LookupError::Request { service: SERVICE, source })?;

        let status = res.status();
        if !status.is_success() {
            tracing::debug!(%zip, %status, "ViaCEP returned non-success status, treating as not found");
            return Ok(None);
        }

        let body = res
            .text()
            .await
            .map_err(|source| LookupError::Request { service: SERVICE, source })?;

        let locality = parse_locality(&body)?;
        tracing::debug!(%zip, ?locality, "ViaCEP lookup finished");

        Ok(locality)
    }
}
