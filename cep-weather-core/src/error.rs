use thiserror::Error;

/// Failure talking to one of the upstream services.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("{service} request failed: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode {service} response: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Outcome of a CEP lookup that did not produce a temperature.
///
/// The display text of each variant is what callers see in the response body.
#[derive(Debug, Error)]
pub enum LookupFailure {
    #[error("invalid zipcode")]
    InvalidZipCode,

    #[error("cannot find zipcode")]
    NotFound,

    #[error(transparent)]
    Upstream(#[from] LookupError),
}
