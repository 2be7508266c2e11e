use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use cep_weather_core::{LookupFailure, Temperature, TemperatureService};
use tower_http::trace::TraceLayer;

pub fn router(service: TemperatureService) -> Router {
    Router::new()
        .route("/temp", get(temperature))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
}

/// First `cep` value in the query string; later repeats are ignored.
fn first_cep(params: &[(String, String)]) -> Option<&str> {
    params.iter().find(|(name, _)| name == "cep").map(|(_, value)| value.as_str())
}

/// Plain-text error response wrapping a failed lookup.
#[derive(Debug)]
pub struct ApiError(LookupFailure);

impl From<LookupFailure> for ApiError {
    fn from(failure: LookupFailure) -> Self {
        Self(failure)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            LookupFailure::InvalidZipCode => StatusCode::UNPROCESSABLE_ENTITY,
            LookupFailure::NotFound => StatusCode::NOT_FOUND,
            LookupFailure::Upstream(err) => {
                tracing::error!(error = %err, "Upstream lookup failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.0.to_string()).into_response()
    }
}

async fn temperature(
    State(service): State<TemperatureService>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Temperature>, ApiError> {
    let temperature = service.lookup(first_cep(&params)).await?;
    Ok(Json(temperature))
}
