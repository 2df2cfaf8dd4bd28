//! Request handlers for the flight API.
//!
//! Handlers only translate between HTTP and [`FlightQueryService`]; all
//! validation lives in the service.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use crate::model::{Flight, FlightStatistics};
use crate::service::{FlightQueryService, QueryError};

/// Query string accepted by the search endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// City to match against each flight's departure city.
    #[serde(rename = "departureCity")]
    pub departure_city: Option<String>,
}

impl SearchParams {
    /// Build from raw query pairs, keeping the first `departureCity` when the
    /// key repeats.
    #[must_use]
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let departure_city = pairs
            .into_iter()
            .find(|(key, _)| key == "departureCity")
            .map(|(_, value)| value);
        Self { departure_city }
    }
}

/// `GET /health`
pub async fn health(State(service): State<FlightQueryService>) -> &'static str {
    service.health_check()
}

/// `GET /flights`
pub async fn list_flights(
    State(service): State<FlightQueryService>,
) -> Result<Json<Vec<Flight>>, QueryError> {
    service.get_all_flights().await.map(Json)
}

/// `GET /flights/{id}`
///
/// The id is parsed here rather than by the extractor so that a non-numeric
/// id is reported the same way as a non-positive one.
pub async fn get_flight(
    State(service): State<FlightQueryService>,
    Path(raw_id): Path<String>,
) -> Result<Json<Flight>, QueryError> {
    let id = raw_id.trim().parse::<i64>().ok();
    if id.is_none() {
        debug!("Unparseable flight id {:?}", raw_id);
    }
    service.get_flight_by_id(id).await.map(Json)
}

/// `GET /flights/search?departureCity=...`
pub async fn search_flights(
    State(service): State<FlightQueryService>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Flight>>, QueryError> {
    let params = SearchParams::from_pairs(pairs);
    service
        .search_by_departure_city(params.departure_city.as_deref())
        .await
        .map(Json)
}

/// `GET /flights/stats`
pub async fn flight_statistics(
    State(service): State<FlightQueryService>,
) -> Result<Json<FlightStatistics>, QueryError> {
    service.get_statistics().await.map(Json)
}

/// `GET /logs/test`
pub async fn log_test(State(service): State<FlightQueryService>) -> &'static str {
    service.log_level_test()
}
