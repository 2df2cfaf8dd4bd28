//! The flight query service.
//!
//! Every operation reads a fresh snapshot from the [`FlightStore`] and filters
//! or aggregates it in memory. Nothing is cached between calls.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, error, info, trace, warn};

use crate::error::Error;
use crate::model::{Flight, FlightStatistics};
use crate::storage::FlightStore;

/// Body returned by the health check.
pub const HEALTH_MESSAGE: &str = "Flight Service is running successfully! Status: OK";

/// Body returned by the log level test.
pub const LOG_TEST_MESSAGE: &str = "Logging test completed. Check your logs.";

/// Why a query could not be answered.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The request was malformed and never reached the store.
    #[error("{0}")]
    BadRequest(&'static str),

    /// No flight has the requested id.
    #[error("Flight with ID {0} not found")]
    NotFound(i64),

    /// The store failed while answering the query.
    #[error("{context}: {source}")]
    Store {
        /// What the service was doing.
        context: &'static str,
        /// The underlying store error.
        #[source]
        source: Error,
    },
}

impl QueryError {
    /// Check if this error was caused by invalid input.
    #[must_use]
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::BadRequest(_))
    }

    /// Check if this error reports a missing flight.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Read, filter and aggregate operations over the flight collection.
#[derive(Debug, Clone)]
pub struct FlightQueryService {
    store: Arc<dyn FlightStore>,
}

impl FlightQueryService {
    /// Create a service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn FlightStore>) -> Self {
        Self { store }
    }

    /// Liveness probe. Never touches the store.
    #[must_use]
    pub fn health_check(&self) -> &'static str {
        info!("Health check endpoint accessed - Service is healthy");
        HEALTH_MESSAGE
    }

    /// Return every stored flight.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Store`] if the store fails.
    pub async fn get_all_flights(&self) -> Result<Vec<Flight>, QueryError> {
        info!("Request received to fetch all flights");

        let started = Instant::now();
        let flights = self
            .store
            .list_all()
            .await
            .map_err(|source| store_failure("Error retrieving flights", source))?;

        info!(
            "Successfully retrieved {} flights in {} ms",
            flights.len(),
            started.elapsed().as_millis()
        );
        debug!("Flight details: {:?}", flights);
        Ok(flights)
    }

    /// Return the flight with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::BadRequest`] if `id` is absent or not positive,
    /// [`QueryError::NotFound`] if no flight has that id, and
    /// [`QueryError::Store`] if the store fails.
    pub async fn get_flight_by_id(&self, id: Option<i64>) -> Result<Flight, QueryError> {
        info!("Request received for flight {:?}", id);

        let Some(id) = id.filter(|id| *id > 0) else {
            warn!("Invalid flight ID provided: {:?}", id);
            return Err(QueryError::BadRequest("Invalid flight ID"));
        };

        let flight = self
            .store
            .find_by_id(id)
            .await
            .map_err(|source| store_failure("Error retrieving flight", source))?;

        match flight {
            Some(flight) => {
                info!(
                    "Flight {} found: {}",
                    id,
                    flight.flight_number.as_deref().unwrap_or("<no flight number>")
                );
                Ok(flight)
            }
            None => {
                warn!("Flight {} not found", id);
                Err(QueryError::NotFound(id))
            }
        }
    }

    /// Return the flights departing from `city`, ignoring case.
    ///
    /// Results keep the store's order.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::BadRequest`] if `city` is absent or blank, and
    /// [`QueryError::Store`] if the store fails.
    pub async fn search_by_departure_city(
        &self,
        city: Option<&str>,
    ) -> Result<Vec<Flight>, QueryError> {
        info!("Searching flights from departure city: {:?}", city);

        let Some(city) = city.filter(|c| !c.trim().is_empty()) else {
            warn!("Empty departure city provided");
            return Err(QueryError::BadRequest("Departure city cannot be empty"));
        };

        let flights: Vec<Flight> = self
            .store
            .list_all()
            .await
            .map_err(|source| store_failure("Error searching flights", source))?
            .into_iter()
            .filter(|flight| flight.departs_from(city))
            .collect();

        info!("Found {} flights from {}", flights.len(), city);
        Ok(flights)
    }

    /// Compute statistics over the whole flight collection.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Store`] if the store fails.
    pub async fn get_statistics(&self) -> Result<FlightStatistics, QueryError> {
        info!("Retrieving flight statistics");

        let flights = self
            .store
            .list_all()
            .await
            .map_err(|source| store_failure("Error generating flight statistics", source))?;
        let stats = FlightStatistics::from_flights(&flights);

        info!(
            "Statistics generated: {} total flights",
            stats.total_flights
        );
        Ok(stats)
    }

    /// Emit one event at every severity level.
    #[must_use]
    pub fn log_level_test(&self) -> &'static str {
        trace!("This is a TRACE level log - Flight Service");
        debug!("This is a DEBUG level log - Flight Service");
        info!("This is an INFO level log - Flight Service");
        warn!("This is a WARN level log - Flight Service");
        error!("This is an ERROR level log - Flight Service");
        info!(
            user = "anonymous",
            action = "log_test",
            "Flight API test endpoint accessed"
        );
        LOG_TEST_MESSAGE
    }
}

fn store_failure(context: &'static str, source: Error) -> QueryError {
    error!(error = ?source, "{}: {}", context, source);
    QueryError::Store { context, source }
}
