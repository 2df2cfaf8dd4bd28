//! In-memory flight store.

use async_trait::async_trait;

use super::FlightStore;
use crate::error::Result;
use crate::model::{Flight, NewFlight};

/// A fixed set of flights held in memory.
///
/// Flights are returned in the order they were supplied.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    flights: Vec<Flight>,
}

impl MemoryStore {
    /// Create a store over already-identified flights.
    #[must_use]
    pub fn new(flights: Vec<Flight>) -> Self {
        Self { flights }
    }

    /// Create a store from unsaved flights, assigning ids starting at 1.
    #[must_use]
    pub fn from_new_flights(flights: impl IntoIterator<Item = NewFlight>) -> Self {
        let flights = flights
            .into_iter()
            .zip(1..)
            .map(|(flight, id)| flight.into_flight(id))
            .collect();
        Self { flights }
    }

    /// Number of flights held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flights.len()
    }

    /// Whether the store holds no flights.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }
}

#[async_trait]
impl FlightStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Flight>> {
        Ok(self.flights.clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Flight>> {
        Ok(self.flights.iter().find(|f| f.id == id).cloned())
    }
}
