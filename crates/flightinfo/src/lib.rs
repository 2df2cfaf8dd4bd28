//! `flightinfo` - A read-only flight information service
//!
//! This library provides the flight store abstraction, the query service that
//! filters and aggregates flights, and the HTTP surface that exposes it.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use model::{Flight, FlightStatistics, NewFlight};
pub use service::{FlightQueryService, QueryError};
pub use storage::{FlightStore, MemoryStore, SqliteStore};
