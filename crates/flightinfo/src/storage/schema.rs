//! `SQLite` schema definitions for flightinfo.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the flights table.
///
/// Only `id` is constrained; every descriptive column is nullable.
pub const CREATE_FLIGHTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS flights (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    flight_number TEXT,
    departure_city TEXT,
    arrival_city TEXT,
    operating_airlines TEXT,
    date_of_departure TEXT,
    estimated_departure_time TEXT
)
";

/// SQL statement to create an index on `departure_city` for filtering.
pub const CREATE_DEPARTURE_CITY_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_flights_departure_city ON flights(departure_city)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";
