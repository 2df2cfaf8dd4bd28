//! Storage layer for flightinfo.
//!
//! The query layer sees storage only through the [`FlightStore`] trait.
//! [`SqliteStore`] is the persistent backend; [`MemoryStore`] holds a fixed
//! set of flights in memory.

pub mod memory;
pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::{Flight, NewFlight};

pub use memory::MemoryStore;

/// Format used to persist departure dates.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format used to persist estimated departure times.
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Columns selected for every flight query, in [`row_to_flight`] order.
const FLIGHT_COLUMNS: &str = "id, flight_number, departure_city, arrival_city, \
     operating_airlines, date_of_departure, estimated_departure_time";

/// Read access to the flight collection.
#[async_trait]
pub trait FlightStore: Send + Sync + std::fmt::Debug {
    /// Return every stored flight.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be queried.
    async fn list_all(&self) -> Result<Vec<Flight>>;

    /// Return the flight with the given id, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be queried.
    async fn find_by_id(&self, id: i64) -> Result<Option<Flight>>;
}

/// `SQLite`-backed flight store.
///
/// A single connection is shared behind a mutex; queries run on the blocking
/// thread pool so request handlers never block the async runtime.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open or create a flight database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist,
    /// then brings the schema up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // WAL lets concurrent readers proceed while an import is writing
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self {
            path,
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory flight database.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a flight and return its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert(&self, flight: &NewFlight) -> Result<i64> {
        let conn = lock(&self.conn)?;
        let id = insert_flight(&conn, flight)?;
        debug!("Inserted flight with id {}", id);
        Ok(id)
    }

    /// Insert several flights in one transaction and return their ids in order.
    ///
    /// Either every flight is stored or none is.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert_many(&self, flights: &[NewFlight]) -> Result<Vec<i64>> {
        let mut conn = lock(&self.conn)?;
        let tx = conn.transaction()?;
        let ids = flights
            .iter()
            .map(|flight| insert_flight(&tx, flight))
            .collect::<Result<Vec<_>>>()?;
        tx.commit()?;

        info!("Inserted {} flights", ids.len());
        Ok(ids)
    }

    /// Count stored flights.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let conn = lock(&self.conn)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM flights", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[async_trait]
impl FlightStore for SqliteStore {
    async fn list_all(&self) -> Result<Vec<Flight>> {
        let conn = Arc::clone(&self.conn);
        run_blocking(move || {
            let conn = lock(&conn)?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {FLIGHT_COLUMNS} FROM flights ORDER BY id ASC"
            ))?;
            let flights = stmt
                .query_map([], row_to_flight)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(flights)
        })
        .await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Flight>> {
        let conn = Arc::clone(&self.conn);
        run_blocking(move || {
            let conn = lock(&conn)?;
            let flight = conn
                .query_row(
                    &format!("SELECT {FLIGHT_COLUMNS} FROM flights WHERE id = ?1"),
                    [id],
                    row_to_flight,
                )
                .optional()?;
            Ok(flight)
        })
        .await
    }
}

/// Read a JSON array of unsaved flights from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON array of flights.
pub fn read_flights_json(path: impl AsRef<Path>) -> Result<Vec<NewFlight>> {
    let path = path.as_ref();
    debug!("Reading flights from {}", path.display());
    let contents = std::fs::read_to_string(path)?;
    let flights: Vec<NewFlight> = serde_json::from_str(&contents)?;
    Ok(flights)
}

/// Acquire the shared connection.
fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| Error::internal("database connection lock poisoned"))
}

/// Run a database closure on the blocking thread pool.
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::internal(format!("database task failed: {e}")))?
}

fn insert_flight(conn: &Connection, flight: &NewFlight) -> Result<i64> {
    let date = flight
        .date_of_departure
        .map(|d| d.format(DATE_FORMAT).to_string());
    let time = flight
        .estimated_departure_time
        .map(|t| t.format(DATETIME_FORMAT).to_string());

    conn.execute(
        r"
        INSERT INTO flights (flight_number, departure_city, arrival_city,
                             operating_airlines, date_of_departure, estimated_departure_time)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ",
        params![
            flight.flight_number,
            flight.departure_city,
            flight.arrival_city,
            flight.operating_airlines,
            date,
            time,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Convert a database row to a Flight.
fn row_to_flight(row: &rusqlite::Row) -> rusqlite::Result<Flight> {
    let id: i64 = row.get(0)?;
    let date_str: Option<String> = row.get(5)?;
    let time_str: Option<String> = row.get(6)?;

    Ok(Flight {
        id,
        flight_number: row.get(1)?,
        departure_city: row.get(2)?,
        arrival_city: row.get(3)?,
        operating_airlines: row.get(4)?,
        date_of_departure: date_str.and_then(|s| parse_date(id, &s)),
        estimated_departure_time: time_str.and_then(|s| parse_datetime(id, &s)),
    })
}

fn parse_date(id: i64, value: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(value, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            warn!("Flight {}: ignoring unparseable departure date {:?}", id, value);
            None
        }
    }
}

fn parse_datetime(id: i64, value: &str) -> Option<NaiveDateTime> {
    // Accept SQLite's space-separated form as well as ISO 8601
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .map_err(|_| {
            warn!(
                "Flight {}: ignoring unparseable departure time {:?}",
                id, value
            );
        })
        .ok()
}
