//! Core flight types for flightinfo.
//!
//! This module defines the persisted [`Flight`] record, its insertion shape
//! [`NewFlight`], and the derived [`FlightStatistics`] aggregate.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A persisted flight record.
///
/// Every descriptive field is optional; read paths tolerate absence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    /// Unique identifier assigned by the store.
    pub id: i64,
    /// Carrier flight number, e.g. `AA100`.
    pub flight_number: Option<String>,
    /// City the flight departs from.
    pub departure_city: Option<String>,
    /// City the flight arrives in.
    pub arrival_city: Option<String>,
    /// Airline operating the flight.
    pub operating_airlines: Option<String>,
    /// Scheduled departure date.
    pub date_of_departure: Option<NaiveDate>,
    /// Estimated local departure time.
    pub estimated_departure_time: Option<NaiveDateTime>,
}

/// A flight that has not been stored yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewFlight {
    /// Carrier flight number.
    pub flight_number: Option<String>,
    /// City the flight departs from.
    pub departure_city: Option<String>,
    /// City the flight arrives in.
    pub arrival_city: Option<String>,
    /// Airline operating the flight.
    pub operating_airlines: Option<String>,
    /// Scheduled departure date.
    pub date_of_departure: Option<NaiveDate>,
    /// Estimated local departure time.
    pub estimated_departure_time: Option<NaiveDateTime>,
}

impl NewFlight {
    /// Create a new flight with the four descriptive fields set.
    #[must_use]
    pub fn new(
        flight_number: impl Into<String>,
        departure_city: impl Into<String>,
        arrival_city: impl Into<String>,
        operating_airlines: impl Into<String>,
    ) -> Self {
        Self {
            flight_number: Some(flight_number.into()),
            departure_city: Some(departure_city.into()),
            arrival_city: Some(arrival_city.into()),
            operating_airlines: Some(operating_airlines.into()),
            date_of_departure: None,
            estimated_departure_time: None,
        }
    }

    /// Attach the identifier assigned by a store.
    #[must_use]
    pub fn into_flight(self, id: i64) -> Flight {
        Flight {
            id,
            flight_number: self.flight_number,
            departure_city: self.departure_city,
            arrival_city: self.arrival_city,
            operating_airlines: self.operating_airlines,
            date_of_departure: self.date_of_departure,
            estimated_departure_time: self.estimated_departure_time,
        }
    }
}

impl Flight {
    /// Check whether this flight departs from `city`, ignoring case.
    ///
    /// Characters are compared one at a time using their single-character
    /// upper and lower case mappings, so `"İZMIR"` matches `"izmir"` and
    /// `"ΟΔΟΣ"` matches `"οδοσ"`. A flight without a departure city never
    /// matches.
    #[must_use]
    pub fn departs_from(&self, city: &str) -> bool {
        self.departure_city
            .as_deref()
            .is_some_and(|departure| eq_ignore_case(departure, city))
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars().count() == b.chars().count()
        && a.chars().zip(b.chars()).all(|(x, y)| chars_eq_ignore_case(x, y))
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    if a == b {
        return true;
    }
    let (upper_a, upper_b) = (simple_upper(a), simple_upper(b));
    upper_a == upper_b || simple_lower(upper_a) == simple_lower(upper_b)
}

/// Single-character uppercase; characters that expand (such as `ß`) map to
/// themselves.
fn simple_upper(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

fn simple_lower(c: char) -> char {
    // U+0130 is the only character whose full lowercase expands.
    if c == '\u{130}' {
        return 'i';
    }
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Summary statistics over a set of flights.
///
/// Distinct counts use exact string equality. An absent value counts as a
/// single bucket of its own, so a set containing `"Delta"` and one flight
/// with no airline has two distinct airlines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightStatistics {
    /// Number of flights.
    pub total_flights: usize,
    /// Number of distinct operating airlines.
    pub total_airlines: usize,
    /// Number of distinct departure cities.
    pub total_departure_cities: usize,
    /// Number of distinct arrival cities.
    pub total_arrival_cities: usize,
}

impl FlightStatistics {
    /// Compute statistics over `flights`.
    #[must_use]
    pub fn from_flights(flights: &[Flight]) -> Self {
        Self {
            total_flights: flights.len(),
            total_airlines: distinct(flights, |f| f.operating_airlines.as_deref()),
            total_departure_cities: distinct(flights, |f| f.departure_city.as_deref()),
            total_arrival_cities: distinct(flights, |f| f.arrival_city.as_deref()),
        }
    }
}

fn distinct<'a>(flights: &'a [Flight], key: impl Fn(&'a Flight) -> Option<&'a str>) -> usize {
    flights.iter().map(key).collect::<HashSet<_>>().len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flight(id: i64, number: &str, from: &str, to: &str, airline: &str) -> Flight {
        NewFlight::new(number, from, to, airline).into_flight(id)
    }

    fn sample_flights() -> Vec<Flight> {
        vec![
            flight(1, "AA100", "NYC", "LON", "Delta"),
            flight(2, "AA200", "NYC", "PAR", "United"),
            flight(3, "AA300", "LAX", "LON", "Delta"),
        ]
    }

    #[test]
    fn test_statistics_sample() {
        let stats = FlightStatistics::from_flights(&sample_flights());
        assert_eq!(stats.total_flights, 3);
        assert_eq!(stats.total_airlines, 2);
        assert_eq!(stats.total_departure_cities, 2);
        assert_eq!(stats.total_arrival_cities, 2);
    }

    #[test]
    fn test_statistics_empty() {
        let stats = FlightStatistics::from_flights(&[]);
        assert_eq!(stats, FlightStatistics::default());
    }

    #[test]
    fn test_statistics_absent_values_form_one_bucket() {
        let mut flights = sample_flights();
        flights.push(NewFlight::default().into_flight(4));
        flights.push(NewFlight::default().into_flight(5));

        let stats = FlightStatistics::from_flights(&flights);
        assert_eq!(stats.total_flights, 5);
        assert_eq!(stats.total_airlines, 3);
        assert_eq!(stats.total_departure_cities, 3);
        assert_eq!(stats.total_arrival_cities, 3);
    }

    #[test]
    fn test_statistics_distinct_is_case_sensitive() {
        let flights = vec![
            flight(1, "AA100", "NYC", "LON", "Delta"),
            flight(2, "AA101", "nyc", "LON", "delta"),
        ];
        let stats = FlightStatistics::from_flights(&flights);
        assert_eq!(stats.total_airlines, 2);
        assert_eq!(stats.total_departure_cities, 2);
        assert_eq!(stats.total_arrival_cities, 1);
    }

    #[test]
    fn test_departs_from_ignores_case() {
        let f = flight(1, "AA100", "New York", "LON", "Delta");
        assert!(f.departs_from("new york"));
        assert!(f.departs_from("NEW YORK"));
        assert!(!f.departs_from("new"));
    }

    #[test]
    fn test_departs_from_absent_city() {
        let f = NewFlight::default().into_flight(1);
        assert!(!f.departs_from("NYC"));
    }

    #[test]
    fn test_departs_from_non_ascii() {
        let f = flight(1, "LH1", "MÜNCHEN", "BER", "Lufthansa");
        assert!(f.departs_from("münchen"));
    }

    #[test]
    fn test_departs_from_dotted_capital_i() {
        let f = NewFlight::new("TK1", "İZMIR", "IST", "Turkish").into_flight(1);
        assert!(f.departs_from("izmir"));
        assert!(f.departs_from("İzmir"));
    }

    #[test]
    fn test_departs_from_final_sigma() {
        let f = NewFlight::new("A3", "ΟΔΟΣ", "ATH", "Aegean").into_flight(1);
        assert!(f.departs_from("οδοσ"));
        assert!(f.departs_from("οδος"));
    }

    #[test]
    fn test_departs_from_does_not_expand_sharp_s() {
        let f = NewFlight::new("LH2", "GIESSEN", "FRA", "Lufthansa").into_flight(1);
        assert!(!f.departs_from("gießen"));
        assert!(f.departs_from("giessen"));
    }

    #[test]
    fn test_flight_serializes_camel_case() {
        let mut f = flight(7, "AA100", "NYC", "LON", "Delta");
        f.date_of_departure = NaiveDate::from_ymd_opt(2024, 5, 1);
        let json = serde_json::to_value(&f).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["flightNumber"], "AA100");
        assert_eq!(json["departureCity"], "NYC");
        assert_eq!(json["arrivalCity"], "LON");
        assert_eq!(json["operatingAirlines"], "Delta");
        assert_eq!(json["dateOfDeparture"], "2024-05-01");
        assert!(json["estimatedDepartureTime"].is_null());
    }

    #[test]
    fn test_statistics_serializes_camel_case() {
        let stats = FlightStatistics::from_flights(&sample_flights());
        let json = serde_json::to_value(stats).unwrap();

        assert_eq!(json["totalFlights"], 3);
        assert_eq!(json["totalAirlines"], 2);
        assert_eq!(json["totalDepartureCities"], 2);
        assert_eq!(json["totalArrivalCities"], 2);
    }

    #[test]
    fn test_new_flight_deserialize_partial() {
        let json = r#"{"flightNumber": "BA9", "estimatedDepartureTime": "2024-05-01T09:30:00"}"#;
        let f: NewFlight = serde_json::from_str(json).unwrap();

        assert_eq!(f.flight_number.as_deref(), Some("BA9"));
        assert!(f.departure_city.is_none());
        assert_eq!(
            f.estimated_departure_time,
            NaiveDate::from_ymd_opt(2024, 5, 1).and_then(|d| d.and_hms_opt(9, 30, 0))
        );
    }

    #[test]
    fn test_into_flight_keeps_fields() {
        let f = NewFlight::new("AA100", "NYC", "LON", "Delta").into_flight(42);
        assert_eq!(f.id, 42);
        assert_eq!(f.flight_number.as_deref(), Some("AA100"));
        assert_eq!(f.operating_airlines.as_deref(), Some("Delta"));
    }
}
