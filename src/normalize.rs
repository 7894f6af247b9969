//! Normalization of raw SerpAPI Google Flights JSON
//!
//! Missing fields never fail: they default to empty strings, zero,
//! `"Economy"` or empty lists. A present-but-empty string or a value of the
//! wrong JSON type counts as missing. Defaults are applied per field, so a
//! partial `carbon_emissions` object yields zeros for the absent entries and
//! those zeros cannot be told apart from reported ones.

use crate::{AirportEvent, CarbonEmissions, FlightLeg, FlightOption, FlightSearchResult, Layover};
use serde_json::{Number, Value};
use tracing::debug;

pub const DEFAULT_TRAVEL_CLASS: &str = "Economy";
pub const DEFAULT_TRIP_TYPE: &str = "Round trip";

/// Convert an upstream response body into a [`FlightSearchResult`].
///
/// Option and leg order are preserved; nothing is sorted, filtered or
/// deduplicated. A body without `best_flights` yields an empty result.
pub fn normalize(raw: &Value) -> FlightSearchResult {
    let best_options: Vec<FlightOption> = array(raw, "best_flights")
        .iter()
        .map(normalize_option)
        .collect();

    debug!(options = best_options.len(), "normalized upstream response");

    FlightSearchResult { best_options }
}

fn normalize_option(raw: &Value) -> FlightOption {
    FlightOption {
        legs: array(raw, "flights").iter().map(normalize_leg).collect(),
        layovers: array(raw, "layovers").iter().map(normalize_layover).collect(),
        total_duration_minutes: integer(raw, "total_duration"),
        carbon_emissions: normalize_emissions(raw.get("carbon_emissions")),
        price: number(raw, "price"),
        trip_type: string_or(raw, "type", DEFAULT_TRIP_TYPE),
        airline_logo: string(raw, "airline_logo"),
        booking_token: optional_string(raw, "booking_token"),
    }
}

fn normalize_leg(raw: &Value) -> FlightLeg {
    FlightLeg {
        departure_airport: normalize_airport(raw.get("departure_airport")),
        arrival_airport: normalize_airport(raw.get("arrival_airport")),
        duration_minutes: integer(raw, "duration"),
        aircraft_model: string(raw, "airplane"),
        airline_name: string(raw, "airline"),
        airline_logo: string(raw, "airline_logo"),
        travel_class: string_or(raw, "travel_class", DEFAULT_TRAVEL_CLASS),
        flight_number: string(raw, "flight_number"),
        legroom_description: string(raw, "legroom"),
        notes: array(raw, "extensions")
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        is_overnight: raw.get("overnight").and_then(Value::as_bool),
    }
}

fn normalize_airport(raw: Option<&Value>) -> AirportEvent {
    match raw {
        Some(airport) => AirportEvent {
            airport_name: string(airport, "name"),
            airport_code: string(airport, "id"),
            local_time: string(airport, "time"),
        },
        None => AirportEvent::default(),
    }
}

fn normalize_layover(raw: &Value) -> Layover {
    Layover {
        duration_minutes: integer(raw, "duration"),
        airport_name: string(raw, "name"),
        airport_code: string(raw, "id"),
    }
}

// Shallow: an object missing a sub-field gets zero for it, same as absent.
fn normalize_emissions(raw: Option<&Value>) -> CarbonEmissions {
    match raw.filter(|v| v.is_object()) {
        Some(emissions) => CarbonEmissions {
            this_flight_grams: integer(emissions, "this_flight"),
            typical_for_route_grams: integer(emissions, "typical_for_this_route"),
            difference_percent: integer(emissions, "difference_percent"),
        },
        None => CarbonEmissions::default(),
    }
}

fn array<'a>(raw: &'a Value, key: &str) -> &'a [Value] {
    raw.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn string(raw: &Value, key: &str) -> String {
    string_or(raw, key, "")
}

fn string_or(raw: &Value, key: &str, default: &str) -> String {
    optional_string(raw, key).unwrap_or_else(|| default.to_string())
}

fn optional_string(raw: &Value, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn integer(raw: &Value, key: &str) -> i64 {
    match raw.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .unwrap_or(0),
        _ => 0,
    }
}

fn number(raw: &Value, key: &str) -> Number {
    match raw.get(key) {
        Some(Value::Number(n)) => n.clone(),
        _ => Number::from(0),
    }
}
