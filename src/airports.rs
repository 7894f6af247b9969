//! City name to airport code lookup
//!
//! A curated table of major cities with a best-effort fallback. This is a
//! convenience default for form input, not an airport directory: unknown
//! names still yield a code, even if it does not exist.

/// Known cities (lower-case) and their primary airport
const CITY_AIRPORTS: &[(&str, &str)] = &[
    // India
    ("mumbai", "BOM"),
    ("delhi", "DEL"),
    ("bangalore", "BLR"),
    ("chennai", "MAA"),
    ("kolkata", "CCU"),
    ("hyderabad", "HYD"),
    ("pune", "PNQ"),
    ("ahmedabad", "AMD"),
    ("goa", "GOI"),
    ("kochi", "COK"),
    // North America
    ("new york", "JFK"),
    ("los angeles", "LAX"),
    ("chicago", "ORD"),
    ("miami", "MIA"),
    ("san francisco", "SFO"),
    ("seattle", "SEA"),
    ("boston", "BOS"),
    ("washington", "DCA"),
    ("atlanta", "ATL"),
    ("denver", "DEN"),
    ("toronto", "YYZ"),
    ("vancouver", "YVR"),
    ("montreal", "YUL"),
    ("mexico city", "MEX"),
    // Europe
    ("london", "LHR"),
    ("paris", "CDG"),
    ("amsterdam", "AMS"),
    ("frankfurt", "FRA"),
    ("zurich", "ZUR"),
    ("istanbul", "IST"),
    ("moscow", "SVO"),
    ("rome", "FCO"),
    ("madrid", "MAD"),
    ("barcelona", "BCN"),
    ("vienna", "VIE"),
    ("prague", "PRG"),
    ("budapest", "BUD"),
    ("warsaw", "WAW"),
    // Middle East and Asia
    ("dubai", "DXB"),
    ("singapore", "SIN"),
    ("bangkok", "BKK"),
    ("tokyo", "NRT"),
    ("seoul", "ICN"),
    ("hong kong", "HKG"),
    ("beijing", "PEK"),
    ("shanghai", "PVG"),
    ("bali", "DPS"),
    ("kuala lumpur", "KUL"),
    ("jakarta", "CGK"),
    ("manila", "MNL"),
    // Oceania
    ("sydney", "SYD"),
    ("melbourne", "MEL"),
    ("perth", "PER"),
    ("auckland", "AKL"),
    // South America
    ("sao paulo", "GRU"),
    ("rio de janeiro", "GIG"),
    ("buenos aires", "EZE"),
    // Africa
    ("cairo", "CAI"),
    ("johannesburg", "JNB"),
    ("cape town", "CPT"),
    ("nairobi", "NBO"),
    ("lagos", "LOS"),
    ("casablanca", "CMN"),
];

/// Resolve a free-form city name to a 3-letter airport code.
///
/// Lookup is case- and whitespace-insensitive. On a miss the first three
/// characters of the upper-cased input are returned, so this never fails.
///
/// ```
/// use trip_flights::resolve_airport_code;
///
/// assert_eq!(resolve_airport_code(" Mumbai "), "BOM");
/// assert_eq!(resolve_airport_code("Nowhereville"), "NOW");
/// ```
pub fn resolve_airport_code(city_name: &str) -> String {
    let normalized = city_name.trim().to_lowercase();

    match lookup(&normalized) {
        Some(code) => code.to_string(),
        None => normalized.to_uppercase().chars().take(3).collect(),
    }
}

/// Exact table lookup on an already-normalized name
fn lookup(normalized: &str) -> Option<&'static str> {
    CITY_AIRPORTS
        .iter()
        .find(|(city, _)| *city == normalized)
        .map(|(_, code)| *code)
}
