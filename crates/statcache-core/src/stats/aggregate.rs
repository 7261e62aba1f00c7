use serde_json::{Map, Value};

/// Divides `numerator` by `denominator`, returning `numerator` unchanged when
/// the denominator is zero.
///
/// A player with no deaths shows their kill count as the ratio instead of
/// infinity.
///
/// # Examples
///
/// ```
/// use statcache_core::stats::safe_divide;
///
/// assert_eq!(safe_divide(10.0, 4.0), 2.5);
/// assert_eq!(safe_divide(7.0, 0.0), 7.0);
/// assert_eq!(safe_divide(0.0, 0.0), 0.0);
/// ```
pub fn safe_divide(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        numerator
    } else {
        numerator / denominator
    }
}

/// Sums the counters whose key equals `field` and contains none of the
/// `excluded` markers.
///
/// Matching is exact on the field name, so `final_kills_bedwars` never leaks
/// into a `kills_bedwars` total. Fields stored under two spellings must be
/// summed by calling this once per spelling. Non-numeric values count as zero.
///
/// # Examples
///
/// ```
/// use statcache_core::stats::sum_excluding;
/// use serde_json::json;
///
/// let counters = json!({"kills_bedwars": 10, "final_kills_bedwars": 4});
/// let counters = counters.as_object().unwrap();
///
/// assert_eq!(sum_excluding(counters, "kills_bedwars", &["final_"]), 10);
/// ```
pub fn sum_excluding(counters: &Map<String, Value>, field: &str, excluded: &[&str]) -> i64 {
    counters
        .iter()
        .filter(|(key, _)| key.as_str() == field)
        .filter(|(key, _)| !excluded.iter().any(|marker| key.contains(marker)))
        .map(|(_, value)| counter_value(value))
        .sum()
}

fn counter_value(value: &Value) -> i64 {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
        .unwrap_or(0)
}
