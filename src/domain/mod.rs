pub mod alerts;
pub mod bedrooms;
pub mod benchmark;
pub mod cache;
pub mod calendar;
pub mod grid;
pub mod pricing;
pub mod summary;
pub mod thresholds;
pub mod unit;
pub mod velocity;

use bedrooms::BedroomIndex;
use benchmark::Benchmarks;
use chrono::NaiveDate;
use unit::Unit;

/// Everything the aggregations need to know about one project for one request.
pub struct ProjectContext<'a> {
    pub project: &'a str,
    pub units: &'a [Unit],
    pub sale_start: Option<NaiveDate>,
    pub today: NaiveDate,
    pub benchmarks: &'a Benchmarks,
    pub bedroom_index: &'a BedroomIndex,
}

/// Rounds to `places` decimals, exact ties to even (`0.125` → `0.12`).
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

/// Mean of `values`, `0.0` when empty.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
