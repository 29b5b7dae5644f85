// src/domain/velocity.rs

use super::calendar::months_between;
use super::round_to;
use super::unit::{count_sold, Unit};
use chrono::NaiveDate;

/// Units sold per elapsed month since the project's sale start.
///
/// The clock stops at the last recorded sale once the whole group is sold;
/// otherwise it runs until `today`. Elapsed months are floored at 1. Without
/// a sale start, or with nothing sold, the velocity is `0.0`.
pub fn sales_velocity(units: &[&Unit], sale_start: Option<NaiveDate>, today: NaiveDate) -> f64 {
    let Some(start) = sale_start else {
        return 0.0;
    };

    let total_sold = count_sold(units);
    if total_sold == 0 {
        return 0.0;
    }

    let end = if total_sold == units.len() {
        units
            .iter()
            .filter(|u| u.status.is_sold())
            .filter_map(|u| u.sale_date)
            .max()
            .unwrap_or(today)
    } else {
        today
    };

    let elapsed = months_between(start, end).max(1);
    round_to(total_sold as f64 / elapsed as f64, 2)
}
