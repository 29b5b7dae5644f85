//! Business constants used across the aggregations.
//!
//! None of these come with a documented justification. They are kept at
//! their historical values and are the first candidates for configuration.

/// Sold fraction at which the remaining available units of a typology are
/// flagged for a price increase.
pub const ALERT_SOLD_FRACTION: f64 = 0.20;

/// Largest bedroom count accepted from explicit data.
pub const MAX_BEDROOMS: u32 = 6;

/// Upper area bound (m², inclusive) for 1..=5 bedrooms. Larger units count as 6.
pub const BEDROOM_AREA_BREAKPOINTS: [(f64, u32); 5] =
    [(55.0, 1), (95.0, 2), (135.0, 3), (170.0, 4), (220.0, 5)];

/// Planned sales horizon in months, used for the time-progress card.
pub const SALES_HORIZON_MONTHS: i32 = 24;

/// USD → PEN rate for realized price columns.
pub const DEFAULT_EXCHANGE_RATE_PEN: f64 = 3.8;

/// Widest grid a request may ask for through `max_columns`.
pub const MAX_GRID_COLUMNS: usize = 100;
