// src/domain/summary.rs
//
// Project dashboard aggregates. Everything here is recomputed per request
// from the unit rows; nothing is written back.

use super::alerts::{alert_units, AlertSet};
use super::bedrooms::{predominant_bedrooms, resolve_bedrooms};
use super::calendar::{month_key, month_sequence, months_between};
use super::thresholds::SALES_HORIZON_MONTHS;
use super::unit::{count_sold, group_by_typology, DisplayStatus, Unit};
use super::velocity::sales_velocity;
use super::{mean, round_to, ProjectContext};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryCards {
    pub units_sold: usize,
    /// Share of the planned sales horizon already elapsed, 0..=100.
    pub time_progress_pct: f64,
    pub available_price_per_m2: f64,
    pub total_sales: f64,
    pub area_sold: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Gauge {
    pub sold_pct: f64,
    pub to_sell_pct: f64,
    pub increment_pct: f64,
    pub sold_units: usize,
    pub to_sell_units: usize,
    /// Sum of list prices over every unit.
    pub provisional_target: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypologyRow {
    pub typology: String,
    pub total_units: usize,
    pub sold_units: usize,
    pub sold_pct: f64,
    pub avg_sold_price_per_m2: f64,
    pub velocity: f64,
    pub absorption: f64,
    pub bedrooms: Option<u32>,
    pub market_price_per_m2: Option<f64>,
    pub market_velocity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint {
    pub month: String,
    pub units: usize,
    pub avg_ticket: f64,
    pub avg_price_per_m2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BedroomBar {
    pub bedrooms: u32,
    pub label: String,
    pub total_count: usize,
    pub sold_count: usize,
    pub sold_pct: f64,
    pub sold_avg: f64,
    pub available_avg: f64,
    pub alert_avg: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub cards: SummaryCards,
    pub gauge: Gauge,
    pub typologies: Vec<TypologyRow>,
    pub monthly: Vec<MonthlyPoint>,
    pub bedroom_bars: Vec<BedroomBar>,
}

pub fn build_dashboard(ctx: &ProjectContext<'_>) -> DashboardSummary {
    if ctx.units.is_empty() {
        return DashboardSummary::default();
    }

    let groups = group_by_typology(ctx.units);
    let alerts = alert_units(&groups);

    DashboardSummary {
        cards: summary_cards(ctx, &alerts),
        gauge: gauge(ctx.units),
        typologies: typology_rows(ctx, &groups),
        monthly: monthly_series(ctx.units, ctx.sale_start, ctx.today),
        bedroom_bars: bedroom_bars(ctx, &alerts),
    }
}

fn summary_cards(ctx: &ProjectContext<'_>, alerts: &AlertSet) -> SummaryCards {
    let sold: Vec<&Unit> = ctx.units.iter().filter(|u| u.status.is_sold()).collect();

    let available_prices: Vec<f64> = ctx
        .units
        .iter()
        .filter(|u| alerts.display_status(u) == DisplayStatus::Available)
        .map(|u| u.price_per_m2)
        .filter(|p| *p != 0.0)
        .collect();

    SummaryCards {
        units_sold: sold.len(),
        time_progress_pct: time_progress(ctx.sale_start, ctx.today),
        available_price_per_m2: round_to(mean(&available_prices), 2),
        total_sales: sold.iter().map(|u| u.sale_price).sum(),
        area_sold: sold.iter().map(|u| u.area).sum(),
    }
}

/// Elapsed share of the planned sales horizon, capped at 100.
pub fn time_progress(sale_start: Option<NaiveDate>, today: NaiveDate) -> f64 {
    let Some(start) = sale_start else {
        return 0.0;
    };
    let months = months_between(start, today).max(0);
    if months == 0 {
        return 0.0;
    }
    round_to(months as f64 / SALES_HORIZON_MONTHS as f64 * 100.0, 1).min(100.0)
}

fn gauge(units: &[Unit]) -> Gauge {
    let total = units.len();
    let sold = units.iter().filter(|u| u.status.is_sold()).count();
    let to_sell = total - sold;
    let denominator = total.max(1) as f64;

    Gauge {
        sold_pct: round_to(sold as f64 / denominator * 100.0, 2),
        to_sell_pct: round_to(to_sell as f64 / denominator * 100.0, 2),
        increment_pct: 0.0,
        sold_units: sold,
        to_sell_units: to_sell,
        provisional_target: units.iter().map(|u| u.list_price).sum(),
    }
}

/// One row per typology, in label order.
pub fn typology_rows(
    ctx: &ProjectContext<'_>,
    groups: &BTreeMap<&str, Vec<&Unit>>,
) -> Vec<TypologyRow> {
    groups
        .iter()
        .map(|(typology, units)| {
            let total = units.len();
            let sold = count_sold(units);

            let realized: Vec<f64> = units
                .iter()
                .filter(|u| u.status.is_sold())
                .filter_map(|u| u.realized_price_per_m2())
                .collect();

            let bedrooms = predominant_bedrooms(units, ctx.project, ctx.bedroom_index);
            let market = bedrooms.and_then(|b| ctx.benchmarks.get(&b));

            TypologyRow {
                typology: typology.to_string(),
                total_units: total,
                sold_units: sold,
                sold_pct: round_to(ratio(sold, total) * 100.0, 1),
                avg_sold_price_per_m2: round_to(mean(&realized), 2),
                velocity: sales_velocity(units, ctx.sale_start, ctx.today),
                absorption: round_to(ratio(sold, total), 2),
                bedrooms,
                market_price_per_m2: market.map(|m| round_to(m.avg_price_per_m2, 0)),
                market_velocity: market.map(|m| round_to(m.avg_velocity, 3)),
            }
        })
        .collect()
}

#[derive(Default)]
struct MonthTotals {
    units: usize,
    tickets: Vec<f64>,
    prices_per_m2: Vec<f64>,
}

/// Sales per calendar month. With a sale start the series runs, gap-free,
/// from the start month through the current month; without one it lists
/// only the months that had sales.
pub fn monthly_series(
    units: &[Unit],
    sale_start: Option<NaiveDate>,
    today: NaiveDate,
) -> Vec<MonthlyPoint> {
    let mut by_month: HashMap<String, MonthTotals> = HashMap::new();
    for unit in units.iter().filter(|u| u.status.is_sold()) {
        let Some(sold_on) = unit.sale_date else {
            continue;
        };
        let totals = by_month.entry(month_key(sold_on)).or_default();
        totals.units += 1;
        if unit.sale_price > 0.0 {
            totals.tickets.push(unit.sale_price);
        }
        if let Some(price) = unit.realized_price_per_m2() {
            totals.prices_per_m2.push(price);
        }
    }

    let months = match sale_start {
        Some(start) => month_sequence(start, today),
        None => {
            let mut keys: Vec<String> = by_month.keys().cloned().collect();
            keys.sort();
            keys
        }
    };

    months
        .into_iter()
        .map(|month| {
            let totals = by_month.remove(&month).unwrap_or_default();
            MonthlyPoint {
                month,
                units: totals.units,
                avg_ticket: round_to(mean(&totals.tickets), 2),
                avg_price_per_m2: round_to(mean(&totals.prices_per_m2), 2),
            }
        })
        .collect()
}

#[derive(Default)]
struct BedroomTotals {
    sold: Vec<f64>,
    available: Vec<f64>,
    alert: Vec<f64>,
}

/// Per bedroom count: sold units at sale price, held and available units
/// at list price, alerted units at list price. Unknown counts are left out.
pub fn bedroom_bars(ctx: &ProjectContext<'_>, alerts: &AlertSet) -> Vec<BedroomBar> {
    let mut by_count: BTreeMap<u32, BedroomTotals> = BTreeMap::new();
    for unit in ctx.units {
        let bedrooms = resolve_bedrooms(unit, ctx.project, ctx.bedroom_index);
        if bedrooms == 0 {
            continue;
        }
        let totals = by_count.entry(bedrooms).or_default();
        match alerts.display_status(unit) {
            DisplayStatus::Sold => totals.sold.push(unit.sale_price),
            DisplayStatus::Alert => totals.alert.push(unit.list_price),
            DisplayStatus::Reserved | DisplayStatus::Available | DisplayStatus::Empty => {
                totals.available.push(unit.list_price)
            }
        }
    }

    by_count
        .into_iter()
        .map(|(bedrooms, t)| {
            let total = t.sold.len() + t.available.len() + t.alert.len();
            BedroomBar {
                bedrooms,
                label: format!("{bedrooms} dor"),
                total_count: total,
                sold_count: t.sold.len(),
                sold_pct: round_to(ratio(t.sold.len(), total) * 100.0, 1),
                sold_avg: round_to(mean(&t.sold), 2),
                available_avg: round_to(mean(&t.available), 2),
                alert_avg: round_to(mean(&t.alert), 2),
            }
        })
        .collect()
}

fn ratio(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}
