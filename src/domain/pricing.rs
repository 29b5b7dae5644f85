// src/domain/pricing.rs
//
// Pricing grid page: typology approval table, legend, sidebar totals and
// the floor grid.

use super::alerts::{alert_units, AlertSet};
use super::bedrooms::predominant_bedrooms;
use super::grid::{build_grid, FloorRow};
use super::unit::{group_by_typology, DisplayStatus, Unit};
use super::velocity::sales_velocity;
use super::{mean, round_to, ProjectContext};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SidebarStats {
    pub total_units: usize,
    /// Sale price for sold units, list price otherwise.
    pub price_sum: f64,
    pub area_sum: f64,
    pub proformas_sum: i64,
}

impl SidebarStats {
    fn add(&mut self, unit: &Unit) {
        self.total_units += 1;
        self.price_sum += unit.ticket();
        self.area_sum += unit.area;
        self.proformas_sum += unit.proformas;
    }
}

/// Sidebar totals split by legend colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Legend {
    pub sold: SidebarStats,
    pub reserved: SidebarStats,
    pub alert: SidebarStats,
    pub available: SidebarStats,
}

impl Legend {
    pub fn bucket(&self, status: DisplayStatus) -> &SidebarStats {
        match status {
            DisplayStatus::Sold => &self.sold,
            DisplayStatus::Reserved => &self.reserved,
            DisplayStatus::Alert => &self.alert,
            DisplayStatus::Available | DisplayStatus::Empty => &self.available,
        }
    }

    fn bucket_mut(&mut self, status: DisplayStatus) -> &mut SidebarStats {
        match status {
            DisplayStatus::Sold => &mut self.sold,
            DisplayStatus::Reserved => &mut self.reserved,
            DisplayStatus::Alert => &mut self.alert,
            DisplayStatus::Available | DisplayStatus::Empty => &mut self.available,
        }
    }
}

/// One line of the price approval table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApprovalRow {
    pub typology: String,
    pub available_units: usize,
    pub total_units: usize,
    pub total_proformas: i64,
    pub avg_list_price_per_m2: f64,
    pub velocity: f64,
    pub avg_sale_price_per_m2_pen: f64,
    pub market_price_per_m2: Option<f64>,
    pub market_velocity: Option<f64>,
    pub bedrooms: Option<u32>,
    pub has_alert: bool,
}

impl ApprovalRow {
    /// `"available/total"`
    pub fn availability(&self) -> String {
        format!("{}/{}", self.available_units, self.total_units)
    }
}

/// What the pricing page renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingView {
    /// Distinct non-empty typology labels, sorted.
    pub typologies: Vec<String>,
    pub filter: Vec<String>,
    pub approval: Vec<ApprovalRow>,
    pub sidebar: SidebarStats,
    pub legend: Legend,
    pub grid: Vec<FloorRow>,
    pub max_columns: usize,
}

/// Drops blank entries from the requested typology filter.
pub fn clean_filter(requested: &[String]) -> Vec<String> {
    requested
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn build_pricing(
    ctx: &ProjectContext<'_>,
    filter: &[String],
    exchange_rate_pen: f64,
    max_columns: usize,
) -> PricingView {
    let filter = clean_filter(filter);
    if ctx.units.is_empty() {
        return PricingView {
            filter,
            max_columns,
            ..PricingView::default()
        };
    }

    let groups = group_by_typology(ctx.units);
    let alerts = alert_units(&groups);

    let filtered: Vec<&Unit> = ctx
        .units
        .iter()
        .filter(|u| filter.is_empty() || filter.contains(&u.typology))
        .collect();

    let mut sidebar = SidebarStats::default();
    let mut legend = Legend::default();
    for unit in &filtered {
        sidebar.add(unit);
        legend.bucket_mut(alerts.display_status(unit)).add(unit);
    }

    let approval = groups
        .iter()
        .filter(|(typology, _)| !typology.is_empty())
        .map(|(typology, units)| approval_row(ctx, typology, units, &alerts, exchange_rate_pen))
        .collect();

    PricingView {
        typologies: groups.keys().filter(|t| !t.is_empty()).map(|t| t.to_string()).collect(),
        grid: build_grid(ctx.units, &alerts, &filter, max_columns),
        filter,
        approval,
        sidebar,
        legend,
        max_columns,
    }
}

fn approval_row(
    ctx: &ProjectContext<'_>,
    typology: &str,
    units: &[&Unit],
    alerts: &AlertSet,
    exchange_rate_pen: f64,
) -> ApprovalRow {
    let listed: Vec<f64> = units
        .iter()
        .map(|u| u.price_per_m2)
        .filter(|p| *p > 0.0)
        .collect();

    let realized: Vec<f64> = units
        .iter()
        .filter(|u| u.status.is_sold() && u.area > 0.0 && u.sale_price > 0.0)
        .map(|u| u.sale_price / u.area)
        .collect();
    let avg_sale_price_per_m2_pen = if realized.is_empty() {
        0.0
    } else {
        round_to(mean(&realized) * exchange_rate_pen, 2)
    };

    let bedrooms = predominant_bedrooms(units, ctx.project, ctx.bedroom_index);
    let market = bedrooms.and_then(|b| ctx.benchmarks.get(&b));

    ApprovalRow {
        typology: typology.to_string(),
        available_units: units.iter().filter(|u| !u.status.is_sold()).count(),
        total_units: units.len(),
        total_proformas: units.iter().map(|u| u.proformas).sum(),
        avg_list_price_per_m2: mean(&listed),
        velocity: sales_velocity(units, ctx.sale_start, ctx.today),
        avg_sale_price_per_m2_pen,
        market_price_per_m2: market.map(|m| round_to(m.avg_price_per_m2, 0)),
        market_velocity: market.map(|m| round_to(m.avg_velocity, 3)),
        bedrooms,
        has_alert: units.iter().any(|u| alerts.contains(&u.code)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bedrooms::BedroomIndex;
    use crate::domain::benchmark::Benchmarks;
    use crate::domain::unit::UnitStatus;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn unit(code: &str, typology: &str, floor: &str, status: UnitStatus) -> Unit {
        Unit {
            code: code.into(),
            typology: typology.into(),
            floor: floor.into(),
            status,
            list_price: 100_000.0,
            sale_price: if status.is_sold() { 110_000.0 } else { 0.0 },
            price_per_m2: 1_500.0,
            area: 55.0,
            proformas: 2,
            ..Unit::default()
        }
    }

    fn sample() -> Vec<Unit> {
        vec![
            unit("101", "A", "1", UnitStatus::Sold),
            unit("102", "A", "1", UnitStatus::Available),
            unit("103", "A", "1", UnitStatus::Reserved),
            unit("201", "B", "2", UnitStatus::Available),
            unit("202", "B", "2", UnitStatus::Available),
            unit("203", "", "2", UnitStatus::Available),
        ]
    }

    fn view(units: &[Unit], filter: &[String], max_columns: usize) -> PricingView {
        let benchmarks = Benchmarks::new();
        let index = BedroomIndex::empty();
        let ctx = ProjectContext {
            project: "STILL",
            units,
            sale_start: Some(d(2024, 1, 1)),
            today: d(2024, 5, 1),
            benchmarks: &benchmarks,
            bedroom_index: &index,
        };
        build_pricing(&ctx, filter, 3.8, max_columns)
    }

    #[test]
    fn legend_and_sidebar_cover_every_unit() {
        let units = sample();
        let v = view(&units, &[], 4);

        assert_eq!(v.typologies, vec!["A", "B"]);
        assert_eq!(v.sidebar.total_units, 6);
        assert_eq!(v.sidebar.price_sum, 110_000.0 + 5.0 * 100_000.0);
        assert_eq!(v.sidebar.proformas_sum, 12);
        assert_eq!(v.legend.sold.total_units, 1);
        assert_eq!(v.legend.reserved.total_units, 1);
        assert_eq!(v.legend.alert.total_units, 1);
        assert_eq!(v.legend.available.total_units, 3);
    }

    #[test]
    fn approval_rows_per_named_typology() {
        let units = sample();
        let v = view(&units, &[], 4);

        assert_eq!(v.approval.len(), 2);
        let a = &v.approval[0];
        assert_eq!(a.typology, "A");
        assert_eq!(a.availability(), "2/3");
        assert_eq!(a.total_proformas, 6);
        assert_eq!(a.avg_list_price_per_m2, 1_500.0);
        assert_eq!(a.avg_sale_price_per_m2_pen, 7_600.0);
        assert_eq!(a.velocity, 0.25);
        assert_eq!(a.bedrooms, Some(1));
        assert!(a.has_alert);

        let b = &v.approval[1];
        assert_eq!(b.availability(), "2/2");
        assert_eq!(b.velocity, 0.0);
        assert!(!b.has_alert);
    }

    #[test]
    fn filter_limits_stats_but_not_grid() {
        let units = sample();
        let v = view(&units, &["B".to_string(), "  ".to_string()], 4);

        assert_eq!(v.filter, vec!["B"]);
        assert_eq!(v.sidebar.total_units, 2);
        assert_eq!(v.legend.available.total_units, 2);

        let cells: usize = v
            .grid
            .iter()
            .flat_map(|r| r.cells.iter())
            .filter(|c| !c.is_placeholder())
            .count();
        assert_eq!(cells, 6);
        assert_eq!(v.grid[0].floor, "2");
        assert_eq!(v.grid[1].cells[1].display, DisplayStatus::Alert);
        assert!(v.grid[1].cells[0].dimmed);
    }

    #[test]
    fn empty_project_gives_empty_view() {
        let v = view(&[], &[], 5);
        assert!(v.grid.is_empty());
        assert!(v.approval.is_empty());
        assert_eq!(v.sidebar, SidebarStats::default());
        assert_eq!(v.max_columns, 5);
    }
}
