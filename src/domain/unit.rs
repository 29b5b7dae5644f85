// src/domain/unit.rs

use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Commercial status of a unit as recorded by the sales team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnitStatus {
    #[default]
    Available,
    Sold,
    Reserved,
    ReservationInProgress,
}

impl UnitStatus {
    /// Maps the raw status text of the inventory export onto the closed set.
    /// Anything unrecognised (including an empty value) counts as available.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "vendido" => UnitStatus::Sold,
            "separado" => UnitStatus::Reserved,
            "proceso de separacion" | "proceso de separación" => {
                UnitStatus::ReservationInProgress
            }
            _ => UnitStatus::Available,
        }
    }

    pub fn is_sold(self) -> bool {
        self == UnitStatus::Sold
    }

    /// Reserved or in the middle of a reservation.
    pub fn is_held(self) -> bool {
        matches!(
            self,
            UnitStatus::Reserved | UnitStatus::ReservationInProgress
        )
    }
}

/// One inventory unit, as loaded from the store.
///
/// Numeric fields default to `0.0` when missing in the source, strings to
/// `""`, and `bedrooms == 0` means "unknown".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Unit {
    pub code: String,
    pub name: String,
    /// Status text exactly as exported, kept for display.
    pub status_label: String,
    pub status: UnitStatus,
    pub list_price: f64,
    /// Only non-zero for sold units.
    pub sale_price: f64,
    pub price_per_m2: f64,
    pub area: f64,
    pub floor: String,
    pub typology: String,
    pub project: String,
    pub bedrooms: u32,
    pub proformas: i64,
    pub sale_date: Option<NaiveDate>,
}

impl Unit {
    /// Realized price per m²: the recorded value when present, otherwise
    /// sale price over area.
    pub fn realized_price_per_m2(&self) -> Option<f64> {
        if self.price_per_m2 > 0.0 {
            return Some(self.price_per_m2);
        }
        if self.area > 0.0 && self.sale_price > 0.0 {
            return Some(self.sale_price / self.area);
        }
        None
    }

    /// Sale price for sold units, list price for everything else.
    pub fn ticket(&self) -> f64 {
        if self.status.is_sold() {
            self.sale_price
        } else {
            self.list_price
        }
    }
}

/// How a unit is shown on the dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayStatus {
    Sold,
    Reserved,
    Alert,
    Available,
    /// Grid padding cell, never a real unit.
    Empty,
}

impl DisplayStatus {
    /// Priority: sold > reserved > alert > available.
    /// A held unit is never shown as alerted, whatever its group did.
    pub fn classify(status: UnitStatus, alerted: bool) -> Self {
        match (status, alerted) {
            (UnitStatus::Sold, _) => DisplayStatus::Sold,
            (UnitStatus::Reserved | UnitStatus::ReservationInProgress, _) => {
                DisplayStatus::Reserved
            }
            (UnitStatus::Available, true) => DisplayStatus::Alert,
            (UnitStatus::Available, false) => DisplayStatus::Available,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            DisplayStatus::Sold => "vendido",
            DisplayStatus::Reserved => "separado",
            DisplayStatus::Alert => "alerta-subir",
            DisplayStatus::Available => "disponible",
            DisplayStatus::Empty => "empty",
        }
    }

    pub fn legend_color(self) -> &'static str {
        match self {
            DisplayStatus::Sold => "gray",
            DisplayStatus::Reserved => "yellow",
            DisplayStatus::Alert => "red",
            DisplayStatus::Available | DisplayStatus::Empty => "green",
        }
    }
}

/// Groups units by typology label, in ascending label order.
/// Units without a typology end up in the `""` group.
pub fn group_by_typology(units: &[Unit]) -> BTreeMap<&str, Vec<&Unit>> {
    let mut groups: BTreeMap<&str, Vec<&Unit>> = BTreeMap::new();
    for unit in units {
        groups.entry(unit.typology.as_str()).or_default().push(unit);
    }
    groups
}

pub fn count_sold(units: &[&Unit]) -> usize {
    units.iter().filter(|u| u.status.is_sold()).count()
}
