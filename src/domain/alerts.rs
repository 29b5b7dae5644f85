// src/domain/alerts.rs

use super::thresholds::ALERT_SOLD_FRACTION;
use super::unit::{count_sold, DisplayStatus, Unit, UnitStatus};
use std::collections::{BTreeMap, HashSet};

/// Codes of the units flagged "alert: raise price".
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AlertSet {
    codes: HashSet<String>,
}

impl AlertSet {
    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Display status of `unit` given this alert set.
    pub fn display_status(&self, unit: &Unit) -> DisplayStatus {
        DisplayStatus::classify(unit.status, self.contains(&unit.code))
    }
}

/// Sold units over total units, `0.0` for an empty group.
pub fn sold_fraction(units: &[&Unit]) -> f64 {
    if units.is_empty() {
        return 0.0;
    }
    count_sold(units) as f64 / units.len() as f64
}

/// Flags every plainly available unit of a typology group whose sold
/// fraction reached [`ALERT_SOLD_FRACTION`]. Sold and held units are never
/// flagged.
pub fn alert_units(groups: &BTreeMap<&str, Vec<&Unit>>) -> AlertSet {
    let codes = groups
        .values()
        .filter(|units| !units.is_empty() && sold_fraction(units) >= ALERT_SOLD_FRACTION)
        .flat_map(|units| units.iter())
        .filter(|u| u.status == UnitStatus::Available)
        .map(|u| u.code.clone())
        .collect();

    AlertSet { codes }
}
