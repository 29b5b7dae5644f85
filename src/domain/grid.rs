// src/domain/grid.rs

use super::alerts::AlertSet;
use super::unit::{DisplayStatus, Unit};

/// One cell of the floor × unit pricing grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub code: String,
    pub status_label: String,
    pub sale_price: f64,
    pub list_price: f64,
    pub price_per_m2: f64,
    pub area: f64,
    pub typology: String,
    pub proformas: i64,
    pub display: DisplayStatus,
    /// Outside the typology filter; rendered faded.
    pub dimmed: bool,
}

impl GridCell {
    pub fn from_unit(unit: &Unit, alerts: &AlertSet, dimmed: bool) -> Self {
        Self {
            code: unit.code.clone(),
            status_label: unit.status_label.clone(),
            sale_price: unit.sale_price,
            list_price: unit.list_price,
            price_per_m2: unit.price_per_m2,
            area: unit.area,
            typology: unit.typology.clone(),
            proformas: unit.proformas,
            display: alerts.display_status(unit),
            dimmed,
        }
    }

    pub fn placeholder() -> Self {
        Self {
            code: String::new(),
            status_label: String::new(),
            sale_price: 0.0,
            list_price: 0.0,
            price_per_m2: 0.0,
            area: 0.0,
            typology: String::new(),
            proformas: 0,
            display: DisplayStatus::Empty,
            dimmed: false,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.display == DisplayStatus::Empty
    }

    pub fn css_class(&self) -> &'static str {
        if self.is_placeholder() {
            "empty-unit"
        } else if self.dimmed {
            "difuminado"
        } else {
            ""
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloorRow {
    pub floor: String,
    pub cells: Vec<GridCell>,
}

/// Largest number of units sharing one floor label.
pub fn max_units_per_floor(units: &[Unit]) -> usize {
    let mut per_floor: Vec<(&str, usize)> = Vec::new();
    for unit in units {
        match per_floor.iter_mut().find(|(f, _)| *f == unit.floor) {
            Some((_, n)) => *n += 1,
            None => per_floor.push((unit.floor.as_str(), 1)),
        }
    }
    per_floor.iter().map(|(_, n)| *n).max().unwrap_or(0)
}

/// The number formed by the digits of a floor label (`"P-12"` → 12), as a
/// `(digit count, digits)` key without leading zeros so labels of any length
/// compare numerically. An empty label counts as floor 0; a label without
/// digits has no number.
fn floor_number(label: &str) -> Option<(usize, String)> {
    if label.is_empty() {
        return Some((1, "0".to_string()));
    }
    let digits: String = label.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let significant = match digits.trim_start_matches('0') {
        "" => "0",
        rest => rest,
    };
    Some((significant.len(), significant.to_string()))
}

/// Highest floor first. When any label carries no number, every floor is
/// ordered by its label instead, still descending.
pub fn sort_floors(floors: &mut [String]) {
    if floors.iter().all(|f| floor_number(f).is_some()) {
        floors.sort_by_cached_key(|f| std::cmp::Reverse(floor_number(f)));
    } else {
        floors.sort_by(|a, b| b.cmp(a));
    }
}

/// Units grouped by floor, top floor first, every row padded with
/// placeholders up to `max_columns`. Rows longer than that are kept whole.
pub fn build_grid(
    units: &[Unit],
    alerts: &AlertSet,
    typology_filter: &[String],
    max_columns: usize,
) -> Vec<FloorRow> {
    let mut rows: Vec<FloorRow> = Vec::new();
    for unit in units {
        let dimmed = !typology_filter.is_empty() && !typology_filter.contains(&unit.typology);
        let cell = GridCell::from_unit(unit, alerts, dimmed);
        match rows.iter_mut().find(|r| r.floor == unit.floor) {
            Some(row) => row.cells.push(cell),
            None => rows.push(FloorRow {
                floor: unit.floor.clone(),
                cells: vec![cell],
            }),
        }
    }

    let mut order: Vec<String> = rows.iter().map(|r| r.floor.clone()).collect();
    sort_floors(&mut order);

    order
        .into_iter()
        .filter_map(|floor| {
            let idx = rows.iter().position(|r| r.floor == floor)?;
            let mut row = rows.swap_remove(idx);
            while row.cells.len() < max_columns {
                row.cells.push(GridCell::placeholder());
            }
            Some(row)
        })
        .collect()
}
