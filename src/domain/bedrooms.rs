// src/domain/bedrooms.rs

use super::thresholds::{BEDROOM_AREA_BREAKPOINTS, MAX_BEDROOMS};
use super::unit::Unit;
use log::{info, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Bedroom counts from the original inventory export, keyed by project then
/// unit code. Used when the store itself has no explicit count.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BedroomIndex {
    by_project: HashMap<String, HashMap<String, u32>>,
}

#[derive(Debug, Deserialize)]
struct BedroomRow {
    #[serde(default)]
    codigo: Option<String>,
    #[serde(default)]
    nombre_proyecto: Option<String>,
    #[serde(default)]
    total_habitaciones: Option<String>,
}

impl BedroomIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Reads the index from the units CSV. A missing or unreadable file
    /// gives an empty index.
    pub fn load(path: &Path) -> Self {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                warn!("bedroom cross-reference {} unavailable: {e}", path.display());
                return Self::empty();
            }
        };
        match Self::from_reader(file) {
            Ok(index) => {
                info!(
                    "loaded bedroom cross-reference for {} projects from {}",
                    index.by_project.len(),
                    path.display()
                );
                index
            }
            Err(e) => {
                warn!("bedroom cross-reference {} unreadable: {e}", path.display());
                Self::empty()
            }
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut index = Self::empty();
        for row in rdr.deserialize::<BedroomRow>() {
            let row = row?;
            let (Some(code), Some(project), Some(raw)) =
                (row.codigo, row.nombre_proyecto, row.total_habitaciones)
            else {
                continue;
            };
            if code.is_empty() || project.is_empty() {
                continue;
            }
            if let Some(count) = parse_count(&raw).filter(|c| in_range(*c)) {
                index.insert(&project, &code, count);
            }
        }
        Ok(index)
    }

    pub fn insert(&mut self, project: &str, code: &str, bedrooms: u32) {
        self.by_project
            .entry(project.to_string())
            .or_default()
            .insert(code.to_string(), bedrooms);
    }

    pub fn lookup(&self, project: &str, code: &str) -> Option<u32> {
        self.by_project.get(project)?.get(code).copied()
    }
}

/// Parses counts such as `"3"` or `"3.0"`, truncating like an integer cast.
pub fn parse_count(raw: &str) -> Option<u32> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() || value <= 0.0 {
        return None;
    }
    Some(value.trunc() as u32)
}

fn in_range(count: u32) -> bool {
    count > 0 && count <= MAX_BEDROOMS
}

/// Bedroom estimate from floor area; 0 when the area is unknown.
pub fn bedrooms_from_area(area: f64) -> u32 {
    if area <= 0.0 || area.is_nan() {
        return 0;
    }
    BEDROOM_AREA_BREAKPOINTS
        .iter()
        .find(|(limit, _)| area <= *limit)
        .map(|(_, bedrooms)| *bedrooms)
        .unwrap_or(MAX_BEDROOMS)
}

/// Explicit count, then the cross-reference, then the area heuristic.
/// Returns 0 when nothing applies.
pub fn resolve_bedrooms(unit: &Unit, project: &str, index: &BedroomIndex) -> u32 {
    if in_range(unit.bedrooms) {
        return unit.bedrooms;
    }

    let code = unit.code.trim();
    let project = match project.trim() {
        "" => unit.project.trim(),
        name => name,
    };
    if !code.is_empty() && !project.is_empty() {
        if let Some(count) = index.lookup(project, code).filter(|c| in_range(*c)) {
            return count;
        }
    }

    bedrooms_from_area(unit.area)
}

/// Most common resolved bedroom count in a typology; ties go to the count
/// seen first.
pub fn predominant_bedrooms(units: &[&Unit], project: &str, index: &BedroomIndex) -> Option<u32> {
    let mut tally: Vec<(u32, usize)> = Vec::new();
    for unit in units {
        let count = resolve_bedrooms(unit, project, index);
        if count == 0 {
            continue;
        }
        match tally.iter_mut().find(|(c, _)| *c == count) {
            Some((_, n)) => *n += 1,
            None => tally.push((count, 1)),
        }
    }

    let mut best: Option<(u32, usize)> = None;
    for (count, n) in tally {
        if best.map_or(true, |(_, top)| n > top) {
            best = Some((count, n));
        }
    }
    best.map(|(count, _)| count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(code: &str, bedrooms: u32, area: f64) -> Unit {
        Unit {
            code: code.into(),
            bedrooms,
            area,
            ..Unit::default()
        }
    }

    #[test]
    fn explicit_count_wins_over_area() {
        let index = BedroomIndex::empty();
        assert_eq!(resolve_bedrooms(&unit("101", 3, 40.0), "STILL", &index), 3);
    }

    #[test]
    fn area_heuristic_applies_without_explicit_value() {
        let index = BedroomIndex::empty();
        assert_eq!(resolve_bedrooms(&unit("101", 0, 60.0), "STILL", &index), 2);
        assert_eq!(resolve_bedrooms(&unit("101", 0, 0.0), "STILL", &index), 0);
    }

    #[test]
    fn out_of_range_explicit_value_is_ignored() {
        let index = BedroomIndex::empty();
        assert_eq!(resolve_bedrooms(&unit("101", 9, 120.0), "STILL", &index), 3);
    }

    #[test]
    fn cross_reference_beats_area() {
        let mut index = BedroomIndex::empty();
        index.insert("STILL", "101", 4);
        assert_eq!(resolve_bedrooms(&unit("101", 0, 50.0), "STILL", &index), 4);
        assert_eq!(resolve_bedrooms(&unit("101", 0, 50.0), "COS", &index), 1);
    }

    #[test]
    fn area_breakpoints_are_inclusive() {
        let cases = [
            (55.0, 1),
            (55.1, 2),
            (95.0, 2),
            (135.0, 3),
            (170.0, 4),
            (220.0, 5),
            (220.5, 6),
        ];
        for (area, expected) in cases {
            assert_eq!(bedrooms_from_area(area), expected, "area {area}");
        }
    }

    #[test]
    fn index_reads_csv_and_skips_bad_rows() {
        let csv = "\
codigo,nombre_proyecto,total_habitaciones,precio_lista
101,STILL,2.0,100
102,STILL,,100
103,STILL,9,100
104,COS,abc,100
201,COS,3,100
";
        let index = BedroomIndex::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(index.lookup("STILL", "101"), Some(2));
        assert_eq!(index.lookup("STILL", "102"), None);
        assert_eq!(index.lookup("STILL", "103"), None);
        assert_eq!(index.lookup("COS", "104"), None);
        assert_eq!(index.lookup("COS", "201"), Some(3));
    }

    #[test]
    fn missing_file_gives_empty_index() {
        let index = BedroomIndex::load(Path::new("does/not/exist.csv"));
        assert_eq!(index, BedroomIndex::empty());
    }

    #[test]
    fn predominant_count_prefers_majority_then_first_seen() {
        let index = BedroomIndex::empty();
        let units = [unit("1", 2, 0.0), unit("2", 3, 0.0), unit("3", 3, 0.0)];
        let refs: Vec<&Unit> = units.iter().collect();
        assert_eq!(predominant_bedrooms(&refs, "STILL", &index), Some(3));

        let tied = [unit("1", 2, 0.0), unit("2", 3, 0.0)];
        let refs: Vec<&Unit> = tied.iter().collect();
        assert_eq!(predominant_bedrooms(&refs, "STILL", &index), Some(2));

        let unknown = [unit("1", 0, 0.0)];
        let refs: Vec<&Unit> = unknown.iter().collect();
        assert_eq!(predominant_bedrooms(&refs, "STILL", &index), None);
    }
}
