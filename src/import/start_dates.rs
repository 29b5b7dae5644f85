// src/import/start_dates.rs
use crate::domain::calendar::parse_date;
use crate::import::ImportError;
use chrono::NaiveDate;
use log::warn;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StartDateRow {
    nombre_proyecto: Option<String>,
    fecha_inicio_venta: Option<String>,
}

/// `(project, sale start)` pairs. Rows with a blank project or a bad date
/// are skipped.
pub fn parse_start_dates<R: Read>(reader: R) -> Result<Vec<(String, NaiveDate)>, ImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut out = Vec::new();
    for (line, row) in rdr.deserialize::<StartDateRow>().enumerate() {
        let row = row?;
        let project = row.nombre_proyecto.unwrap_or_default();
        let date = row.fecha_inicio_venta.as_deref().and_then(parse_date);
        match (project.is_empty(), date) {
            (false, Some(date)) => out.push((project, date)),
            _ => warn!("line {}: sale start skipped", line + 2),
        }
    }
    Ok(out)
}
