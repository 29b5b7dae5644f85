// src/import/units_csv.rs
use crate::domain::bedrooms::parse_count;
use crate::domain::calendar::parse_date;
use crate::domain::thresholds::MAX_BEDROOMS;
use crate::domain::unit::{Unit, UnitStatus};
use crate::import::ImportError;
use log::{debug, warn};
use serde::Deserialize;
use std::io::Read;

/// One line of the inventory export. Every column is optional so a short or
/// partial export still loads.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UnitCsvRow {
    pub codigo_proyecto: Option<String>,
    pub codigo: Option<String>,
    pub nombre: Option<String>,
    pub estado_comercial: Option<String>,
    pub precio_venta: Option<String>,
    pub precio_lista: Option<String>,
    pub precio_m2: Option<String>,
    pub area_techada: Option<String>,
    pub piso: Option<String>,
    pub nombre_tipologia: Option<String>,
    pub nombre_proyecto: Option<String>,
    pub total_habitaciones: Option<String>,
    pub codigo_proforma: Option<String>,
    pub tipo_unidad: Option<String>,
    pub fecha_venta: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    OtherProject,
    Parking,
    BadFloor,
    MissingCode,
}

impl UnitCsvRow {
    /// Applies the load filters and converts the row. Malformed numbers
    /// become 0 for that field only.
    pub fn into_unit(self, valid_projects: &[String]) -> Result<Unit, SkipReason> {
        let project_code = text(&self.codigo_proyecto).to_uppercase();
        if !valid_projects.is_empty() && !valid_projects.iter().any(|p| *p == project_code) {
            return Err(SkipReason::OtherProject);
        }
        if text(&self.tipo_unidad)
            .to_lowercase()
            .contains("estacionamiento")
        {
            return Err(SkipReason::Parking);
        }
        match text(&self.piso).parse::<i64>() {
            Ok(floor) if floor >= 0 => {}
            _ => return Err(SkipReason::BadFloor),
        }
        let code = text(&self.codigo);
        if code.is_empty() {
            return Err(SkipReason::MissingCode);
        }

        let status_label = text(&self.estado_comercial).to_string();
        Ok(Unit {
            code: code.to_string(),
            name: text(&self.nombre).to_string(),
            status: UnitStatus::parse(&status_label),
            status_label,
            sale_price: number(&self.precio_venta),
            list_price: number(&self.precio_lista),
            price_per_m2: number(&self.precio_m2),
            area: number(&self.area_techada),
            floor: text(&self.piso).to_string(),
            typology: text(&self.nombre_tipologia).to_string(),
            project: text(&self.nombre_proyecto).to_string(),
            bedrooms: self
                .total_habitaciones
                .as_deref()
                .and_then(parse_count)
                .filter(|b| *b <= MAX_BEDROOMS)
                .unwrap_or(0),
            proformas: proforma_count(text(&self.codigo_proforma)),
            sale_date: self.fecha_venta.as_deref().and_then(parse_date),
        })
    }
}

fn text(field: &Option<String>) -> &str {
    field.as_deref().map(str::trim).unwrap_or("")
}

fn number(field: &Option<String>) -> f64 {
    text(field)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Proforma codes arrive comma-separated in one column.
pub fn proforma_count(codes: &str) -> i64 {
    if codes.trim().is_empty() {
        0
    } else {
        codes.split(',').count() as i64
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedUnits {
    pub units: Vec<Unit>,
    pub skipped: usize,
}

pub fn parse_units<R: Read>(reader: R, valid_projects: &[String]) -> Result<ParsedUnits, ImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let mut parsed = ParsedUnits::default();
    for (line, row) in rdr.deserialize::<UnitCsvRow>().enumerate() {
        match row?.into_unit(valid_projects) {
            Ok(unit) => parsed.units.push(unit),
            Err(SkipReason::MissingCode) => {
                warn!("line {}: unit without code skipped", line + 2);
                parsed.skipped += 1;
            }
            Err(reason) => {
                debug!("line {}: skipped ({reason:?})", line + 2);
                parsed.skipped += 1;
            }
        }
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projects() -> Vec<String> {
        ["STILL", "COS"].iter().map(|p| p.to_string()).collect()
    }

    const HEADER: &str = "codigo_proyecto,codigo,nombre,estado_comercial,precio_venta,precio_lista,precio_m2,area_techada,piso,nombre_tipologia,nombre_proyecto,total_habitaciones,codigo_proforma,tipo_unidad,fecha_venta\n";

    #[test]
    fn loads_valid_rows_and_applies_filters() {
        let csv = format!(
            "{HEADER}\
             still,STILL-101,Depa 101,Vendido,150000,140000,2500,60,1,A,STILL,2,\"P1,P2,P3\",Departamento,2024-03-05\n\
             STILL,STILL-E1,Est 1,Disponible,0,9000,0,12,1,,STILL,,,Estacionamiento,\n\
             STILL,STILL-S1,Sotano,Disponible,0,9000,0,12,-1,,STILL,,,Deposito,\n\
             XYZ,XYZ-101,Depa,Disponible,0,9000,0,12,1,,XYZ,,,Departamento,\n\
             COS,COS-201,Depa 201,Disponible,,abc,,85.5,2,B,COS,,,Departamento,\n"
        );
        let parsed = parse_units(csv.as_bytes(), &projects()).unwrap();

        assert_eq!(parsed.units.len(), 2);
        assert_eq!(parsed.skipped, 3);

        let sold = &parsed.units[0];
        assert_eq!(sold.code, "STILL-101");
        assert_eq!(sold.status, UnitStatus::Sold);
        assert_eq!(sold.sale_price, 150_000.0);
        assert_eq!(sold.bedrooms, 2);
        assert_eq!(sold.proformas, 3);
        assert_eq!(sold.sale_date, parse_date("2024-03-05"));

        let open = &parsed.units[1];
        assert_eq!(open.list_price, 0.0);
        assert_eq!(open.area, 85.5);
        assert_eq!(open.proformas, 0);
        assert_eq!(open.bedrooms, 0);
        assert_eq!(open.sale_date, None);
    }

    #[test]
    fn empty_project_list_accepts_everything() {
        let csv = format!("{HEADER}XYZ,XYZ-1,D,Disponible,0,1,0,50,3,A,XYZ,,,,\n");
        let parsed = parse_units(csv.as_bytes(), &[]).unwrap();
        assert_eq!(parsed.units.len(), 1);
    }

    #[test]
    fn header_only_file_parses_to_nothing() {
        let parsed = parse_units(HEADER.as_bytes(), &projects()).unwrap();
        assert_eq!(parsed, ParsedUnits::default());
    }

    #[test]
    fn proforma_codes_are_counted() {
        assert_eq!(proforma_count(""), 0);
        assert_eq!(proforma_count("   "), 0);
        assert_eq!(proforma_count("P1"), 1);
        assert_eq!(proforma_count("P1,P2"), 2);
    }
}
