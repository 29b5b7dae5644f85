// src/db/units.rs
use crate::domain::calendar::parse_date;
use crate::domain::unit::{Unit, UnitStatus};
use crate::errors::ServerError;
use rusqlite::{params, Connection, Row};

const SELECT_UNITS: &str = r#"
    SELECT
        code, name, status, sale_price, list_price, price_per_m2, area,
        floor, typology, proformas_count, project, bedrooms, sale_date
    FROM units
"#;

/// Distinct project names, alphabetically.
pub fn list_projects(conn: &Connection) -> Result<Vec<String>, ServerError> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT project FROM units WHERE project IS NOT NULL ORDER BY project",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Every unit of `project` in load order. Unknown projects give an empty list.
pub fn units_for_project(conn: &Connection, project: &str) -> Result<Vec<Unit>, ServerError> {
    let sql = format!("{SELECT_UNITS} WHERE project = ?1 ORDER BY rowid");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![project], unit_from_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// NULL numbers read as 0, NULL text as "", and an unparseable sale date as absent.
fn unit_from_row(row: &Row<'_>) -> rusqlite::Result<Unit> {
    let status_label: String = row.get::<_, Option<String>>(2)?.unwrap_or_default();
    let sale_date: Option<String> = row.get(12)?;

    Ok(Unit {
        code: row.get(0)?,
        name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        status: UnitStatus::parse(&status_label),
        status_label,
        sale_price: row.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
        list_price: row.get::<_, Option<f64>>(4)?.unwrap_or(0.0),
        price_per_m2: row.get::<_, Option<f64>>(5)?.unwrap_or(0.0),
        area: row.get::<_, Option<f64>>(6)?.unwrap_or(0.0),
        floor: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
        typology: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
        proformas: row.get::<_, Option<i64>>(9)?.unwrap_or(0),
        project: row.get::<_, Option<String>>(10)?.unwrap_or_default(),
        bedrooms: row
            .get::<_, Option<i64>>(11)?
            .and_then(|b| u32::try_from(b).ok())
            .unwrap_or(0),
        sale_date: sale_date.as_deref().and_then(parse_date),
    })
}

/// Outcome of a batch refresh.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceOutcome {
    pub inserted: usize,
    /// Rows dropped because their code was already present.
    pub duplicates: usize,
}

/// Replaces the whole unit table in one transaction. The first row wins
/// when a code repeats.
pub fn replace_units(conn: &mut Connection, units: &[Unit]) -> Result<ReplaceOutcome, ServerError> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM units", [])?;

    let mut outcome = ReplaceOutcome::default();
    {
        let mut stmt = tx.prepare(
            r#"
            INSERT OR IGNORE INTO units (
                code, name, status, sale_price, list_price, price_per_m2, area,
                floor, typology, proformas_count, project, bedrooms, sale_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )?;
        for unit in units {
            let bedrooms = (unit.bedrooms > 0).then_some(unit.bedrooms);
            let sale_date = unit.sale_date.map(|d| d.format("%Y-%m-%d").to_string());
            let changed = stmt.execute(params![
                &unit.code,
                &unit.name,
                &unit.status_label,
                unit.sale_price,
                unit.list_price,
                unit.price_per_m2,
                unit.area,
                &unit.floor,
                &unit.typology,
                unit.proformas,
                &unit.project,
                bedrooms,
                sale_date,
            ])?;
            if changed == 0 {
                outcome.duplicates += 1;
            } else {
                outcome.inserted += 1;
            }
        }
    }

    tx.commit()?;
    Ok(outcome)
}
