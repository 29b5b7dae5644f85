// src/db/projects.rs
use crate::domain::calendar::parse_date;
use crate::errors::ServerError;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

/// Sale-start date of `project`; `None` when not registered or unparseable.
pub fn sale_start_date(conn: &Connection, project: &str) -> Result<Option<NaiveDate>, ServerError> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT start_date FROM project_start_dates WHERE project = ?1",
            params![project],
            |row| row.get(0),
        )
        .optional()?;

    Ok(raw.as_deref().and_then(parse_date))
}

pub fn upsert_sale_start(
    conn: &Connection,
    project: &str,
    start_date: NaiveDate,
) -> Result<(), ServerError> {
    conn.execute(
        r#"
        INSERT INTO project_start_dates (project, start_date)
        VALUES (?1, ?2)
        ON CONFLICT(project) DO UPDATE SET start_date = excluded.start_date
        "#,
        params![project, start_date.format("%Y-%m-%d").to_string()],
    )
    .map_err(|e| ServerError::DbError(format!("store sale start failed: {e}")))?;
    Ok(())
}
