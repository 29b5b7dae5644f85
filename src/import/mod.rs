pub mod import_error;
pub mod start_dates;
pub mod units_csv;

pub use import_error::ImportError;

use crate::db::projects::upsert_sale_start;
use crate::db::units::replace_units;
use crate::db::Database;
use log::info;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub units_csv: PathBuf,
    pub start_dates_csv: Option<PathBuf>,
    /// Upper-case project codes to keep; empty keeps every project.
    pub valid_projects: Vec<String>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub inserted: usize,
    pub skipped: usize,
    pub duplicates: usize,
    pub start_dates: usize,
}

fn open(path: &Path) -> Result<File, ImportError> {
    File::open(path).map_err(|source| ImportError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Batch refresh: replaces the unit table with the export and upserts the
/// sale-start dates.
pub fn run_import(db: &Database, opts: &ImportOptions) -> Result<ImportReport, ImportError> {
    let valid_projects: Vec<String> = opts
        .valid_projects
        .iter()
        .map(|p| p.trim().to_uppercase())
        .filter(|p| !p.is_empty())
        .collect();

    let parsed = units_csv::parse_units(open(&opts.units_csv)?, &valid_projects)?;
    let outcome = db.with_conn(|conn| replace_units(conn, &parsed.units))?;

    let mut report = ImportReport {
        inserted: outcome.inserted,
        skipped: parsed.skipped,
        duplicates: outcome.duplicates,
        start_dates: 0,
    };

    if let Some(path) = &opts.start_dates_csv {
        let dates = start_dates::parse_start_dates(open(path)?)?;
        db.with_conn(|conn| {
            for (project, date) in &dates {
                upsert_sale_start(conn, project, *date)?;
            }
            Ok(())
        })?;
        report.start_dates = dates.len();
    }

    info!(
        "imported {} units from {} ({} skipped, {} duplicate codes, {} sale starts)",
        report.inserted,
        opts.units_csv.display(),
        report.skipped,
        report.duplicates,
        report.start_dates
    );
    Ok(report)
}
