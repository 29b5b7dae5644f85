// src/app.rs
use crate::config::Settings;
use crate::db::Database;
use crate::domain::bedrooms::BedroomIndex;
use crate::domain::benchmark::{load_market_benchmarks, Benchmarks};
use crate::domain::cache::{KeyedMemo, Memo};
use crate::domain::grid::max_units_per_floor;
use crate::domain::unit::Unit;
use log::info;
use std::sync::Arc;

/// Shared by every worker thread. Only the two file-backed datasets and the
/// per-project grid width are cached; everything else is recomputed per request.
#[derive(Debug)]
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    benchmarks: Memo<Benchmarks>,
    bedroom_index: Memo<BedroomIndex>,
    max_columns: KeyedMemo<usize>,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        Self {
            db,
            settings,
            benchmarks: Memo::new(),
            bedroom_index: Memo::new(),
            max_columns: KeyedMemo::new(),
        }
    }

    pub fn benchmarks(&self) -> Arc<Benchmarks> {
        self.benchmarks.get_or_init(|| {
            let loaded =
                load_market_benchmarks(&self.settings.market_csv, &self.settings.benchmark_filter);
            info!("market benchmarks loaded for {} bedroom counts", loaded.len());
            loaded
        })
    }

    pub fn bedroom_index(&self) -> Arc<BedroomIndex> {
        self.bedroom_index
            .get_or_init(|| BedroomIndex::load(&self.settings.units_csv))
    }

    /// Widest floor of `project`, computed from the first request's units.
    pub fn max_columns(&self, project: &str, units: &[Unit]) -> usize {
        self.max_columns
            .get_or_insert_with(project, || max_units_per_floor(units))
    }

    /// Forget every cached value, e.g. after a re-import.
    pub fn reset_caches(&self) {
        self.benchmarks.reset();
        self.bedroom_index.reset();
        self.max_columns.reset();
        info!("caches cleared");
    }
}
