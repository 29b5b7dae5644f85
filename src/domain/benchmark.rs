// src/domain/benchmark.rs

use super::calendar::{months_between, parse_date};
use chrono::Datelike;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const COL_PRICE_PER_M2: &str = "Precio por m2 - Venta Solarizado";
const COL_STATUS: &str = "Estado de Inmueble";
const COL_SECTOR: &str = "Sector";
const COL_SALE_DATE: &str = "Fecha de Venta";
const COL_SALE_START: &str = "Fecha de Inicio de Venta";
const COL_BEDROOMS: &str = "Cantidad de Dormitorios";

static NON_NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\d.,-]").expect("static pattern is valid"));

/// Competitor sales figures for one bedroom count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarketBenchmark {
    pub avg_price_per_m2: f64,
    pub avg_velocity: f64,
    pub samples: usize,
}

pub type Benchmarks = BTreeMap<u32, MarketBenchmark>;

/// Which rows of the competitive-sales dataset count towards the benchmark.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkFilter {
    pub sector: String,
    pub years: Vec<i32>,
}

impl Default for BenchmarkFilter {
    fn default() -> Self {
        Self {
            sector: "lima top".to_string(),
            years: vec![2024, 2025],
        }
    }
}

/// Benchmarks from the competitive-sales CSV at `path`.
/// Never fails: any problem with the file yields an empty map.
pub fn load_market_benchmarks(path: &Path, filter: &BenchmarkFilter) -> Benchmarks {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            warn!("market dataset {} unavailable: {e}", path.display());
            return Benchmarks::new();
        }
    };

    match benchmarks_from_reader(file, filter) {
        Ok(benchmarks) => {
            info!(
                "computed market benchmarks for {} bedroom buckets from {}",
                benchmarks.len(),
                path.display()
            );
            benchmarks
        }
        Err(e) => {
            warn!("market dataset {} unreadable: {e}", path.display());
            Benchmarks::new()
        }
    }
}

struct Columns {
    price: usize,
    status: usize,
    sector: usize,
    sale_date: usize,
    sale_start: usize,
    bedrooms: usize,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Option<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        Some(Self {
            price: find(COL_PRICE_PER_M2)?,
            status: find(COL_STATUS)?,
            sector: find(COL_SECTOR)?,
            sale_date: find(COL_SALE_DATE)?,
            sale_start: find(COL_SALE_START)?,
            bedrooms: find(COL_BEDROOMS)?,
        })
    }
}

#[derive(Default)]
struct Bucket {
    price_sum: f64,
    velocity_sum: f64,
    samples: usize,
}

pub fn benchmarks_from_reader<R: Read>(
    reader: R,
    filter: &BenchmarkFilter,
) -> Result<Benchmarks, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let Some(cols) = Columns::locate(rdr.headers()?) else {
        warn!("market dataset is missing required columns");
        return Ok(Benchmarks::new());
    };
    let sector = filter.sector.trim().to_lowercase();

    let mut buckets: BTreeMap<u32, Bucket> = BTreeMap::new();
    for record in rdr.records() {
        let record = record?;
        let field = |i: usize| record.get(i).unwrap_or("").trim();

        if !field(cols.status).eq_ignore_ascii_case("vendido")
            || field(cols.sector).to_lowercase() != sector
        {
            continue;
        }
        let Some(sold_on) = parse_date(field(cols.sale_date)) else {
            continue;
        };
        if !filter.years.contains(&sold_on.year()) {
            continue;
        }
        let Some(started_on) = parse_date(field(cols.sale_start)) else {
            continue;
        };
        let Some(price) = clean_numeric(field(cols.price)) else {
            continue;
        };
        let Some(bedrooms) = rounded_bedrooms(field(cols.bedrooms)) else {
            continue;
        };

        let months = months_between(started_on, sold_on).max(1);
        let bucket = buckets.entry(bedrooms).or_default();
        bucket.price_sum += price;
        bucket.velocity_sum += 1.0 / months as f64;
        bucket.samples += 1;
    }

    Ok(buckets
        .into_iter()
        .map(|(bedrooms, b)| {
            let n = b.samples as f64;
            (
                bedrooms,
                MarketBenchmark {
                    avg_price_per_m2: b.price_sum / n,
                    avg_velocity: b.velocity_sum / n,
                    samples: b.samples,
                },
            )
        })
        .collect())
}

/// Strips currency symbols and thousands separators: `"US$ 2,450.50"` → `2450.5`.
pub fn clean_numeric(raw: &str) -> Option<f64> {
    let kept = NON_NUMERIC.replace_all(raw, "");
    let value: f64 = kept.replace(',', "").parse().ok()?;
    value.is_finite().then_some(value)
}

fn rounded_bedrooms(raw: &str) -> Option<u32> {
    let value: f64 = raw.parse().ok()?;
    // Half-way counts go to the even neighbour: 2.5 -> 2.
    let rounded = value.round_ties_even();
    (rounded.is_finite() && rounded > 0.0).then_some(rounded as u32)
}
