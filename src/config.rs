// src/config.rs
use crate::domain::benchmark::BenchmarkFilter;
use crate::domain::thresholds::DEFAULT_EXCHANGE_RATE_PEN;
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sales_board")]
#[command(about = "Unit sales dashboard and pricing grid")]
#[command(version)]
pub struct Cli {
    /// SQLite database file
    #[arg(long, global = true, default_value = "sales.sqlite3", env = "SALES_DB")]
    pub db: PathBuf,

    /// Schema applied on startup
    #[arg(long, global = true, default_value = "sql/schema.sql", env = "SALES_SCHEMA")]
    pub schema: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the dashboard and pricing pages
    Serve(ServeArgs),
    /// Replace the unit table from a CSV export
    Import(ImportArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1:3000", env = "SALES_BIND")]
    pub bind: SocketAddr,

    /// Units export used for the bedroom cross-reference
    #[arg(long, default_value = "unidades.csv", env = "SALES_UNITS_CSV")]
    pub units_csv: PathBuf,

    /// Market transactions export used for benchmarks
    #[arg(long, default_value = "Tb_utf8.csv", env = "SALES_MARKET_CSV")]
    pub market_csv: PathBuf,

    #[arg(long, default_value = "STILL", env = "SALES_DEFAULT_PROJECT")]
    pub default_project: String,

    /// Market sector the benchmarks are restricted to
    #[arg(long, default_value = "lima top", env = "SALES_SECTOR")]
    pub sector: String,

    /// Sale years the benchmarks are restricted to
    #[arg(long, value_delimiter = ',', default_values_t = [2024, 2025], env = "SALES_YEARS")]
    pub years: Vec<i32>,

    /// USD to PEN rate for the approval table
    #[arg(long, default_value_t = DEFAULT_EXCHANGE_RATE_PEN, env = "SALES_EXCHANGE_RATE")]
    pub exchange_rate: f64,

    #[arg(long, default_value_t = 8, env = "SALES_WORKERS")]
    pub workers: usize,
}

#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
    #[arg(long, default_value = "unidades.csv")]
    pub units: PathBuf,

    /// `nombre_proyecto,fecha_inicio_venta`
    #[arg(long)]
    pub start_dates: Option<PathBuf>,

    /// Project codes to keep; empty keeps all
    #[arg(long, value_delimiter = ',', default_values_t = default_projects())]
    pub projects: Vec<String>,
}

fn default_projects() -> Vec<String> {
    ["STILL", "COS", "PS", "ANG", "NUN"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}

/// What the request handlers need from the command line.
#[derive(Debug, Clone)]
pub struct Settings {
    pub units_csv: PathBuf,
    pub market_csv: PathBuf,
    pub default_project: String,
    pub benchmark_filter: BenchmarkFilter,
    pub exchange_rate_pen: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            units_csv: PathBuf::from("unidades.csv"),
            market_csv: PathBuf::from("Tb_utf8.csv"),
            default_project: "STILL".to_string(),
            benchmark_filter: BenchmarkFilter::default(),
            exchange_rate_pen: DEFAULT_EXCHANGE_RATE_PEN,
        }
    }
}

impl From<&ServeArgs> for Settings {
    fn from(args: &ServeArgs) -> Self {
        Self {
            units_csv: args.units_csv.clone(),
            market_csv: args.market_csv.clone(),
            default_project: args.default_project.clone(),
            benchmark_filter: BenchmarkFilter {
                sector: args.sector.clone(),
                years: args.years.clone(),
            },
            exchange_rate_pen: args.exchange_rate,
        }
    }
}
