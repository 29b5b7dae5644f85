use crate::app::AppState;
use crate::config::{Cli, Command, ImportArgs, ServeArgs, Settings};
use crate::db::{init_db, Database};
use crate::import::{run_import, ImportOptions};
use crate::router::handle;
use anyhow::{Context, Result};
use astra::Server;
use clap::Parser;
use env_logger::Env;
use log::info;

mod app;
mod config;
mod db;
mod domain;
mod errors;
mod import;
mod responses;
mod router;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let db = Database::new(&cli.db);
    init_db(&db, &cli.schema).with_context(|| {
        format!(
            "initializing {} from {}",
            cli.db.display(),
            cli.schema.display()
        )
    })?;

    match cli.command {
        Command::Serve(args) => serve(db, &args),
        Command::Import(args) => import(&db, args),
    }
}

fn serve(db: Database, args: &ServeArgs) -> Result<()> {
    let state = AppState::new(db, Settings::from(args));
    info!(
        "serving on http://{} (default project {}, {} workers)",
        args.bind, state.settings.default_project, args.workers
    );

    Server::bind(&args.bind)
        .max_workers(args.workers)
        .serve(move |req, _info| match handle(req, &state) {
            Ok(resp) => resp,
            Err(err) => responses::html_error_response(err),
        })
        .context("server stopped")?;

    info!("server shut down cleanly");
    Ok(())
}

fn import(db: &Database, args: ImportArgs) -> Result<()> {
    let opts = ImportOptions {
        units_csv: args.units,
        start_dates_csv: args.start_dates,
        valid_projects: args.projects,
    };
    let report = run_import(db, &opts)
        .with_context(|| format!("importing {}", opts.units_csv.display()))?;
    println!(
        "{} units loaded, {} skipped, {} duplicate codes, {} sale starts",
        report.inserted, report.skipped, report.duplicates, report.start_dates
    );
    Ok(())
}
