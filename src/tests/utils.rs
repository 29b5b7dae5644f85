use crate::app::AppState;
use crate::config::Settings;
use crate::db::{init_db, Database};
use crate::db::projects::upsert_sale_start;
use crate::db::units::replace_units;
use crate::domain::unit::{Unit, UnitStatus};
use crate::router::handle_on;
use astra::{Body, Response};
use chrono::NaiveDate;
use std::io::Read;
use tempfile::TempDir;

/// A fresh database under a temp dir, removed on drop.
pub struct TestApp {
    _dir: TempDir,
    pub state: AppState,
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// The day every request in the router tests is served on.
pub fn today() -> NaiveDate {
    date(2024, 7, 20)
}

pub fn init_test_app(settings: Settings) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new(dir.path().join("test.sqlite"));
    init_db(&db, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    let settings = Settings {
        units_csv: dir.path().join("missing_units.csv"),
        market_csv: dir.path().join("missing_market.csv"),
        ..settings
    };
    TestApp {
        state: AppState::new(db, settings),
        _dir: dir,
    }
}

pub fn unit(project: &str, code: &str, floor: &str, typology: &str, status: &str) -> Unit {
    let status_enum = UnitStatus::parse(status);
    Unit {
        code: code.to_string(),
        name: code.to_string(),
        status_label: status.to_string(),
        status: status_enum,
        list_price: 100_000.0,
        sale_price: if status_enum.is_sold() { 95_000.0 } else { 0.0 },
        price_per_m2: 2_000.0,
        area: 50.0,
        floor: floor.to_string(),
        typology: typology.to_string(),
        project: project.to_string(),
        bedrooms: 0,
        proformas: 2,
        sale_date: status_enum.is_sold().then(|| date(2024, 3, 10)),
    }
}

/// STILL: typology A with 2 of 5 sold (alerted), typology B with nothing
/// sold; COS: a single unit.
pub fn seed(app: &TestApp) {
    let units = vec![
        unit("STILL", "STILL-101", "1", "A", "Vendido"),
        unit("STILL", "STILL-102", "1", "A", "Vendido"),
        unit("STILL", "STILL-103", "1", "A", "Disponible"),
        unit("STILL", "STILL-201", "2", "A", "Separado"),
        unit("STILL", "STILL-202", "2", "A", "Disponible"),
        unit("STILL", "STILL-104", "1", "B", "Disponible"),
        unit("STILL", "STILL-203", "2", "B", "Disponible"),
        unit("STILL", "STILL-301", "3", "B", "Disponible"),
        unit("STILL", "STILL-302", "3", "B", "Disponible"),
        unit("STILL", "STILL-303", "3", "B", "Disponible"),
        unit("COS", "COS-101", "1", "X", "Disponible"),
    ];
    app.state
        .db
        .with_conn(|conn| {
            replace_units(conn, &units)?;
            upsert_sale_start(conn, "STILL", date(2024, 1, 15))
        })
        .unwrap();
}

pub fn get(app: &TestApp, uri: &str) -> Response {
    request(app, http::Request::builder().method("GET").uri(uri))
}

pub fn htmx_get(app: &TestApp, uri: &str, target: &str) -> Response {
    request(
        app,
        http::Request::builder()
            .method("GET")
            .uri(uri)
            .header("HX-Request", "true")
            .header("HX-Target", target),
    )
}

/// Runs the request and turns handler errors into their error pages.
pub fn request(app: &TestApp, builder: http::request::Builder) -> Response {
    let req = builder.body(Body::from("")).unwrap();
    match handle_on(req, &app.state, today()) {
        Ok(resp) => resp,
        Err(err) => crate::responses::html_error_response(err),
    }
}

pub fn body_string(mut resp: Response) -> String {
    let mut body_bytes = Vec::new();
    resp.body_mut()
        .reader()
        .read_to_end(&mut body_bytes)
        .unwrap();
    String::from_utf8(body_bytes).unwrap()
}

pub fn location(resp: &Response) -> &str {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}
