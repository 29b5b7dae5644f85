use crate::app::AppState;
use crate::db::projects::sale_start_date;
use crate::db::units::{list_projects, units_for_project};
use crate::domain::pricing::build_pricing;
use crate::domain::summary::build_dashboard;
use crate::domain::thresholds::MAX_GRID_COLUMNS;
use crate::domain::unit::Unit;
use crate::domain::ProjectContext;
use crate::errors::ServerError;
use crate::responses::{html_response, redirect_response, ResultResp};
use crate::spreadsheets::export_approval_xlsx;
use crate::templates::layouts::desktop::project_href;
use crate::templates::pages::pricing::{
    grid_and_sidebar, grid_with_oob_sidebar, sidebar_stats, tipologia_button_text,
};
use crate::templates::pages::{
    dashboard_page, no_projects_page, pricing_page, DashboardVm, PricingVm, Vista,
};
use crate::templates::{Nav, Section};
use astra::Request;
use chrono::{Local, NaiveDate};
use log::debug;

pub fn handle(req: Request, state: &AppState) -> ResultResp {
    handle_on(req, state, Local::now().date_naive())
}

/// Routes `req` as if it were `today`.
pub fn handle_on(req: Request, state: &AppState, today: NaiveDate) -> ResultResp {
    if req.method().as_str() != "GET" {
        return Err(ServerError::NotFound);
    }

    let path = req.uri().path().to_string();
    debug!("GET {path}");
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match segments.as_slice() {
        [""] => redirect_response(&project_href(
            Section::Dashboard,
            &state.settings.default_project,
        )),
        ["dashboard"] => section_index(state, Section::Dashboard),
        ["pricing"] => section_index(state, Section::Pricing),
        ["dashboard", project] => dashboard(state, &decode(project)?, today),
        ["pricing", project] => pricing(&req, state, &decode(project)?, today),
        ["pricing", project, "export"] => export(state, &decode(project)?, today),
        _ => Err(ServerError::NotFound),
    }
}

fn decode(segment: &str) -> Result<String, ServerError> {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .map_err(|_| ServerError::BadRequest("project name is not valid UTF-8".into()))
}

/// Redirects to the default project, or the first one when it is not loaded.
fn section_index(state: &AppState, section: Section) -> ResultResp {
    let projects = state.db.with_conn(|conn| list_projects(conn))?;
    let default = &state.settings.default_project;

    let target = if projects.iter().any(|p| p == default) {
        Some(default.as_str())
    } else {
        projects.first().map(String::as_str)
    };

    match target {
        Some(project) => redirect_response(&project_href(section, project)),
        None => html_response(no_projects_page(&Nav {
            section,
            project: None,
            projects: &projects,
        })),
    }
}

struct Loaded {
    projects: Vec<String>,
    units: Vec<Unit>,
    sale_start: Option<NaiveDate>,
}

fn load(state: &AppState, project: &str) -> Result<Loaded, ServerError> {
    state.db.with_conn(|conn| {
        Ok(Loaded {
            projects: list_projects(conn)?,
            units: units_for_project(conn, project)?,
            sale_start: sale_start_date(conn, project)?,
        })
    })
}

fn dashboard(state: &AppState, project: &str, today: NaiveDate) -> ResultResp {
    let loaded = load(state, project)?;
    let benchmarks = state.benchmarks();
    let bedroom_index = state.bedroom_index();

    let summary = build_dashboard(&ProjectContext {
        project,
        units: &loaded.units,
        sale_start: loaded.sale_start,
        today,
        benchmarks: &benchmarks,
        bedroom_index: &bedroom_index,
    });

    let nav = Nav {
        section: Section::Dashboard,
        project: Some(project),
        projects: &loaded.projects,
    };
    html_response(dashboard_page(
        &DashboardVm {
            project,
            summary: &summary,
        },
        &nav,
    ))
}

/// Query string of the pricing page. `tipologia` may repeat.
#[derive(Debug, Default, PartialEq)]
struct PricingQuery {
    tipologias: Vec<String>,
    vista: Vista,
    max_columns: Option<usize>,
}

fn parse_pricing_query(query: Option<&str>) -> PricingQuery {
    let mut out = PricingQuery::default();
    let Some(query) = query else {
        return out;
    };
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "tipologia" => out.tipologias.push(value.into_owned()),
            "vista" => out.vista = Vista::parse(Some(value.as_ref())),
            "max_columns" => {
                out.max_columns = value
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .map(|n| n.min(MAX_GRID_COLUMNS))
            }
            _ => {}
        }
    }
    out
}

/// Which fragment an htmx request asked for.
#[derive(Debug, PartialEq, Eq)]
enum Partial {
    Full,
    GridWithOobSidebar,
    Sidebar,
    ButtonText,
    GridAndSidebar,
}

fn partial_for(req: &Request) -> Partial {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string()
    };
    if header("HX-Request") != "true" {
        return Partial::Full;
    }
    match header("HX-Target").as_str() {
        "grid-container" => Partial::GridWithOobSidebar,
        "sidebar-stats" => Partial::Sidebar,
        "tipologia-button-text" => Partial::ButtonText,
        _ => Partial::GridAndSidebar,
    }
}

fn pricing(req: &Request, state: &AppState, project: &str, today: NaiveDate) -> ResultResp {
    let query = parse_pricing_query(req.uri().query());
    let loaded = load(state, project)?;
    let benchmarks = state.benchmarks();
    let bedroom_index = state.bedroom_index();

    let max_columns = match query.max_columns {
        Some(n) => n,
        None => state.max_columns(project, &loaded.units),
    };

    let view = build_pricing(
        &ProjectContext {
            project,
            units: &loaded.units,
            sale_start: loaded.sale_start,
            today,
            benchmarks: &benchmarks,
            bedroom_index: &bedroom_index,
        },
        &query.tipologias,
        state.settings.exchange_rate_pen,
        max_columns,
    );

    let markup = match partial_for(req) {
        Partial::Full => {
            let nav = Nav {
                section: Section::Pricing,
                project: Some(project),
                projects: &loaded.projects,
            };
            pricing_page(
                &PricingVm {
                    project,
                    view: &view,
                    vista: query.vista,
                },
                &nav,
            )
        }
        Partial::GridWithOobSidebar => grid_with_oob_sidebar(&view, query.vista),
        Partial::Sidebar => sidebar_stats(&view, false),
        Partial::ButtonText => tipologia_button_text(&view.filter),
        Partial::GridAndSidebar => grid_and_sidebar(&view, query.vista),
    };
    html_response(markup)
}

fn export(state: &AppState, project: &str, today: NaiveDate) -> ResultResp {
    let loaded = load(state, project)?;
    if loaded.units.is_empty() {
        return Err(ServerError::NotFound);
    }
    let benchmarks = state.benchmarks();
    let bedroom_index = state.bedroom_index();

    let view = build_pricing(
        &ProjectContext {
            project,
            units: &loaded.units,
            sale_start: loaded.sale_start,
            today,
            benchmarks: &benchmarks,
            bedroom_index: &bedroom_index,
        },
        &[],
        state.settings.exchange_rate_pen,
        0,
    );
    export_approval_xlsx(project, &view.approval)
}
