// src/tests/router_tests/dashboard_tests.rs

use crate::config::Settings;
use crate::tests::utils::{body_string, get, init_test_app, location, request, seed};

#[test]
fn root_redirects_to_default_dashboard() {
    let app = init_test_app(Settings::default());
    let resp = get(&app, "/");
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/dashboard/STILL");
}

#[test]
fn section_index_prefers_default_project() {
    let app = init_test_app(Settings::default());
    seed(&app);

    let resp = get(&app, "/dashboard");
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/dashboard/STILL");

    let resp = get(&app, "/pricing");
    assert_eq!(location(&resp), "/pricing/STILL");
}

#[test]
fn section_index_falls_back_to_first_project() {
    let app = init_test_app(Settings {
        default_project: "NUN".into(),
        ..Settings::default()
    });
    seed(&app);

    let resp = get(&app, "/dashboard");
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/dashboard/COS");
}

#[test]
fn section_index_without_projects_says_so() {
    let app = init_test_app(Settings::default());
    let resp = get(&app, "/pricing");
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("No hay proyectos cargados"));
}

#[test]
fn dashboard_renders_project_summary() {
    let app = init_test_app(Settings::default());
    seed(&app);

    let resp = get(&app, "/dashboard/STILL");
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);

    assert!(body.contains("Avance de ventas: STILL"));
    assert!(body.contains(r#"<span class="stat-value">2</span>"#));
    assert!(body.contains("$190,000"));
    assert!(body.contains(r#""month":"2024-03","units":2"#));
    assert!(body.contains(r#"href="/pricing/STILL""#));
    assert!(body.contains(r#"href="/dashboard/COS""#));
}

#[test]
fn unknown_project_gets_an_empty_dashboard() {
    let app = init_test_app(Settings::default());
    seed(&app);

    let resp = get(&app, "/dashboard/NOPE");
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("Sin unidades cargadas."));
    assert!(body.contains(r#"<span class="stat-value">0</span>"#));
}

#[test]
fn unknown_paths_are_not_found() {
    let app = init_test_app(Settings::default());
    let resp = get(&app, "/dashboard/STILL/extra");
    assert_eq!(resp.status(), 404);
    assert!(body_string(resp).contains("Error 404"));

    let resp = get(&app, "/favicon.ico");
    assert_eq!(resp.status(), 404);
}

#[test]
fn only_get_is_routed() {
    let app = init_test_app(Settings::default());
    let resp = request(&app, http::Request::builder().method("POST").uri("/dashboard"));
    assert_eq!(resp.status(), 404);
}
