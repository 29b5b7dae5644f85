// src/tests/router_tests/pricing_tests.rs

use crate::config::Settings;
use crate::db::units::replace_units;
use crate::domain::thresholds::MAX_GRID_COLUMNS;
use crate::tests::utils::{body_string, get, htmx_get, init_test_app, seed, unit};

fn occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[test]
fn full_page_has_grid_sidebar_and_approval_table() {
    let app = init_test_app(Settings::default());
    seed(&app);

    let resp = get(&app, "/pricing/STILL");
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);

    assert!(body.contains(r#"id="grid-container""#));
    assert!(body.contains(r#"id="sidebar-stats""#));
    assert!(body.contains("Aprobación de precios"));
    assert!(body.contains(r#"href="/pricing/STILL/export""#));
    // Floors top down.
    let top = body.find("Piso 3").unwrap();
    let bottom = body.find("Piso 1").unwrap();
    assert!(top < bottom);
}

#[test]
fn alerted_typology_marks_only_available_units() {
    let app = init_test_app(Settings::default());
    seed(&app);

    let body = body_string(get(&app, "/pricing/STILL"));
    // STILL-103 and STILL-202 in the grid, plus the approval row of A.
    assert_eq!(occurrences(&body, "alerta-subir"), 3);
    assert!(body.contains("separado"));
    assert_eq!(occurrences(&body, "td class=\"vendido "), 2);
}

#[test]
fn rows_are_padded_to_widest_floor() {
    let app = init_test_app(Settings::default());
    seed(&app);

    let body = body_string(get(&app, "/pricing/STILL"));
    assert_eq!(occurrences(&body, r#"class="empty-unit""#), 2);

    let body = body_string(get(&app, "/pricing/STILL?max_columns=6"));
    assert_eq!(occurrences(&body, r#"class="empty-unit""#), 8);

    let body = body_string(get(&app, "/pricing/STILL?max_columns=abc"));
    assert_eq!(occurrences(&body, r#"class="empty-unit""#), 2);
}

#[test]
fn oversized_max_columns_is_capped() {
    let app = init_test_app(Settings::default());
    seed(&app);

    let resp = get(&app, "/pricing/STILL?max_columns=18446744073709551615");
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    // Three floors holding 4, 3 and 3 units.
    let expected = 3 * MAX_GRID_COLUMNS - 10;
    assert_eq!(occurrences(&body, r#"class="empty-unit""#), expected);
}

#[test]
fn grid_width_is_cached_per_project() {
    let app = init_test_app(Settings::default());
    seed(&app);
    let _ = get(&app, "/pricing/STILL");

    // A wider floor after the first request does not change the padding.
    let mut units: Vec<_> = (1..=6)
        .map(|n| unit("STILL", &format!("STILL-9{n}"), "9", "C", "Disponible"))
        .collect();
    units.push(unit("STILL", "STILL-81", "8", "C", "Disponible"));
    app.state
        .db
        .with_conn(|conn| replace_units(conn, &units))
        .unwrap();

    let body = body_string(get(&app, "/pricing/STILL"));
    assert_eq!(occurrences(&body, r#"class="empty-unit""#), 3);

    app.state.reset_caches();
    let body = body_string(get(&app, "/pricing/STILL"));
    assert_eq!(occurrences(&body, r#"class="empty-unit""#), 5);
}

#[test]
fn typology_filter_dims_other_units() {
    let app = init_test_app(Settings::default());
    seed(&app);

    let body = body_string(get(&app, "/pricing/STILL?tipologia=A"));
    assert_eq!(occurrences(&body, "difuminado"), 5);
    assert!(body.contains(r#"value="A" checked"#));
    // Sidebar counts only typology A.
    assert!(body.contains("<dt>Unidades</dt><dd>5</dd>"));
}

#[test]
fn vista_selects_cell_value() {
    let app = init_test_app(Settings::default());
    seed(&app);

    let body = body_string(get(&app, "/pricing/STILL?vista=area"));
    assert!(body.contains(r#"data-vista="area""#));
    assert!(body.contains(r#"<span class="unit-value">50.00 m²</span>"#));

    let body = body_string(get(&app, "/pricing/STILL?vista=whatever"));
    assert!(body.contains(r#"data-vista="precio""#));
    assert!(body.contains(r#"<span class="unit-value">$95,000</span>"#));
    assert!(body.contains(r#"<span class="unit-value">$100,000</span>"#));
}

#[test]
fn htmx_grid_target_gets_grid_and_oob_sidebar() {
    let app = init_test_app(Settings::default());
    seed(&app);

    let body = body_string(htmx_get(&app, "/pricing/STILL?tipologia=B", "grid-container"));
    assert!(!body.contains("<html"));
    assert!(body.contains("pricing-grid"));
    assert!(body.contains(r#"id="sidebar-stats" hx-swap-oob="true""#));
    assert!(!body.contains(r#"id="grid-container""#));
}

#[test]
fn htmx_sidebar_target_gets_sidebar_only() {
    let app = init_test_app(Settings::default());
    seed(&app);

    let body = body_string(htmx_get(&app, "/pricing/STILL", "sidebar-stats"));
    assert!(body.starts_with(r#"<aside id="sidebar-stats">"#));
    assert!(!body.contains("pricing-grid"));
    assert!(body.contains("<dt>Unidades</dt><dd>10</dd>"));
}

#[test]
fn htmx_button_target_gets_filter_text() {
    let app = init_test_app(Settings::default());
    seed(&app);

    let body = body_string(htmx_get(
        &app,
        "/pricing/STILL?tipologia=A&tipologia=B",
        "tipologia-button-text",
    ));
    assert_eq!(body, r#"<span id="tipologia-button-text">2 tipologías</span>"#);
}

#[test]
fn htmx_other_target_gets_grid_and_sidebar() {
    let app = init_test_app(Settings::default());
    seed(&app);

    let body = body_string(htmx_get(&app, "/pricing/STILL", "pricing-content-wrapper"));
    assert!(!body.contains("<html"));
    assert!(body.contains(r#"id="grid-container""#));
    assert!(body.contains(r#"<aside id="sidebar-stats">"#));
}

#[test]
fn encoded_project_names_are_decoded() {
    let app = init_test_app(Settings::default());
    app.state
        .db
        .with_conn(|conn| replace_units(conn, &[unit("LOS PINOS", "LP-1", "1", "A", "Disponible")]))
        .unwrap();

    let body = body_string(get(&app, "/pricing/LOS%20PINOS"));
    assert!(body.contains("Grilla de precios: LOS PINOS"));
    assert!(body.contains("LP-1"));
}

#[test]
fn export_returns_workbook() {
    let app = init_test_app(Settings::default());
    seed(&app);

    let resp = get(&app, "/pricing/STILL/export");
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(
        resp.headers().get("Content-Disposition").unwrap(),
        "attachment; filename=\"aprobacion_STILL.xlsx\""
    );
}

#[test]
fn export_of_unknown_project_is_not_found() {
    let app = init_test_app(Settings::default());
    seed(&app);
    assert_eq!(get(&app, "/pricing/NOPE/export").status(), 404);
}
