use crate::domain::grid::GridCell;
use crate::domain::pricing::{ApprovalRow, PricingView, SidebarStats};
use crate::domain::unit::DisplayStatus;
use crate::templates::components::format::{currency, currency_pen, velocity};
use crate::templates::layouts::desktop::project_href;
use crate::templates::{desktop_layout, Nav, Section};
use maud::{html, Markup};

/// Which figure each grid cell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Vista {
    #[default]
    Precio,
    M2,
    Area,
    Proformas,
}

impl Vista {
    /// Unknown values fall back to price.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("m2") => Vista::M2,
            Some("area") => Vista::Area,
            Some("proformas") => Vista::Proformas,
            _ => Vista::Precio,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Vista::Precio => "precio",
            Vista::M2 => "m2",
            Vista::Area => "area",
            Vista::Proformas => "proformas",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Vista::Precio => "Precio",
            Vista::M2 => "Precio m²",
            Vista::Area => "Área",
            Vista::Proformas => "Proformas",
        }
    }

    fn cell_value(self, cell: &GridCell) -> String {
        match self {
            Vista::Precio if cell.display == DisplayStatus::Sold => currency(cell.sale_price),
            Vista::Precio => currency(cell.list_price),
            Vista::M2 => currency(cell.price_per_m2),
            Vista::Area => format!("{:.2} m²", cell.area),
            Vista::Proformas => cell.proformas.to_string(),
        }
    }
}

const ALL_VISTAS: [Vista; 4] = [Vista::Precio, Vista::M2, Vista::Area, Vista::Proformas];

pub struct PricingVm<'a> {
    pub project: &'a str,
    pub view: &'a PricingView,
    pub vista: Vista,
}

pub fn pricing_page(vm: &PricingVm<'_>, nav: &Nav<'_>) -> Markup {
    let href = project_href(Section::Pricing, vm.project);
    desktop_layout(
        &format!("Grilla de precios {}", vm.project),
        nav,
        html! {
            main class="container pricing" id="pricing-content-wrapper" {
                h1 { "Grilla de precios: " (vm.project) }

                form class="pricing-filters"
                    method="get"
                    action=(href)
                    hx-get=(href)
                    hx-target="#grid-container"
                    hx-trigger="change"
                    hx-swap="innerHTML"
                {
                    details class="tipologia-filter" {
                        summary { (tipologia_button_text(&vm.view.filter)) }
                        @for typology in &vm.view.typologies {
                            label {
                                input type="checkbox" name="tipologia" value=(typology)
                                    checked[vm.view.filter.contains(typology)];
                                (typology)
                            }
                        }
                    }
                    label for="vista" { "Ver" }
                    select name="vista" id="vista" {
                        @for vista in ALL_VISTAS {
                            option value=(vista.as_str()) selected[vista == vm.vista] { (vista.label()) }
                        }
                    }
                    input type="hidden" name="max_columns" value=(vm.view.max_columns);
                    noscript { button type="submit" { "Filtrar" } }
                }

                div class="pricing-layout" {
                    div id="grid-container" {
                        (grid(vm.view, vm.vista))
                    }
                    (sidebar_stats(vm.view, false))
                }

                (legend(vm.view))
                (approval_table(vm.project, &vm.view.approval))
            }
        },
    )
}

/// Text of the typology dropdown button.
pub fn tipologia_button_text(filter: &[String]) -> Markup {
    html! {
        span id="tipologia-button-text" {
            @match filter.len() {
                0 => { "Todas las tipologías" }
                1 => { (filter[0]) }
                n => { (n) " tipologías" }
            }
        }
    }
}

pub fn grid(view: &PricingView, vista: Vista) -> Markup {
    html! {
        @if view.grid.is_empty() {
            p class="empty" { "Sin unidades para este proyecto." }
        } @else {
            table class="pricing-grid" data-vista=(vista.as_str()) {
                tbody {
                    @for row in &view.grid {
                        tr {
                            th class="floor" { "Piso " (row.floor) }
                            @for cell in &row.cells {
                                @if cell.is_placeholder() {
                                    td class=(cell.css_class()) {}
                                } @else {
                                    td class={ (cell.display.css_class()) " " (cell.css_class()) }
                                        title={ (cell.code) " · " (cell.typology) " · " (cell.status_label) }
                                    {
                                        span class="unit-code" { (cell.code) }
                                        span class="unit-value" { (vista.cell_value(cell)) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Totals for the current filter. `oob` marks it for an out-of-band swap
/// when it rides along with the grid.
pub fn sidebar_stats(view: &PricingView, oob: bool) -> Markup {
    html! {
        aside id="sidebar-stats" hx-swap-oob=[oob.then_some("true")] {
            h3 { "Resumen" }
            (stats_list(&view.sidebar))
        }
    }
}

fn stats_list(stats: &SidebarStats) -> Markup {
    html! {
        dl {
            dt { "Unidades" } dd { (stats.total_units) }
            dt { "Precio total" } dd { (currency(stats.price_sum)) }
            dt { "Área total" } dd { (format!("{:.2} m²", stats.area_sum)) }
            dt { "Proformas" } dd { (stats.proformas_sum) }
        }
    }
}

/// Grid with the sidebar swapped out-of-band.
pub fn grid_with_oob_sidebar(view: &PricingView, vista: Vista) -> Markup {
    html! {
        (grid(view, vista))
        (sidebar_stats(view, true))
    }
}

pub fn grid_and_sidebar(view: &PricingView, vista: Vista) -> Markup {
    html! {
        div id="grid-container" {
            (grid(view, vista))
        }
        (sidebar_stats(view, false))
    }
}

fn legend(view: &PricingView) -> Markup {
    let entries = [
        (DisplayStatus::Sold, "Vendido"),
        (DisplayStatus::Reserved, "Separado"),
        (DisplayStatus::Alert, "Alerta: subir precio"),
        (DisplayStatus::Available, "Disponible"),
    ];
    html! {
        section class="legend" {
            @for (status, label) in entries {
                div class={ "legend-item " (status.legend_color()) } {
                    span class="legend-swatch" {}
                    strong { (label) }
                    (stats_list(view.legend.bucket(status)))
                }
            }
        }
    }
}

fn approval_table(project: &str, rows: &[ApprovalRow]) -> Markup {
    html! {
        section class="approval" {
            h2 { "Aprobación de precios" }
            a class="export" href=(format!("{}/export", project_href(Section::Pricing, project))) {
                "Exportar a Excel"
            }
            table {
                thead {
                    tr {
                        th { "Tipología" }
                        th { "Disponibles" }
                        th { "Proformas" }
                        th { "Precio lista m²" }
                        th { "Velocidad" }
                        th { "Precio venta m²" }
                        th { "Dorm." }
                        th { "Precio m² mercado" }
                        th { "Velocidad mercado" }
                    }
                }
                tbody {
                    @for row in rows {
                        tr class=[row.has_alert.then_some("alerta-subir")] {
                            td { (row.typology) }
                            td { (row.availability()) }
                            td { (row.total_proformas) }
                            td { (currency(row.avg_list_price_per_m2)) }
                            td { (velocity(Some(row.velocity))) }
                            td { (currency_pen(Some(row.avg_sale_price_per_m2_pen))) }
                            td { @if let Some(b) = row.bedrooms { (b) } }
                            td { (currency_pen(row.market_price_per_m2)) }
                            td { (velocity(row.market_velocity)) }
                        }
                    }
                }
            }
        }
    }
}
