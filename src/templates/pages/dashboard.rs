use crate::domain::summary::{BedroomBar, DashboardSummary, Gauge, MonthlyPoint, TypologyRow};
use crate::templates::components::format::{currency, currency_pen, pct, thousands, velocity};
use crate::templates::components::{card, stat_card};
use crate::templates::{desktop_layout, Nav};
use maud::{html, Markup, PreEscaped};

pub struct DashboardVm<'a> {
    pub project: &'a str,
    pub summary: &'a DashboardSummary,
}

pub fn dashboard_page(vm: &DashboardVm<'_>, nav: &Nav<'_>) -> Markup {
    let s = vm.summary;
    desktop_layout(
        &format!("Dashboard {}", vm.project),
        nav,
        html! {
            main class="container" {
                h1 { "Avance de ventas: " (vm.project) }

                section class="stat-strip" id="summary-cards" {
                    (stat_card("Unidades vendidas", &s.cards.units_sold.to_string()))
                    (stat_card("Avance de tiempo", &pct(s.cards.time_progress_pct)))
                    (stat_card("Precio m² disponible", &currency(s.cards.available_price_per_m2)))
                    (stat_card("Ventas totales", &currency(s.cards.total_sales)))
                    (stat_card("Área vendida", &format!("{} m²", thousands(s.cards.area_sold))))
                }

                (card("Avance de la meta", gauge(&s.gauge)))
                (card("Tipologías", typology_table(&s.typologies)))
                (card("Ventas mensuales", monthly_section(&s.monthly)))
                (card("Dormitorios", bedroom_table(&s.bedroom_bars)))
            }
        },
    )
}

fn gauge(g: &Gauge) -> Markup {
    html! {
        div class="gauge" data-sold=(g.sold_pct) data-to-sell=(g.to_sell_pct) {
            div class="gauge-bar" {
                div class="gauge-sold" style=(format!("width: {:.1}%", g.sold_pct)) {}
            }
            dl {
                dt { "Vendido" } dd { (g.sold_units) " (" (pct(g.sold_pct)) ")" }
                dt { "Por vender" } dd { (g.to_sell_units) " (" (pct(g.to_sell_pct)) ")" }
                dt { "Incremento" } dd { (pct(g.increment_pct)) }
                dt { "Meta provisional" } dd { (currency(g.provisional_target)) }
            }
        }
    }
}

fn typology_table(rows: &[TypologyRow]) -> Markup {
    html! {
        @if rows.is_empty() {
            p class="empty" { "Sin unidades cargadas." }
        } @else {
            table class="typology-table" {
                thead {
                    tr {
                        th { "Tipología" }
                        th { "Unidades" }
                        th { "Vendidas" }
                        th { "% vendido" }
                        th { "Precio m² vendido" }
                        th { "Velocidad" }
                        th { "Absorción" }
                        th { "Dorm." }
                        th { "Precio m² mercado" }
                        th { "Velocidad mercado" }
                    }
                }
                tbody {
                    @for row in rows {
                        tr {
                            td { (row.typology) }
                            td { (row.total_units) }
                            td { (row.sold_units) }
                            td { (pct(row.sold_pct)) }
                            td { (currency(row.avg_sold_price_per_m2)) }
                            td { (velocity(Some(row.velocity))) }
                            td { (format!("{:.2}", row.absorption)) }
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

fn monthly_section(points: &[MonthlyPoint]) -> Markup {
    // Chart data for the client-side chart; the table is the fallback.
    let json = serde_json::to_string(points).unwrap_or_else(|_| "[]".to_string());
    html! {
        canvas id="monthly-chart" {}
        script type="application/json" id="monthly-data" { (PreEscaped(json)) }
        table class="monthly-table" {
            thead {
                tr {
                    th { "Mes" }
                    th { "Unidades" }
                    th { "Ticket promedio" }
                    th { "Precio m² promedio" }
                }
            }
            tbody {
                @for p in points {
                    tr {
                        td { (p.month) }
                        td { (p.units) }
                        td { (currency(p.avg_ticket)) }
                        td { (currency(p.avg_price_per_m2)) }
                    }
                }
            }
        }
    }
}

fn bedroom_table(bars: &[BedroomBar]) -> Markup {
    html! {
        table class="bedroom-table" {
            thead {
                tr {
                    th { "Dormitorios" }
                    th { "Total" }
                    th { "Vendidas" }
                    th { "% vendido" }
                    th { "Precio vendido" }
                    th { "Precio disponible" }
                    th { "Precio alerta" }
                }
            }
            tbody {
                @for bar in bars {
                    tr {
                        td { (bar.label) }
                        td { (bar.total_count) }
                        td { (bar.sold_count) }
                        td {
                            div class="bar" style=(format!("width: {:.1}%", bar.sold_pct)) {}
                            (pct(bar.sold_pct))
                        }
                        td { (currency(bar.sold_avg)) }
                        td { (currency(bar.available_avg)) }
                        td { (currency(bar.alert_avg)) }
                    }
                }
            }
        }
    }
}
