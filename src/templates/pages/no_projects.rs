use crate::templates::{desktop_layout, Nav};
use maud::{html, Markup};

pub fn no_projects_page(nav: &Nav<'_>) -> Markup {
    desktop_layout(
        "Sin proyectos",
        nav,
        html! {
            main class="container" {
                h1 { "No hay proyectos cargados" }
                p { "Importa el archivo de unidades con " code { "sales_board import" } " y recarga la página." }
            }
        },
    )
}
