use maud::{html, Markup};

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

/// One figure of the summary strip.
pub fn stat_card(label: &str, value: &str) -> Markup {
    html! {
        div class="stat-card" {
            span class="stat-label" { (label) }
            span class="stat-value" { (value) }
        }
    }
}
