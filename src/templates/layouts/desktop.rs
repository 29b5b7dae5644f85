use maud::{html, Markup, DOCTYPE};

/// Which page the navigation should highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Dashboard,
    Pricing,
}

/// Top navigation: one link per project for the current section, plus the
/// switch between dashboard and pricing grid.
pub struct Nav<'a> {
    pub section: Section,
    pub project: Option<&'a str>,
    pub projects: &'a [String],
}

fn section_path(section: Section) -> &'static str {
    match section {
        Section::Dashboard => "/dashboard",
        Section::Pricing => "/pricing",
    }
}

pub fn project_href(section: Section, project: &str) -> String {
    format!("{}/{}", section_path(section), urlencoding::encode(project))
}

pub fn desktop_layout(title: &str, nav: &Nav<'_>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="es" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="icon" href="/static/favicon/favicon.ico";
                link rel="stylesheet" href="/static/main.css";
                script src="/static/htmx.js" defer {};
                script src="/static/chart.js" defer {};
            }
            body {
              header class="flex items-center justify-between px-6 py-3 shadow" {
                  h3 { "Avance de ventas" }
                  nav {
                      ul {
                          @for (section, label) in [(Section::Dashboard, "Dashboard"), (Section::Pricing, "Grilla de precios")] {
                              li class=[(nav.section == section).then_some("active")] {
                                  @match nav.project {
                                      Some(project) => a href=(project_href(section, project)) { (label) },
                                      None => a href=(section_path(section)) { (label) },
                                  }
                              }
                          }
                      }
                  }
                  @if !nav.projects.is_empty() {
                      nav class="project-switch" {
                          ul {
                              @for project in nav.projects {
                                  li class=[(nav.project == Some(project.as_str())).then_some("active")] {
                                      a href=(project_href(nav.section, project)) { (project) }
                                  }
                              }
                          }
                      }
                  }
              }
                (content)
            }
        }
    }
}
