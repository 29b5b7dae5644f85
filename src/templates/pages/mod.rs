pub mod dashboard;
pub mod no_projects;
pub mod pricing;

pub use dashboard::{dashboard_page, DashboardVm};
pub use no_projects::no_projects_page;
pub use pricing::{pricing_page, PricingVm, Vista};
