mod dashboard_tests;
mod pricing_tests;
