pub mod connection;
pub mod projects;
pub mod units;

pub use connection::{init_db, Database};
