pub mod card;
pub mod error;
pub mod format;

pub use card::{card, stat_card};
pub use error::error_page;
