pub mod error;
pub mod html_cleaner;
pub mod models;
pub mod ticker_filter;

pub use error::{FixtureError, Result};
