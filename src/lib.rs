pub mod api;
pub mod config;
pub mod result_display;
pub mod utils;

pub use api::{LookupClient, LookupError, Outcome, Query};
