//! Configuration module
//!
//! TOML settings for the lookup client: endpoint, transport,
//! accepted statuses and default query values.

pub mod config;

pub use config::Config;
