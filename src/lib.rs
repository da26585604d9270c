//! Startup configuration loading for the MuchToDo service.

pub mod config;

pub use config::{Config, ConfigError};
