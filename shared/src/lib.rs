//! Shared library for Barcode Check Lambda functions.
//!
//! This crate provides errors, configuration, HTTP helpers and the configuration
//! store used by the Lambda functions.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod secrets;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use models::{Analysis, ApiKey, Area, Iz, IzAnalysis};
pub use secrets::{get_database_credentials, get_secret, DatabaseCredentials};
pub use store::{ConfigStore, PgConfigStore};
