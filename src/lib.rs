//! keymint: license key generator (library crate).
//!
//! Re-exports public modules for integration tests and external use.

pub mod clock;
pub mod config;
pub mod constants;
pub mod env;
pub mod issue;
pub mod key;
pub mod models;
pub mod output;
pub mod sql;
