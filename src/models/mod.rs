//! Shared types used across modules.
//!
//! The license record only exists as the values of a generated `INSERT`
//! statement; nothing here is persisted.

pub mod license;

pub use license::{Expiry, NewLicense};
