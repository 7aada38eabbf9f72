//! # Warden Config
//!
//! Typed configuration management for Warden Bot: a serde schema over the
//! TOML config file, environment overrides for secrets, and validation.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
