//! # Warden Common
//!
//! Shared types, errors, and utilities for Warden Bot.
//!
//! This crate provides the foundational chat-message model and error type
//! used across all other crates in the Warden Bot workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod duration;
pub mod error;
pub mod reply;
pub mod types;

pub use error::*;
pub use types::*;
