//! # Warden Bot
//!
//! Process wiring for the Warden Twitch bot: configuration, persistence,
//! the IRC transport, identity resolution, and the dispatch loop around
//! the command engine.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod bot;
pub mod helix;
pub mod identity;
pub mod irc;
pub mod persistence;

pub use bot::WardenBot;
