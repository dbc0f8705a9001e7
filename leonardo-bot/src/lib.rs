//! leonardo-bot library crate.
//!
//! Polls a substitution plan API and mirrors every change into a single,
//! replaceable Discord message. Failures are reported to a second channel.

pub mod config;
pub mod error;
pub mod logging;
pub mod notification;
pub mod plan;
pub mod scheduler;
pub mod utils;

pub use error::{Error, Result};
