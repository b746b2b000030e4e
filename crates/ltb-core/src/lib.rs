//! Core domain + application logic for the Lify Telegram bridge.
//!
//! This crate is intentionally framework-agnostic. Telegram and the Lify
//! backend live behind ports (traits) implemented in adapter crates.

pub mod backend;
pub mod config;
pub mod coordinator;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod poller;
pub mod session;

pub use errors::{Error, Result};
