//! # Client Runtime Library
//!
//! Exposes configuration, logging setup and the wiring container so the
//! binary and the integration tests build the client the same way.

#![warn(clippy::all)]
#![deny(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod config;
pub mod container;
pub mod logging;

pub use config::{ClientConfig, ConfigError};
pub use container::{open_storage, ClientContainer};
