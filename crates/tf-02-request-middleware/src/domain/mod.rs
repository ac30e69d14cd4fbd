//! Domain layer: pure policies with no I/O.

pub mod config;
pub mod csrf;
pub mod failure;
pub mod messages;
pub mod retry_policy;
pub mod sanitize;
