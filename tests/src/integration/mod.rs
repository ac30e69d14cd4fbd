//! Cross-crate integration scenarios.

pub mod lifecycle;
pub mod middleware_chain;
pub mod pipeline;
pub mod statistics;
