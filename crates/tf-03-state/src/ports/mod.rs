//! # Ports
//!
//! - `outbound.rs` - driven ports the store needs from the host (session storage)

pub mod outbound;

pub use outbound::{SessionStorage, StorageKey};
