//! # Adapters
//!
//! - `memory`: in-process session storage for tests and ephemeral clients
//! - `file`: JSON file session storage

pub mod file;
pub mod memory;

pub use file::FileSessionStorage;
pub use memory::MemorySessionStorage;
