pub mod memory;
pub mod rest;
pub mod token;

pub use memory::InMemoryBackend;
pub use rest::RestBackend;
pub use token::StoreTokenProvider;
