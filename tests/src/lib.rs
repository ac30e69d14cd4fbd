//! # TaskFlow Client Test Suite
//!
//! Cross-crate scenarios that no single crate can check on its own.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs        # Entity builders, scripted HTTP backend, wired runtime
//! └── integration/
//!     ├── lifecycle.rs       # Store + views: create/update/delete, filter reset
//!     ├── statistics.rs      # Derived views over store state, memo reuse
//!     ├── middleware_chain.rs# ApiClient + full chain: retry, sanitize, headers
//!     └── pipeline.rs        # Effects over REST through the chain
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p tf-tests
//! cargo test -p tf-tests integration::pipeline::
//!
//! # Benchmarks
//! cargo bench -p tf-tests
//! ```

pub mod fixtures;
pub mod integration;
