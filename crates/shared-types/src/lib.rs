//! # Shared Types Crate
//!
//! Domain entities, wire envelopes, request payloads and error shapes shared
//! by every TaskFlow client crate.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type that crosses a crate boundary is
//!   defined here.
//! - **Immutable Entities**: records are replaced, never edited in place.
//! - **Wire Fidelity**: serde attributes match the backend's camelCase JSON.

pub mod domain;
pub mod entities;
pub mod envelope;
pub mod errors;
pub mod requests;

pub use domain::Domain;
pub use entities::*;
pub use envelope::{ApiEnvelope, PaginatedResponse, PaginationMeta};
pub use errors::{ApiError, ErrorKind};
pub use requests::*;
