//! Adapters for the chain's ports and the HTTP transport.

pub mod memory;
pub mod reqwest_transport;

pub use memory::{NoAuthToken, NoCsrfMeta, RecordingNotifier, StaticCsrfToken, TracingNotifier};
pub use reqwest_transport::ReqwestTransport;
