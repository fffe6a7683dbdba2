//! Upstream user API subsystem.
//!
//! # Data Flow
//! ```text
//! Handler
//!     → client.rs (build request, attach X-Request-ID, send with timeout)
//!     → upstream REST API
//!     → client.rs (check status, decode JSON)
//!     → Result<T, UpstreamError>
//! ```
//!
//! # Design Decisions
//! - One reqwest::Client shared by all requests (connection reuse)
//! - No retries: every failure is terminal for the request
//! - Status expectations are per operation (201 create, 200 update, 200/204 delete)

pub mod client;
pub mod error;

pub use client::UpstreamClient;
pub use error::{UpstreamError, UpstreamResult};
