//! User resource subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → handlers.rs (validate id / body, 400 on failure)
//!     → upstream::UpstreamClient (one call)
//!     → handlers.rs (map outcome to status + body)
//!     → JSON response
//! ```

pub mod handlers;
pub mod types;

pub use types::{InvalidUserId, User, UserId, UserInput, UserList};
