//! User proxy service library.
//!
//! Exposes CRUD endpoints for users and forwards each request to an upstream
//! REST API, translating its status codes and bodies.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;
pub mod users;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
