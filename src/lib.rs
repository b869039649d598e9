//! Jokes API library.
//!
//! An HTTP service exposing an in-memory joke list, a like counter and a
//! document-store-backed user directory.

pub mod config;
pub mod http;
pub mod jokes;
pub mod lifecycle;
pub mod observability;
pub mod users;

pub use config::schema::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
