//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (assign x-request-id)
//!     → extract.rs (decode JSON bodies, empty body = {})
//!     → jokes.rs / users.rs (handlers)
//!     → error.rs (failures → status + plain-text body)
//!     → Send to client
//! ```

pub mod error;
pub mod extract;
pub mod jokes;
pub mod request;
pub mod server;
pub mod users;

pub use error::ApiError;
pub use extract::JsonBody;
pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
