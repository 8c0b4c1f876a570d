//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, timeout / request-id / trace layers)
//!     → request.rs (request ID, query params, bearer token)
//!     → [dispatcher: cache, routing, handlers]
//!     → response.rs (ApiResponse envelope with CORS headers)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{SearchParams, X_REQUEST_ID};
pub use response::{ApiResponse, Payload};
pub use server::{HttpServer, ServerError};
