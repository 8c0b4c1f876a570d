//! Upstream content API integration.
//!
//! # Data Flow
//! ```text
//! ContentHandler (route params, query, token)
//!     → client.rs (resolve URL, GET with bearer auth, buffer body)
//!     → types.rs (UpstreamResponse → ApiResponse envelope, or UpstreamError)
//! ```
//!
//! # Design Decisions
//! - Single attempt per call, no retries
//! - Every call has a deadline
//! - 5xx is a failure; 2xx/4xx are passed through to the caller

pub mod client;
pub mod types;

pub use client::UpstreamClient;
pub use types::{UpstreamError, UpstreamResponse, UpstreamResult};
