//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (ordered route lookup)
//!     → matcher.rs (method filter + path template, param capture)
//!     → Return: RouteMatch { handler, params } or None
//!
//! Route table (at startup):
//!     register(method, pattern, handler) in a fixed order
//!     → patterns compiled once
//!     → frozen behind Arc, immutable at runtime
//! ```
//!
//! # Design Decisions
//! - No regex in hot path
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by registration)

pub mod matcher;
pub mod router;

pub use matcher::{is_dot_segment, MethodFilter, Params, PatternError, RoutePattern};
pub use router::{Route, RouteMatch, Router};
