//! Response caching subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → key.rs (derive CacheKey, or None for non-shareable requests)
//!     → store.rs (lookup / put ApiResponse snapshots)
//! ```
//!
//! # Design Decisions
//! - Best effort: every store failure is absorbed by the caller
//! - Entries are immutable snapshots; writes replace, never mutate
//! - No TTL here; expiry is the store's business

pub mod key;
pub mod store;

pub use key::{derive_cache_key, CacheKey};
pub use store::{CacheError, CacheStore, MemoryCacheStore};
