//! Cache-aware request dispatch.

pub mod dispatcher;

pub use dispatcher::{CacheStatus, DispatchError, Dispatched, Dispatcher};
