//! Edge HTTP façade over a third-party content API.
//!
//! Requests are routed to handlers that fetch pages, tables, users and search
//! results from the upstream API. Responses are wrapped in a CORS envelope and
//! served stale-while-revalidate from a response cache.

pub mod cache;
pub mod config;
pub mod dispatch;
pub mod handlers;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod upstream;

pub use config::FacadeConfig;
pub use dispatch::Dispatcher;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
