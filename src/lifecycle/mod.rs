//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → every subscriber wakes → server stops accepting → drain → exit
//! ```
//!
//! # Design Decisions
//! - One broadcast channel fans the stop signal out to every long-running task
//! - In-flight background revalidations are not awaited on exit

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
