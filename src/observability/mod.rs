//! Observability subsystem.
//!
//! All subsystems emit `tracing` events with structured fields; `logging.rs`
//! decides where they go. The forwarding path logs at debug level only.

pub mod logging;

pub use logging::init_logging;
