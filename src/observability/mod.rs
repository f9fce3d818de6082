//! Observability subsystem: tracing setup.

pub mod logging;
