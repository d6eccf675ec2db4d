//! Shared utilities for finquest

pub mod logging;

pub use logging::init_tracing;
