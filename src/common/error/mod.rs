//! Unified error types for servicedeck.
//!
//! This module provides a single error type covering content configuration,
//! template binding, verse fetching and package I/O.

// Submodule declarations
pub mod types;
pub mod conversions;

// Re-exports
pub use types::{Error, Result};
