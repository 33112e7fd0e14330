//! Shared utilities
//!
//! Error handling used across the engine.

pub mod error;

pub use error::{PortalError, Result};
