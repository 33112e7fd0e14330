//! Configuration data models
//!
//! This module defines all configuration structures used by the engine.

#![allow(missing_docs)]

pub mod access;
pub mod session;
pub mod storage;

// Re-export all configuration types
pub use access::*;
pub use session::*;
pub use storage::*;

/// Default broadcast capacity for session signals
pub fn default_signal_capacity() -> usize {
    16
}

/// Default placeholder avatar service
pub fn default_avatar_base_url() -> String {
    "https://api.dicebear.com/7.x/initials/svg?seed=".to_string()
}
