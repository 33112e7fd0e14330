//! Error handling for the portal engine
//!
//! This module defines the error type shared by every component.

#![allow(missing_docs)]

mod helpers;
mod types;

pub use types::{PortalError, Result};
