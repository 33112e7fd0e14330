//! Session-wide scope filter
//!
//! The scope narrows what data the portal asks for: a region, an
//! organisation, a station, a site and a date range. It is independent of
//! identity and lives only as long as the process.

mod store;
mod types;

pub use store::ScopeStore;
pub use types::{DateRange, DateWindow, Region, Scope, ScopePatch, Selection};
