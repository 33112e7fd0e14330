//! Navigation menu visibility
//!
//! Filters the ordered menu by role and guards direct navigation. Entries are
//! evaluated one at a time; a parent's decision never applies to its children.

mod defaults;
mod resolver;
mod types;

pub use defaults::default_menu;
pub use resolver::MenuResolver;
pub use types::{MenuAccess, MenuItem, RouteDecision};
