//! Role-Based Access Control (RBAC) system
//!
//! Roles form a closed enumeration grouped into overlapping capability
//! clusters. Permissions are additive allow-lists per (feature, action) pair
//! with a single bypass role; anything not granted is denied.

mod defaults;
mod permissions;
mod roles;
mod types;

// Re-export public types and structs
pub use defaults::default_rules;
pub use permissions::PermissionMatrix;
pub use roles::{Role, RoleCatalog, RoleGroup, RoleSet};
pub use types::{
    Action, ActionMap, Audience, Feature, GrantSource, PermissionCheck, PermissionRule,
};
