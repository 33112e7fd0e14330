//! Role-based menu filtering and path guards

use super::types::{MenuItem, RouteDecision};
use crate::auth::rbac::{Role, RoleCatalog};
use crate::utils::error::{PortalError, Result};
use tracing::debug;

/// Filters the navigation menu and answers direct-navigation checks
#[derive(Debug, Clone)]
pub struct MenuResolver {
    catalog: RoleCatalog,
    items: Vec<MenuItem>,
}

impl Default for MenuResolver {
    fn default() -> Self {
        Self::new(RoleCatalog::global().clone(), super::defaults::default_menu())
    }
}

impl MenuResolver {
    pub fn new(catalog: RoleCatalog, items: Vec<MenuItem>) -> Self {
        Self { catalog, items }
    }

    /// Load a menu from YAML
    pub fn from_yaml(catalog: RoleCatalog, yaml: &str) -> Result<Self> {
        let items: Vec<MenuItem> = serde_yaml::from_str(yaml)
            .map_err(|e| PortalError::config(format!("Failed to parse menu: {}", e)))?;
        debug!("Loaded menu with {} top-level entries", items.len());
        Ok(Self::new(catalog, items))
    }

    /// Unfiltered menu
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Whether a single entry is visible to the role. Children are not consulted.
    pub fn is_item_visible(&self, role: Role, item: &MenuItem) -> bool {
        role.is_bypass() || item.roles.admits(role, &self.catalog)
    }

    /// Top-level entries visible to the role, in source order.
    ///
    /// Children of a visible entry are returned untouched; callers that render
    /// nested entries check them with [`MenuResolver::is_item_visible`].
    pub fn visible_items(&self, role: Role) -> Vec<&MenuItem> {
        if role.is_bypass() {
            return self.items.iter().collect();
        }

        self.items
            .iter()
            .filter(|item| self.is_item_visible(role, item))
            .collect()
    }

    /// First entry (pre-order) whose path equals `path` exactly
    pub fn find_item(&self, path: &str) -> Option<&MenuItem> {
        fn walk<'a>(items: &'a [MenuItem], path: &str) -> Option<&'a MenuItem> {
            for item in items {
                if item.path == path {
                    return Some(item);
                }
                if let Some(found) = walk(&item.children, path) {
                    return Some(found);
                }
            }
            None
        }

        walk(&self.items, path)
    }

    /// Whether the role may open `path` directly.
    ///
    /// Paths that are not menu entries, such as record detail pages, are
    /// allowed.
    pub fn can_access_path(&self, role: Role, path: &str) -> bool {
        if role.is_bypass() {
            return true;
        }

        match self.find_item(path) {
            Some(item) => item.roles.admits(role, &self.catalog),
            None => true,
        }
    }

    /// Route guard for an optional current role
    pub fn guard_route(&self, role: Option<Role>, path: &str) -> RouteDecision {
        match role {
            None => RouteDecision::RedirectToLogin,
            Some(role) if self.can_access_path(role, path) => RouteDecision::Allow,
            Some(role) => {
                debug!("Route {} refused for role {}", path, role);
                RouteDecision::NotAuthorized
            }
        }
    }
}
