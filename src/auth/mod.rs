//! Authentication and authorization
//!
//! `rbac` answers "may this role do this", `menu` answers "may this role see or
//! open this page", and `session` tracks whose role that is. [`AccessControl`]
//! ties the three together so callers ask about the current session directly.

pub mod menu;
pub mod rbac;
pub mod session;

use menu::{MenuItem, MenuResolver, RouteDecision};
use rbac::{Action, ActionMap, Feature, PermissionCheck, PermissionMatrix, Role};
use session::SessionStore;
use std::sync::Arc;
use tracing::debug;

/// Permission and menu checks for whoever the session currently is
#[derive(Debug, Clone)]
pub struct AccessControl {
    permissions: Arc<PermissionMatrix>,
    menu: Arc<MenuResolver>,
    session: Arc<SessionStore>,
}

impl AccessControl {
    pub fn new(
        permissions: Arc<PermissionMatrix>,
        menu: Arc<MenuResolver>,
        session: Arc<SessionStore>,
    ) -> Self {
        Self {
            permissions,
            menu,
            session,
        }
    }

    pub fn permissions(&self) -> &PermissionMatrix {
        &self.permissions
    }

    pub fn menu(&self) -> &MenuResolver {
        &self.menu
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Role in effect; the target's while impersonating
    pub fn role(&self) -> Option<Role> {
        self.session.effective_role()
    }

    /// Whether the current identity may perform `action` on `feature`.
    /// Always false when logged out.
    pub fn can(&self, feature: Feature, action: Action) -> bool {
        self.role()
            .is_some_and(|role| self.permissions.has_permission(role, feature, action))
    }

    /// Like [`AccessControl::can`] but explains the outcome
    pub fn check(&self, feature: Feature, action: Action) -> PermissionCheck {
        match self.role() {
            Some(role) => self.permissions.check(role, feature, action),
            None => PermissionCheck {
                granted: false,
                granted_by: None,
                denial_reason: Some("not logged in".to_string()),
            },
        }
    }

    /// Action map for `feature`; empty when logged out
    pub fn permissions_for(&self, feature: Feature) -> ActionMap {
        self.role()
            .map(|role| self.permissions.permissions_for(role, feature))
            .unwrap_or_default()
    }

    /// Top-level menu entries for the current identity
    pub fn visible_menu(&self) -> Vec<&MenuItem> {
        match self.role() {
            Some(role) => self.menu.visible_items(role),
            None => Vec::new(),
        }
    }

    /// Guard a navigation to `path`
    pub fn guard_route(&self, path: &str) -> RouteDecision {
        let decision = self.menu.guard_route(self.role(), path);
        debug!("Route {} -> {:?}", path, decision);
        decision
    }
}
