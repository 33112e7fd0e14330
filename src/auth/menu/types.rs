//! Menu type definitions

use crate::auth::rbac::{Audience, Role, RoleCatalog, RoleGroup};
use serde::{Deserialize, Serialize};

/// Who may see a menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MenuAccessRepr", into = "MenuAccessRepr")]
pub enum MenuAccess {
    /// Every authenticated actor
    All,
    /// Listed roles plus members of listed groups
    Only(Audience),
}

impl MenuAccess {
    pub fn groups(groups: &[RoleGroup]) -> Self {
        Self::Only(Audience::groups(groups))
    }

    pub fn roles(roles: &[Role]) -> Self {
        Self::Only(Audience::roles(roles))
    }

    /// Per-entry check; the bypass role is handled by the resolver
    pub fn admits(&self, role: Role, catalog: &RoleCatalog) -> bool {
        match self {
            MenuAccess::All => true,
            MenuAccess::Only(audience) => audience.admits(role, catalog).is_some(),
        }
    }
}

/// A role or a group name inside a menu role list
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum RoleRef {
    Role(Role),
    Group(RoleGroup),
}

/// Wire form: the keyword `ALL` or a list of role and group names
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum MenuAccessRepr {
    Keyword(String),
    List(Vec<RoleRef>),
}

impl TryFrom<MenuAccessRepr> for MenuAccess {
    type Error = String;

    fn try_from(repr: MenuAccessRepr) -> Result<Self, Self::Error> {
        match repr {
            MenuAccessRepr::Keyword(keyword) if keyword.eq_ignore_ascii_case("all") => {
                Ok(MenuAccess::All)
            }
            MenuAccessRepr::Keyword(other) => Err(format!(
                "Menu roles must be ALL or a list of roles/groups, got: {}",
                other
            )),
            MenuAccessRepr::List(refs) => {
                let mut audience = Audience::default();
                for entry in refs {
                    match entry {
                        RoleRef::Role(role) => audience.roles.push(role),
                        RoleRef::Group(group) => audience.groups.push(group),
                    }
                }
                Ok(MenuAccess::Only(audience))
            }
        }
    }
}

impl From<MenuAccess> for MenuAccessRepr {
    fn from(access: MenuAccess) -> Self {
        match access {
            MenuAccess::All => MenuAccessRepr::Keyword("ALL".to_string()),
            MenuAccess::Only(audience) => MenuAccessRepr::List(
                audience
                    .roles
                    .into_iter()
                    .map(RoleRef::Role)
                    .chain(audience.groups.into_iter().map(RoleRef::Group))
                    .collect(),
            ),
        }
    }
}

/// Navigation entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Route path, matched exactly by the access guard
    pub path: String,
    /// Display label
    pub label: String,
    /// Icon name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Visibility
    pub roles: MenuAccess,
    /// Nested entries, evaluated independently of the parent
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuItem>,
    /// Badge text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    /// Render a divider before this entry
    #[serde(default)]
    pub divider: bool,
}

impl MenuItem {
    pub fn new(path: impl Into<String>, label: impl Into<String>, roles: MenuAccess) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            icon: None,
            roles,
            children: Vec::new(),
            badge: None,
            divider: false,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_children(mut self, children: Vec<MenuItem>) -> Self {
        self.children = children;
        self
    }

    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }

    pub fn with_divider(mut self) -> Self {
        self.divider = true;
        self
    }
}

/// Outcome of the route guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Nobody is logged in
    RedirectToLogin,
    /// Render the page
    Allow,
    /// Render the not-authorized view
    NotAuthorized,
}
