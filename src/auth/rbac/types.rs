//! RBAC type definitions

use super::roles::{Role, RoleCatalog, RoleGroup};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Portal feature a permission applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Stations,
    Sites,
    Sessions,
    Swaps,
    Billing,
    Tariffs,
    Incidents,
    Dispatches,
    Team,
    Users,
    Reports,
    Settings,
}

impl Feature {
    pub const ALL: [Feature; 12] = [
        Feature::Stations,
        Feature::Sites,
        Feature::Sessions,
        Feature::Swaps,
        Feature::Billing,
        Feature::Tariffs,
        Feature::Incidents,
        Feature::Dispatches,
        Feature::Team,
        Feature::Users,
        Feature::Reports,
        Feature::Settings,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Feature::Stations => "stations",
            Feature::Sites => "sites",
            Feature::Sessions => "sessions",
            Feature::Swaps => "swaps",
            Feature::Billing => "billing",
            Feature::Tariffs => "tariffs",
            Feature::Incidents => "incidents",
            Feature::Dispatches => "dispatches",
            Feature::Team => "team",
            Feature::Users => "users",
            Feature::Reports => "reports",
            Feature::Settings => "settings",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Feature::ALL
            .into_iter()
            .find(|feature| feature.as_str() == wanted)
            .ok_or_else(|| format!("Invalid feature: {}", s))
    }
}

/// Operation a screen can expose on a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
    Assign,
    Approve,
    Cancel,
    Resolve,
    Export,
    Refund,
    Invite,
    Impersonate,
}

impl Action {
    pub const ALL: [Action; 12] = [
        Action::View,
        Action::Create,
        Action::Edit,
        Action::Delete,
        Action::Assign,
        Action::Approve,
        Action::Cancel,
        Action::Resolve,
        Action::Export,
        Action::Refund,
        Action::Invite,
        Action::Impersonate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::Assign => "assign",
            Action::Approve => "approve",
            Action::Cancel => "cancel",
            Action::Resolve => "resolve",
            Action::Export => "export",
            Action::Refund => "refund",
            Action::Invite => "invite",
            Action::Impersonate => "impersonate",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == wanted)
            .ok_or_else(|| format!("Invalid action: {}", s))
    }
}

/// Allow-list made of literal roles and group references
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audience {
    /// Roles listed literally
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Groups whose members are admitted
    #[serde(default)]
    pub groups: Vec<RoleGroup>,
}

impl Audience {
    pub fn new(roles: &[Role], groups: &[RoleGroup]) -> Self {
        Self {
            roles: roles.to_vec(),
            groups: groups.to_vec(),
        }
    }

    /// Audience made only of group references
    pub fn groups(groups: &[RoleGroup]) -> Self {
        Self::new(&[], groups)
    }

    /// Audience made only of literal roles
    pub fn roles(roles: &[Role]) -> Self {
        Self::new(roles, &[])
    }

    /// Why the role is admitted, if it is. Does not apply the bypass.
    pub fn admits(&self, role: Role, catalog: &RoleCatalog) -> Option<GrantSource> {
        if self.roles.contains(&role) {
            return Some(GrantSource::Literal);
        }
        self.groups
            .iter()
            .find(|group| catalog.is_in_group(role, **group))
            .map(|group| GrantSource::Group(*group))
    }

    /// Additive merge; never removes an entry
    pub fn extend(&mut self, other: &Audience) {
        for role in &other.roles {
            if !self.roles.contains(role) {
                self.roles.push(*role);
            }
        }
        for group in &other.groups {
            if !self.groups.contains(group) {
                self.groups.push(*group);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty() && self.groups.is_empty()
    }
}

/// One (feature, action) entry of the matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRule {
    pub feature: Feature,
    pub action: Action,
    #[serde(flatten)]
    pub audience: Audience,
}

impl PermissionRule {
    pub fn new(feature: Feature, action: Action, roles: &[Role], groups: &[RoleGroup]) -> Self {
        Self {
            feature,
            action,
            audience: Audience::new(roles, groups),
        }
    }
}

/// Which part of an allow-list granted access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantSource {
    /// The bypass role
    Bypass,
    /// The role is listed literally
    Literal,
    /// The role is a member of this referenced group
    Group(RoleGroup),
}

/// Permission check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionCheck {
    /// Whether permission is granted
    pub granted: bool,
    /// What granted the permission
    pub granted_by: Option<GrantSource>,
    /// Reason for denial (if not granted)
    pub denial_reason: Option<String>,
}

/// Every action a feature exposes, mapped to the grant for one role
pub type ActionMap = BTreeMap<Action, bool>;
