//! Role taxonomy and group membership

use crate::utils::error::{PortalError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Job-function tag carried by every actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Platform owner; bypasses every permission and menu check
    SuperAdmin,
    /// Platform administrator
    PlatformAdmin,
    /// Network operations staff
    PlatformOperator,
    /// Platform finance staff
    PlatformFinance,
    /// Customer support agents
    PlatformSupport,
    /// Owner of one or more charging/swap stations
    StationOwner,
    /// Operator contracted by a station owner
    StationOperator,
    /// On-site manager of a station
    StationManager,
    /// Front-desk station attendant
    StationAttendant,
    /// Station cashier
    Cashier,
    /// Owner of a host site (car park, mall)
    SiteOwner,
    /// Technician employed by an organization
    TechnicianOrg,
    /// Freelance technician from the public marketplace
    TechnicianPublic,
}

impl Role {
    /// Every role, in declaration order
    pub const ALL: [Role; 13] = [
        Role::SuperAdmin,
        Role::PlatformAdmin,
        Role::PlatformOperator,
        Role::PlatformFinance,
        Role::PlatformSupport,
        Role::StationOwner,
        Role::StationOperator,
        Role::StationManager,
        Role::StationAttendant,
        Role::Cashier,
        Role::SiteOwner,
        Role::TechnicianOrg,
        Role::TechnicianPublic,
    ];

    /// The distinguished bypass role
    pub const BYPASS: Role = Role::SuperAdmin;

    /// Whether this is the bypass role
    pub fn is_bypass(self) -> bool {
        self == Self::BYPASS
    }

    /// Canonical wire name
    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::PlatformAdmin => "PLATFORM_ADMIN",
            Role::PlatformOperator => "PLATFORM_OPERATOR",
            Role::PlatformFinance => "PLATFORM_FINANCE",
            Role::PlatformSupport => "PLATFORM_SUPPORT",
            Role::StationOwner => "STATION_OWNER",
            Role::StationOperator => "STATION_OPERATOR",
            Role::StationManager => "STATION_MANAGER",
            Role::StationAttendant => "STATION_ATTENDANT",
            Role::Cashier => "CASHIER",
            Role::SiteOwner => "SITE_OWNER",
            Role::TechnicianOrg => "TECHNICIAN_ORG",
            Role::TechnicianPublic => "TECHNICIAN_PUBLIC",
        }
    }

    fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase().replace('-', "_");
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == wanted)
            .ok_or_else(|| format!("Invalid role: {}", s))
    }
}

/// Named capability cluster. Groups overlap freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleGroup {
    /// May administer the platform and impersonate users
    PlatformAdmins,
    /// Platform-side staff running day-to-day operations
    PlatformOperators,
    /// Roles allowed to see revenue and payouts
    FinancialViewers,
    /// Commercial owners of station assets
    StationOwners,
    /// Roles managing a station's staff and dispatches
    StationManagers,
    /// Everyone working at a station
    StationStaff,
    /// Maintenance technicians
    Technicians,
    /// Host-site owners
    SiteOwners,
}

impl RoleGroup {
    /// Number of groups
    pub const COUNT: usize = 8;

    /// Every group, in declaration order
    pub const ALL: [RoleGroup; Self::COUNT] = [
        RoleGroup::PlatformAdmins,
        RoleGroup::PlatformOperators,
        RoleGroup::FinancialViewers,
        RoleGroup::StationOwners,
        RoleGroup::StationManagers,
        RoleGroup::StationStaff,
        RoleGroup::Technicians,
        RoleGroup::SiteOwners,
    ];

    /// Canonical wire name
    pub fn as_str(self) -> &'static str {
        match self {
            RoleGroup::PlatformAdmins => "PLATFORM_ADMINS",
            RoleGroup::PlatformOperators => "PLATFORM_OPERATORS",
            RoleGroup::FinancialViewers => "FINANCIAL_VIEWERS",
            RoleGroup::StationOwners => "STATION_OWNERS",
            RoleGroup::StationManagers => "STATION_MANAGERS",
            RoleGroup::StationStaff => "STATION_STAFF",
            RoleGroup::Technicians => "TECHNICIANS",
            RoleGroup::SiteOwners => "SITE_OWNERS",
        }
    }

    /// Declared members of this group
    pub fn members(self) -> &'static [Role] {
        match self {
            RoleGroup::PlatformAdmins => &[Role::SuperAdmin, Role::PlatformAdmin],
            RoleGroup::PlatformOperators => &[
                Role::SuperAdmin,
                Role::PlatformAdmin,
                Role::PlatformOperator,
                Role::PlatformSupport,
            ],
            RoleGroup::FinancialViewers => &[
                Role::SuperAdmin,
                Role::PlatformAdmin,
                Role::PlatformFinance,
                Role::StationOwner,
                Role::SiteOwner,
            ],
            RoleGroup::StationOwners => &[Role::StationOwner, Role::StationOperator],
            RoleGroup::StationManagers => &[
                Role::StationOwner,
                Role::StationOperator,
                Role::StationManager,
            ],
            RoleGroup::StationStaff => &[
                Role::StationManager,
                Role::StationAttendant,
                Role::Cashier,
            ],
            RoleGroup::Technicians => &[Role::TechnicianOrg, Role::TechnicianPublic],
            RoleGroup::SiteOwners => &[Role::SiteOwner],
        }
    }
}

impl fmt::Display for RoleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for RoleGroup {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase().replace('-', "_");
        RoleGroup::ALL
            .into_iter()
            .find(|group| group.as_str() == wanted)
            .ok_or_else(|| format!("Invalid role group: {}", s))
    }
}

/// Bitset of roles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RoleSet(u32);

impl RoleSet {
    /// The empty set
    pub const EMPTY: RoleSet = RoleSet(0);

    pub fn contains(self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    pub fn insert(&mut self, role: Role) {
        self.0 |= role.bit();
    }

    pub fn union(self, other: RoleSet) -> RoleSet {
        RoleSet(self.0 | other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in declaration order
    pub fn iter(self) -> impl Iterator<Item = Role> {
        Role::ALL.into_iter().filter(move |role| self.contains(*role))
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        let mut set = RoleSet::EMPTY;
        for role in iter {
            set.insert(role);
        }
        set
    }
}

/// Precomputed group membership
#[derive(Debug, Clone)]
pub struct RoleCatalog {
    groups: [RoleSet; RoleGroup::COUNT],
}

impl Default for RoleCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleCatalog {
    /// Build the catalog from the declared group members
    pub fn new() -> Self {
        let mut groups = [RoleSet::EMPTY; RoleGroup::COUNT];
        for group in RoleGroup::ALL {
            groups[group as usize] = group.members().iter().copied().collect();
        }
        Self { groups }
    }

    /// Process-wide catalog, computed once
    pub fn global() -> &'static RoleCatalog {
        static CATALOG: once_cell::sync::Lazy<RoleCatalog> =
            once_cell::sync::Lazy::new(RoleCatalog::new);
        &CATALOG
    }

    pub fn roles_in_group(&self, group: RoleGroup) -> RoleSet {
        self.groups[group as usize]
    }

    pub fn is_in_group(&self, role: Role, group: RoleGroup) -> bool {
        self.roles_in_group(group).contains(role)
    }

    /// Whether the role belongs to at least one of the given groups
    pub fn is_in_any(&self, role: Role, groups: &[RoleGroup]) -> bool {
        groups.iter().any(|group| self.is_in_group(role, *group))
    }

    /// Groups the role belongs to, in declaration order
    pub fn groups_of(&self, role: Role) -> Vec<RoleGroup> {
        RoleGroup::ALL
            .into_iter()
            .filter(|group| self.is_in_group(role, *group))
            .collect()
    }

    /// Roles that belong to no group. The bypass role is exempt.
    pub fn orphaned_roles(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| !role.is_bypass() && self.groups_of(*role).is_empty())
            .collect()
    }

    /// Completeness check run at startup and in tests
    pub fn validate(&self) -> Result<()> {
        let orphans = self.orphaned_roles();
        if orphans.is_empty() {
            return Ok(());
        }

        let names: Vec<&str> = orphans.iter().map(|role| role.as_str()).collect();
        Err(PortalError::config(format!(
            "Roles without any group: {}",
            names.join(", ")
        )))
    }
}
