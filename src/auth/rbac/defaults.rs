//! Built-in permission matrix for the portal screens

use super::roles::Role::*;
use super::roles::RoleGroup::*;
use super::types::{Action, Feature, PermissionRule};

/// The matrix shipped with the portal
#[rustfmt::skip]
pub fn default_rules() -> Vec<PermissionRule> {
    use Action::*;
    use Feature::*;

    vec![
        // Stations
        PermissionRule::new(Stations, View, &[], &[PlatformOperators, StationManagers, StationStaff, Technicians, SiteOwners]),
        PermissionRule::new(Stations, Create, &[], &[PlatformAdmins, StationOwners]),
        PermissionRule::new(Stations, Edit, &[PlatformOperator], &[PlatformAdmins, StationOwners]),
        PermissionRule::new(Stations, Delete, &[], &[PlatformAdmins]),
        // Sites
        PermissionRule::new(Sites, View, &[], &[PlatformOperators, StationOwners, SiteOwners]),
        PermissionRule::new(Sites, Create, &[], &[PlatformAdmins, SiteOwners]),
        PermissionRule::new(Sites, Edit, &[], &[PlatformAdmins, SiteOwners]),
        PermissionRule::new(Sites, Delete, &[], &[PlatformAdmins]),
        // Charging sessions
        PermissionRule::new(Sessions, View, &[], &[PlatformOperators, StationManagers, StationStaff]),
        PermissionRule::new(Sessions, Cancel, &[StationAttendant], &[PlatformOperators, StationManagers]),
        PermissionRule::new(Sessions, Export, &[PlatformFinance], &[PlatformOperators, StationOwners]),
        // Battery swaps
        PermissionRule::new(Swaps, View, &[], &[PlatformOperators, StationManagers, StationStaff]),
        PermissionRule::new(Swaps, Create, &[StationAttendant], &[StationManagers]),
        PermissionRule::new(Swaps, Cancel, &[], &[PlatformOperators, StationManagers]),
        // Billing
        PermissionRule::new(Billing, View, &[Cashier], &[FinancialViewers]),
        PermissionRule::new(Billing, Export, &[], &[FinancialViewers]),
        PermissionRule::new(Billing, Refund, &[PlatformFinance, PlatformSupport], &[PlatformAdmins]),
        PermissionRule::new(Billing, Approve, &[PlatformFinance], &[PlatformAdmins]),
        // Tariffs
        PermissionRule::new(Tariffs, View, &[], &[PlatformOperators, FinancialViewers, StationManagers]),
        PermissionRule::new(Tariffs, Edit, &[], &[PlatformAdmins, StationOwners]),
        PermissionRule::new(Tariffs, Approve, &[], &[PlatformAdmins]),
        // Incidents
        PermissionRule::new(Incidents, View, &[], &[PlatformOperators, StationManagers, StationStaff, Technicians]),
        PermissionRule::new(Incidents, Create, &[], &[PlatformOperators, StationManagers, StationStaff]),
        PermissionRule::new(Incidents, Assign, &[], &[PlatformOperators, StationManagers]),
        PermissionRule::new(Incidents, Resolve, &[], &[PlatformOperators, StationManagers, Technicians]),
        // Technician dispatches
        PermissionRule::new(Dispatches, View, &[], &[PlatformOperators, StationManagers, Technicians]),
        PermissionRule::new(Dispatches, Create, &[], &[PlatformOperators, StationManagers]),
        PermissionRule::new(Dispatches, Assign, &[], &[PlatformOperators, StationManagers]),
        PermissionRule::new(Dispatches, Resolve, &[], &[Technicians]),
        PermissionRule::new(Dispatches, Cancel, &[], &[PlatformAdmins, StationOwners]),
        // Team roster
        PermissionRule::new(Team, View, &[], &[PlatformOperators, StationManagers, SiteOwners]),
        PermissionRule::new(Team, Invite, &[], &[PlatformAdmins, StationManagers, SiteOwners]),
        PermissionRule::new(Team, Edit, &[], &[PlatformAdmins, StationOwners, SiteOwners]),
        PermissionRule::new(Team, Delete, &[], &[PlatformAdmins, StationOwners]),
        // Platform users
        PermissionRule::new(Users, View, &[PlatformSupport], &[PlatformAdmins]),
        PermissionRule::new(Users, Create, &[], &[PlatformAdmins]),
        PermissionRule::new(Users, Edit, &[], &[PlatformAdmins]),
        PermissionRule::new(Users, Delete, &[], &[PlatformAdmins]),
        PermissionRule::new(Users, Impersonate, &[], &[PlatformAdmins]),
        // Reports
        PermissionRule::new(Reports, View, &[], &[PlatformOperators, FinancialViewers, StationManagers]),
        PermissionRule::new(Reports, Export, &[], &[PlatformOperators, FinancialViewers]),
        // Settings
        PermissionRule::new(Settings, View, &[], &[PlatformAdmins, StationOwners]),
        PermissionRule::new(Settings, Edit, &[], &[PlatformAdmins]),
    ]
}
