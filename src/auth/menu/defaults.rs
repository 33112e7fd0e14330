//! Built-in navigation menu

use super::types::{MenuAccess, MenuItem};
use crate::auth::rbac::{Audience, Role};
use crate::auth::rbac::RoleGroup::*;

/// The menu shipped with the portal
#[rustfmt::skip]
pub fn default_menu() -> Vec<MenuItem> {
    vec![
        MenuItem::new("/dashboard", "Dashboard", MenuAccess::All).with_icon("gauge"),
        MenuItem::new(
            "/stations",
            "Stations",
            MenuAccess::groups(&[PlatformOperators, StationManagers, StationStaff, Technicians, SiteOwners]),
        )
        .with_icon("charging-station"),
        MenuItem::new("/sites", "Sites", MenuAccess::groups(&[PlatformOperators, StationOwners, SiteOwners]))
            .with_icon("map-pin"),
        MenuItem::new("/sessions", "Sessions", MenuAccess::groups(&[PlatformOperators, StationManagers, StationStaff]))
            .with_icon("plug"),
        MenuItem::new("/swaps", "Battery swaps", MenuAccess::groups(&[PlatformOperators, StationManagers, StationStaff]))
            .with_icon("battery"),
        MenuItem::new(
            "/billing",
            "Billing",
            MenuAccess::Only(Audience::new(&[Role::Cashier], &[FinancialViewers])),
        )
        .with_icon("receipt")
        .with_divider(),
        MenuItem::new("/tariffs", "Tariffs", MenuAccess::groups(&[PlatformOperators, FinancialViewers, StationManagers]))
            .with_icon("tag"),
        MenuItem::new(
            "/incidents",
            "Incidents",
            MenuAccess::groups(&[PlatformOperators, StationManagers, StationStaff, Technicians]),
        )
        .with_icon("alert-triangle")
        .with_children(vec![
            MenuItem::new(
                "/incidents/dispatches",
                "Dispatches",
                MenuAccess::groups(&[PlatformOperators, StationManagers, Technicians]),
            ),
            MenuItem::new("/incidents/escalations", "Escalations", MenuAccess::groups(&[PlatformOperators])),
        ]),
        MenuItem::new("/team", "Team", MenuAccess::groups(&[PlatformOperators, StationManagers, SiteOwners]))
            .with_icon("users")
            .with_divider(),
        MenuItem::new("/users", "Users", MenuAccess::Only(Audience::new(&[Role::PlatformSupport], &[PlatformAdmins])))
            .with_icon("user-cog"),
        MenuItem::new("/reports", "Reports", MenuAccess::groups(&[PlatformOperators, FinancialViewers, StationManagers]))
            .with_icon("bar-chart"),
        MenuItem::new("/audit", "Audit log", MenuAccess::roles(&[Role::PlatformAdmin]))
            .with_icon("scroll")
            .with_badge("beta"),
        MenuItem::new("/settings", "Settings", MenuAccess::groups(&[PlatformAdmins, StationOwners]))
            .with_icon("settings")
            .with_divider(),
        MenuItem::new("/profile", "Profile", MenuAccess::All).with_icon("user"),
    ]
}
