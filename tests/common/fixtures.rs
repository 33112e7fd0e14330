//! Test fixtures and data factories
//!
//! Factories build real values with sensible defaults.

use chargedesk::auth::session::{AuthUser, ImpersonationTarget, OwnerCapability};
use chargedesk::{Credentials, Role};

/// Password every factory user logs in with
pub const PASSWORD: &str = "correct horse battery staple";

/// Factory for backend identities
pub struct UserFactory;

impl UserFactory {
    /// User with the given role, id and email derived from the role name
    pub fn with_role(role: Role) -> AuthUser {
        let slug = role.as_str().to_ascii_lowercase().replace('_', "-");
        AuthUser {
            id: format!("user-{}", slug),
            name: format!("Test {}", role),
            role,
            email: Some(format!("{}@chargedesk.test", slug)),
        }
    }

    pub fn platform_admin() -> AuthUser {
        Self::with_role(Role::PlatformAdmin)
    }

    pub fn super_admin() -> AuthUser {
        Self::with_role(Role::SuperAdmin)
    }

    pub fn attendant() -> AuthUser {
        Self::with_role(Role::StationAttendant)
    }

    /// Credentials matching a factory user
    pub fn credentials(user: &AuthUser) -> Credentials {
        Credentials::email(user.email.clone().unwrap_or_default(), PASSWORD)
    }
}

/// Factory for impersonation targets
pub struct TargetFactory;

impl TargetFactory {
    pub fn station_owner() -> ImpersonationTarget {
        ImpersonationTarget {
            owner_capability: Some(OwnerCapability::Charge),
            email: Some("owner@stations.test".to_string()),
            ..ImpersonationTarget::new("owner-1", "Station Owner", Role::StationOwner)
        }
    }

    pub fn cashier() -> ImpersonationTarget {
        ImpersonationTarget::new("cashier-1", "Front Desk", Role::Cashier)
    }
}
