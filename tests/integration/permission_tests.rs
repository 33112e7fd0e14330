//! Permission matrix integration tests
//!
//! Checks the built-in matrix against the role catalog and the layering of
//! extra rules.

#[cfg(test)]
mod tests {
    use chargedesk::{
        Action, Audience, Feature, GrantSource, PermissionMatrix, PermissionRule, Role,
        RoleCatalog, RoleGroup,
    };

    // ==================== Catalog ====================

    /// Every non-bypass role belongs to at least one group
    #[test]
    fn test_catalog_has_no_orphans() {
        let catalog = RoleCatalog::global();
        assert!(catalog.orphaned_roles().is_empty());
        assert!(catalog.validate().is_ok());
    }

    /// Every role can do something somewhere
    #[test]
    fn test_every_role_reaches_a_feature() {
        let matrix = PermissionMatrix::default();
        for role in Role::ALL {
            assert!(
                Feature::ALL
                    .into_iter()
                    .any(|feature| matrix.can_reach(role, feature)),
                "{} cannot reach any feature",
                role
            );
        }
    }

    // ==================== Bypass & default deny ====================

    #[test]
    fn test_bypass_role_has_every_permission() {
        let matrix = PermissionMatrix::default();
        for feature in Feature::ALL {
            for action in Action::ALL {
                assert!(matrix.has_permission(Role::SuperAdmin, feature, action));
            }
        }
    }

    /// An empty matrix denies everything except the bypass role
    #[test]
    fn test_empty_matrix_denies() {
        let matrix = PermissionMatrix::from_rules(RoleCatalog::new(), Vec::new());
        for role in Role::ALL.into_iter().filter(|role| !role.is_bypass()) {
            assert!(!matrix.has_permission(role, Feature::Stations, Action::View));
        }
        assert!(matrix.has_permission(Role::SuperAdmin, Feature::Stations, Action::View));
    }

    // ==================== Scenarios ====================

    #[test]
    fn test_station_manager_assigns_dispatches_via_group() {
        let matrix = PermissionMatrix::default();
        let check = matrix.check(Role::StationManager, Feature::Dispatches, Action::Assign);
        assert!(check.granted);
        assert_eq!(
            check.granted_by,
            Some(GrantSource::Group(RoleGroup::StationManagers))
        );
    }

    #[test]
    fn test_cashier_cannot_delete_users() {
        let matrix = PermissionMatrix::default();
        let check = matrix.check(Role::Cashier, Feature::Users, Action::Delete);
        assert!(!check.granted);
        assert!(check.granted_by.is_none());
        assert_eq!(
            check.denial_reason.as_deref(),
            Some("CASHIER may not delete users")
        );
    }

    #[test]
    fn test_only_admin_group_may_impersonate() {
        let matrix = PermissionMatrix::default();
        let catalog = RoleCatalog::global();
        for role in Role::ALL {
            let expected =
                role.is_bypass() || catalog.is_in_group(role, RoleGroup::PlatformAdmins);
            assert_eq!(
                matrix.has_permission(role, Feature::Users, Action::Impersonate),
                expected,
                "impersonate grant for {}",
                role
            );
        }
    }

    /// Group membership implies every grant the group carries
    #[test]
    fn test_group_grants_reach_all_members() {
        let matrix = PermissionMatrix::default();
        let catalog = RoleCatalog::global();

        for feature in Feature::ALL {
            for action in Action::ALL {
                let Some(audience) = matrix.audience(feature, action) else {
                    continue;
                };
                for group in &audience.groups {
                    for role in catalog.roles_in_group(*group).iter() {
                        assert!(matrix.has_permission(role, feature, action));
                    }
                }
            }
        }
    }

    #[test]
    fn test_permissions_for_lists_every_action() {
        let matrix = PermissionMatrix::default();
        let actions = matrix.permissions_for(Role::StationAttendant, Feature::Sessions);
        assert_eq!(
            actions.keys().copied().collect::<Vec<_>>(),
            matrix.actions_of(Feature::Sessions)
        );
        assert_eq!(actions.get(&Action::View), Some(&true));
    }

    // ==================== Layered rules ====================

    #[test]
    fn test_extra_rules_only_add() {
        let mut matrix = PermissionMatrix::default();
        let before: Vec<bool> = Role::ALL
            .into_iter()
            .map(|role| matrix.has_permission(role, Feature::Reports, Action::Export))
            .collect();

        matrix.extend(vec![PermissionRule {
            feature: Feature::Reports,
            action: Action::Export,
            audience: Audience::roles(&[Role::Cashier]),
        }]);

        for (role, was_granted) in Role::ALL.into_iter().zip(before) {
            let now = matrix.has_permission(role, Feature::Reports, Action::Export);
            if was_granted {
                assert!(now, "{} lost a grant", role);
            }
        }
        assert!(matrix.has_permission(Role::Cashier, Feature::Reports, Action::Export));
    }

    #[test]
    fn test_rules_from_yaml() {
        let yaml = r#"
- feature: tariffs
  action: approve
  groups: [STATION_OWNERS]
- feature: swaps
  action: refund
  roles: [CASHIER]
  groups: [PLATFORM_OPERATORS]
"#;
        let rules: Vec<PermissionRule> = serde_yaml::from_str(yaml).unwrap();
        let matrix = PermissionMatrix::from_rules(RoleCatalog::new(), rules);

        assert!(matrix.has_permission(Role::StationOperator, Feature::Tariffs, Action::Approve));
        assert!(!matrix.has_permission(Role::StationManager, Feature::Tariffs, Action::Approve));
        assert!(matrix.has_permission(Role::Cashier, Feature::Swaps, Action::Refund));
        assert!(matrix.has_permission(Role::PlatformSupport, Feature::Swaps, Action::Refund));
    }
}
