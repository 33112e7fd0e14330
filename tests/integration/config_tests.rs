//! Configuration integration tests
//!
//! Loads configuration files from disk and boots a portal from them.

#[cfg(test)]
mod tests {
    use crate::common::{ScriptedAuth, UserFactory};
    use chargedesk::config::StorageBackend;
    use chargedesk::{
        Action, Feature, Portal, PortalConfig, PortalError, Role, RouteDecision, SessionState,
    };
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        tokio::fs::write(&path, content).await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_portal_from_config_file() {
        let dir = TempDir::new().unwrap();
        let rules = write(
            &dir,
            "rules.yaml",
            "- feature: reports\n  action: export\n  roles: [CASHIER]\n",
        )
        .await;
        let menu = write(
            &dir,
            "menu.yaml",
            "- path: /home\n  label: Home\n  roles: ALL\n- path: /money\n  label: Money\n  roles: [FINANCIAL_VIEWERS]\n",
        )
        .await;
        let config = format!(
            "storage:\n  backend: file\n  directory: {:?}\naccess:\n  permissions_file: {:?}\n  menu_file: {:?}\n",
            dir.path().join("records"),
            rules,
            menu
        );
        let config_path = write(&dir, "chargedesk.yaml", &config).await;

        let config = PortalConfig::from_file(&config_path).await.unwrap();
        assert_eq!(config.storage.backend, StorageBackend::File);

        let cashier = UserFactory::with_role(Role::Cashier);
        let auth = Arc::new(ScriptedAuth::with_users([cashier.clone()]));
        let portal = Portal::bootstrap(config, auth).await.unwrap();

        portal
            .session()
            .login(&UserFactory::credentials(&cashier))
            .await
            .unwrap();

        let access = portal.access();
        assert!(access.can(Feature::Reports, Action::Export));
        assert_eq!(access.guard_route("/money"), RouteDecision::NotAuthorized);
        assert_eq!(access.guard_route("/home"), RouteDecision::Allow);
        assert_eq!(access.visible_menu().len(), 1);

        portal.signals().credentials_expired();
        for _ in 0..200 {
            if portal.session().state() == SessionState::LoggedOut {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        assert_eq!(portal.session().state(), SessionState::LoggedOut);
        portal.shutdown();
    }

    #[tokio::test]
    async fn test_broken_menu_file_fails_bootstrap() {
        let dir = TempDir::new().unwrap();
        let menu = write(&dir, "menu.yaml", "- path: /home\n  roles: SOMEONE\n").await;

        let mut config = PortalConfig::default();
        config.access.menu_file = Some(menu);

        let result = Portal::bootstrap(config, Arc::new(ScriptedAuth::default())).await;
        assert!(matches!(result, Err(PortalError::Config(_))));
    }

    #[tokio::test]
    async fn test_missing_rules_file_fails_bootstrap() {
        let mut config = PortalConfig::default();
        config.access.permissions_file = Some("/no/such/rules.yaml".into());

        let result = Portal::bootstrap(config, Arc::new(ScriptedAuth::default())).await;
        assert!(matches!(result, Err(PortalError::Config(_))));
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.yaml", "session:\n  signals:\n    capacity: 0\n").await;
        assert!(PortalConfig::from_file(&path).await.is_err());
    }
}
