//! Session lifecycle integration tests
//!
//! Drives the session store through a scripted auth backend, with both the
//! in-memory and the file-backed storage.

#[cfg(test)]
mod tests {
    use crate::common::{ScriptedAuth, TargetFactory, UserFactory};
    use crate::{assert_err, assert_ok};
    use chargedesk::auth::session::{AvatarGenerator, IdentitySource};
    use chargedesk::config::StorageKeys;
    use chargedesk::storage::store_json;
    use chargedesk::{
        Credentials, FileStore, ImpersonationOutcome, KeyValueStore, MemoryStore, PortalError,
        RoleCatalog, SessionState, SessionStore, SignalBus, StopOutcome,
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    fn session_over(storage: Arc<dyn KeyValueStore>, auth: Arc<ScriptedAuth>) -> SessionStore {
        SessionStore::new(
            storage,
            auth,
            RoleCatalog::new(),
            StorageKeys::default(),
            AvatarGenerator::default(),
        )
    }

    async fn wait_for_state(store: &SessionStore, state: SessionState) {
        for _ in 0..200 {
            if store.state() == state {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("session never reached {:?}", state);
    }

    // ==================== Login ====================

    #[tokio::test]
    async fn test_login_and_logout() {
        let admin = UserFactory::platform_admin();
        let auth = Arc::new(ScriptedAuth::with_users([admin.clone()]));
        let store = session_over(Arc::new(MemoryStore::new()), auth.clone());

        let profile = assert_ok!(store.login(&UserFactory::credentials(&admin)).await);
        assert_eq!(profile.id, admin.id);
        assert_eq!(profile.email, admin.email);
        assert_eq!(store.state(), SessionState::LoggedIn);
        assert_eq!(auth.login_calls(), 1);

        store.logout().await;
        assert_eq!(store.state(), SessionState::LoggedOut);
        assert_eq!(auth.logout_calls(), 1);
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let admin = UserFactory::platform_admin();
        let auth = Arc::new(ScriptedAuth::with_users([admin.clone()]));
        let store = session_over(Arc::new(MemoryStore::new()), auth);

        let credentials = Credentials::email(admin.email.clone().unwrap(), "wrong");
        let error = assert_err!(store.login(&credentials).await);
        assert!(error.is_auth_error());
        assert!(!store.is_loading());
        assert_eq!(store.state(), SessionState::LoggedOut);
    }

    #[tokio::test]
    async fn test_relogin_replaces_identity() {
        let admin = UserFactory::platform_admin();
        let attendant = UserFactory::attendant();
        let auth = Arc::new(ScriptedAuth::with_users([admin.clone(), attendant.clone()]));
        let store = session_over(Arc::new(MemoryStore::new()), auth);

        assert_ok!(store.login(&UserFactory::credentials(&admin)).await);
        assert_ok!(store.login(&UserFactory::credentials(&attendant)).await);
        assert_eq!(store.current_user().unwrap().id, attendant.id);
    }

    // ==================== Impersonation ====================

    #[tokio::test]
    async fn test_super_admin_may_impersonate() {
        let root = UserFactory::super_admin();
        let auth = Arc::new(ScriptedAuth::with_users([root.clone()]));
        let store = session_over(Arc::new(MemoryStore::new()), auth);
        assert_ok!(store.login(&UserFactory::credentials(&root)).await);

        assert!(store.can_impersonate());
        assert_eq!(
            store.start_impersonation(TargetFactory::station_owner(), "/stations"),
            ImpersonationOutcome::Started
        );
        assert!(!store.can_impersonate());
    }

    #[tokio::test]
    async fn test_attendant_cannot_impersonate() {
        let attendant = UserFactory::attendant();
        let auth = Arc::new(ScriptedAuth::with_users([attendant.clone()]));
        let store = session_over(Arc::new(MemoryStore::new()), auth);
        assert_ok!(store.login(&UserFactory::credentials(&attendant)).await);
        let before = store.snapshot();

        assert_eq!(
            store.start_impersonation(TargetFactory::station_owner(), "/users"),
            ImpersonationOutcome::NotPermitted
        );
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn test_forced_logout_while_impersonating() {
        let admin = UserFactory::platform_admin();
        let auth = Arc::new(ScriptedAuth::with_users([admin.clone()]));
        let storage = Arc::new(MemoryStore::new());
        let store = Arc::new(session_over(storage.clone(), auth.clone()));
        assert_ok!(store.login(&UserFactory::credentials(&admin)).await);
        store.start_impersonation(TargetFactory::station_owner(), "/x");

        let bus = SignalBus::new(8);
        let listener = store.clone().spawn_expiry_listener(bus.subscribe());
        bus.credentials_expired();
        wait_for_state(&store, SessionState::LoggedOut).await;

        let session = store.snapshot();
        assert!(session.user.is_none());
        assert!(session.impersonator.is_none());
        assert!(session.impersonation_return_path.is_none());
        assert!(storage.is_empty());

        // A second expiry is a no-op
        bus.credentials_expired();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(auth.logout_calls(), 1);

        listener.abort();
    }

    #[tokio::test]
    async fn test_logout_failure_still_clears() {
        let admin = UserFactory::platform_admin();
        let auth = Arc::new(ScriptedAuth::with_users([admin.clone()]));
        auth.fail_logouts();
        let store = session_over(Arc::new(MemoryStore::new()), auth);

        assert_ok!(store.login(&UserFactory::credentials(&admin)).await);
        store.logout().await;
        assert_eq!(store.state(), SessionState::LoggedOut);
    }

    // ==================== Persistence ====================

    #[tokio::test]
    async fn test_session_survives_restart() {
        let dir = TempDir::new().unwrap();
        let admin = UserFactory::platform_admin();
        let auth = Arc::new(ScriptedAuth::with_users([admin.clone()]));

        let first = session_over(Arc::new(FileStore::open(dir.path()).unwrap()), auth.clone());
        let profile = assert_ok!(first.login(&UserFactory::credentials(&admin)).await);
        drop(first);

        let second = session_over(Arc::new(FileStore::open(dir.path()).unwrap()), auth);
        assert_eq!(second.current_user(), Some(profile));
        assert_eq!(
            second.restore_report().source,
            Some(IdentitySource::Session)
        );
    }

    #[tokio::test]
    async fn test_impersonation_survives_restart() {
        let dir = TempDir::new().unwrap();
        let admin = UserFactory::platform_admin();
        let auth = Arc::new(ScriptedAuth::with_users([admin.clone()]));

        let first = session_over(Arc::new(FileStore::open(dir.path()).unwrap()), auth.clone());
        assert_ok!(first.login(&UserFactory::credentials(&admin)).await);
        first.start_impersonation(TargetFactory::station_owner(), "/stations/7");
        drop(first);

        let second = session_over(Arc::new(FileStore::open(dir.path()).unwrap()), auth);
        assert_eq!(second.state(), SessionState::Impersonating);
        assert_eq!(second.impersonator().unwrap().id, admin.id);
        assert_eq!(
            second.stop_impersonation(),
            StopOutcome::Restored {
                return_path: Some("/stations/7".to_string())
            }
        );
        assert_eq!(second.current_user().unwrap().id, admin.id);
    }

    #[tokio::test]
    async fn test_logout_leaves_nothing_to_restore() {
        let dir = TempDir::new().unwrap();
        let admin = UserFactory::platform_admin();
        let auth = Arc::new(ScriptedAuth::with_users([admin.clone()]));

        let first = session_over(Arc::new(FileStore::open(dir.path()).unwrap()), auth.clone());
        assert_ok!(first.login(&UserFactory::credentials(&admin)).await);
        first.logout().await;
        drop(first);

        let second = session_over(Arc::new(FileStore::open(dir.path()).unwrap()), auth);
        assert_eq!(second.state(), SessionState::LoggedOut);
    }

    #[tokio::test]
    async fn test_forced_logout_with_client_record_stays_logged_out_on_restart() {
        let dir = TempDir::new().unwrap();
        let admin = UserFactory::platform_admin();
        let auth = Arc::new(ScriptedAuth::with_users([admin.clone()]));
        auth.fail_logouts();

        let first = session_over(Arc::new(FileStore::open(dir.path()).unwrap()), auth.clone());
        assert_ok!(first.login(&UserFactory::credentials(&admin)).await);
        let storage = FileStore::open(dir.path()).unwrap();
        store_json(&storage, &StorageKeys::default().auth_user, &admin).unwrap();

        first.handle_credentials_expired().await;
        assert_eq!(first.refresh_user(), None);
        assert_eq!(first.state(), SessionState::LoggedOut);
        drop(first);

        let second = session_over(Arc::new(storage), auth);
        assert_eq!(second.state(), SessionState::LoggedOut);
        assert!(second.restore_report().source.is_none());
    }

    #[test]
    fn test_external_record_wins_on_restart() {
        let dir = TempDir::new().unwrap();
        let storage = FileStore::open(dir.path()).unwrap();
        let keys = StorageKeys::default();
        let admin = UserFactory::platform_admin();
        let attendant = UserFactory::attendant();

        store_json(&storage, &keys.auth_user, &attendant).unwrap();
        store_json(&storage, &keys.session, &admin).unwrap();

        let store = session_over(Arc::new(storage), Arc::new(ScriptedAuth::default()));
        assert_eq!(store.current_user().unwrap().id, attendant.id);
        assert_eq!(
            store.restore_report().source,
            Some(IdentitySource::External)
        );
    }

    #[test]
    fn test_corrupt_file_is_reported_not_fatal() {
        let dir = TempDir::new().unwrap();
        let storage = FileStore::open(dir.path()).unwrap();
        let keys = StorageKeys::default();
        storage.set(&keys.session, "{\"id\":").unwrap();

        let store = session_over(Arc::new(storage), Arc::new(ScriptedAuth::default()));
        assert_eq!(store.state(), SessionState::LoggedOut);
        assert_eq!(store.restore_report().corrupt_keys, vec![keys.session]);
    }

    #[test]
    fn test_storage_errors_are_typed() {
        let error = PortalError::storage("disk full");
        assert!(!error.is_client_error());
        assert!(error.to_string().contains("disk full"));
    }
}
