//! Session store: identity, impersonation and login lifecycle

use super::avatar::AvatarGenerator;
use super::service::AuthService;
use super::signals::SessionSignal;
use super::types::{
    AuthUser, Credentials, IdentitySource, ImpersonationOutcome, ImpersonationTarget,
    RestoreReport, Session, SessionState, StopOutcome, UserProfile,
};
use crate::auth::rbac::{Role, RoleCatalog, RoleGroup};
use crate::config::{PortalConfig, StorageKeys};
use crate::storage::{KeyValueStore, LoadOutcome, load_json, load_string, store_json};
use crate::utils::error::Result;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Group whose members may impersonate other users
pub const IMPERSONATION_GROUP: RoleGroup = RoleGroup::PlatformAdmins;

/// Owns the current identity and its persisted copy
pub struct SessionStore {
    session: RwLock<Session>,
    storage: Arc<dyn KeyValueStore>,
    auth: Arc<dyn AuthService>,
    catalog: RoleCatalog,
    keys: StorageKeys,
    avatars: AvatarGenerator,
    restore_report: RestoreReport,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &*self.session.read())
            .field("keys", &self.keys)
            .finish()
    }
}

impl SessionStore {
    /// Create a store and restore any persisted session
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        auth: Arc<dyn AuthService>,
        catalog: RoleCatalog,
        keys: StorageKeys,
        avatars: AvatarGenerator,
    ) -> Self {
        let mut store = Self {
            session: RwLock::new(Session::default()),
            storage,
            auth,
            catalog,
            keys,
            avatars,
            restore_report: RestoreReport::default(),
        };
        store.restore();
        store
    }

    /// Create a store using the keys and avatar settings from configuration
    pub fn from_config(
        config: &PortalConfig,
        storage: Arc<dyn KeyValueStore>,
        auth: Arc<dyn AuthService>,
    ) -> Self {
        Self::new(
            storage,
            auth,
            RoleCatalog::global().clone(),
            config.storage.keys.clone(),
            AvatarGenerator::new(&config.session.avatar),
        )
    }

    // ==================== Reads ====================

    /// Copy of the whole session record
    pub fn snapshot(&self) -> Session {
        self.session.read().clone()
    }

    pub fn state(&self) -> SessionState {
        self.session.read().state()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.session.read().user.clone()
    }

    pub fn impersonator(&self) -> Option<UserProfile> {
        self.session.read().impersonator.clone()
    }

    pub fn impersonation_return_path(&self) -> Option<String> {
        self.session.read().impersonation_return_path.clone()
    }

    /// Role every permission check should use: the target's while impersonating
    pub fn effective_role(&self) -> Option<Role> {
        self.session.read().user.as_ref().map(|user| user.role)
    }

    pub fn is_loading(&self) -> bool {
        self.session.read().is_loading
    }

    pub fn is_impersonating(&self) -> bool {
        self.session.read().impersonator.is_some()
    }

    /// Whether the current identity may start impersonating
    pub fn can_impersonate(&self) -> bool {
        let session = self.session.read();
        session.impersonator.is_none()
            && session
                .user
                .as_ref()
                .is_some_and(|user| self.catalog.is_in_group(user.role, IMPERSONATION_GROUP))
    }

    /// Outcome of the startup restore
    pub fn restore_report(&self) -> &RestoreReport {
        &self.restore_report
    }

    // ==================== Transitions ====================

    /// Authenticate through the auth service and become `LoggedIn`.
    ///
    /// Authentication errors are returned unchanged after `is_loading` is
    /// reset. Overlapping calls are not rejected.
    pub async fn login(&self, credentials: &Credentials) -> Result<UserProfile> {
        self.session.write().is_loading = true;

        let response = match self.auth.login(credentials).await {
            Ok(response) => response,
            Err(e) => {
                self.session.write().is_loading = false;
                warn!("Login failed: {}", e);
                return Err(e);
            }
        };

        let profile = self.profile_from_auth_user(response.user);
        self.persist_profile(&self.keys.session, &profile);
        self.remove_key(&self.keys.impersonator);
        self.remove_key(&self.keys.return_path);

        {
            let mut session = self.session.write();
            session.user = Some(profile.clone());
            session.impersonator = None;
            session.impersonation_return_path = None;
            session.is_loading = false;
        }

        info!("User {} logged in as {}", profile.id, profile.role);
        Ok(profile)
    }

    /// Act as `target` until [`SessionStore::stop_impersonation`].
    ///
    /// Only a logged-in member of the platform-admin group may start, and only
    /// when not already impersonating. In every other case the session is left
    /// as it was.
    pub fn start_impersonation(
        &self,
        target: ImpersonationTarget,
        return_path: impl Into<String>,
    ) -> ImpersonationOutcome {
        let mut session = self.session.write();

        let Some(current) = session.user.clone() else {
            debug!("Impersonation ignored: nobody is logged in");
            return ImpersonationOutcome::NotLoggedIn;
        };
        if session.impersonator.is_some() {
            debug!("Impersonation ignored: already impersonating");
            return ImpersonationOutcome::AlreadyImpersonating;
        }
        if !self.catalog.is_in_group(current.role, IMPERSONATION_GROUP) {
            warn!(
                "Impersonation refused for user {} with role {}",
                current.id, current.role
            );
            return ImpersonationOutcome::NotPermitted;
        }

        let return_path = return_path.into();
        let profile = self.profile_from_target(target);

        self.persist_profile(&self.keys.impersonator, &current);
        self.persist_profile(&self.keys.session, &profile);
        self.persist_string(&self.keys.return_path, &return_path);

        info!(
            "User {} started impersonating {} ({})",
            current.id, profile.id, profile.role
        );

        session.impersonator = Some(current);
        session.user = Some(profile);
        session.impersonation_return_path = Some(return_path);
        ImpersonationOutcome::Started
    }

    /// Restore the original identity. No-op when not impersonating.
    pub fn stop_impersonation(&self) -> StopOutcome {
        let mut session = self.session.write();

        let Some(original) = session.impersonator.take() else {
            return StopOutcome::NotImpersonating;
        };
        let return_path = session.impersonation_return_path.take();

        self.persist_profile(&self.keys.session, &original);
        self.remove_key(&self.keys.impersonator);
        self.remove_key(&self.keys.return_path);

        info!("User {} stopped impersonating", original.id);
        session.user = Some(original);
        StopOutcome::Restored { return_path }
    }

    /// End the session and remove every persisted identity record.
    /// Auth service failures are logged and ignored.
    pub async fn logout(&self) {
        if let Err(e) = self.auth.logout().await {
            warn!("Auth service logout failed, clearing local session anyway: {}", e);
        }
        self.clear();
    }

    /// React to the backend rejecting credentials. Idempotent.
    pub async fn handle_credentials_expired(&self) {
        if self.state() == SessionState::LoggedOut {
            debug!("Credentials expired while logged out; nothing to do");
            return;
        }
        warn!("Credentials expired, forcing logout");
        self.logout().await;
    }

    /// Re-read the persisted identity into memory without calling the backend.
    ///
    /// Keeps the in-memory identity when nothing usable is persisted.
    /// Does nothing while logged out.
    pub fn refresh_user(&self) -> Option<UserProfile> {
        let mut session = self.session.write();
        if session.user.is_none() {
            return None;
        }

        let refreshed = if session.impersonator.is_some() {
            load_json::<UserProfile>(self.storage.as_ref(), &self.keys.session).into_option()
        } else {
            self.read_identity().0.map(|(profile, _)| profile)
        };

        if let Some(profile) = refreshed {
            debug!("Refreshed user {} from storage", profile.id);
            session.user = Some(profile);
        }
        session.user.clone()
    }

    /// Listen for [`SessionSignal::CredentialsExpired`] until the bus closes
    pub fn spawn_expiry_listener(
        self: Arc<Self>,
        mut signals: broadcast::Receiver<SessionSignal>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match signals.recv().await {
                    Ok(SessionSignal::CredentialsExpired) => {
                        self.handle_credentials_expired().await;
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        // Every signal on the bus is an expiry, so a gap still means expiry
                        debug!("Session listener lagged by {} signals", missed);
                        self.handle_credentials_expired().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("Session signal bus closed, listener exiting");
                        break;
                    }
                }
            }
        })
    }

    // ==================== Internals ====================

    fn clear(&self) {
        for key in self.keys.owned() {
            self.remove_key(key);
        }
        // restore() treats the API client record as an identity
        self.remove_key(&self.keys.auth_user);

        let mut session = self.session.write();
        let previous = session.impersonator.as_ref().or(session.user.as_ref());
        if let Some(user) = previous {
            info!("User {} logged out", user.id);
        }
        *session = Session::default();
    }

    /// Startup restore. Corrupt or unreadable records count as absent.
    fn restore(&mut self) {
        let mut report = RestoreReport::default();

        let impersonator = self.load_profile(&self.keys.impersonator, &mut report);
        let session_record = self.load_profile(&self.keys.session, &mut report);

        let restored = match (impersonator, session_record) {
            (Some(impersonator), Some(target)) => {
                let return_path = match load_string(self.storage.as_ref(), &self.keys.return_path)
                {
                    LoadOutcome::Found(path) => Some(path),
                    LoadOutcome::Unreadable(_) => {
                        report.unreadable_keys.push(self.keys.return_path.clone());
                        None
                    }
                    _ => None,
                };
                Some((
                    Session {
                        user: Some(target),
                        impersonator: Some(impersonator),
                        impersonation_return_path: return_path,
                        is_loading: false,
                    },
                    IdentitySource::Impersonation,
                ))
            }
            (_, session_record) => {
                let (external, mut external_report) = self.read_external();
                report.corrupt_keys.append(&mut external_report.corrupt_keys);
                report
                    .unreadable_keys
                    .append(&mut external_report.unreadable_keys);

                external
                    .map(|profile| (profile, IdentitySource::External))
                    .or_else(|| session_record.map(|profile| (profile, IdentitySource::Session)))
                    .map(|(profile, source)| {
                        (
                            Session {
                                user: Some(profile),
                                ..Session::default()
                            },
                            source,
                        )
                    })
            }
        };

        if let Some((session, source)) = restored {
            if let Some(user) = &session.user {
                info!("Restored session for user {} from {:?}", user.id, source);
            }
            report.source = Some(source);
            *self.session.get_mut() = session;
        }

        self.restore_report = report;
    }

    /// Identity by precedence: external record first, then the session record
    fn read_identity(&self) -> (Option<(UserProfile, IdentitySource)>, RestoreReport) {
        let (external, mut report) = self.read_external();
        if let Some(profile) = external {
            return (Some((profile, IdentitySource::External)), report);
        }

        let session_record = self.load_profile(&self.keys.session, &mut report);
        (
            session_record.map(|profile| (profile, IdentitySource::Session)),
            report,
        )
    }

    fn read_external(&self) -> (Option<UserProfile>, RestoreReport) {
        let mut report = RestoreReport::default();
        let external = match load_json::<AuthUser>(self.storage.as_ref(), &self.keys.auth_user) {
            LoadOutcome::Found(user) => Some(self.profile_from_auth_user(user)),
            LoadOutcome::Corrupt(_) => {
                report.corrupt_keys.push(self.keys.auth_user.clone());
                None
            }
            LoadOutcome::Unreadable(_) => {
                report.unreadable_keys.push(self.keys.auth_user.clone());
                None
            }
            LoadOutcome::Empty => None,
        };
        (external, report)
    }

    fn load_profile(&self, key: &str, report: &mut RestoreReport) -> Option<UserProfile> {
        match load_json::<UserProfile>(self.storage.as_ref(), key) {
            LoadOutcome::Found(profile) => Some(profile),
            LoadOutcome::Corrupt(_) => {
                report.corrupt_keys.push(key.to_string());
                None
            }
            LoadOutcome::Unreadable(_) => {
                report.unreadable_keys.push(key.to_string());
                None
            }
            LoadOutcome::Empty => None,
        }
    }

    fn profile_from_auth_user(&self, user: AuthUser) -> UserProfile {
        let avatar_url = self.avatars.for_identity(user.email.as_deref(), &user.name);
        UserProfile {
            id: user.id,
            name: user.name,
            role: user.role,
            owner_capability: None,
            avatar_url: Some(avatar_url),
            email: user.email,
        }
    }

    fn profile_from_target(&self, target: ImpersonationTarget) -> UserProfile {
        let avatar_url = target
            .avatar_url
            .unwrap_or_else(|| self.avatars.for_identity(target.email.as_deref(), &target.name));
        UserProfile {
            id: target.id,
            name: target.name,
            role: target.role,
            owner_capability: target.owner_capability,
            avatar_url: Some(avatar_url),
            email: target.email,
        }
    }

    // Storage writes never fail a transition

    fn persist_profile(&self, key: &str, profile: &UserProfile) {
        if let Err(e) = store_json(self.storage.as_ref(), key, profile) {
            debug!("Ignoring failed write of {}: {}", key, e);
        }
    }

    fn persist_string(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value) {
            debug!("Ignoring failed write of {}: {}", key, e);
        }
    }

    fn remove_key(&self, key: &str) {
        if let Err(e) = self.storage.remove(key) {
            debug!("Ignoring failed removal of {}: {}", key, e);
        }
    }
}
