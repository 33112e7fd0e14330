//! # ChargeDesk
//!
//! Authorization and session-scope engine for an EV-charging operations
//! portal.
//!
//! ## Features
//!
//! - **Role catalog**: a closed set of roles grouped into overlapping,
//!   precomputed capability groups
//! - **Permission matrix**: default-deny, additive allow-lists per feature and
//!   action, with a single bypass role
//! - **Menu visibility**: role-filtered navigation and direct-path guards
//! - **Sessions**: login, logout, forced logout on expired credentials and
//!   one level of admin impersonation, persisted across restarts
//! - **Scope**: region, organisation, station, site and date-range filter
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chargedesk::{Action, Feature, PermissionMatrix, Role};
//!
//! let matrix = PermissionMatrix::default();
//! assert!(matrix.has_permission(Role::StationManager, Feature::Dispatches, Action::Assign));
//! assert!(!matrix.has_permission(Role::Cashier, Feature::Users, Action::Delete));
//! ```
//!
//! ## Wiring a portal
//!
//! ```rust,no_run
//! use chargedesk::{AuthService, Portal, PortalConfig};
//! use std::sync::Arc;
//!
//! async fn start(auth: Arc<dyn AuthService>) -> chargedesk::Result<()> {
//!     let config = PortalConfig::from_file("config/chargedesk.yaml").await?;
//!     let portal = Portal::bootstrap(config, auth).await?;
//!     let _menu = portal.access().visible_menu();
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod auth;
pub mod config;
pub mod scope;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::PortalConfig;
pub use utils::error::{PortalError, Result};

pub use auth::AccessControl;
pub use auth::menu::{MenuAccess, MenuItem, MenuResolver, RouteDecision};
pub use auth::rbac::{
    Action, ActionMap, Audience, Feature, GrantSource, PermissionCheck, PermissionMatrix,
    PermissionRule, Role, RoleCatalog, RoleGroup, RoleSet,
};
pub use auth::session::{
    AuthService, AuthUser, Credentials, ImpersonationOutcome, ImpersonationTarget,
    LoginResponse, SessionSignal, SessionState, SessionStore, SignalBus, StopOutcome,
    UserProfile,
};
pub use scope::{DateRange, Region, Scope, ScopePatch, ScopeStore, Selection};
pub use storage::{FileStore, KeyValueStore, MemoryStore};

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// A fully wired engine: access checks, session, scope and signal bus
pub struct Portal {
    config: PortalConfig,
    access: AccessControl,
    scope: ScopeStore,
    signals: SignalBus,
    listener: JoinHandle<()>,
}

impl Portal {
    /// Build every store from configuration and start the expiry listener.
    ///
    /// Must be called inside a tokio runtime.
    pub async fn bootstrap(config: PortalConfig, auth: Arc<dyn AuthService>) -> Result<Self> {
        info!("Bootstrapping portal engine");

        let catalog = RoleCatalog::global().clone();
        catalog.validate()?;

        let mut permissions = PermissionMatrix::default();
        permissions.extend(config.load_permission_rules().await?);
        let menu = config.load_menu(catalog).await?;

        let storage = storage::open(&config.storage)?;
        let session = Arc::new(SessionStore::from_config(&config, storage, auth));

        let signals = SignalBus::new(config.session.signals.capacity);
        let listener = session.clone().spawn_expiry_listener(signals.subscribe());

        info!("Portal engine ready, session state {:?}", session.state());

        Ok(Self {
            access: AccessControl::new(Arc::new(permissions), Arc::new(menu), session),
            scope: ScopeStore::new(),
            signals,
            listener,
            config,
        })
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    pub fn access(&self) -> &AccessControl {
        &self.access
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        self.access.session()
    }

    pub fn scope(&self) -> &ScopeStore {
        &self.scope
    }

    /// Bus the API client raises expired-credential signals on
    pub fn signals(&self) -> &SignalBus {
        &self.signals
    }

    /// Stop the expiry listener
    pub fn shutdown(self) {
        self.listener.abort();
        info!("Portal engine stopped");
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Engine build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Unix timestamp of the build
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: option_env!("BUILD_TIME").unwrap_or("unknown"),
            git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
            rust_version: option_env!("RUST_VERSION").unwrap_or("unknown"),
        }
    }
}

/// Build
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
