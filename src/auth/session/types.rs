//! Session type definitions

use crate::auth::rbac::Role;
use serde::{Deserialize, Serialize};

/// What kind of stations an owner runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OwnerCapability {
    Charge,
    Swap,
    Both,
}

/// An actor: the authenticated user or an impersonation target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_capability: Option<OwnerCapability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Identity as returned by the auth backend and persisted by the API client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Admin-supplied description of the user to impersonate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpersonationTarget {
    pub id: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub owner_capability: Option<OwnerCapability>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl ImpersonationTarget {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            owner_capability: None,
            email: None,
            avatar_url: None,
        }
    }
}

/// Login identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginIdentifier {
    Email(String),
    Phone(String),
}

/// Login form input
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(flatten)]
    pub identifier: LoginIdentifier,
    pub password: String,
}

impl Credentials {
    pub fn email(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: LoginIdentifier::Email(email.into()),
            password: password.into(),
        }
    }

    pub fn phone(phone: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: LoginIdentifier::Phone(phone.into()),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: AuthUser,
}

/// Snapshot of the session record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Current identity; the impersonation target while impersonating
    pub user: Option<UserProfile>,
    /// The real identity, only while impersonating
    pub impersonator: Option<UserProfile>,
    /// Where to go when impersonation stops
    pub impersonation_return_path: Option<String>,
    /// A login call is in flight
    pub is_loading: bool,
}

impl Session {
    pub fn state(&self) -> SessionState {
        match (&self.user, &self.impersonator) {
            (None, _) => SessionState::LoggedOut,
            (Some(_), None) => SessionState::LoggedIn,
            (Some(_), Some(_)) => SessionState::Impersonating,
        }
    }
}

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn,
    Impersonating,
}

/// What `start_impersonation` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpersonationOutcome {
    /// The target is now the current identity
    Started,
    /// Nobody is logged in; nothing changed
    NotLoggedIn,
    /// Already impersonating; nothing changed
    AlreadyImpersonating,
    /// The current role may not impersonate; nothing changed
    NotPermitted,
}

/// What `stop_impersonation` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    /// The original identity is back; carries the recorded return path
    Restored { return_path: Option<String> },
    /// There was no impersonation to stop
    NotImpersonating,
}

/// Where the startup identity came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    /// Identity record written by the API client
    External,
    /// Legacy session record
    Session,
    /// Session and impersonator records of an interrupted impersonation
    Impersonation,
}

/// What happened while restoring persisted state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Source of the restored identity, if any
    pub source: Option<IdentitySource>,
    /// Keys whose records were present but malformed
    pub corrupt_keys: Vec<String>,
    /// Keys whose backend read failed
    pub unreadable_keys: Vec<String>,
}
