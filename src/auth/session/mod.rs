//! Session management
//!
//! Tracks who is logged in, supports a single level of impersonation for
//! platform admins, and persists the session records so a restarted process
//! picks up where it left off.

mod avatar;
mod service;
mod signals;
mod store;
mod types;

pub use avatar::AvatarGenerator;
#[cfg(test)]
pub use service::MockAuthService;
pub use service::AuthService;
pub use signals::{SessionSignal, SignalBus};
pub use store::{IMPERSONATION_GROUP, SessionStore};
pub use types::{
    AuthUser, Credentials, IdentitySource, ImpersonationOutcome, ImpersonationTarget,
    LoginIdentifier, LoginResponse, OwnerCapability, RestoreReport, Session, SessionState,
    StopOutcome, UserProfile,
};
