//! Authentication backend port

use super::types::{Credentials, LoginResponse};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Credential exchange with the platform backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchange credentials for an identity; fails with `PortalError::Auth`
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse>;

    /// Server-side teardown, best effort. The session store clears every
    /// local record, `auth_user` included, whatever this returns.
    async fn logout(&self) -> Result<()>;
}
