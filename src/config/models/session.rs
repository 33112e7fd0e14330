//! Session configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Avatar placeholder configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarConfig {
    /// Prefix to which the URL-encoded seed is appended
    #[serde(default = "default_avatar_base_url")]
    pub base_url: String,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            base_url: default_avatar_base_url(),
        }
    }
}

/// Session signal bus configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalConfig {
    /// Broadcast channel capacity
    #[serde(default = "default_signal_capacity")]
    pub capacity: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            capacity: default_signal_capacity(),
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub avatar: AvatarConfig,
    #[serde(default)]
    pub signals: SignalConfig,
}

impl SessionConfig {
    /// Merge session configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.avatar.base_url != default_avatar_base_url() {
            self.avatar = other.avatar;
        }
        if other.signals.capacity != default_signal_capacity() {
            self.signals = other.signals;
        }
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.avatar.base_url.trim().is_empty() {
            return Err("session.avatar.base_url must not be empty".to_string());
        }
        url::Url::parse(&self.avatar.base_url)
            .map_err(|e| format!("session.avatar.base_url is not a valid URL: {}", e))?;
        if self.signals.capacity == 0 {
            return Err("session.signals.capacity must be greater than zero".to_string());
        }
        Ok(())
    }
}
