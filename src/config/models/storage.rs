//! Storage configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where session records are persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Lost on process exit
    #[default]
    Memory,
    /// One file per record in `directory`
    File,
}

/// Storage configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend kind
    #[serde(default)]
    pub backend: StorageBackend,
    /// Directory for the file backend
    #[serde(default)]
    pub directory: Option<PathBuf>,
    /// Record keys
    #[serde(default)]
    pub keys: StorageKeys,
}

/// Keys of the persisted session records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageKeys {
    /// Current identity (`UserProfile` JSON)
    #[serde(default = "default_session_key")]
    pub session: String,
    /// Identity saved while impersonating (`UserProfile` JSON)
    #[serde(default = "default_impersonator_key")]
    pub impersonator: String,
    /// Path to return to when impersonation stops (plain string)
    #[serde(default = "default_return_path_key")]
    pub return_path: String,
    /// Identity written by the API client (read only here)
    #[serde(default = "default_auth_user_key")]
    pub auth_user: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            session: default_session_key(),
            impersonator: default_impersonator_key(),
            return_path: default_return_path_key(),
            auth_user: default_auth_user_key(),
        }
    }
}

impl StorageKeys {
    /// Keys written by the session store, i.e. everything except `auth_user`
    pub fn owned(&self) -> [&str; 3] {
        [
            self.session.as_str(),
            self.impersonator.as_str(),
            self.return_path.as_str(),
        ]
    }

    pub fn validate(&self) -> Result<(), String> {
        let all = [
            &self.session,
            &self.impersonator,
            &self.return_path,
            &self.auth_user,
        ];
        if all.iter().any(|key| key.trim().is_empty()) {
            return Err("storage keys must not be empty".to_string());
        }
        for (i, key) in all.iter().enumerate() {
            if all[i + 1..].contains(key) {
                return Err(format!("storage key {} is used twice", key));
            }
        }
        Ok(())
    }
}

impl StorageConfig {
    /// Merge storage configurations, other taking precedence where set
    pub fn merge(mut self, other: Self) -> Self {
        if other.backend != StorageBackend::default() {
            self.backend = other.backend;
        }
        if other.directory.is_some() {
            self.directory = other.directory;
        }
        if other.keys != StorageKeys::default() {
            self.keys = other.keys;
        }
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.backend == StorageBackend::File && self.directory.is_none() {
            return Err("storage.directory is required for the file backend".to_string());
        }
        self.keys.validate()
    }
}

fn default_session_key() -> String {
    "chargedesk.session.user".to_string()
}

fn default_impersonator_key() -> String {
    "chargedesk.session.impersonator".to_string()
}

fn default_return_path_key() -> String {
    "chargedesk.session.impersonation_return_path".to_string()
}

fn default_auth_user_key() -> String {
    "chargedesk.api.auth_user".to_string()
}
