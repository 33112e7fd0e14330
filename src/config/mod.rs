//! Configuration management for the portal engine
//!
//! This module handles loading, validation, and merging of engine configuration.

pub mod models;

pub use models::*;

use crate::auth::menu::MenuResolver;
use crate::auth::rbac::{PermissionRule, RoleCatalog};
use crate::utils::error::{PortalError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Session record persistence
    #[serde(default)]
    pub storage: StorageConfig,
    /// Session behaviour
    #[serde(default)]
    pub session: SessionConfig,
    /// Permission and menu overrides
    #[serde(default)]
    pub access: AccessConfig,
}

impl PortalConfig {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| PortalError::config(format!("Failed to read config file: {}", e)))?;

        let config: PortalConfig = serde_yaml::from_str(&content)
            .map_err(|e| PortalError::config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from `CHARGEDESK_*` environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Self::default();

        if let Ok(backend) = env::var("CHARGEDESK_STORAGE_BACKEND") {
            config.storage.backend = match backend.to_ascii_lowercase().as_str() {
                "memory" => StorageBackend::Memory,
                "file" => StorageBackend::File,
                other => {
                    return Err(PortalError::config(format!(
                        "Invalid storage backend: {}",
                        other
                    )));
                }
            };
        }
        if let Ok(directory) = env::var("CHARGEDESK_STORAGE_DIR") {
            config.storage.directory = Some(PathBuf::from(directory));
        }
        if let Ok(base_url) = env::var("CHARGEDESK_AVATAR_BASE_URL") {
            config.session.avatar.base_url = base_url;
        }
        if let Ok(capacity) = env::var("CHARGEDESK_SIGNAL_CAPACITY") {
            config.session.signals.capacity = capacity
                .parse()
                .map_err(|e| PortalError::config(format!("Invalid signal capacity: {}", e)))?;
        }
        if let Ok(file) = env::var("CHARGEDESK_PERMISSIONS_FILE") {
            config.access.permissions_file = Some(PathBuf::from(file));
        }
        if let Ok(file) = env::var("CHARGEDESK_MENU_FILE") {
            config.access.menu_file = Some(PathBuf::from(file));
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.storage
            .validate()
            .map_err(|e| PortalError::config(format!("Storage config error: {}", e)))?;

        self.session
            .validate()
            .map_err(|e| PortalError::config(format!("Session config error: {}", e)))?;

        Ok(())
    }

    /// Merge with another configuration (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        self.storage = self.storage.merge(other.storage);
        self.session = self.session.merge(other.session);
        self.access = self.access.merge(other.access);
        self
    }

    /// Extra permission rules named by `access.permissions_file`
    pub async fn load_permission_rules(&self) -> Result<Vec<PermissionRule>> {
        let Some(path) = &self.access.permissions_file else {
            return Ok(Vec::new());
        };

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            PortalError::config(format!("Failed to read permissions file {:?}: {}", path, e))
        })?;
        let rules: Vec<PermissionRule> = serde_yaml::from_str(&content).map_err(|e| {
            PortalError::config(format!("Failed to parse permissions file {:?}: {}", path, e))
        })?;

        info!("Loaded {} extra permission rules from {:?}", rules.len(), path);
        Ok(rules)
    }

    /// Menu named by `access.menu_file`, or the built-in one
    pub async fn load_menu(&self, catalog: RoleCatalog) -> Result<MenuResolver> {
        let Some(path) = &self.access.menu_file else {
            return Ok(MenuResolver::new(catalog, crate::auth::menu::default_menu()));
        };

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            PortalError::config(format!("Failed to read menu file {:?}: {}", path, e))
        })?;
        MenuResolver::from_yaml(catalog, &content)
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| PortalError::config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
