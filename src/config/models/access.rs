//! Access model configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Optional overrides for the built-in permission matrix and menu
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessConfig {
    /// YAML list of extra permission rules, merged additively
    #[serde(default)]
    pub permissions_file: Option<PathBuf>,
    /// YAML menu replacing the built-in one
    #[serde(default)]
    pub menu_file: Option<PathBuf>,
}

impl AccessConfig {
    /// Merge access configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.permissions_file.is_some() {
            self.permissions_file = other.permissions_file;
        }
        if other.menu_file.is_some() {
            self.menu_file = other.menu_file;
        }
        self
    }
}
