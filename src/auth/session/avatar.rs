//! Deterministic placeholder avatars

use crate::config::AvatarConfig;

/// Builds avatar URLs from a seed
#[derive(Debug, Clone)]
pub struct AvatarGenerator {
    base_url: String,
}

impl Default for AvatarGenerator {
    fn default() -> Self {
        Self::new(&AvatarConfig::default())
    }
}

impl AvatarGenerator {
    pub fn new(config: &AvatarConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
        }
    }

    /// Avatar for an identity, seeded by email when present, else by name
    pub fn for_identity(&self, email: Option<&str>, name: &str) -> String {
        let seed = email
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .unwrap_or(name)
            .trim()
            .to_lowercase();
        let encoded: String = url::form_urlencoded::byte_serialize(seed.as_bytes()).collect();
        format!("{}{}", self.base_url, encoded)
    }
}
