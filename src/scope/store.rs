//! Mutable holder for the current scope

use super::types::{Scope, ScopePatch};
use parking_lot::RwLock;
use tracing::debug;

/// Process-wide scope. Not persisted; starts from defaults.
#[derive(Debug, Default)]
pub struct ScopeStore {
    scope: RwLock<Scope>,
}

impl ScopeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a given scope instead of the defaults
    pub fn with_scope(scope: Scope) -> Self {
        Self {
            scope: RwLock::new(scope),
        }
    }

    /// Copy of the current scope
    pub fn scope(&self) -> Scope {
        self.scope.read().clone()
    }

    /// Merge `patch` into the current scope and return the result.
    ///
    /// Ids are not checked for existence.
    pub fn set_scope(&self, patch: ScopePatch) -> Scope {
        let mut scope = self.scope.write();
        if patch.is_empty() {
            return scope.clone();
        }

        patch.apply_to(&mut scope);
        debug!(
            "Scope set to region={} org={} station={} site={} range={}",
            scope.region, scope.org_id, scope.station_id, scope.site_id, scope.date_range
        );
        scope.clone()
    }

    /// Back to the defaults
    pub fn reset(&self) {
        *self.scope.write() = Scope::default();
        debug!("Scope reset");
    }
}
