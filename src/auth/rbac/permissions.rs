//! Permission matrix and checking methods

use super::roles::{Role, RoleCatalog};
use super::types::{
    Action, ActionMap, Audience, Feature, GrantSource, PermissionCheck, PermissionRule,
};
use std::collections::HashMap;
use tracing::debug;

/// Allow-lists for every (feature, action) pair the portal knows about
#[derive(Debug, Clone)]
pub struct PermissionMatrix {
    catalog: RoleCatalog,
    rules: HashMap<(Feature, Action), Audience>,
}

impl Default for PermissionMatrix {
    fn default() -> Self {
        Self::from_rules(RoleCatalog::global().clone(), super::defaults::default_rules())
    }
}

impl PermissionMatrix {
    /// Build a matrix from explicit rules. Rules for the same pair are merged.
    pub fn from_rules(catalog: RoleCatalog, rules: Vec<PermissionRule>) -> Self {
        let mut matrix = Self {
            catalog,
            rules: HashMap::new(),
        };
        matrix.extend(rules);
        matrix
    }

    /// Layer additional rules on top. Grants only accumulate.
    pub fn extend(&mut self, rules: Vec<PermissionRule>) {
        let count = rules.len();
        for rule in rules {
            self.rules
                .entry((rule.feature, rule.action))
                .or_default()
                .extend(&rule.audience);
        }
        debug!("Merged {} permission rules, matrix has {} pairs", count, self.rules.len());
    }

    pub fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }

    /// Allow-list for a pair, if one is defined
    pub fn audience(&self, feature: Feature, action: Action) -> Option<&Audience> {
        self.rules.get(&(feature, action))
    }

    /// Whether the role may perform the action on the feature
    pub fn has_permission(&self, role: Role, feature: Feature, action: Action) -> bool {
        if role.is_bypass() {
            return true;
        }

        self.rules
            .get(&(feature, action))
            .and_then(|audience| audience.admits(role, &self.catalog))
            .is_some()
    }

    /// Detailed permission check
    pub fn check(&self, role: Role, feature: Feature, action: Action) -> PermissionCheck {
        if role.is_bypass() {
            return PermissionCheck {
                granted: true,
                granted_by: Some(GrantSource::Bypass),
                denial_reason: None,
            };
        }

        let source = self
            .rules
            .get(&(feature, action))
            .and_then(|audience| audience.admits(role, &self.catalog));

        match source {
            Some(source) => PermissionCheck {
                granted: true,
                granted_by: Some(source),
                denial_reason: None,
            },
            None => PermissionCheck {
                granted: false,
                granted_by: None,
                denial_reason: Some(format!("{} may not {} {}", role, action, feature)),
            },
        }
    }

    /// Actions the feature exposes, in stable order
    pub fn actions_of(&self, feature: Feature) -> Vec<Action> {
        let mut actions: Vec<Action> = self
            .rules
            .keys()
            .filter(|(f, _)| *f == feature)
            .map(|(_, action)| *action)
            .collect();
        actions.sort();
        actions
    }

    /// Full permission object for a feature. Unknown features yield an empty map.
    pub fn permissions_for(&self, role: Role, feature: Feature) -> ActionMap {
        self.actions_of(feature)
            .into_iter()
            .map(|action| (action, self.has_permission(role, feature, action)))
            .collect()
    }

    /// Whether the role may do anything at all on the feature
    pub fn can_reach(&self, role: Role, feature: Feature) -> bool {
        self.permissions_for(role, feature).values().any(|granted| *granted)
    }
}
