use serde::{Deserialize, Serialize};

use super::matcher::{KindMatcher, LocationMatcher};
use super::model::{Entity, LocationSpec};

/// One configured policy unit.
///
/// Absent lists deserialize as empty. An empty `allow` list admits every
/// kind; an empty `deny` list denies nothing; an empty `locations` list
/// applies the rule set everywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Kinds admitted by this rule set. Empty admits every kind.
    #[serde(default)]
    pub allow: Vec<KindMatcher>,
    /// Kinds rejected by this rule set. Takes precedence over `allow`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deny: Vec<KindMatcher>,
    /// Location types this rule set applies to. Empty applies everywhere.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<LocationMatcher>,
}

/// The opinion of a single applicable rule set about an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// A `deny` matcher hit. Wins over any `allow` match.
    Denied { kind: String },
    /// `allow` is empty, so every kind is admitted.
    AllowedAll,
    /// An `allow` matcher hit.
    Allowed { kind: String },
    /// `allow` is a non-empty list that does not contain the entity's kind.
    NotAllowListed,
}

impl Verdict {
    /// Whether this verdict admits the entity.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::AllowedAll | Verdict::Allowed { .. })
    }
}

impl RuleSet {
    /// A rule set admitting only `kinds` (every kind when empty).
    pub fn allowing(kinds: &[&str]) -> Self {
        Self {
            allow: kinds.iter().map(|k| KindMatcher::new(*k)).collect(),
            ..Self::default()
        }
    }

    /// Replace the deny list with `kinds`.
    pub fn denying(mut self, kinds: &[&str]) -> Self {
        self.deny = kinds.iter().map(|k| KindMatcher::new(*k)).collect();
        self
    }

    /// Restrict the rule set to the given location types.
    pub fn at_locations(mut self, types: &[&str]) -> Self {
        self.locations = types.iter().map(|t| LocationMatcher::new(*t)).collect();
        self
    }

    /// Whether this rule set has an opinion about entities found at `location`.
    pub fn applies_to(&self, location: &LocationSpec) -> bool {
        self.locations.is_empty() || self.locations.iter().any(|m| m.matches(location))
    }

    /// This rule set's own verdict for `entity`, ignoring location scope.
    pub fn verdict(&self, entity: &Entity) -> Verdict {
        if let Some(m) = self.deny.iter().find(|m| m.matches(entity)) {
            return Verdict::Denied {
                kind: m.kind.clone(),
            };
        }
        if self.allow.is_empty() {
            return Verdict::AllowedAll;
        }
        match self.allow.iter().find(|m| m.matches(entity)) {
            Some(m) => Verdict::Allowed {
                kind: m.kind.clone(),
            },
            None => Verdict::NotAllowListed,
        }
    }

    /// `None` when the rule set does not apply to `location`.
    pub fn judge(&self, entity: &Entity, location: &LocationSpec) -> Option<Verdict> {
        if self.applies_to(location) {
            Some(self.verdict(entity))
        } else {
            None
        }
    }
}
