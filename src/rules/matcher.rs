//! Kind and location-type predicates.
//!
//! Matchers are plain value records. In configuration they can be written
//! either as tables (`{ kind = "Group" }`, `{ type = "github" }`) or as bare
//! strings (`"Group"`, `"github"`).

use serde::{Deserialize, Serialize};

use super::model::{Entity, LocationSpec};

/// Case-insensitive string equality. No trimming or other normalization.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Matches entities whose kind equals `kind`, ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "KindMatcherRepr")]
pub struct KindMatcher {
    /// Kind to match, e.g. `"Group"`.
    pub kind: String,
}

impl KindMatcher {
    /// Create a matcher for `kind`.
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }

    /// Whether the entity's kind equals this matcher's kind, ignoring case.
    pub fn matches(&self, entity: &Entity) -> bool {
        eq_ignore_case(&self.kind, &entity.kind)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KindMatcherRepr {
    Bare(String),
    Table { kind: String },
}

impl From<KindMatcherRepr> for KindMatcher {
    fn from(repr: KindMatcherRepr) -> Self {
        match repr {
            KindMatcherRepr::Bare(kind) | KindMatcherRepr::Table { kind } => KindMatcher { kind },
        }
    }
}

/// Matches locations whose type equals `location_type`, ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LocationMatcherRepr")]
pub struct LocationMatcher {
    /// Location type to match, e.g. `"github"`.
    #[serde(rename = "type")]
    pub location_type: String,
}

impl LocationMatcher {
    /// Create a matcher for `location_type`.
    pub fn new(location_type: impl Into<String>) -> Self {
        Self {
            location_type: location_type.into(),
        }
    }

    /// Whether the location's type equals this matcher's type, ignoring case.
    pub fn matches(&self, location: &LocationSpec) -> bool {
        eq_ignore_case(&self.location_type, &location.location_type)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LocationMatcherRepr {
    Bare(String),
    Table {
        #[serde(rename = "type")]
        location_type: String,
    },
}

impl From<LocationMatcherRepr> for LocationMatcher {
    fn from(repr: LocationMatcherRepr) -> Self {
        match repr {
            LocationMatcherRepr::Bare(location_type)
            | LocationMatcherRepr::Table { location_type } => LocationMatcher { location_type },
        }
    }
}
