//! Entity and location descriptors handed to the enforcer by the ingestion
//! pipeline.

use serde::{Deserialize, Serialize};

/// Metadata carried alongside an entity. Only used for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMetadata {
    /// Entity name, when the envelope carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A catalog entity as seen by the admission rules.
///
/// Deserializes from the usual entity envelope (`{"kind": ..., "metadata":
/// {...}}`); any other fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Category label, e.g. `"User"` or `"Component"`. Compared case-insensitively.
    pub kind: String,
    /// Envelope metadata. Defaults to empty when absent.
    #[serde(default)]
    pub metadata: EntityMetadata,
}

impl Entity {
    /// Create an unnamed entity of the given kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            metadata: EntityMetadata::default(),
        }
    }

    /// Attach a `metadata.name`.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.metadata.name = Some(name.into());
        self
    }

    /// Display name for logs: `kind:name`, or just the kind when unnamed.
    pub fn display_ref(&self) -> String {
        match &self.metadata.name {
            Some(name) => format!("{}:{}", self.kind, name),
            None => self.kind.clone(),
        }
    }
}

/// Where an entity was discovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSpec {
    /// Source mechanism, e.g. `"github"` or `"file"`. Compared case-insensitively.
    #[serde(rename = "type")]
    pub location_type: String,
    /// Opaque target (URL, path). Not used for matching.
    #[serde(default)]
    pub target: String,
}

impl LocationSpec {
    /// Create a location descriptor.
    pub fn new(location_type: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            location_type: location_type.into(),
            target: target.into(),
        }
    }
}
