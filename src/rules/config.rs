//! TOML configuration for the catalog admission rules.
//!
//! # Example `catalog-rules.toml`
//!
//! ```toml
//! # Accept everything except groups discovered through GitHub.
//! [[catalog.rules]]
//! allow = []
//! deny = [{ kind = "Group" }]
//! locations = [{ type = "github" }]
//! ```
//!
//! Matchers may also be written as bare strings: `allow = ["Component", "API"]`.

use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::rule_set::RuleSet;
use crate::error::{CatalogRulesError, Result};

/// Bundled rule templates, by name.
pub const TEMPLATES: &[(&str, &str)] = &[
    ("permissive", include_str!("../../templates/permissive.toml")),
    (
        "no-github-groups",
        include_str!("../../templates/no-github-groups.toml"),
    ),
    ("strict", include_str!("../../templates/strict.toml")),
];

/// Look up a bundled template by name.
pub fn template(name: &str) -> Result<&'static str> {
    TEMPLATES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, content)| *content)
        .ok_or_else(|| CatalogRulesError::UnknownTemplate(name.to_string()))
}

/// Catalog section (`[catalog]`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Ordered rule sets; later applicable rule sets override earlier ones.
    #[serde(default)]
    pub rules: Vec<RuleSet>,
}

/// Top-level configuration deserialized from `catalog-rules.toml`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Load and parse the configuration from a TOML file at the given path.
    ///
    /// `${VAR}` and `$VAR` placeholders inside string values are replaced
    /// with environment variable values. An unset variable is an error.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse TOML text, then substitute placeholders in its string values.
    ///
    /// Comments and keys are never substituted.
    pub fn parse(content: &str) -> Result<Self> {
        let mut value: toml::Value = toml::from_str(content)?;
        let placeholder = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Z_][A-Z0-9_]*)")?;
        substitute_in_value(&mut value, &placeholder)?;
        let config: AppConfig = value.try_into()?;
        Ok(config)
    }
}

fn substitute_in_value(value: &mut toml::Value, placeholder: &Regex) -> Result<()> {
    match value {
        toml::Value::String(s) => *s = substitute_env_vars(s, placeholder)?,
        toml::Value::Array(items) => {
            for item in items {
                substitute_in_value(item, placeholder)?;
            }
        }
        toml::Value::Table(table) => {
            for (_, item) in table.iter_mut() {
                substitute_in_value(item, placeholder)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Replace `${VAR_NAME}` and `$VAR_NAME` (uppercase only) in one pass.
///
/// Each placeholder is replaced at its own position; substituted values are
/// not scanned again. The first unset variable is returned as the error.
fn substitute_env_vars(input: &str, placeholder: &Regex) -> Result<String> {
    let mut missing: Option<String> = None;
    let result = placeholder.replace_all(input, |cap: &regex::Captures<'_>| {
        let name = cap
            .get(1)
            .or_else(|| cap.get(2))
            .map_or("", |m| m.as_str());
        match std::env::var(name) {
            Ok(value) => value,
            Err(_) => {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(name) => Err(CatalogRulesError::ConfigEnvVar(name)),
        None => Ok(result.into_owned()),
    }
}
