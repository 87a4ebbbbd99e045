//! # catalog-rules
//!
//! **Rule-based admission policy for catalog ingestion.**
//!
//! Given an entity and the location it was discovered at, a
//! [`RuleEnforcer`](rules::RuleEnforcer) decides whether the entity may enter
//! the catalog. Rule sets are evaluated in order and the last one that
//! applies to the location decides; within a rule set, `deny` beats `allow`.
//!
//! ## Architecture
//!
//! - **[`rules`]** — descriptors, matchers, rule sets, the enforcer, and TOML configuration
//! - **[`audit`]** — SQLite-backed decision log with JSON/CSV export
//! - **[`cli`]** — command-line interface (clap)
//! - **[`error`]** — unified error types using `thiserror`
//!
//! ## Example
//!
//! ```
//! use catalog_rules::rules::{Entity, LocationSpec, RuleEnforcer, RuleSet};
//!
//! let enforcer = RuleEnforcer::new(vec![
//!     RuleSet::default().denying(&["Group"]).at_locations(&["github"]),
//! ]);
//! let github = LocationSpec::new("github", "https://github.com/a/b/blob/master/x.yaml");
//! assert!(!enforcer.is_allowed(&Entity::new("group"), &github));
//! assert!(enforcer.is_allowed(&Entity::new("Component"), &github));
//! ```

pub mod audit;
pub mod cli;
pub mod error;
pub mod rules;
