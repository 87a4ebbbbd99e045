//! Catalog admission rules.
//!
//! [`model`] holds the entity and location descriptors, [`matcher`] the kind
//! and location predicates, [`rule_set`] a single policy unit, and
//! [`enforcer`] the evaluation across all configured rule sets. [`config`]
//! loads rule sets from TOML.

pub mod config;
pub mod enforcer;
pub mod matcher;
pub mod model;
pub mod rule_set;

pub use enforcer::{Decision, RuleEnforcer};
pub use matcher::{KindMatcher, LocationMatcher};
pub use model::{Entity, LocationSpec};
pub use rule_set::{RuleSet, Verdict};
