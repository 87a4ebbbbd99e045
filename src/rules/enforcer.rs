use tracing::debug;

use super::config::CatalogConfig;
use super::model::{Entity, LocationSpec};
use super::rule_set::{RuleSet, Verdict};

/// Outcome of evaluating an entity against the rule sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Whether the entity may enter the catalog.
    pub allowed: bool,
    /// Human-readable explanation of the verdict.
    pub reason: String,
    /// Index of the last rule set that applied, if any.
    pub matched_rule: Option<usize>,
}

impl Decision {
    fn baseline(reason: &str) -> Self {
        Decision {
            allowed: true,
            reason: reason.to_string(),
            matched_rule: None,
        }
    }

    fn from_verdict(index: usize, entity: &Entity, verdict: &Verdict) -> Self {
        let reason = match verdict {
            Verdict::Denied { kind } => format!("Rule set #{index} denies kind '{kind}'"),
            Verdict::AllowedAll => format!("Rule set #{index} allows all kinds"),
            Verdict::Allowed { kind } => format!("Rule set #{index} allows kind '{kind}'"),
            Verdict::NotAllowListed => format!(
                "Kind '{}' is not in the allow list of rule set #{index}",
                entity.kind
            ),
        };
        Decision {
            allowed: verdict.is_allowed(),
            reason,
            matched_rule: Some(index),
        }
    }
}

/// Decides whether entities may enter the catalog.
///
/// Rule sets are evaluated in order. A rule set whose `locations` do not
/// match is skipped; otherwise its verdict replaces whatever earlier rule
/// sets decided. With no rule sets, or when none applies, the entity is
/// allowed.
///
/// The enforcer is immutable and can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct RuleEnforcer {
    rules: Vec<RuleSet>,
}

impl RuleEnforcer {
    /// Create an enforcer over `rules`, evaluated in the given order.
    pub fn new(rules: Vec<RuleSet>) -> Self {
        Self { rules }
    }

    /// Create an enforcer from the `[catalog]` section of the config.
    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(config.rules.clone())
    }

    /// The configured rule sets, in evaluation order.
    pub fn rules(&self) -> &[RuleSet] {
        &self.rules
    }

    /// Whether `entity`, discovered at `location`, may enter the catalog.
    pub fn is_allowed(&self, entity: &Entity, location: &LocationSpec) -> bool {
        self.evaluate(entity, location).allowed
    }

    /// Evaluate with the reason and the deciding rule set.
    pub fn evaluate(&self, entity: &Entity, location: &LocationSpec) -> Decision {
        if self.rules.is_empty() {
            return Decision::baseline("No rules configured; default policy applied");
        }

        let initial = Decision::baseline("No rule set applies to this location");
        self.rules
            .iter()
            .enumerate()
            .fold(initial, |decision, (index, rule)| {
                match rule.judge(entity, location) {
                    Some(verdict) => {
                        debug!(
                            "rule set #{} on {} at {}: {:?}",
                            index,
                            entity.display_ref(),
                            location.location_type,
                            verdict
                        );
                        Decision::from_verdict(index, entity, &verdict)
                    }
                    None => decision,
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn github_x() -> LocationSpec {
        LocationSpec::new("github", "https://github.com/a/b/blob/master/x.yaml")
    }

    fn file_z() -> LocationSpec {
        LocationSpec::new("file", "/root/z.yaml")
    }

    #[test]
    fn no_rules_allows_with_baseline_reason() {
        let enforcer = RuleEnforcer::new(vec![]);
        let decision = enforcer.evaluate(&Entity::new("User"), &github_x());
        assert!(decision.allowed);
        assert!(decision.matched_rule.is_none());
        assert!(decision.reason.contains("No rules configured"));
    }

    #[test]
    fn last_applicable_rule_set_decides() {
        let enforcer = RuleEnforcer::new(vec![
            RuleSet::default().denying(&["Group"]),
            RuleSet::allowing(&["Group"]).at_locations(&["file"]),
        ]);

        let decision = enforcer.evaluate(&Entity::new("Group"), &file_z());
        assert!(decision.allowed);
        assert_eq!(decision.matched_rule, Some(1));

        let decision = enforcer.evaluate(&Entity::new("Group"), &github_x());
        assert!(!decision.allowed);
        assert_eq!(decision.matched_rule, Some(0));
        assert_eq!(decision.reason, "Rule set #0 denies kind 'Group'");
    }

    #[test]
    fn no_applicable_rule_set_keeps_default() {
        let enforcer = RuleEnforcer::new(vec![RuleSet::default()
            .denying(&["Group"])
            .at_locations(&["github"])]);
        let decision = enforcer.evaluate(&Entity::new("Group"), &file_z());
        assert!(decision.allowed);
        assert!(decision.matched_rule.is_none());
    }

    #[test]
    fn not_allow_listed_reason_names_entity_kind() {
        let enforcer = RuleEnforcer::new(vec![RuleSet::allowing(&["Component"])]);
        let decision = enforcer.evaluate(&Entity::new("User"), &file_z());
        assert!(!decision.allowed);
        assert_eq!(
            decision.reason,
            "Kind 'User' is not in the allow list of rule set #0"
        );
    }

    #[test]
    fn enforcer_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuleEnforcer>();
    }
}
