use catalog_rules::audit::{self, DecisionLog};
use catalog_rules::rules::config::{self, AppConfig};
use catalog_rules::rules::{Entity, LocationSpec, RuleEnforcer};

// ===== Template tests =====

#[test]
fn all_templates_are_valid_toml() {
    for (name, content) in config::TEMPLATES {
        let config = AppConfig::parse(content)
            .unwrap_or_else(|e| panic!("Template '{}' failed to parse: {}", name, e));
        assert!(
            !config.catalog.rules.is_empty(),
            "Template '{}' has no rule sets",
            name
        );
    }
}

#[test]
fn no_github_groups_template() {
    let config = AppConfig::parse(config::template("no-github-groups").unwrap()).unwrap();
    let enforcer = RuleEnforcer::from_config(&config.catalog);
    let github = LocationSpec::new("github", "https://github.com/org/repo/blob/main/catalog-info.yaml");
    let file = LocationSpec::new("file", "/etc/catalog/org.yaml");

    assert!(!enforcer.is_allowed(&Entity::new("Group"), &github));
    assert!(enforcer.is_allowed(&Entity::new("Group"), &file));
    assert!(enforcer.is_allowed(&Entity::new("Component"), &github));
}

#[test]
fn strict_template() {
    let config = AppConfig::parse(config::template("strict").unwrap()).unwrap();
    let enforcer = RuleEnforcer::from_config(&config.catalog);
    let github = LocationSpec::new("github", "https://github.com/org/repo/blob/main/catalog-info.yaml");
    let file = LocationSpec::new("file", "/etc/catalog/org.yaml");

    assert!(enforcer.is_allowed(&Entity::new("Component"), &github));
    assert!(enforcer.is_allowed(&Entity::new("api"), &github));
    assert!(!enforcer.is_allowed(&Entity::new("User"), &github));
    assert!(enforcer.is_allowed(&Entity::new("User"), &file));
    assert!(enforcer.is_allowed(&Entity::new("Component"), &file));
    assert!(!enforcer.is_allowed(&Entity::new("Template"), &file));
}

#[test]
fn template_apply_creates_valid_config() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("catalog-rules.toml");
    std::fs::write(&config_path, config::template("permissive").unwrap()).unwrap();

    let config = AppConfig::load_from_path(&config_path).unwrap();
    let enforcer = RuleEnforcer::from_config(&config.catalog);
    assert!(enforcer.is_allowed(&Entity::new("Resource"), &LocationSpec::new("url", "")));
}

// ===== End-to-end: entities + rules + audit log =====

#[test]
fn e2e_filter_batch_records_decisions() {
    let config = AppConfig::parse(config::template("no-github-groups").unwrap()).unwrap();
    let enforcer = RuleEnforcer::from_config(&config.catalog);
    let location = LocationSpec::new("github", "https://github.com/org/repo/blob/main/all.yaml");

    let entities: Vec<Entity> = serde_json::from_str(
        r#"[
            { "kind": "Component", "metadata": { "name": "petstore" } },
            { "kind": "Group", "metadata": { "name": "admins" } },
            { "kind": "User", "metadata": { "name": "jdoe" } }
        ]"#,
    )
    .unwrap();

    let conn = audit::open_memory_db().unwrap();
    let mut admitted = Vec::new();
    for entity in &entities {
        let decision = enforcer.evaluate(entity, &location);
        audit::log_decision(&conn, &DecisionLog::new(entity, &location, &decision)).unwrap();
        if decision.allowed {
            admitted.push(entity.metadata.name.clone().unwrap());
        }
    }
    assert_eq!(admitted, vec!["petstore", "jdoe"]);

    let stats = audit::query_stats(&conn).unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.allowed, 2);
    assert_eq!(stats.denied, 1);

    let recent = audit::query_recent(&conn, 10).unwrap();
    let denied = recent.iter().find(|l| l.verdict == "deny").unwrap();
    assert_eq!(denied.name, "admins");
    assert_eq!(denied.reason, "Rule set #1 denies kind 'Group'");
}

#[test]
fn e2e_audit_export_after_filter() {
    let enforcer = RuleEnforcer::new(vec![]);
    let location = LocationSpec::new("file", "/root/z.yaml");
    let entity = Entity::new("Component").with_name("petstore");

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("audit.db");
    let conn = audit::open_db(&db_path).unwrap();
    let decision = enforcer.evaluate(&entity, &location);
    audit::log_decision(&conn, &DecisionLog::new(&entity, &location, &decision)).unwrap();

    let json = audit::export::export_json(&conn).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed[0]["kind"], "Component");
    assert_eq!(parsed[0]["verdict"], "allow");
    assert_eq!(parsed[0]["target"], "/root/z.yaml");
}
