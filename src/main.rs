use std::path::Path;

use catalog_rules::audit::{self, DecisionLog};
use catalog_rules::cli::{Cli, Commands, ExportFormat};
use catalog_rules::rules::config::{self, AppConfig};
use catalog_rules::rules::{Entity, LocationSpec, RuleEnforcer};
use clap::Parser;
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            kind,
            location_type,
            target,
        } => cmd_check(&cli.config, &kind, LocationSpec::new(location_type, target))?,
        Commands::Filter {
            entities,
            location_type,
            target,
            audit_db,
        } => cmd_filter(
            &cli.config,
            &entities,
            LocationSpec::new(location_type, target),
            audit_db.as_deref(),
        )?,
        Commands::Show => cmd_show(&cli.config)?,
        Commands::Template { name } => cmd_template(&cli.config, &name)?,
        Commands::Init => cmd_init(&cli.config)?,
        Commands::Logs {
            audit_db,
            tail,
            export,
            format,
        } => cmd_logs(&audit_db, tail, export, format)?,
    }

    Ok(())
}

fn load_enforcer(config_path: &Path) -> anyhow::Result<RuleEnforcer> {
    let config = AppConfig::load_from_path(config_path)?;
    info!(
        "Loaded {} rule sets from {}",
        config.catalog.rules.len(),
        config_path.display()
    );
    Ok(RuleEnforcer::from_config(&config.catalog))
}

fn cmd_check(config_path: &Path, kind: &str, location: LocationSpec) -> anyhow::Result<()> {
    let enforcer = load_enforcer(config_path)?;
    let decision = enforcer.evaluate(&Entity::new(kind), &location);
    let verdict = if decision.allowed { "ALLOW" } else { "DENY" };
    println!("{} {} at {}: {}", verdict, kind, location.location_type, decision.reason);
    Ok(())
}

fn cmd_filter(
    config_path: &Path,
    entities_path: &Path,
    location: LocationSpec,
    audit_db: Option<&Path>,
) -> anyhow::Result<()> {
    let enforcer = load_enforcer(config_path)?;
    let content = std::fs::read_to_string(entities_path)?;
    let entities: Vec<Entity> = serde_json::from_str(&content)?;
    let conn = audit_db.map(audit::open_db).transpose()?;

    let mut admitted = Vec::new();
    for entity in entities {
        let decision = enforcer.evaluate(&entity, &location);
        if let Some(conn) = &conn {
            audit::log_decision(conn, &DecisionLog::new(&entity, &location, &decision))?;
        }
        if decision.allowed {
            admitted.push(entity);
        } else {
            warn!("Rejected {}: {}", entity.display_ref(), decision.reason);
        }
    }

    info!(
        "Admitted {} entities from {} location {}",
        admitted.len(),
        location.location_type,
        location.target
    );
    println!("{}", serde_json::to_string_pretty(&admitted)?);
    Ok(())
}

fn cmd_show(config_path: &Path) -> anyhow::Result<()> {
    let config = AppConfig::load_from_path(config_path)?;
    let rules = &config.catalog.rules;
    println!("Catalog rules ({})", config_path.display());
    println!("═══════════════════════════════════════");
    if rules.is_empty() {
        println!("No rule sets configured; every entity is allowed.");
        return Ok(());
    }
    for (index, rule) in rules.iter().enumerate() {
        let allow = if rule.allow.is_empty() {
            "*".to_string()
        } else {
            join(rule.allow.iter().map(|m| m.kind.as_str()))
        };
        let deny = join(rule.deny.iter().map(|m| m.kind.as_str()));
        let locations = if rule.locations.is_empty() {
            "*".to_string()
        } else {
            join(rule.locations.iter().map(|m| m.location_type.as_str()))
        };
        println!(
            "  #{} allow: [{}] deny: [{}] locations: [{}]",
            index, allow, deny, locations
        );
    }
    Ok(())
}

fn join<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items.collect::<Vec<_>>().join(", ")
}

fn cmd_template(config_path: &Path, name: &str) -> anyhow::Result<()> {
    let content = match config::template(name) {
        Ok(content) => content,
        Err(e) => {
            println!("{}", e);
            let names: Vec<&str> = config::TEMPLATES.iter().map(|(n, _)| *n).collect();
            println!("Available templates: {}", names.join(", "));
            return Ok(());
        }
    };
    std::fs::write(config_path, content)?;
    println!("Applied template '{}' to {}", name, config_path.display());
    Ok(())
}

fn cmd_init(config_path: &Path) -> anyhow::Result<()> {
    if config_path.exists() {
        println!("Config already exists: {}", config_path.display());
    } else {
        std::fs::write(config_path, config::template("permissive")?)?;
        println!("Created config: {}", config_path.display());
    }
    Ok(())
}

fn cmd_logs(db: &Path, tail: usize, export: bool, format: ExportFormat) -> anyhow::Result<()> {
    if !db.exists() {
        println!("No audit database found at {}.", db.display());
        return Ok(());
    }

    let conn = audit::open_db(db)?;

    if export {
        match format {
            ExportFormat::Csv => print!("{}", audit::export::export_csv(&conn)?),
            ExportFormat::Json => println!("{}", audit::export::export_json(&conn)?),
        }
        return Ok(());
    }

    let stats = audit::query_stats(&conn)?;
    println!(
        "Decisions: {} (allowed {}, denied {})",
        stats.total, stats.allowed, stats.denied
    );
    let logs = audit::query_recent(&conn, tail)?;
    if logs.is_empty() {
        println!("No decisions recorded.");
        return Ok(());
    }
    println!("{}", audit::table_header());
    println!("{}", "─".repeat(120));
    for log in &logs {
        println!("{}", log.table_row());
    }
    Ok(())
}
