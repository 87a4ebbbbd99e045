//! SQLite-backed decision audit log.
//!
//! Every admission decision made by the `filter` command can be recorded
//! with its timestamp, entity, location, verdict (`allow`/`deny`), and
//! reason. The [`export`] submodule provides JSON and CSV export.

pub mod export;

use rusqlite::Connection;

use crate::error::Result;
use crate::rules::{Decision, Entity, LocationSpec};

/// A single recorded decision in the `decisions` table.
#[derive(Debug, Clone)]
pub struct DecisionLog {
    /// Auto-incremented row ID (`None` before insert).
    pub id: Option<i64>,
    /// RFC 3339 timestamp.
    pub timestamp: String,
    pub kind: String,
    /// Entity name, empty when the entity has none.
    pub name: String,
    pub location_type: String,
    pub target: String,
    /// `"allow"` or `"deny"`.
    pub verdict: String,
    pub reason: String,
}

impl DecisionLog {
    /// Build a record for `decision`, stamped with the current time.
    pub fn new(entity: &Entity, location: &LocationSpec, decision: &Decision) -> Self {
        DecisionLog {
            id: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
            kind: entity.kind.clone(),
            name: entity.metadata.name.clone().unwrap_or_default(),
            location_type: location.location_type.clone(),
            target: location.target.clone(),
            verdict: if decision.allowed { "allow" } else { "deny" }.to_string(),
            reason: decision.reason.clone(),
        }
    }
}

impl DecisionLog {
    /// One line of the `logs` listing, aligned with [`table_header`].
    pub fn table_row(&self) -> String {
        format_row([
            self.timestamp.as_str(),
            self.verdict.as_str(),
            self.kind.as_str(),
            self.name.as_str(),
            self.location_type.as_str(),
            self.reason.as_str(),
        ])
    }
}

/// Column headings for the `logs` listing.
pub fn table_header() -> String {
    format_row(["TIMESTAMP", "VERDICT", "KIND", "NAME", "LOCATION", "REASON"])
}

fn format_row(cols: [&str; 6]) -> String {
    format!(
        "{:<26} {:<7} {:<14} {:<24} {:<10} {}",
        cols[0], cols[1], cols[2], cols[3], cols[4], cols[5]
    )
}

/// Create the `decisions` table if it doesn't exist.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS decisions (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp     TEXT NOT NULL,
            kind          TEXT NOT NULL,
            name          TEXT NOT NULL,
            location_type TEXT NOT NULL,
            target        TEXT NOT NULL,
            verdict       TEXT NOT NULL,
            reason        TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_decisions_timestamp ON decisions(timestamp);
        CREATE INDEX IF NOT EXISTS idx_decisions_kind ON decisions(kind);",
    )?;
    Ok(())
}

pub fn log_decision(conn: &Connection, log: &DecisionLog) -> Result<i64> {
    conn.execute(
        "INSERT INTO decisions (timestamp, kind, name, location_type, target, verdict, reason)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            log.timestamp,
            log.kind,
            log.name,
            log.location_type,
            log.target,
            log.verdict,
            log.reason,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Query the most recent N decisions, newest first.
pub fn query_recent(conn: &Connection, limit: usize) -> Result<Vec<DecisionLog>> {
    let mut stmt = conn.prepare(
        "SELECT id, timestamp, kind, name, location_type, target, verdict, reason
         FROM decisions ORDER BY id DESC LIMIT ?1",
    )?;

    // SQLite limits are signed; clamp `usize::MAX` callers.
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let rows = stmt.query_map(rusqlite::params![limit], |row| {
        Ok(DecisionLog {
            id: Some(row.get(0)?),
            timestamp: row.get(1)?,
            kind: row.get(2)?,
            name: row.get(3)?,
            location_type: row.get(4)?,
            target: row.get(5)?,
            verdict: row.get(6)?,
            reason: row.get(7)?,
        })
    })?;

    let mut logs = Vec::new();
    for row in rows {
        logs.push(row?);
    }
    Ok(logs)
}

/// Aggregated decision counts.
#[derive(Debug, Clone, Default)]
pub struct DecisionStats {
    pub total: usize,
    pub allowed: usize,
    pub denied: usize,
}

pub fn query_stats(conn: &Connection) -> Result<DecisionStats> {
    let mut stmt = conn.prepare("SELECT verdict, COUNT(*) FROM decisions GROUP BY verdict")?;
    let rows = stmt.query_map([], |row| {
        let verdict: String = row.get(0)?;
        let count: i64 = row.get(1)?;
        Ok((verdict, count as usize))
    })?;

    let mut stats = DecisionStats::default();
    for row in rows {
        let (verdict, count) = row?;
        stats.total += count;
        match verdict.as_str() {
            "allow" => stats.allowed = count,
            "deny" => stats.denied = count,
            _ => {}
        }
    }
    Ok(stats)
}

/// Open or create a SQLite database at the given path.
pub fn open_db(path: &std::path::Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    init_db(&conn)?;
    Ok(conn)
}

/// Open an in-memory SQLite database (for testing).
pub fn open_memory_db() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_db(&conn)?;
    Ok(conn)
}
