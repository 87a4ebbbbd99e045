use rusqlite::Connection;
use serde::Serialize;

use super::DecisionLog;
use crate::error::Result;

#[derive(Debug, Serialize)]
struct ExportEntry<'a> {
    id: i64,
    timestamp: &'a str,
    kind: &'a str,
    name: &'a str,
    location_type: &'a str,
    target: &'a str,
    verdict: &'a str,
    reason: &'a str,
}

impl<'a> From<&'a DecisionLog> for ExportEntry<'a> {
    fn from(log: &'a DecisionLog) -> Self {
        ExportEntry {
            id: log.id.unwrap_or(0),
            timestamp: &log.timestamp,
            kind: &log.kind,
            name: &log.name,
            location_type: &log.location_type,
            target: &log.target,
            verdict: &log.verdict,
            reason: &log.reason,
        }
    }
}

/// Export all decisions as a JSON array.
pub fn export_json(conn: &Connection) -> Result<String> {
    let logs = super::query_recent(conn, usize::MAX)?;
    let entries: Vec<ExportEntry<'_>> = logs.iter().map(ExportEntry::from).collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

/// Export all decisions as CSV. Fields containing commas or quotes are quoted.
pub fn export_csv(conn: &Connection) -> Result<String> {
    let logs = super::query_recent(conn, usize::MAX)?;
    let mut output = String::from("id,timestamp,kind,name,location_type,target,verdict,reason\n");
    for log in &logs {
        let fields = [
            log.id.unwrap_or(0).to_string(),
            csv_field(&log.timestamp),
            csv_field(&log.kind),
            csv_field(&log.name),
            csv_field(&log.location_type),
            csv_field(&log.target),
            csv_field(&log.verdict),
            csv_field(&log.reason),
        ];
        output.push_str(&fields.join(","));
        output.push('\n');
    }
    Ok(output)
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{DecisionLog, log_decision, open_memory_db};

    fn sample_log(kind: &str, reason: &str) -> DecisionLog {
        DecisionLog {
            id: None,
            timestamp: "2026-02-12T10:00:00Z".to_string(),
            kind: kind.to_string(),
            name: "sample".to_string(),
            location_type: "file".to_string(),
            target: "/root/z.yaml".to_string(),
            verdict: "allow".to_string(),
            reason: reason.to_string(),
        }
    }

    #[test]
    fn export_json_format() {
        let conn = open_memory_db().unwrap();
        log_decision(&conn, &sample_log("Component", "test")).unwrap();

        let json = export_json(&conn).unwrap();
        assert!(json.contains("\"kind\": \"Component\""));
        assert!(json.contains("\"location_type\": \"file\""));

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
    }

    #[test]
    fn export_csv_format() {
        let conn = open_memory_db().unwrap();
        log_decision(&conn, &sample_log("Component", "test")).unwrap();
        log_decision(&conn, &sample_log("API", "test")).unwrap();

        let csv = export_csv(&conn).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "id,timestamp,kind,name,location_type,target,verdict,reason");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn export_csv_quotes_reasons_with_commas() {
        let conn = open_memory_db().unwrap();
        log_decision(&conn, &sample_log("User", "Kind 'User', not listed")).unwrap();

        let csv = export_csv(&conn).unwrap();
        assert!(csv.lines().nth(1).unwrap().ends_with(",allow,\"Kind 'User', not listed\""));
    }

    #[test]
    fn export_empty_db() {
        let conn = open_memory_db().unwrap();
        assert_eq!(export_json(&conn).unwrap(), "[]");
        assert_eq!(export_csv(&conn).unwrap().lines().count(), 1);
    }
}
