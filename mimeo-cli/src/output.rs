//! Output formatting for the CLI.
//!
//! The end-of-run summary renders as a table for humans or as JSON/YAML
//! for scripting. Log lines go to stderr via tracing; everything here
//! writes to stdout.

use std::time::Duration;

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled};

use mimeo_common::{Destination, ItemFailure, ItemSuccess, ObjectType, RunReport};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "yaml" | "yml" => OutputFormat::Yaml,
            _ => OutputFormat::Table,
        }
    }
}

/// Print the end-of-run summary in the requested format.
pub fn print_summary(report: &RunReport, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print_summary_table(report),
        OutputFormat::Json => print_json(&SummaryDoc::from(report))?,
        OutputFormat::Yaml => print_yaml(&SummaryDoc::from(report))?,
    }
    Ok(())
}

fn print_summary_table(report: &RunReport) {
    println!();
    println!(
        "{}",
        "==================== Replication Summary ====================".bold()
    );
    println!();

    if report.is_empty() {
        println!("{}", "No objects found".yellow());
    } else {
        let rows: Vec<OutcomeRow> = report
            .successes()
            .map(OutcomeRow::success)
            .chain(report.failures().map(OutcomeRow::failure))
            .collect();
        let table = Table::new(rows);
        println!("{}", table);
    }

    println!();
    print_success(&format!("{} replicated", report.success_count()));
    if report.failure_count() > 0 {
        print_error(&format!("{} failed", report.failure_count()));
    }
    println!("completed in {}", format_duration(report.duration));
}

/// One line of the summary table.
#[derive(Tabled)]
struct OutcomeRow {
    status: String,
    object: String,
    version: String,
    detail: String,
}

impl OutcomeRow {
    fn success(item: &ItemSuccess) -> Self {
        Self {
            status: "replicated".to_string(),
            object: format!("{}/{}", item.key.object_type, item.key.name),
            version: item.key.version.clone().unwrap_or_else(|| "-".to_string()),
            detail: match &item.destination {
                Destination::Disk { path } => format!("wrote {}", path.display()),
                Destination::Api => "published".to_string(),
            },
        }
    }

    fn failure(item: &ItemFailure) -> Self {
        Self {
            status: "failed".to_string(),
            object: format!("{}/{}", item.key.object_type, item.key.name),
            version: item.key.version.clone().unwrap_or_else(|| "-".to_string()),
            detail: item.reason.clone(),
        }
    }
}

/// Machine-readable form of the summary.
#[derive(Serialize)]
struct SummaryDoc<'a> {
    object_type: ObjectType,
    started_at: DateTime<Utc>,
    duration_ms: u64,
    success_count: usize,
    failure_count: usize,
    successes: Vec<&'a ItemSuccess>,
    failures: Vec<&'a ItemFailure>,
}

impl<'a> From<&'a RunReport> for SummaryDoc<'a> {
    fn from(report: &'a RunReport) -> Self {
        Self {
            object_type: report.object_type,
            started_at: report.started_at,
            duration_ms: report.duration.as_millis() as u64,
            success_count: report.success_count(),
            failure_count: report.failure_count(),
            successes: report.successes().collect(),
            failures: report.failures().collect(),
        }
    }
}

/// Print data as pretty-printed JSON
pub fn print_json<T: Serialize>(data: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    println!("{}", json);
    Ok(())
}

/// Print data as YAML
pub fn print_yaml<T: Serialize>(data: &T) -> anyhow::Result<()> {
    let yaml = serde_yaml::to_string(data)?;
    println!("{}", yaml);
    Ok(())
}

/// Print a success message with green checkmark
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

/// Print an error message with red X
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

/// Print an info message with blue i
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Print a warning message with yellow triangle
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message.yellow());
}

/// Format a duration for the summary footer.
pub fn format_duration(duration: Duration) -> String {
    if duration < Duration::from_secs(1) {
        return format!("{}ms", duration.as_millis());
    }

    let secs = duration.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        let m = secs / 60;
        let s = secs % 60;
        if s > 0 {
            format!("{}m {}s", m, s)
        } else {
            format!("{}m", m)
        }
    } else {
        let h = secs / 3600;
        let m = (secs % 3600) / 60;
        if m > 0 {
            format!("{}h {}m", h, m)
        } else {
            format!("{}h", h)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mimeo_common::ObjectKey;
    use std::path::PathBuf;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("YAML"), OutputFormat::Yaml);
        assert_eq!(OutputFormat::from_str("yml"), OutputFormat::Yaml);
        assert_eq!(OutputFormat::from_str("table"), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str("anything"), OutputFormat::Table);
    }

    #[test]
    fn test_rows_show_version_or_dash() {
        let success = ItemSuccess {
            key: ObjectKey::new(
                ObjectType::EnvironmentTemplates,
                "web",
                Some("1.2".to_string()),
            ),
            destination: Destination::Disk {
                path: PathBuf::from("/snap/environmenttemplates/web-1.2.json"),
            },
        };
        let row = OutcomeRow::success(&success);
        assert_eq!(row.status, "replicated");
        assert_eq!(row.object, "environmenttemplates/web");
        assert_eq!(row.version, "1.2");
        assert!(row.detail.starts_with("wrote "));

        let failure = ItemFailure::new(
            ObjectKey::unversioned(ObjectType::ComputeProfiles, "small"),
            "500: boom",
        );
        let row = OutcomeRow::failure(&failure);
        assert_eq!(row.status, "failed");
        assert_eq!(row.version, "-");
        assert_eq!(row.detail, "500: boom");
    }

    #[test]
    fn test_summary_doc_counts() {
        let mut report = RunReport::new(ObjectType::ConfigContexts);
        report.record(Ok(ItemSuccess {
            key: ObjectKey::unversioned(ObjectType::ConfigContexts, "a"),
            destination: Destination::Api,
        }));
        report.record(Err(ItemFailure::new(
            ObjectKey::unversioned(ObjectType::ConfigContexts, "b"),
            "409: exists",
        )));

        let doc = SummaryDoc::from(&report);
        assert_eq!(doc.success_count, 1);
        assert_eq!(doc.failure_count, 1);

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["object_type"], "configcontexts");
        assert_eq!(json["successes"][0]["name"], "a");
        assert_eq!(json["failures"][0]["reason"], "409: exists");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_secs(5)), "5s");
        assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
        assert_eq!(format_duration(Duration::from_secs(7200)), "2h");
    }
}
