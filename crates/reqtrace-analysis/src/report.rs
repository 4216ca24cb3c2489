//! Ledger report: all analyzers run over one consistent snapshot, formatted
//! as JSON, a text table, or Markdown.

use serde::{Deserialize, Serialize};

use reqtrace_core::{EntityCatalog, EntityId, EntityRecord, LinkRecord, TopologyEdge};

use crate::coverage::find_uncovered;
use crate::cycle::find_cycles;
use crate::health::{run_health_checks, HealthIssue};
use crate::orphan::find_orphans;

/// Output format for a ledger report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
    Markdown,
}

/// Aggregated analyzer output for one snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerReport {
    pub issues: Vec<HealthIssue>,
    pub orphans: Vec<EntityId>,
    pub cycles: Vec<Vec<EntityId>>,
    pub uncovered: Vec<EntityId>,
}

impl LedgerReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
            && self.orphans.is_empty()
            && self.cycles.is_empty()
            && self.uncovered.is_empty()
    }
}

/// Run every analyzer over the same snapshot. Pure; the caller guarantees
/// the snapshot is consistent (spec'd single-writer discipline).
#[must_use]
pub fn build_report(
    links: &[LinkRecord],
    entities: &[EntityRecord],
    edges: &[TopologyEdge],
) -> LedgerReport {
    let catalog = EntityCatalog::new(entities);
    LedgerReport {
        issues: run_health_checks(links, &catalog),
        orphans: find_orphans(entities, links, edges)
            .into_iter()
            .map(|e| e.id.clone())
            .collect(),
        cycles: find_cycles(links),
        uncovered: find_uncovered(entities, links)
            .into_iter()
            .map(|e| e.id.clone())
            .collect(),
    }
}

/// Format a report in the specified output format.
#[must_use]
pub fn format_report(report: &LedgerReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format_json(report),
        OutputFormat::Table => format_table(report),
        OutputFormat::Markdown => format_markdown(report),
    }
}

fn format_json(report: &LedgerReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}

fn format_table(report: &LedgerReport) -> String {
    if report.is_clean() {
        return "(no findings)".to_string();
    }

    let mut out = String::new();

    if !report.issues.is_empty() {
        let rows: Vec<[String; 3]> = report
            .issues
            .iter()
            .map(|i| {
                [
                    i.link_id.clone(),
                    i.severity.as_str().to_string(),
                    i.message.clone(),
                ]
            })
            .collect();

        let headers = ["link", "severity", "message"];
        let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.len());
            }
        }

        out.push_str("health issues\n");
        for (i, header) in headers.iter().enumerate() {
            out.push_str(&format!("{:<width$}  ", header, width = widths[i]));
        }
        out.push('\n');
        for (i, _) in headers.iter().enumerate() {
            out.push_str(&"-".repeat(widths[i]));
            out.push_str("  ");
        }
        out.push('\n');
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                out.push_str(&format!("{:<width$}  ", cell, width = widths[i]));
            }
            out.push('\n');
        }
        out.push('\n');
    }

    push_id_section(&mut out, "orphans", &report.orphans);
    if !report.cycles.is_empty() {
        out.push_str("cycles\n");
        for cycle in &report.cycles {
            out.push_str("  ");
            out.push_str(&join_ids(cycle, " -> "));
            out.push('\n');
        }
        out.push('\n');
    }
    push_id_section(&mut out, "uncovered requirements", &report.uncovered);

    out.trim_end().to_string()
}

fn format_markdown(report: &LedgerReport) -> String {
    let mut out = String::from("# Ledger report\n\n");

    out.push_str("## Health issues\n\n");
    if report.issues.is_empty() {
        out.push_str("_none_\n\n");
    } else {
        out.push_str("| link | severity | message |\n|---|---|---|\n");
        for issue in &report.issues {
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                issue.link_id,
                issue.severity.as_str(),
                issue.message
            ));
        }
        out.push('\n');
    }

    out.push_str("## Orphans\n\n");
    push_md_ids(&mut out, &report.orphans);

    out.push_str("## Cycles\n\n");
    if report.cycles.is_empty() {
        out.push_str("_none_\n\n");
    } else {
        for cycle in &report.cycles {
            out.push_str(&format!("- {}\n", join_ids(cycle, " -> ")));
        }
        out.push('\n');
    }

    out.push_str("## Uncovered requirements\n\n");
    push_md_ids(&mut out, &report.uncovered);

    out.trim_end().to_string()
}

fn push_id_section(out: &mut String, title: &str, ids: &[EntityId]) {
    if ids.is_empty() {
        return;
    }
    out.push_str(title);
    out.push('\n');
    for id in ids {
        out.push_str(&format!("  {id}\n"));
    }
    out.push('\n');
}

fn push_md_ids(out: &mut String, ids: &[EntityId]) {
    if ids.is_empty() {
        out.push_str("_none_\n\n");
    } else {
        for id in ids {
            out.push_str(&format!("- {id}\n"));
        }
        out.push('\n');
    }
}

fn join_ids(ids: &[EntityId], sep: &str) -> String {
    ids.iter()
        .map(EntityId::as_str)
        .collect::<Vec<_>>()
        .join(sep)
}
