//! Rendering scan and diff results as text or JSON.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use console::style;
use depscope_graph::{Descriptor, GraphSnapshot, IssueKind, JoinedRecord, ScanIssue};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::Result;

/// Serializable view of a scan with root-relative paths.
#[derive(Debug, Serialize)]
pub struct ScanReport<'a> {
    pub root: String,
    pub entry: String,
    pub nodes: BTreeMap<String, NodeReport<'a>>,
    pub issues: &'a [ScanIssue],
}

#[derive(Debug, Serialize)]
pub struct NodeReport<'a> {
    pub descriptor: &'a Descriptor,
    pub dependents: Vec<String>,
}

impl<'a> ScanReport<'a> {
    pub fn new(snapshot: &'a GraphSnapshot, issues: &'a [ScanIssue]) -> Self {
        let nodes = snapshot
            .nodes
            .iter()
            .map(|(path, node)| {
                let report = NodeReport {
                    descriptor: &node.descriptor,
                    dependents: node
                        .dependents
                        .iter()
                        .map(|d| snapshot.display_path(d))
                        .collect(),
                };
                (snapshot.display_path(path), report)
            })
            .collect();

        Self {
            root: snapshot.root.display().to_string(),
            entry: snapshot.display_path(&snapshot.entry),
            nodes,
            issues,
        }
    }
}

/// One joined record, optionally with the size of its transitive impact.
#[derive(Debug, Serialize)]
pub struct DiffEntry<'a> {
    #[serde(flatten)]
    pub record: &'a JoinedRecord,

    /// Number of files that reach this one through any chain of imports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impacted: Option<usize>,
}

/// Render a finished scan.
pub fn render_scan(
    snapshot: &GraphSnapshot,
    issues: &[ScanIssue],
    format: OutputFormat,
    color: bool,
) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&ScanReport::new(snapshot, issues))?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Text => Ok(scan_text(snapshot, color)),
    }
}

fn scan_text(snapshot: &GraphSnapshot, color: bool) -> String {
    let mut out = String::new();

    for (path, node) in &snapshot.nodes {
        let name = snapshot.display_path(path);
        if *path == snapshot.entry {
            let _ = writeln!(
                out,
                "{} {}",
                style(name).bold().force_styling(color),
                style("(entry)").dim().force_styling(color)
            );
        } else {
            let _ = writeln!(out, "{}", style(name).bold().force_styling(color));
        }

        write_descriptor(&mut out, &node.descriptor, color);

        if !node.dependents.is_empty() {
            let dependents: Vec<String> = node
                .dependents
                .iter()
                .map(|d| snapshot.display_path(d))
                .collect();
            let _ = writeln!(
                out,
                "  {} {}",
                style("imported by:").dim().force_styling(color),
                dependents.join(", ")
            );
        }
    }

    out
}

/// Render joined diff records.
///
/// With `transitive`, each record also reports how many files reach it.
pub fn render_diff(
    records: &[JoinedRecord],
    snapshot: &GraphSnapshot,
    transitive: bool,
    format: OutputFormat,
    color: bool,
) -> Result<String> {
    let entries: Vec<DiffEntry<'_>> = records
        .iter()
        .map(|record| DiffEntry {
            record,
            impacted: transitive.then(|| impacted_count(record, snapshot)),
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&entries)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Text => Ok(diff_text(&entries, color)),
    }
}

fn impacted_count(record: &JoinedRecord, snapshot: &GraphSnapshot) -> usize {
    snapshot
        .lookup(Path::new(&record.path))
        .map(|(path, _)| snapshot.transitive_dependents(path).len())
        .unwrap_or_default()
}

fn diff_text(entries: &[DiffEntry<'_>], color: bool) -> String {
    let mut out = String::new();

    for entry in entries {
        let record = entry.record;
        let change = record
            .meta
            .get("type")
            .and_then(|value| value.as_str())
            .unwrap_or("changed");

        let _ = writeln!(
            out,
            "{} {}",
            style(format!("[{change}]")).cyan().force_styling(color),
            style(&record.path).bold().force_styling(color)
        );

        if let Some(from) = record.meta.get("from").and_then(|value| value.as_str()) {
            let _ = writeln!(out, "  {} {from}", style("from:").dim().force_styling(color));
        }

        write_descriptor(&mut out, &record.descriptor, color);

        let dependents = if record.dependents.is_empty() {
            "-".to_string()
        } else {
            record.dependents.join(", ")
        };
        let _ = writeln!(
            out,
            "  {} {dependents}",
            style("imported by:").dim().force_styling(color)
        );

        if let Some(impacted) = entry.impacted {
            let _ = writeln!(
                out,
                "  {} {impacted} file(s)",
                style("impacts:").dim().force_styling(color)
            );
        }
    }

    out
}

fn write_descriptor(out: &mut String, descriptor: &Descriptor, color: bool) {
    for (key, value) in descriptor {
        if value.is_empty() {
            let _ = writeln!(out, "  {}", style(format!("@{key}")).green().force_styling(color));
        } else {
            let _ = writeln!(
                out,
                "  {} {value}",
                style(format!("@{key}:")).green().force_styling(color)
            );
        }
    }
}

/// One-line summary: file count and issue counts by kind.
pub fn summary(snapshot: &GraphSnapshot, issues: &[ScanIssue]) -> String {
    let mut line = format!(
        "{} file(s) reachable from {}",
        snapshot.len(),
        snapshot.display_path(&snapshot.entry)
    );

    if !issues.is_empty() {
        let mut counts: BTreeMap<IssueKind, usize> = BTreeMap::new();
        for issue in issues {
            *counts.entry(issue.kind).or_default() += 1;
        }
        let parts: Vec<String> = counts
            .iter()
            .map(|(kind, count)| format!("{count} {kind}"))
            .collect();
        let _ = write!(line, ", {} issue(s) ({})", issues.len(), parts.join(", "));
    }

    line
}
