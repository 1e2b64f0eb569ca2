/*============================================================
  Synavera Project: Syn-Compat
  Module: syncompat_core::report
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Construct the Syn-Compat report: every installed app record
    augmented with its compatibility verdict, plus run metadata.

  Security / Safety Notes:
    Report data is written to operator-controlled paths; no
    privileged operations are performed.

  Dependencies:
    serde for JSON serialization, chrono for timestamps.

  Operational Scope:
    Consumed by operators or dashboards planning an upgrade.

  Revision History:
    2026-09-14 COD  Authored report builder.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Output records keep the input field names
    - Rich metadata for audit and observability
============================================================*/

use std::fs::File;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::app_info::{AppVerdict, Compatibility, InstalledApp, VERDICT_FIELDS};
use crate::batch::BatchEntry;
use crate::catalog::Snapshot;
use crate::error::{Result, SyncompatError};
use crate::logger::Logger;
use crate::resolver::ResolveOptions;

/// Wrapper representing the full report document.
#[derive(Debug, Serialize)]
pub struct ReportDocument {
    pub metadata: ReportMetadata,
    pub apps: Vec<ReportEntry>,
}

/// Metadata block describing report context.
#[derive(Debug, Serialize)]
pub struct ReportMetadata {
    pub generated_at: String,
    pub generated_by: String,
    pub target_version: String,
    pub cloud_compatibility_required: bool,
    pub total_apps: usize,
    pub compatible: usize,
    pub incompatible: usize,
    pub undecided: usize,
    pub catalog_apps: usize,
    pub matrix_rows: usize,
}

/// Input record augmented with its verdict fields.
#[derive(Debug, Serialize)]
pub struct ReportEntry {
    #[serde(flatten)]
    pub app: InstalledApp,
    #[serde(flatten)]
    pub verdict: AppVerdict,
}

/// Build a report from resolved batch entries.
pub fn build_report(
    entries: Vec<BatchEntry>,
    options: &ResolveOptions,
    snapshot: &Snapshot,
    logger: &Logger,
) -> ReportDocument {
    let mut compatible = 0usize;
    let mut incompatible = 0usize;
    let mut undecided = 0usize;
    let mut apps = Vec::with_capacity(entries.len());

    for entry in entries {
        match entry.verdict.compatibility {
            Compatibility::Yes => compatible += 1,
            Compatibility::No => incompatible += 1,
            Compatibility::Undecided => undecided += 1,
        }
        logger.debug(
            "VERDICT",
            format!(
                "{} ({:?}) → {}",
                entry.app.title,
                entry.category,
                entry.verdict.compatibility.as_str()
            ),
        );
        let mut app = entry.app;
        // Stale verdict fields from a previous report are replaced.
        for field in VERDICT_FIELDS {
            app.extra.remove(field);
        }
        apps.push(ReportEntry {
            app,
            verdict: entry.verdict,
        });
    }

    let metadata = ReportMetadata {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        generated_by: "syncompat_core".to_string(),
        target_version: options.target_version.clone(),
        cloud_compatibility_required: options.cloud_compatibility_required,
        total_apps: apps.len(),
        compatible,
        incompatible,
        undecided,
        catalog_apps: snapshot.catalog.len(),
        matrix_rows: snapshot.matrix.len(),
    };

    ReportDocument { metadata, apps }
}

/// Persist the report to the given path.
pub fn write_report(document: &ReportDocument, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| {
            SyncompatError::Filesystem(format!(
                "Failed to create report directory {}: {err}",
                parent.display()
            ))
        })?;
    }
    let file = File::create(path).map_err(|err| {
        SyncompatError::Filesystem(format!(
            "Failed to create report file {}: {err}",
            path.display()
        ))
    })?;
    serde_json::to_writer_pretty(file, document).map_err(|err| {
        SyncompatError::Filesystem(format!("Failed to write report {}: {err}", path.display()))
    })?;
    Ok(())
}

/// Render the console summary used for dry runs.
pub fn render_summary(document: &ReportDocument) -> String {
    let meta = &document.metadata;
    let mut out = format!(
        "→ Compatibility dry-run for {}. Apps={} Compatible={} Incompatible={} Undecided={}\n",
        meta.target_version, meta.total_apps, meta.compatible, meta.incompatible, meta.undecided
    );
    for entry in &document.apps {
        out.push_str(&format!(
            "  {} [{}]\n    {}\n",
            entry.app.title,
            entry.verdict.compatibility.as_str(),
            entry.verdict.status.replace('\n', "\n    ")
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Category;

    fn options() -> ResolveOptions {
        ResolveOptions {
            target_version: "9.1.0".into(),
            cloud_compatibility_required: false,
            threat_baseapp_as_compatible: false,
            matrix_url: String::new(),
            support_url: String::new(),
        }
    }

    fn entries() -> Vec<BatchEntry> {
        vec![
            BatchEntry {
                app: InstalledApp::new("search").with_version("9.1.0"),
                category: Category::Internal,
                verdict: AppVerdict::yes("internal"),
            },
            BatchEntry {
                app: InstalledApp::new("TA-old").with_version("1.0.0"),
                category: Category::Regular,
                verdict: AppVerdict::no("update")
                    .with_note("the most recent compatible version is 2.0.0"),
            },
            BatchEntry {
                app: InstalledApp::new("SA-UEBA"),
                category: Category::Regular,
                verdict: AppVerdict::undecided("no version").premium(),
            },
        ]
    }

    #[test]
    fn counts_verdicts_and_flattens_records() {
        let logger = Logger::new(None, false).unwrap();
        let document = build_report(entries(), &options(), &Snapshot::default(), &logger);
        assert_eq!(document.metadata.total_apps, 3);
        assert_eq!(document.metadata.compatible, 1);
        assert_eq!(document.metadata.incompatible, 1);
        assert_eq!(document.metadata.undecided, 1);

        let value = serde_json::to_value(&document).unwrap();
        let first = &value["apps"][0];
        assert_eq!(first["title"], "search");
        assert_eq!(first["version"], "9.1.0");
        assert_eq!(first["already_compatible"], "yes");
        assert_eq!(first["is_premium_app"], "0");
        assert_eq!(value["apps"][2]["is_premium_app"], "1");
    }

    #[test]
    fn input_fields_are_carried_into_the_report() {
        let logger = Logger::new(None, false).unwrap();
        let app: InstalledApp = serde_json::from_value(serde_json::json!({
            "title": "Splunk_TA_nix",
            "version": "8.7.0",
            "disabled": "0",
            "author": "Splunk",
            "already_compatible": "yes"
        }))
        .unwrap();
        let entries = vec![BatchEntry {
            app,
            category: Category::Regular,
            verdict: AppVerdict::no("update"),
        }];
        let document = build_report(entries, &options(), &Snapshot::default(), &logger);

        let raw = serde_json::to_string(&document).unwrap();
        assert_eq!(raw.matches("\"already_compatible\"").count(), 1);
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let record = &value["apps"][0];
        assert_eq!(record["disabled"], "0");
        assert_eq!(record["author"], "Splunk");
        assert_eq!(record["already_compatible"], "no");
    }

    #[test]
    fn writes_report_file() {
        let logger = Logger::new(None, false).unwrap();
        let document = build_report(entries(), &options(), &Snapshot::default(), &logger);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");
        write_report(&document, &path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["metadata"]["target_version"], "9.1.0");
    }

    #[test]
    fn summary_indents_follow_up_lines() {
        let logger = Logger::new(None, false).unwrap();
        let document = build_report(entries(), &options(), &Snapshot::default(), &logger);
        let summary = render_summary(&document);
        assert!(summary.contains("Apps=3 Compatible=1 Incompatible=1 Undecided=1"));
        assert!(summary.contains("\n        the most recent compatible version is 2.0.0"));
    }
}
