/*============================================================
  Synavera Project: Syn-Compat
  Module: syncompat_core::main
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Entry point for Syn-Compat Core. Enumerates installed
    Splunk apps, queries Splunkbase and the premium app
    compatibility matrix, and emits a report describing which
    apps are ready for a target platform version.

  Security / Safety Notes:
    Operates within user privileges. Performs HTTPS GET
    requests and reads operator-supplied paths only.

  Dependencies:
    clap for CLI parsing, chrono for timestamps, tokio runtime.

  Operational Scope:
    Invoked by operators before a Splunk platform upgrade, or
    by automation regenerating the compatibility report.

  Revision History:
    2026-09-14 COD  Authored Syn-Compat Core runtime.
    2026-10-02 COD  Added platform version listing.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Result-first error handling with deterministic exits
    - Structured logging following Synavera cadence
    - Configurable execution via CLI and config file
============================================================*/

mod app_info;
mod batch;
mod catalog;
mod classify;
mod config;
mod docs;
mod error;
mod inventory;
mod logger;
mod report;
mod resolver;
mod version;

use std::collections::HashSet;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::Utc;
use clap::{ArgAction, Parser};

use app_info::InstalledApp;
use batch::BatchRunner;
use catalog::CatalogClient;
use classify::Classifier;
use config::{validate_target_version, SyncompatConfig};
use error::{Result, SyncompatError};
use logger::Logger;
use report::{build_report, render_summary, write_report};
use resolver::ResolveOptions;

/// Command-line arguments for Syn-Compat-Core.
#[derive(Debug, Parser)]
#[command(
    name = "Syn-Compat-Core",
    version,
    author = "Synavera Systems",
    about = "Splunk app compatibility check ahead of platform upgrades"
)]
struct Cli {
    /// Override configuration file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Splunk version you intend to upgrade to.
    #[arg(long, value_name = "VERSION")]
    target_version: Option<String>,
    /// Installed app records as JSON (`-` reads stdin).
    #[arg(long, value_name = "PATH", conflicts_with = "apps_dir")]
    apps: Option<PathBuf>,
    /// Scan a Splunk `etc/apps` directory instead of reading records.
    #[arg(long, value_name = "DIR")]
    apps_dir: Option<PathBuf>,
    /// Limit the check to specific apps.
    #[arg(long = "app", value_name = "TITLE", action = ArgAction::Append)]
    selected: Vec<String>,
    /// Only accept releases compatible with Splunk Cloud.
    #[arg(long, action = ArgAction::SetTrue)]
    cloud_compatibility_required: bool,
    /// Treat base apps as compatible instead of flagging them.
    #[arg(long, action = ArgAction::SetTrue)]
    threat_baseapp_as_compatible: bool,
    /// Override report output path.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
    /// Explicit log file path.
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,
    /// Print published Splunk versions and exit.
    #[arg(long, action = ArgAction::SetTrue)]
    list_target_versions: bool,
    /// Do not write the report; emit summary only.
    #[arg(long, action = ArgAction::SetTrue)]
    dry_run: bool,
    /// Enable verbose logging to stderr.
    #[arg(long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("[Syn-Compat-Core] {}", err);
            err.exit_code()
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = SyncompatConfig::load_from_optional_path(cli.config.as_deref())?;

    let started = Utc::now();
    let log_path = cli
        .log
        .clone()
        .unwrap_or_else(|| Logger::session_path(&config.log_dir(), started));
    let logger = Logger::new(Some(log_path), cli.verbose)?;
    logger.info("INIT", "Syn-Compat Core awakening.");

    let client = CatalogClient::new(&config.catalog, &config.docs)?;

    if cli.list_target_versions {
        let versions = client.fetch_platform_versions().await?;
        logger.info("VERSIONS", format!("Found {} platform versions", versions.len()));
        for version in versions {
            println!("{version}");
        }
        logger.finalize()?;
        return Ok(ExitCode::SUCCESS);
    }

    let options = resolve_options(&cli, &config)?;
    logger.info(
        "TARGET",
        format!(
            "target={} cloud_required={} baseapp_compatible={}",
            options.target_version,
            options.cloud_compatibility_required,
            options.threat_baseapp_as_compatible
        ),
    );

    let installed = load_inventory(&cli)?;
    logger.info("APPS", format!("Loaded {} installed app records", installed.len()));

    let selected = filter_apps(installed, &cli.selected, &logger);
    if selected.is_empty() {
        logger.warn("EMPTY", "No apps selected for compatibility check; exiting");
        logger.finalize()?;
        return Ok(ExitCode::SUCCESS);
    }

    let snapshot = match client.fetch_snapshot().await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            logger.error("FETCH", format!("Aborting batch: {err}"));
            logger.finalize()?;
            return Err(err);
        }
    };
    logger.info(
        "SOURCES",
        format!(
            "Splunkbase apps={} matrix rows={}",
            snapshot.catalog.len(),
            snapshot.matrix.len()
        ),
    );
    match snapshot.matrix.get(&options.target_version) {
        Some(row) => logger.debug(
            "MATRIX",
            format!(
                "{}: ES={:?} ITSI={:?} work={:?}",
                row.platform_version, row.security, row.it_service, row.work
            ),
        ),
        None => logger.warn(
            "MATRIX",
            format!(
                "{} not listed in the premium compatibility matrix",
                options.target_version
            ),
        ),
    }

    let snapshot = Arc::new(snapshot);
    let runner = BatchRunner::new(Classifier::new(&config.classification), options);
    let entries = runner.run_batch(selected, snapshot.clone()).await;
    let document = build_report(entries, runner.options(), &snapshot, &logger);

    if cli.dry_run {
        print!("{}", render_summary(&document));
    } else {
        let report_path = cli.report.clone().unwrap_or_else(|| config.report_path());
        write_report(&document, &report_path)?;
        logger.info("REPORT", format!("Report written to {}", report_path.display()));
    }

    logger.info(
        "SUMMARY",
        format!(
            "apps={} compatible={} incompatible={} undecided={}",
            document.metadata.total_apps,
            document.metadata.compatible,
            document.metadata.incompatible,
            document.metadata.undecided
        ),
    );
    logger.info("COMPLETE", "Compatibility assessed.");
    logger.finalize()?;

    Ok(ExitCode::SUCCESS)
}

fn resolve_options(cli: &Cli, config: &SyncompatConfig) -> Result<ResolveOptions> {
    let raw_target = cli
        .target_version
        .as_deref()
        .or(config.check.target_version.as_deref())
        .ok_or_else(|| {
            SyncompatError::Config(
                "target_version is required (--target-version or [check] target_version)".into(),
            )
        })?;

    Ok(ResolveOptions {
        target_version: validate_target_version(raw_target)?,
        cloud_compatibility_required: cli.cloud_compatibility_required
            || config.check.cloud_compatibility_required,
        threat_baseapp_as_compatible: cli.threat_baseapp_as_compatible
            || config.check.threat_baseapp_as_compatible,
        matrix_url: config.docs.matrix_url.clone(),
        support_url: config.support_url().to_string(),
    })
}

fn load_inventory(cli: &Cli) -> Result<Vec<InstalledApp>> {
    match (&cli.apps, &cli.apps_dir) {
        (Some(path), _) => inventory::load_records(path),
        (None, Some(dir)) => inventory::scan_apps_dir(dir),
        (None, None) => Err(SyncompatError::Input(
            "No inventory given; pass --apps <PATH|-> or --apps-dir <DIR>".into(),
        )),
    }
}

fn filter_apps(
    installed: Vec<InstalledApp>,
    requested: &[String],
    logger: &Logger,
) -> Vec<InstalledApp> {
    if requested.is_empty() {
        return installed;
    }

    let requested_set: HashSet<&str> = requested.iter().map(String::as_str).collect();
    let selected: Vec<InstalledApp> = installed
        .into_iter()
        .filter(|app| requested_set.contains(app.title.as_str()))
        .collect();

    let mut missing: Vec<&str> = requested_set
        .into_iter()
        .filter(|title| !selected.iter().any(|app| app.title == *title))
        .collect();
    if !missing.is_empty() {
        missing.sort_unstable();
        logger.warn(
            "APP404",
            format!("Requested apps not installed: {}", missing.join(", ")),
        );
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["syncompat_core"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("valid arguments")
    }

    #[test]
    fn cli_overrides_config_target() {
        let config = SyncompatConfig::from_toml("[check]\ntarget_version = \"9.0.0\"").unwrap();
        let options = resolve_options(&cli(&["--target-version", "9.1.2"]), &config).unwrap();
        assert_eq!(options.target_version, "9.1.2");

        let options = resolve_options(&cli(&[]), &config).unwrap();
        assert_eq!(options.target_version, "9.0.0");
    }

    #[test]
    fn missing_target_is_a_config_error() {
        let err = resolve_options(&cli(&[]), &SyncompatConfig::default()).unwrap_err();
        assert!(matches!(err, SyncompatError::Config(_)));
    }

    #[test]
    fn policy_flags_combine_with_config() {
        let config = SyncompatConfig::from_toml(
            "[check]\ncloud_compatibility_required = true",
        )
        .unwrap();
        let options = resolve_options(
            &cli(&["--target-version", "9.1", "--threat-baseapp-as-compatible"]),
            &config,
        )
        .unwrap();
        assert!(options.cloud_compatibility_required);
        assert!(options.threat_baseapp_as_compatible);
    }

    #[test]
    fn apps_and_apps_dir_conflict() {
        let parsed =
            Cli::try_parse_from(["syncompat_core", "--apps", "a.json", "--apps-dir", "/opt"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn filter_keeps_requested_apps() {
        let logger = Logger::new(None, false).unwrap();
        let installed = vec![
            InstalledApp::new("search"),
            InstalledApp::new("Splunk_TA_nix"),
        ];
        let selected = filter_apps(
            installed,
            &["Splunk_TA_nix".to_string(), "missing".to_string()],
            &logger,
        );
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].title, "Splunk_TA_nix");
    }
}
