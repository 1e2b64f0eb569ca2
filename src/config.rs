/*============================================================
  Synavera Project: Syn-Compat
  Module: syncompat_core::config
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Load operator configuration for Syn-Compat-Core: check
    policy, endpoint settings, classification lists and
    output locations.

  Security / Safety Notes:
    Reads a single TOML file from an operator-controlled path.
    Missing files fall back to built-in defaults.

  Dependencies:
    toml + serde for parsing, dirs for XDG locations.

  Operational Scope:
    Loaded once at startup; the resulting values are immutable
    for the remainder of the invocation.

  Revision History:
    2026-09-14 COD  Authored configuration layer.
    2026-10-02 COD  Moved classification lists into config.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Defaults documented alongside their fields
    - Validation before values reach the core
============================================================*/

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, SyncompatError};
use crate::version::Version;

const APP_DIR: &str = "syn-compat";

pub const DEFAULT_SUPPORT_URL: &str =
    "https://github.com/dglauche/splunk_upgrade_app_compatibility_checker/issues";

/// Root configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SyncompatConfig {
    pub check: CheckConfig,
    pub catalog: CatalogConfig,
    pub docs: DocsConfig,
    pub classification: ClassificationConfig,
    pub report: ReportConfig,
}

/// Policy knobs for a compatibility check.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    pub target_version: Option<String>,
    pub cloud_compatibility_required: bool,
    pub threat_baseapp_as_compatible: bool,
}

/// Splunkbase catalog endpoint settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub page_size: usize,
    /// Safety ceiling; pagination normally stops at the first short page.
    pub max_apps: usize,
    pub max_parallel_requests: usize,
    /// Per-request timeout in seconds.
    pub timeout: u64,
    pub max_retries: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://splunkbase.splunk.com/api/v1/app/".into(),
            page_size: 100,
            max_apps: 20_000,
            max_parallel_requests: 8,
            timeout: 30,
            max_retries: 3,
        }
    }
}

/// Documentation endpoints (premium matrix and platform version list).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    pub matrix_url: String,
    pub versions_url: String,
    /// Per-request timeout in seconds.
    pub timeout: u64,
    pub max_retries: usize,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            matrix_url:
                "https://docs.splunk.com/Documentation/VersionCompatibility/current/Matrix/CompatMatrix"
                    .into(),
            versions_url:
                "https://docs.splunk.com/Documentation/Splunk/latest/SearchReference/Stats".into(),
            timeout: 30,
            max_retries: 3,
        }
    }
}

/// Static classification lists, overridable without a rebuild.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    pub internal_apps: Vec<String>,
    pub base_app_suffixes: Vec<String>,
    pub security_suite_apps: Vec<String>,
    pub it_suite_apps: Vec<String>,
    pub security_suite_anchor: String,
    pub it_suite_anchor: String,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            internal_apps: owned(&[
                "alert_logevent",
                "alert_webhook",
                "appsbrowser",
                "introspection_generator_addon",
                "search",
                "splunk-dashboard-studio",
                "splunk_archiver",
                "splunk_gdi",
                "splunk_instrumentation",
                "splunk_monitoring_console",
                "splunk_rapid_diag",
                "splunk_secure_gateway",
                "Splunk_TA_ueba",
                "splunk_metrics_workspace",
                "launcher",
                "learned",
                "legacy",
                "splunk_httpinput",
                "splunk_internal_metrics",
                "SplunkForwarder",
                "SplunkLightForwarder",
                "journald_input",
            ]),
            base_app_suffixes: owned(&[
                "all_forwarder_outputs_route_onprem_and_cloud",
                "all_app_props",
                "all_deploymentclient",
                "all_indexer_base",
                "all_indexes",
                "all_search_base",
                "dept_app_inputs",
                "full_license_server",
                "indexer_volume_indexes",
                "search_bundle_size_distsearch",
                "search_volume_indexes",
                "cluster_forwarder_outputs",
                "cluster_indexer_base",
                "cluster_search_base",
                "master_deploymentclient",
                "multisite_master_base",
                "site_n_indexer_base",
            ]),
            security_suite_apps: owned(&[
                "DA-ESS-AccessProtection",
                "DA-ESS-EndpointProtection",
                "DA-ESS-IdentityManagement",
                "DA-ESS-NetworkProtection",
                "DA-ESS-ThreatIntelligence",
                "SA-AccessProtection",
                "SA-AuditAndDataProtection",
                "SA-EndpointProtection",
                "SA-IdentityManagement",
                "SA-NetworkProtection",
                "SA-ThreatIntelligence",
                "SA-UEBA",
                "SA-Utils",
                "SplunkEnterpriseSecuritySuite",
            ]),
            it_suite_apps: owned(&[
                "itsi",
                "DA-ITSI-APPSERVER",
                "DA-ITSI-DATABASE",
                "DA-ITSI-EUEM",
                "DA-ITSI-LB",
                "DA-ITSI-OS",
                "DA-ITSI-STORAGE",
                "DA-ITSI-VIRTUALIZATION",
                "DA-ITSI-WEBSERVER",
                "SA-IndexCreation",
                "SA-ITOA",
                "SA-ITSI-ATAD",
                "SA-ITSI-CustomModuleViz",
                "SA-ITSI-Licensechecker",
                "SA-ITSI-MetricAD",
                "SA-UserAccess",
            ]),
            security_suite_anchor: "SplunkEnterpriseSecuritySuite".into(),
            it_suite_anchor: "itsi".into(),
        }
    }
}

/// Output locations and operator-facing links.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub path: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub support_url: Option<String>,
}

impl SyncompatConfig {
    /// Load configuration from `path`, or from the default location when
    /// `path` is `None`. A missing default file yields built-in defaults;
    /// a missing explicit file is an error.
    pub fn load_from_optional_path(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match default_config_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if explicit {
                return Err(SyncompatError::Config(format!(
                    "Configuration file {} does not exist",
                    path.display()
                )));
            }
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path).map_err(|err| {
            SyncompatError::Filesystem(format!(
                "Failed to read configuration {}: {err}",
                path.display()
            ))
        })?;
        Self::from_toml(&raw).map_err(|err| match err {
            SyncompatError::Config(msg) => {
                SyncompatError::Config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(raw: &str) -> Result<Self> {
        let mut config: SyncompatConfig =
            toml::from_str(raw).map_err(|err| SyncompatError::Config(err.to_string()))?;
        config.normalise();
        Ok(config)
    }

    fn normalise(&mut self) {
        self.catalog.page_size = self.catalog.page_size.max(1);
        self.catalog.max_parallel_requests = self.catalog.max_parallel_requests.max(1);
        self.catalog.max_retries = self.catalog.max_retries.max(1);
        self.docs.max_retries = self.docs.max_retries.max(1);
    }

    /// Report output path, defaulting to the XDG data directory.
    pub fn report_path(&self) -> PathBuf {
        self.report.path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
                .join("report.json")
        })
    }

    /// Log directory, defaulting to the XDG state directory.
    pub fn log_dir(&self) -> PathBuf {
        self.report.log_dir.clone().unwrap_or_else(|| {
            dirs::state_dir()
                .or_else(dirs::data_dir)
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
                .join("logs")
        })
    }

    pub fn support_url(&self) -> &str {
        self.report
            .support_url
            .as_deref()
            .unwrap_or(DEFAULT_SUPPORT_URL)
    }
}

/// Validate an operator-supplied target platform version.
pub fn validate_target_version(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    match Version::parse(trimmed) {
        Some(version) if version.precision() >= 2 => Ok(trimmed.to_string()),
        _ => Err(SyncompatError::Config(format!(
            "target_version `{raw}` must be a dotted version such as 9.1 or 9.1.2"
        ))),
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_yields_defaults() {
        let config = SyncompatConfig::from_toml("").unwrap();
        assert_eq!(config.catalog.page_size, 100);
        assert!(!config.check.cloud_compatibility_required);
        assert!(!config.check.threat_baseapp_as_compatible);
        assert!(config
            .classification
            .security_suite_apps
            .iter()
            .any(|app| app == "SA-UEBA"));
        assert_eq!(config.support_url(), DEFAULT_SUPPORT_URL);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = SyncompatConfig::from_toml(
            r#"
            [check]
            target_version = "9.1.2"
            threat_baseapp_as_compatible = true

            [catalog]
            page_size = 0
            timeout = 5

            [classification]
            internal_apps = ["search"]
            "#,
        )
        .unwrap();
        assert_eq!(config.check.target_version.as_deref(), Some("9.1.2"));
        assert!(config.check.threat_baseapp_as_compatible);
        assert_eq!(config.catalog.page_size, 1);
        assert_eq!(config.catalog.timeout, 5);
        assert_eq!(config.catalog.max_parallel_requests, 8);
        assert_eq!(config.classification.internal_apps, vec!["search"]);
        assert!(!config.classification.base_app_suffixes.is_empty());
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = SyncompatConfig::from_toml("[check\n").unwrap_err();
        assert!(matches!(err, SyncompatError::Config(_)));
    }

    #[test]
    fn explicit_missing_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let err = SyncompatConfig::load_from_optional_path(Some(&missing)).unwrap_err();
        assert!(matches!(err, SyncompatError::Config(_)));
    }

    #[test]
    fn explicit_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[report]\nsupport_url = \"https://example.invalid/help\"").unwrap();
        let config = SyncompatConfig::load_from_optional_path(Some(file.path())).unwrap();
        assert_eq!(config.support_url(), "https://example.invalid/help");
    }

    #[test]
    fn target_version_validation() {
        assert_eq!(validate_target_version(" 9.1.2 ").unwrap(), "9.1.2");
        assert!(validate_target_version("9.1").is_ok());
        assert!(validate_target_version("9").is_err());
        assert!(validate_target_version("latest").is_err());
    }
}
