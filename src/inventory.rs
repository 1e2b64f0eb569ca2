/*============================================================
  Synavera Project: Syn-Compat
  Module: syncompat_core::inventory
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Enumerate installed Splunk apps, either from exported
    search records (JSON) or by scanning an `etc/apps`
    directory for `app.conf` files.

  Security / Safety Notes:
    Read-only access to operator-supplied paths. Nothing found
    inside app directories is executed.

  Dependencies:
    serde_json for record parsing.

  Operational Scope:
    Supplies Syn-Compat-Core with the local inventory that is
    checked against Splunkbase and the premium matrix.

  Revision History:
    2026-09-14 COD  Crafted inventory loaders.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Structured parsing with clear failure modes
    - Deterministic ordering of enumerated apps
============================================================*/

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde_json::Map;

use crate::app_info::InstalledApp;
use crate::error::{Result, SyncompatError};

/// Load app records from a JSON file, or from stdin when `path` is `-`.
pub fn load_records(path: &Path) -> Result<Vec<InstalledApp>> {
    let raw = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(path).map_err(|err| {
            SyncompatError::Filesystem(format!(
                "Failed to read app records {}: {err}",
                path.display()
            ))
        })?
    };
    parse_records(&raw)
}

/// Parse app records.
///
/// Accepts a JSON array of records or newline-delimited JSON as produced
/// by a Splunk search export, where each line is either a record or an
/// object wrapping it under `result`.
pub fn parse_records(raw: &str) -> Result<Vec<InstalledApp>> {
    let trimmed = raw.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        return serde_json::from_str::<Vec<InstalledApp>>(trimmed)
            .map_err(|err| SyncompatError::Input(format!("Invalid app record array: {err}")));
    }

    let mut apps = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record = serde_json::from_str::<ExportLine>(line).map_err(|err| {
            SyncompatError::Input(format!("Invalid app record on line {}: {err}", idx + 1))
        })?;
        apps.push(record.into_app());
    }
    Ok(apps)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExportLine {
    Wrapped { result: InstalledApp },
    Bare(InstalledApp),
}

impl ExportLine {
    fn into_app(self) -> InstalledApp {
        match self {
            ExportLine::Wrapped { result } => result,
            ExportLine::Bare(app) => app,
        }
    }
}

/// Enumerate apps installed under a Splunk `etc/apps` directory.
///
/// The directory name is the app title; `[launcher] version` and
/// `[ui] label` come from `default/app.conf`, overridden by
/// `local/app.conf`.
pub fn scan_apps_dir(dir: &Path) -> Result<Vec<InstalledApp>> {
    let entries = std::fs::read_dir(dir).map_err(|err| {
        SyncompatError::Filesystem(format!(
            "Failed to read apps directory {}: {err}",
            dir.display()
        ))
    })?;

    let mut apps = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let title = entry.file_name().to_string_lossy().to_string();
        if title.starts_with('.') {
            continue;
        }

        let mut settings = AppConf::default();
        for layer in ["default", "local"] {
            let conf_path = entry.path().join(layer).join("app.conf");
            if conf_path.is_file() {
                let raw = std::fs::read_to_string(&conf_path).map_err(|err| {
                    SyncompatError::Filesystem(format!(
                        "Failed to read {}: {err}",
                        conf_path.display()
                    ))
                })?;
                settings.merge(parse_app_conf(&raw));
            }
        }

        apps.push(InstalledApp {
            title,
            label: settings.get("ui", "label"),
            version: settings.get("launcher", "version"),
            update_homepage: None,
            extra: Map::new(),
        });
    }

    apps.sort_by(|a, b| a.title.cmp(&b.title));
    Ok(apps)
}

/// Stanza → key → value view of an `app.conf` file.
#[derive(Debug, Default)]
struct AppConf {
    stanzas: HashMap<String, HashMap<String, String>>,
}

impl AppConf {
    fn merge(&mut self, other: AppConf) {
        for (stanza, values) in other.stanzas {
            self.stanzas.entry(stanza).or_default().extend(values);
        }
    }

    fn get(&self, stanza: &str, key: &str) -> Option<String> {
        self.stanzas
            .get(stanza)
            .and_then(|values| values.get(key))
            .filter(|value| !value.is_empty())
            .cloned()
    }
}

fn parse_app_conf(raw: &str) -> AppConf {
    let mut conf = AppConf::default();
    let mut stanza = String::from("default");
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            stanza = name.trim().to_string();
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            conf.stanzas
                .entry(stanza.clone())
                .or_default()
                .insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    conf
}
