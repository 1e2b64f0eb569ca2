/*============================================================
  Synavera Project: Syn-Compat
  Module: syncompat_core::app_info
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Shared structures describing an installed Splunk app and
    the compatibility verdict computed for it.

  Security / Safety Notes:
    Pure data container; no I/O performed in this module.

  Dependencies:
    serde and serde_json for record input and report output.

  Operational Scope:
    Used by inventory loading, the resolver, the batch runner
    and report construction.

  Revision History:
    2026-09-14 COD  Introduced InstalledApp and AppVerdict types.
    2026-10-18 COD  Carry unmodelled record fields into reports.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Clear data contracts between modules
    - Inputs are never mutated; verdicts are new values
============================================================*/

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Identity record for one app found on the local instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledApp {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(
        default,
        rename = "update.homepage",
        skip_serializing_if = "Option::is_none"
    )]
    pub update_homepage: Option<String>,
    /// Remaining input fields, carried through to the report untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
impl InstalledApp {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            label: None,
            version: None,
            update_homepage: None,
            extra: Map::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl InstalledApp {
    /// Installed version, treating blank values as absent.
    pub fn installed_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .map(str::trim)
            .filter(|version| !version.is_empty())
    }

    /// Display label, treating blank values as absent.
    pub fn display_label(&self) -> Option<&str> {
        self.label
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
    }
}

/// Output field names owned by [`AppVerdict`].
pub const VERDICT_FIELDS: [&str; 4] =
    ["status", "already_compatible", "is_premium_app", "is_baseapp"];

/// Tri-state compatibility outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Compatibility {
    Yes,
    No,
    Undecided,
}

impl Compatibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Compatibility::Yes => "yes",
            Compatibility::No => "no",
            Compatibility::Undecided => "undecided",
        }
    }

    /// Leading glyph for status narratives.
    pub fn glyph(self) -> &'static str {
        match self {
            Compatibility::Yes => "✅",
            Compatibility::No | Compatibility::Undecided => "🛑",
        }
    }
}

/// Resolution result for one app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppVerdict {
    pub status: String,
    #[serde(rename = "already_compatible")]
    pub compatibility: Compatibility,
    #[serde(rename = "is_premium_app", serialize_with = "serialize_flag")]
    pub is_premium: bool,
    #[serde(rename = "is_baseapp", serialize_with = "serialize_flag")]
    pub is_baseapp: bool,
}

impl AppVerdict {
    /// Build a verdict whose narrative starts with the matching glyph.
    pub fn new(compatibility: Compatibility, message: impl AsRef<str>) -> Self {
        Self {
            status: format!("{} {}", compatibility.glyph(), message.as_ref()),
            compatibility,
            is_premium: false,
            is_baseapp: false,
        }
    }

    pub fn yes(message: impl AsRef<str>) -> Self {
        Self::new(Compatibility::Yes, message)
    }

    pub fn no(message: impl AsRef<str>) -> Self {
        Self::new(Compatibility::No, message)
    }

    pub fn undecided(message: impl AsRef<str>) -> Self {
        Self::new(Compatibility::Undecided, message)
    }

    /// Append an indented follow-up line to the narrative.
    pub fn with_note(mut self, note: impl AsRef<str>) -> Self {
        self.status.push_str("\n    ");
        self.status.push_str(note.as_ref());
        self
    }

    pub fn premium(mut self) -> Self {
        self.is_premium = true;
        self
    }

    pub fn baseapp(mut self) -> Self {
        self.is_baseapp = true;
        self
    }
}

fn serialize_flag<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *flag { "1" } else { "0" })
}
