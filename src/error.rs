/*============================================================
  Synavera Project: Syn-Compat
  Module: syncompat_core::error
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Centralise Syn-Compat-Core error types to provide consistent
    diagnostics and exit semantics.

  Security / Safety Notes:
    Error contexts expose endpoint URLs and local paths only;
    no credentials are ever part of a request.

  Dependencies:
    thiserror for ergonomic error definitions.

  Operational Scope:
    Used across modules to propagate batch-level failures.
    Per-app problems never surface here; they become
    `undecided` verdicts inside the resolver.

  Revision History:
    2026-09-14 COD  Established shared error definitions.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit error taxonomy with actionable context
    - No silent failure paths
    - Stable exit codes for operational tooling
============================================================*/

use std::io;
use std::process::ExitCode;

use thiserror::Error;

/// Result alias for Syn-Compat-Core operations.
pub type Result<T> = std::result::Result<T, SyncompatError>;

/// Enumerates high-level error domains surfaced by Syn-Compat-Core.
#[derive(Debug, Error)]
pub enum SyncompatError {
    #[error("Configuration: {0}")]
    Config(String),
    #[error("Input: {0}")]
    Input(String),
    #[error("Network: {0}")]
    Network(String),
    #[error("Serialization: {0}")]
    Serialization(String),
    #[error("Filesystem: {0}")]
    Filesystem(String),
    #[error("Runtime: {0}")]
    Runtime(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl SyncompatError {
    /// Map error category to a deterministic exit code.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            SyncompatError::Config(_) => ExitCode::from(20),
            SyncompatError::Input(_) => ExitCode::from(21),
            SyncompatError::Network(_) => ExitCode::from(30),
            SyncompatError::Serialization(_) => ExitCode::from(31),
            SyncompatError::Filesystem(_) => ExitCode::from(40),
            SyncompatError::Io(_) => ExitCode::from(41),
            SyncompatError::Runtime(_) => ExitCode::from(50),
        }
    }
}
