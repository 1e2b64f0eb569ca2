/*============================================================
  Synavera Project: Syn-Compat
  Module: syncompat_core::logger
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Provide structured, append-only session logging for
    Syn-Compat-Core runs.

  Security / Safety Notes:
    Entries record app titles, versions and endpoint URLs
    only; no response bodies are logged.

  Dependencies:
    std::sync::Mutex, chrono for stamps, sha2 for digests.

  Operational Scope:
    One logger per invocation; the session file is sealed with
    a SHA-256 sidecar when the run completes.

  Revision History:
    2026-09-14 COD  Established logging module for Syn-Compat-Core.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Append-only logging with UTC timestamps
    - Deterministic formatting for auditability
    - Graceful error propagation on I/O failures
============================================================*/

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};

use crate::error::{Result, SyncompatError};

/// Structured log level for Syn-Compat-Core events, most severe first.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// Session logger writing `<stamp> [LEVEL] [CODE] message` lines.
pub struct Logger {
    sink: Option<Mutex<BufWriter<File>>>,
    path: Option<PathBuf>,
    /// Least severe level echoed to stderr.
    echo_level: LogLevel,
}

impl Logger {
    /// Build a logger that writes to stderr and optionally to a file.
    /// Warnings and errors always reach stderr; `verbose` echoes everything.
    pub fn new(path: Option<PathBuf>, verbose: bool) -> Result<Self> {
        let sink = match path.as_deref() {
            Some(file_path) => Some(Mutex::new(BufWriter::new(open_append(file_path)?))),
            None => None,
        };
        Ok(Self {
            sink,
            path,
            echo_level: if verbose { LogLevel::Debug } else { LogLevel::Warn },
        })
    }

    /// Session log path `<dir>/compat_<stamp>.log` for a run started at `started`.
    pub fn session_path(dir: &Path, started: DateTime<Utc>) -> PathBuf {
        dir.join(format!("compat_{}.log", started.format("%Y-%m-%d_%H-%M-%S")))
    }

    /// Emit a log entry with the given level, code, and message.
    pub fn log<S: AsRef<str>>(&self, level: LogLevel, code: &str, message: S) {
        let line = format!(
            "{} [{}] [{}] {}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            level.as_str(),
            code,
            message.as_ref()
        );

        if level <= self.echo_level {
            eprintln!("{line}");
        }

        let Some(sink) = &self.sink else {
            return;
        };
        if let Ok(mut writer) = sink.lock() {
            if writeln!(writer, "{line}").and_then(|_| writer.flush()).is_err() {
                eprintln!("[LOGGER] Failed to write session log entry");
            }
        }
    }

    pub fn info<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Info, code, message);
    }

    pub fn warn<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Warn, code, message);
    }

    pub fn error<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Error, code, message);
    }

    pub fn debug<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Debug, code, message);
    }

    /// Return the path backing this logger, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Seal the session log with a SHA-256 sidecar and return its path.
    pub fn finalize(&self) -> Result<Option<PathBuf>> {
        let Some(path) = self.path() else {
            return Ok(None);
        };
        if let Some(sink) = &self.sink {
            if let Ok(mut writer) = sink.lock() {
                writer.flush()?;
            }
        }

        let data = std::fs::read(path).map_err(|err| {
            SyncompatError::Filesystem(format!(
                "Failed to read log for hashing {}: {err}",
                path.display()
            ))
        })?;
        let digest = Sha256::digest(&data);
        let hash_path = hash_path_for(path);
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        std::fs::write(&hash_path, format!("{digest:x}  {name}\n")).map_err(|err| {
            SyncompatError::Filesystem(format!(
                "Failed to write hash file {}: {err}",
                hash_path.display()
            ))
        })?;
        Ok(Some(hash_path))
    }
}

fn open_append(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| {
            SyncompatError::Filesystem(format!(
                "Failed to create log directory {}: {err}",
                parent.display()
            ))
        })?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| {
            SyncompatError::Filesystem(format!("Failed to open log file {}: {err}", path.display()))
        })
}

fn hash_path_for(path: &Path) -> PathBuf {
    let mut hash_os = path.as_os_str().to_os_string();
    hash_os.push(".hash");
    PathBuf::from(hash_os)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn file_logger_appends_and_hashes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("compat.log");
        let logger = Logger::new(Some(path.clone()), false).unwrap();
        logger.info("INIT", "starting");
        logger.debug("VERDICT", "search → yes");
        let hash_path = logger.finalize().unwrap().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[INFO] [INIT] starting"));
        assert!(lines[1].contains("[DEBUG] [VERDICT]"));

        let digest = std::fs::read_to_string(hash_path).unwrap();
        assert!(digest.trim_end().ends_with("  compat.log"));
        assert_eq!(digest.split_whitespace().next().unwrap().len(), 64);
    }

    #[test]
    fn stderr_only_logger_has_nothing_to_seal() {
        let logger = Logger::new(None, false).unwrap();
        assert!(logger.path().is_none());
        assert!(logger.finalize().unwrap().is_none());
    }

    #[test]
    fn session_path_is_stamped() {
        let started = Utc.with_ymd_and_hms(2026, 10, 18, 9, 5, 0).unwrap();
        let path = Logger::session_path(Path::new("/var/log/syn-compat"), started);
        assert_eq!(
            path,
            PathBuf::from("/var/log/syn-compat/compat_2026-10-18_09-05-00.log")
        );
    }

    #[test]
    fn levels_order_by_severity() {
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Info < LogLevel::Debug);
    }
}
