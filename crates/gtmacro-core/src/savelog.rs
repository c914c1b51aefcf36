// Gtmacro Console Log
// Appends every console line to a per-player log file; degrades to a no-op

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::host::Host;

/// Errors that can occur when opening the log file
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Persistent copy of the in-client console
#[derive(Debug, Default)]
pub struct ConsoleLog {
    file: Option<Mutex<File>>,
    path: Option<PathBuf>,
}

impl ConsoleLog {
    /// A log that records nothing
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Log file path for a player: `<dir>/<player>.log`
    pub fn path_for(dir: &Path, player: &str) -> PathBuf {
        let player = player.trim();
        let stem = if player.is_empty() { "unknown" } else { player };
        dir.join(format!("{}.log", stem))
    }

    /// Open (append/create) the player's log file, creating the directory
    pub fn open(dir: &Path, player: &str) -> Result<Self, LogError> {
        fs::create_dir_all(dir).map_err(|source| LogError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = Self::path_for(dir, player);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LogError::Open {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            file: Some(Mutex::new(file)),
            path: Some(path),
        })
    }

    /// Open the log, telling the player where it goes or that it failed
    ///
    /// A failure is reported once through a notification and leaves a
    /// disabled log behind; the rest of the add-ons keep working.
    pub fn open_or_notify(dir: &Path, player: &str, host: &dyn Host) -> Self {
        match Self::open(dir, player) {
            Ok(log) => {
                if let Some(path) = &log.path {
                    host.notify(&format!("Logging to {}", path.display()));
                }
                log
            }
            Err(e) => {
                log::warn!("{}", e);
                host.notify("Failed to open log file");
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append one timestamped line
    pub fn record(&self, text: &str) {
        let Some(file) = &self.file else {
            return;
        };
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let entry = format!("[{}] {}\n", timestamp, text);
        if let Err(e) = file.lock().write_all(entry.as_bytes()) {
            log::debug!("console log write failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostCall, RecordingHost};

    #[test]
    fn test_path_for_unknown_player() {
        let dir = Path::new("logs");
        assert_eq!(ConsoleLog::path_for(dir, ""), PathBuf::from("logs/unknown.log"));
        assert_eq!(ConsoleLog::path_for(dir, "Alice"), PathBuf::from("logs/Alice.log"));
    }

    #[test]
    fn test_record_appends_timestamped_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = ConsoleLog::open(&dir.path().join("logs"), "Alice").unwrap();
        log.record("* Healing Bob");
        log.record("* Radium Mode");

        let content = fs::read_to_string(log.path().unwrap()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("] * Healing Bob"));
        assert!(lines[1].ends_with("] * Radium Mode"));
    }

    #[test]
    fn test_open_failure_degrades_to_noop() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the directory should be
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "x").unwrap();

        let host = RecordingHost::new("Alice");
        let log = ConsoleLog::open_or_notify(&blocker, "Alice", &host);
        assert!(!log.is_enabled());
        log.record("ignored");
        assert_eq!(host.calls(), vec![HostCall::Notify("Failed to open log file".to_string())]);
    }

    #[test]
    fn test_open_success_notifies_path() {
        let dir = tempfile::tempdir().unwrap();
        let host = RecordingHost::new("Alice");
        let log = ConsoleLog::open_or_notify(dir.path(), "Alice", &host);
        assert!(log.is_enabled());
        match &host.calls()[0] {
            HostCall::Notify(text) => assert!(text.starts_with("Logging to ")),
            other => panic!("unexpected call {:?}", other),
        }
    }
}
