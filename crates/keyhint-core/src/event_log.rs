// Keyhint Event Log
// Append-only JSON-lines record of normalized input events

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::charmap::{char_of, name_of};
use crate::input::MouseButton;
use crate::modifier::ModifierState;
use crate::{Action, VirtualKey};

/// Default log file, read by the suggestion generator
pub const DEFAULT_LOG_FILE: &str = "input_events.txt";

#[derive(Debug, thiserror::Error)]
pub enum EventLogError {
    #[error("Failed to write event log {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode log record: {0}")]
    Encode(#[from] serde_json::Error),
}

// Field order is part of the file format
#[derive(Serialize)]
struct KeyboardRecord {
    timestamp: u64,
    #[serde(rename = "type")]
    kind: &'static str,
    action: String,
    key: String,
    #[serde(rename = "char")]
    character: Option<char>,
}

#[derive(Serialize)]
struct MouseRecord {
    timestamp: u64,
    #[serde(rename = "type")]
    kind: &'static str,
    action: String,
    x: i32,
    y: i32,
}

/// Writes one JSON object per line.
///
/// Every call opens the file for append, writes the record and syncs it to
/// disk before returning; nothing is buffered between calls.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> EventLogError {
        EventLogError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Truncate the log. Called once at startup.
    pub fn clear(&self) -> Result<(), EventLogError> {
        File::create(&self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }

    fn append<T: Serialize>(&self, record: &T) -> Result<(), EventLogError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        file.write_all(line.as_bytes())
            .and_then(|_| file.flush())
            .and_then(|_| file.sync_data())
            .map_err(|e| self.io_error(e))
    }

    /// Log a key transition. `char` is null for non-printable keys.
    pub fn log_keyboard(
        &self,
        timestamp: u64,
        key: VirtualKey,
        is_key_up: bool,
        modifiers: &ModifierState,
    ) -> Result<(), EventLogError> {
        self.append(&KeyboardRecord {
            timestamp,
            kind: "keyboard",
            action: Action::from_key_up(is_key_up).to_string(),
            key: name_of(key),
            character: char_of(key, modifiers),
        })
    }

    pub fn log_mouse_button(
        &self,
        timestamp: u64,
        button: MouseButton,
        is_button_up: bool,
        position: (i32, i32),
    ) -> Result<(), EventLogError> {
        let direction = if is_button_up { "up" } else { "down" };
        self.append(&MouseRecord {
            timestamp,
            kind: "mouse",
            action: format!("{}{}", button, direction),
            x: position.0,
            y: position.1,
        })
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_FILE)
    }
}
