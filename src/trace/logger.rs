use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::trace::trace::TraceEvent;

/// Appends one JSON line per handled page event. Never fails the caller: a
/// sink that cannot be opened or written only produces a warning.
pub struct TraceLogger {
    sink: Option<TraceSink>,
}

struct TraceSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl TraceLogger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();

        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => Self {
                sink: Some(TraceSink {
                    path,
                    file: Mutex::new(file),
                }),
            },
            Err(e) => {
                eprintln!(
                    "Warning: could not open trace file '{}': {}",
                    path.display(),
                    e
                );
                Self::disabled()
            }
        }
    }

    /// A logger that drops every event.
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.sink.as_ref().map(|s| s.path.as_path())
    }

    pub fn log(&self, event: &TraceEvent) {
        let Some(sink) = &self.sink else {
            return;
        };

        let line = match serde_json::to_string(event) {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Warning: dropping '{}' trace event: {}", event.event, e);
                return;
            }
        };

        let Ok(mut file) = sink.file.lock() else {
            eprintln!("Warning: trace file '{}' is poisoned", sink.path.display());
            return;
        };

        if let Err(e) = writeln!(file, "{}", line) {
            eprintln!(
                "Warning: failed to append to trace file '{}': {}",
                sink.path.display(),
                e
            );
        }
    }
}
