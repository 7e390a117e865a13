//! Log sinks and their configuration

use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use crate::error::{Error, Result};

use super::levels::{Level, LevelSpec};
use super::queue::queue_sender;
use super::record::LogRecord;

/// Serializable description of one sink
///
/// `kind` is `stream`, `file` or `queue`. For streams `path` selects
/// `stderr` (default) or `stdout`; for files it is the file to append to,
/// relative paths being resolved against the logger folder; for queues it
/// is the name of a registered queue. `levels`, when set, is the exhaustive
/// list of levels the sink accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlerConfig {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub levels: Option<Vec<LevelSpec>>,
}

impl HandlerConfig {
    pub fn stream() -> Self {
        Self {
            kind: "stream".to_string(),
            path: None,
            levels: None,
        }
    }

    pub fn stdout() -> Self {
        Self {
            path: Some("stdout".to_string()),
            ..Self::stream()
        }
    }

    pub fn file(path: impl Into<String>) -> Self {
        Self {
            kind: "file".to_string(),
            path: Some(path.into()),
            levels: None,
        }
    }

    pub fn queue(name: impl Into<String>) -> Self {
        Self {
            kind: "queue".to_string(),
            path: Some(name.into()),
            levels: None,
        }
    }

    pub fn with_levels<L: Into<LevelSpec>>(mut self, levels: impl IntoIterator<Item = L>) -> Self {
        self.levels = Some(levels.into_iter().map(Into::into).collect());
        self
    }
}

/// Filter letting through an exhaustive set of levels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelsFilter {
    levels: Vec<Level>,
}

impl LevelsFilter {
    pub fn new(levels: &[LevelSpec]) -> Result<Self> {
        let levels = levels
            .iter()
            .map(LevelSpec::resolve)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { levels })
    }

    pub fn passes(&self, level: Level) -> bool {
        self.levels.contains(&level)
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }
}

enum Sink {
    Stderr,
    Stdout,
    File(Mutex<File>),
    Queue { name: String, sender: Sender<LogRecord> },
}

/// A built sink with its optional levels filter
pub(crate) struct Handler {
    sink: Sink,
    filter: Option<LevelsFilter>,
}

impl Handler {
    pub(crate) fn build(config: &HandlerConfig, folder: &Path) -> Result<Self> {
        let sink = match config.kind.as_str() {
            "stream" => match config.path.as_deref() {
                None | Some("stderr") => Sink::Stderr,
                Some("stdout") => Sink::Stdout,
                Some(other) => {
                    return Err(Error::value_error(format!(
                        "Invalid stream: \"{}\" (expected \"stdout\" or \"stderr\")",
                        other
                    )))
                }
            },
            "file" => {
                let path = config
                    .path
                    .as_deref()
                    .ok_or_else(|| Error::value_error("File handler requires a path."))?;
                let path = folder.join(path);
                let file = OpenOptions::new().create(true).append(true).open(&path)?;
                Sink::File(Mutex::new(file))
            }
            "queue" => {
                let name = config
                    .path
                    .as_deref()
                    .ok_or_else(|| Error::value_error("Queue handler requires a queue name."))?;
                Sink::Queue {
                    name: name.to_string(),
                    sender: queue_sender(name)?,
                }
            }
            other => {
                return Err(Error::value_error(format!(
                    "Invalid handler kind: \"{}\"",
                    other
                )))
            }
        };

        let filter = config
            .levels
            .as_deref()
            .map(LevelsFilter::new)
            .transpose()?;

        Ok(Self { sink, filter })
    }

    pub(crate) fn accepts(&self, level: Level) -> bool {
        self.filter.as_ref().map_or(true, |f| f.passes(level))
    }

    /// Deliver a record; delivery failures are reported on stderr
    pub(crate) fn emit(&self, record: &LogRecord) {
        if !self.accepts(record.level) {
            return;
        }

        let result = match &self.sink {
            Sink::Stderr => writeln!(io::stderr().lock(), "{}", record.format()),
            Sink::Stdout => writeln!(io::stdout().lock(), "{}", record.format()),
            Sink::File(file) => {
                let mut file = file.lock().unwrap_or_else(PoisonError::into_inner);
                writeln!(file, "{}", record.format()).and_then(|_| file.flush())
            }
            Sink::Queue { name, sender } => sender.try_send(record.clone()).map_err(|e| {
                io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    format!("log queue '{}' unavailable: {}", name, e),
                )
            }),
        };

        if let Err(e) = result {
            eprintln!("yaptools: logging error: {}", e);
        }
    }
}
