//! Thin logging facade with serializable configuration
//!
//! A [`Logger`] writes formatted records to a set of sinks (standard
//! streams, files opened in append mode, or named in-process queues), each
//! optionally restricted to an exhaustive list of levels. Loggers are built
//! from a [`LoggerConfig`] and serialize back to it, so objects holding one
//! can be serialized and restored without carrying OS handles.

mod config;
mod handler;
mod levels;
mod logged;
mod queue;
mod record;

pub use config::LoggerConfig;
pub use handler::{HandlerConfig, LevelsFilter};
pub use levels::{level_from_name, Level, LevelSpec, LOGGING_LEVELS};
pub use logged::{describe_error, Logged};
pub use queue::{register_queue, register_queue_sender, unregister_queue};
pub use record::LogRecord;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::validity::kind_of;

use handler::Handler;

struct LoggerInner {
    config: LoggerConfig,
    level: Level,
    handlers: Vec<Handler>,
}

/// Cheaply clonable logger; clones share their sinks
#[derive(Clone, Serialize, Deserialize)]
#[serde(into = "LoggerConfig", try_from = "LoggerConfig")]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

impl Logger {
    /// Build a logger and open its sinks
    ///
    /// The folder is created when missing and stored as an absolute path.
    pub fn new(mut config: LoggerConfig) -> Result<Self> {
        if config.folder.exists() {
            if !config.folder.is_dir() {
                return Err(Error::value_error(format!(
                    "'{}' is not a folder.",
                    config.folder.display()
                )));
            }
        } else {
            fs::create_dir_all(&config.folder)?;
        }
        config.folder = fs::canonicalize(&config.folder)?;

        let level = Level::clamped(config.level);
        config.level = i64::from(level.value());

        let handlers = config
            .handlers
            .iter()
            .map(|handler| Handler::build(handler, &config.folder))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            inner: Arc::new(LoggerInner {
                config,
                level,
                handlers,
            }),
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.inner.config.name.as_deref()
    }

    pub fn folder(&self) -> &Path {
        &self.inner.config.folder
    }

    pub fn level(&self) -> Level {
        self.inner.level
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.inner.config
    }

    pub fn is_enabled_for(&self, level: Level) -> bool {
        level >= self.inner.level
    }

    /// Resolve a level leniently
    ///
    /// Unknown names, including `default`, give the logger level. Values
    /// that are neither numbers nor names are reported with a warning and
    /// also give the logger level.
    pub fn resolve_level(&self, level: &LevelSpec) -> Level {
        match level {
            LevelSpec::Number(n) => Level(*n),
            LevelSpec::Name(name) => level_from_name(name).unwrap_or(self.inner.level),
            LevelSpec::Other(value) => {
                self.emit(
                    Level::WARNING,
                    format!(
                        "Invalid 'level' argument passed to 'log': {} (type {}).",
                        value,
                        kind_of(value)
                    ),
                );
                self.inner.level
            }
        }
    }

    /// Log `msg` with severity `level` (number, name or dynamic value)
    pub fn log(&self, level: impl Into<LevelSpec>, msg: impl fmt::Display) {
        let level = self.resolve_level(&level.into());
        self.emit(level, msg.to_string());
    }

    pub fn debug(&self, msg: impl fmt::Display) {
        self.emit(Level::DEBUG, msg.to_string());
    }

    pub fn info(&self, msg: impl fmt::Display) {
        self.emit(Level::INFO, msg.to_string());
    }

    pub fn warning(&self, msg: impl fmt::Display) {
        self.emit(Level::WARNING, msg.to_string());
    }

    pub fn error(&self, msg: impl fmt::Display) {
        self.emit(Level::ERROR, msg.to_string());
    }

    pub fn critical(&self, msg: impl fmt::Display) {
        self.emit(Level::CRITICAL, msg.to_string());
    }

    fn emit(&self, level: Level, message: String) {
        if !self.is_enabled_for(level) {
            return;
        }
        let record = LogRecord::new(self.name(), level, message);
        for handler in &self.inner.handlers {
            handler.emit(&record);
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name())
            .field("folder", &self.folder())
            .field("level", &self.level())
            .field("handlers", &self.inner.handlers.len())
            .finish()
    }
}

impl From<Logger> for LoggerConfig {
    fn from(logger: Logger) -> Self {
        logger.inner.config.clone()
    }
}

impl TryFrom<LoggerConfig> for Logger {
    type Error = Error;

    fn try_from(config: LoggerConfig) -> Result<Self> {
        Logger::new(config)
    }
}
