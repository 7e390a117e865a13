//! Severity levels and their names

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::validity::kind_of;

/// Numeric severity; higher is more severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Level(pub u32);

impl Level {
    pub const NOTSET: Level = Level(0);
    pub const DEBUG: Level = Level(10);
    pub const INFO: Level = Level(20);
    pub const WARNING: Level = Level(30);
    pub const ERROR: Level = Level(40);
    pub const CRITICAL: Level = Level(50);

    /// Clamp an arbitrary integer into the level range
    pub fn clamped(value: i64) -> Level {
        Level(value.clamp(0, i64::from(u32::MAX)) as u32)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn name(&self) -> String {
        match *self {
            Level::NOTSET => "NOTSET".to_string(),
            Level::DEBUG => "DEBUG".to_string(),
            Level::INFO => "INFO".to_string(),
            Level::WARNING => "WARNING".to_string(),
            Level::ERROR => "ERROR".to_string(),
            Level::CRITICAL => "CRITICAL".to_string(),
            Level(other) => format!("Level {}", other),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Level names accepted wherever a level may be given by name
pub const LOGGING_LEVELS: &[(&str, Level)] = &[
    ("debug", Level::DEBUG),
    ("info", Level::INFO),
    ("warning", Level::WARNING),
    ("warn", Level::WARNING),
    ("error", Level::ERROR),
    ("fatal", Level::CRITICAL),
    ("critical", Level::CRITICAL),
];

static LEVELS_BY_NAME: Lazy<HashMap<&'static str, Level>> =
    Lazy::new(|| LOGGING_LEVELS.iter().copied().collect());

/// Look up a level by name, ignoring case
pub fn level_from_name(name: &str) -> Option<Level> {
    LEVELS_BY_NAME.get(name.to_ascii_lowercase().as_str()).copied()
}

/// A level as given by a caller or a configuration file: a number, a
/// name, or anything else found in dynamic input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelSpec {
    Number(u32),
    Name(String),
    Other(Value),
}

impl LevelSpec {
    /// Resolve strictly: unknown names and non-level values are errors
    pub fn resolve(&self) -> Result<Level> {
        match self {
            LevelSpec::Number(n) => Ok(Level(*n)),
            LevelSpec::Name(name) => level_from_name(name)
                .ok_or_else(|| Error::lookup_error(format!("Invalid level name: '{}'.", name))),
            LevelSpec::Other(value) => Err(Error::type_error(format!(
                "Expected 'level' to be of type int or str, not {}.",
                kind_of(value)
            ))),
        }
    }
}

impl fmt::Display for LevelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelSpec::Number(n) => write!(f, "{}", n),
            LevelSpec::Name(name) => f.write_str(name),
            LevelSpec::Other(value) => write!(f, "{}", value),
        }
    }
}

impl From<Level> for LevelSpec {
    fn from(level: Level) -> Self {
        LevelSpec::Number(level.0)
    }
}

impl From<u32> for LevelSpec {
    fn from(value: u32) -> Self {
        LevelSpec::Number(value)
    }
}

impl From<&str> for LevelSpec {
    fn from(name: &str) -> Self {
        LevelSpec::Name(name.to_string())
    }
}

impl From<String> for LevelSpec {
    fn from(name: String) -> Self {
        LevelSpec::Name(name)
    }
}

impl From<Value> for LevelSpec {
    fn from(value: Value) -> Self {
        match value {
            Value::String(name) => LevelSpec::Name(name),
            Value::Number(ref n) => match n.as_u64().and_then(|n| u32::try_from(n).ok()) {
                Some(n) => LevelSpec::Number(n),
                None => LevelSpec::Other(value),
            },
            other => LevelSpec::Other(other),
        }
    }
}
