//! Log records and their text format

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::levels::Level;

/// One log event, as delivered to sinks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub created: DateTime<Local>,
    pub level: Level,
    pub logger: Option<String>,
    pub message: String,
}

impl LogRecord {
    pub fn new(logger: Option<&str>, level: Level, message: impl Into<String>) -> Self {
        Self {
            created: Local::now(),
            level,
            logger: logger.map(str::to_string),
            message: message.into(),
        }
    }

    /// `<asctime> : <logger> : <message>`, without the logger part when unnamed
    pub fn format(&self) -> String {
        let asctime = self.created.format("%Y-%m-%d %H:%M:%S,%3f");
        match self.logger.as_deref() {
            Some(name) if !name.is_empty() => format!("{} : {} : {}", asctime, name, self.message),
            _ => format!("{} : {}", asctime, self.message),
        }
    }
}
