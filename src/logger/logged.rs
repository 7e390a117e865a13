//! Objects carrying a logger, and error descriptions for their log lines

use std::any::Any;
use std::fmt;

use crate::error::{Error, Result};

use super::config::LoggerConfig;
use super::levels::LevelSpec;
use super::Logger;

/// Short kind name of an error value
///
/// Crate errors give their kind (`TypeError`, `ValueError`, ...), also when
/// wrapped in an `anyhow::Error`; other errors give their type name.
pub fn describe_error<E: Any>(error: &E) -> &'static str {
    let any = error as &dyn Any;
    if let Some(err) = any.downcast_ref::<Error>() {
        return err.kind_name();
    }
    if let Some(err) = any.downcast_ref::<anyhow::Error>() {
        return err
            .chain()
            .find_map(|cause| cause.downcast_ref::<Error>())
            .map_or("Error", Error::kind_name);
    }
    short_type_name::<E>()
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let path = full.split('<').next().unwrap_or(full);
    path.rsplit("::").next().unwrap_or(path)
}

/// Objects that carry a logger
///
/// Implementors store a [`Logger`] (usually built with `init_logger` in
/// their constructor) and expose it through `logger`. Since `Logger`
/// serializes as its configuration, deriving serde on the implementor is
/// enough to round-trip it.
pub trait Logged {
    fn logger(&self) -> &Logger;

    /// Logger used when none is provided; override to customize
    fn default_logger() -> Result<Logger>
    where
        Self: Sized,
    {
        Logger::new(LoggerConfig::default())
    }

    fn init_logger(logger: Option<Logger>) -> Result<Logger>
    where
        Self: Sized,
    {
        match logger {
            Some(logger) => Ok(logger),
            None => Self::default_logger(),
        }
    }

    fn log(&self, msg: impl fmt::Display, level: impl Into<LevelSpec>)
    where
        Self: Sized,
    {
        self.logger().log(level, msg);
    }

    /// Log `<kind>: <message>.` for an error
    fn log_exception<E>(&self, error: &E, level: impl Into<LevelSpec>)
    where
        Self: Sized,
        E: fmt::Display + Any,
    {
        self.log(format!("{}: {}.", describe_error(error), error), level);
    }

    /// Log a failed method result at error level and hand it back
    ///
    /// ```
    /// use yaptools::{Error, Logged, Logger, Result};
    ///
    /// struct Parser {
    ///     logger: Logger,
    /// }
    ///
    /// impl Logged for Parser {
    ///     fn logger(&self) -> &Logger {
    ///         &self.logger
    ///     }
    /// }
    ///
    /// impl Parser {
    ///     fn parse(&self, x: &str) -> Result<i64> {
    ///         self.logged("Parser.parse", x.parse().map_err(|_| Error::type_error("not an int")))
    ///     }
    /// }
    ///
    /// let parser = Parser { logger: Parser::init_logger(None).unwrap() };
    /// assert_eq!(parser.parse("4").unwrap(), 4);
    /// // Logs "<asctime> : TypeError at 'Parser.parse': not an int"
    /// assert!(parser.parse("four").is_err());
    /// ```
    fn logged<T, E>(&self, method: &str, result: std::result::Result<T, E>) -> std::result::Result<T, E>
    where
        Self: Sized,
        E: fmt::Display + Any,
    {
        if let Err(error) = &result {
            self.log(
                format!("{} at '{}': {}", describe_error(error), method, error),
                "error",
            );
        }
        result
    }
}
