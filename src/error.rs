use thiserror::Error;

/// Errors raised by yaptools helpers.
///
/// The first four variants form the validation taxonomy: a value of the
/// wrong kind, a value of the right kind but invalid content, a name that
/// cannot be resolved, and a once-only operation invoked again.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Type(String),

    #[error("{0}")]
    Value(String),

    #[error("{0}")]
    Lookup(String),

    #[error("{0}")]
    State(String),

    #[error("worker {worker} panicked while processing chunk {chunk}: {message}")]
    WorkerPanic {
        worker: usize,
        chunk: usize,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::Type(message.into())
    }

    pub fn value_error(message: impl Into<String>) -> Self {
        Self::Value(message.into())
    }

    pub fn lookup_error(message: impl Into<String>) -> Self {
        Self::Lookup(message.into())
    }

    pub fn state_error(message: impl Into<String>) -> Self {
        Self::State(message.into())
    }

    /// Short kind name, as used in logged failure messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Type(_) => "TypeError",
            Self::Value(_) => "ValueError",
            Self::Lookup(_) => "LookupError",
            Self::State(_) => "StateError",
            Self::WorkerPanic { .. } => "WorkerPanic",
            Self::Io(_) => "IoError",
            Self::Json(_) => "JsonError",
        }
    }
}
