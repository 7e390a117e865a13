//! Type definitions for parallel transforms
//!
//! Contains the pool configuration, chunk messages exchanged with workers
//! and the outcome of a transform.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::Range;

use crate::error::{Error, Result};
use crate::validity::{check_type_validity, Kind};

/// Configuration for a worker pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Requested number of workers; capped at the table length
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

fn default_pool_size() -> usize {
    num_cpus::get()
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
        }
    }
}

impl PoolConfig {
    pub fn new(pool_size: usize) -> Result<Self> {
        let config = Self { pool_size };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.pool_size == 0 {
            return Err(Error::value_error(
                "Invalid 'pool_size' value: expected a positive integer, got 0.",
            ));
        }
        Ok(())
    }

    /// Build a configuration from dynamic options such as `{"pool_size": 4}`
    pub fn from_value(options: &Value) -> Result<Self> {
        check_type_validity(options, &[Kind::Map], "options")?;

        let config = match options.get("pool_size") {
            None => Self::default(),
            Some(pool_size) => {
                check_type_validity(pool_size, &[Kind::Int], "pool_size")?;
                let requested = pool_size.as_i64().unwrap_or(i64::MAX);
                if requested <= 0 {
                    return Err(Error::value_error(format!(
                        "Invalid 'pool_size' value: expected a positive integer, got {}.",
                        requested
                    )));
                }
                Self {
                    pool_size: usize::try_from(requested).unwrap_or(usize::MAX),
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Number of workers actually used for a table of `len` rows
    pub fn effective_workers(&self, len: usize) -> usize {
        self.pool_size.min(len)
    }
}

/// Split `len` rows into contiguous ranges of `ceil(len / workers)` rows
///
/// The last range may be shorter; ranges never overlap and cover `0..len`.
pub fn plan_chunks(len: usize, workers: usize) -> Vec<Range<usize>> {
    if len == 0 || workers == 0 {
        return Vec::new();
    }
    let chunk_size = len / workers + usize::from(len % workers > 0);
    (0..len)
        .step_by(chunk_size)
        .map(|start| start..(start + chunk_size).min(len))
        .collect()
}

/// A chunk of rows sent to a worker
#[derive(Debug)]
pub(crate) struct Chunk<T> {
    pub id: usize,
    pub table: T,
}

/// Result of processing one chunk
#[derive(Debug)]
pub(crate) struct ChunkResult<R> {
    pub chunk_id: usize,
    pub outcome: anyhow::Result<R>,
}

/// Outcome of a transform
#[derive(Debug, Clone, PartialEq)]
pub enum Transformed<R> {
    /// Fewer than two workers: the function ran once on the whole table
    Direct(R),
    /// One partial result per chunk, in chunk order
    Parts(Vec<R>),
    /// Partial results reduced by the aggregator
    Aggregated(R),
}

impl<R> Transformed<R> {
    /// Single value of a direct or aggregated run
    pub fn into_value(self) -> Option<R> {
        match self {
            Transformed::Direct(value) | Transformed::Aggregated(value) => Some(value),
            Transformed::Parts(_) => None,
        }
    }

    /// Partial results, a direct run counting as a single part
    pub fn into_parts(self) -> Vec<R> {
        match self {
            Transformed::Parts(parts) => parts,
            Transformed::Direct(value) | Transformed::Aggregated(value) => vec![value],
        }
    }

    pub fn is_parallel(&self) -> bool {
        !matches!(self, Transformed::Direct(_))
    }
}
