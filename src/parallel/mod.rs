//! Parallel table transforms
//!
//! Splits a labeled table into contiguous row chunks and processes them in
//! a bounded pool of worker threads that lives for the duration of a call.
//!
//! # Module Structure
//!
//! - `table`: `Series`/`DataFrame` tables and row labels
//! - `types`: Pool configuration, chunk messages and transform outcomes
//! - `worker`: Worker thread applying the transformation to chunks
//! - `sink`: Ordered collection of chunk results
//! - `processor`: Main `PoolTransform` orchestration

mod processor;
mod sink;
mod table;
mod types;
mod worker;

// Re-export public types
pub use processor::{Aggregator, PoolTransform};
pub use table::{DataFrame, Label, Record, Series, Table};
pub use types::{plan_chunks, PoolConfig, Transformed};
