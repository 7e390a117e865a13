//! Main parallel transform
//!
//! Contains `PoolTransform`, which splits a table into row chunks, runs a
//! function on each chunk in a bounded pool of worker threads, and gathers
//! the partial results in chunk order.

use anyhow::{anyhow, Result};
use crossbeam_channel::{bounded, unbounded};
use std::thread;

use crate::error::Error;

use super::sink::collect_ordered;
use super::table::{Series, Table};
use super::types::{plan_chunks, Chunk, PoolConfig, Transformed};
use super::worker::worker_thread;

/// Reduces the ordered partial results into one
pub type Aggregator<R> = Box<dyn Fn(Vec<R>) -> Result<R> + Send + Sync>;

/// Parallel table transform
///
/// Extra parameters of the transformation are captured by the closure
/// passed to `transform` or `apply`; closures may borrow from the caller.
pub struct PoolTransform<R> {
    config: PoolConfig,
    aggregate: Option<Aggregator<R>>,
}

impl<R: Send> PoolTransform<R> {
    /// Pool of `pool_size` workers; zero is rejected
    pub fn new(pool_size: usize) -> std::result::Result<Self, Error> {
        Self::from_config(PoolConfig::new(pool_size)?)
    }

    pub fn from_config(config: PoolConfig) -> std::result::Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            config,
            aggregate: None,
        })
    }

    /// Reduce partial results with `aggregate` when the work was split
    pub fn with_aggregate<A>(mut self, aggregate: A) -> Self
    where
        A: Fn(Vec<R>) -> Result<R> + Send + Sync + 'static,
    {
        self.aggregate = Some(Box::new(aggregate));
        self
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Call `function` once per chunk, each call receiving a whole chunk
    ///
    /// With fewer than two effective workers the function runs once on the
    /// whole table in the calling thread and its result is returned as is,
    /// without aggregation.
    pub fn transform<T, F>(&self, table: &T, function: F) -> Result<Transformed<R>>
    where
        T: Table,
        F: Fn(T) -> Result<R> + Sync,
    {
        let workers = self.config.effective_workers(table.len());
        if workers < 2 {
            return function(table.clone()).map(Transformed::Direct);
        }

        let parts = run_pool(table, workers, &function)?;
        match &self.aggregate {
            Some(aggregate) => aggregate(parts).map(Transformed::Aggregated),
            None => Ok(Transformed::Parts(parts)),
        }
    }
}

impl<U: Send> PoolTransform<Series<U>> {
    /// Apply `function` row by row; each chunk yields a labeled series
    pub fn apply<T, F>(&self, table: &T, function: F) -> Result<Transformed<Series<U>>>
    where
        T: Table,
        F: Fn(&T::Row) -> U + Sync,
    {
        self.transform(table, |chunk: T| Ok(chunk.apply(&function)))
    }
}

/// Run `function` over the chunks of `table` with `workers` threads
fn run_pool<T, R, F>(table: &T, workers: usize, function: &F) -> Result<Vec<R>>
where
    T: Table,
    R: Send,
    F: Fn(T) -> Result<R> + Sync,
{
    let ranges = plan_chunks(table.len(), workers);
    let (work_sender, work_receiver) = bounded::<Chunk<T>>(workers);
    let (result_sender, result_receiver) = unbounded();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|worker_id| {
                let work_receiver = work_receiver.clone();
                let result_sender = result_sender.clone();
                scope.spawn(move || {
                    worker_thread(worker_id, work_receiver, result_sender, function)
                })
            })
            .collect();

        // Only the workers may hold these, or the channels never disconnect
        drop(work_receiver);
        drop(result_sender);

        let mut dispatch_error = None;
        for (id, range) in ranges.iter().enumerate() {
            let chunk = Chunk {
                id,
                table: table.slice(range.clone()),
            };
            if work_sender.send(chunk).is_err() {
                dispatch_error = Some(anyhow!("worker pool stopped before chunk {} was sent", id));
                break;
            }
        }
        drop(work_sender);

        let collected = collect_ordered(result_receiver, ranges.len());

        for (worker_id, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() {
                return Err(anyhow!("worker {} terminated abnormally", worker_id));
            }
        }

        match dispatch_error {
            Some(e) => Err(e),
            None => collected,
        }
    })
}
