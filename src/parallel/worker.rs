//! Worker thread for parallel transforms
//!
//! Each worker pulls chunks until the work channel closes and sends one
//! result per chunk. Panics inside the transformation are caught and
//! reported as errors so the pool can still drain.

use crossbeam_channel::{Receiver, Sender};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::error::Error;

use super::types::{Chunk, ChunkResult};

/// Worker thread: applies `function` to every chunk it receives
pub(crate) fn worker_thread<T, R, F>(
    worker_id: usize,
    work_receiver: Receiver<Chunk<T>>,
    result_sender: Sender<ChunkResult<R>>,
    function: &F,
) where
    F: Fn(T) -> anyhow::Result<R> + Sync,
{
    while let Ok(chunk) = work_receiver.recv() {
        let chunk_id = chunk.id;
        let table = chunk.table;

        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| function(table))) {
            Ok(outcome) => outcome,
            Err(payload) => Err(Error::WorkerPanic {
                worker: worker_id,
                chunk: chunk_id,
                message: panic_message(payload.as_ref()),
            }
            .into()),
        };

        // The collector only goes away once every chunk has been accounted for
        if result_sender.send(ChunkResult { chunk_id, outcome }).is_err() {
            break;
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
