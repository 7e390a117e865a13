//! Ordered result collection for parallel transforms

use crossbeam_channel::Receiver;
use std::collections::HashMap;

use super::types::ChunkResult;

/// Collect every chunk result and return them in chunk order
///
/// Blocks until all workers have dropped their senders. If any chunk
/// failed, the error of the lowest-numbered failed chunk is returned once
/// all results are in.
pub(crate) fn collect_ordered<R>(
    result_receiver: Receiver<ChunkResult<R>>,
    expected_chunks: usize,
) -> anyhow::Result<Vec<R>> {
    let mut pending: HashMap<usize, anyhow::Result<R>> = HashMap::new();
    let mut ordered = Vec::with_capacity(expected_chunks);
    let mut first_error: Option<anyhow::Error> = None;
    let mut next_expected_id = 0usize;

    while let Ok(result) = result_receiver.recv() {
        pending.insert(result.chunk_id, result.outcome);

        // Move all consecutive chunks starting from next_expected_id
        while let Some(outcome) = pending.remove(&next_expected_id) {
            match outcome {
                Ok(value) => ordered.push(value),
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
            next_expected_id += 1;
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }
    if next_expected_id != expected_chunks || !pending.is_empty() {
        return Err(anyhow::anyhow!(
            "worker pool returned {} of {} chunk results",
            next_expected_id,
            expected_chunks
        ));
    }

    Ok(ordered)
}
