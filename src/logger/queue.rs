//! Named in-process queues for queue log sinks
//!
//! Handler configurations refer to queues by name so that they stay
//! serializable; the receiving end is handed to whoever registers the name.

use crossbeam_channel::{unbounded, Receiver, Sender};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::error::{Error, Result};

use super::record::LogRecord;

static QUEUES: Lazy<Mutex<HashMap<String, Sender<LogRecord>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Register a new queue under `name` and return its receiving end
///
/// Registering an existing name replaces the previous queue.
pub fn register_queue(name: &str) -> Receiver<LogRecord> {
    let (sender, receiver) = unbounded();
    register_queue_sender(name, sender);
    receiver
}

/// Register an existing channel under `name`
pub fn register_queue_sender(name: &str, sender: Sender<LogRecord>) {
    QUEUES
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(name.to_string(), sender);
}

/// Forget a queue; returns whether it was registered
pub fn unregister_queue(name: &str) -> bool {
    QUEUES
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(name)
        .is_some()
}

pub(crate) fn queue_sender(name: &str) -> Result<Sender<LogRecord>> {
    QUEUES
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .cloned()
        .ok_or_else(|| Error::lookup_error(format!("No log queue registered as '{}'", name)))
}
