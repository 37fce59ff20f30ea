use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::Receiver;

use crate::error::ChainforgeResult;
use crate::table::Outcome;

/// An event to track the progress of the generation of a rainbow table.
#[derive(Clone, Debug)]
pub enum Event {
    /// Chains written to disk so far, out of the requested total.
    Progress {
        written: u64,
        total: u64,
        elapsed: Duration,
    },
    /// The table file already held this many records and generation picked
    /// up after them.
    Resumed { completed: u64 },
}

/// A handle on a generation running in a background thread.
pub struct GeneratorHandle {
    pub(crate) thread_handle: JoinHandle<ChainforgeResult<Outcome>>,
    pub(crate) receiver: Receiver<Event>,
    pub(crate) cancel: Arc<AtomicBool>,
}

impl GeneratorHandle {
    /// Returns the outcome of the generation.
    /// Blocks until the table is finished.
    pub fn join(self) -> ChainforgeResult<Outcome> {
        self.thread_handle.join().unwrap()
    }

    /// Blocks until an event is received.
    /// Returns `None` if the generation is finished.
    pub fn recv(&self) -> Option<Event> {
        self.receiver.recv().ok()
    }

    /// Returns an event if one is pending, without blocking.
    pub fn try_recv(&self) -> Option<Event> {
        self.receiver.try_recv().ok()
    }

    /// Asks the generation to stop.
    ///
    /// Fully written records are flushed and kept; in-flight chains are
    /// discarded. The run then fails with
    /// [`crate::ChainforgeError::Cancelled`].
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Returns true once the generation thread has ended.
    pub fn is_finished(&self) -> bool {
        self.thread_handle.is_finished()
    }
}
