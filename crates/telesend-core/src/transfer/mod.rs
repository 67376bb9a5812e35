//! Fire-and-join HTTP POST transfers.
//!
//! [`send`] starts a POST on a dedicated thread and returns a
//! [`TransferHandle`] immediately. [`TransferHandle::wait`] blocks until that
//! thread has terminated and yields a [`CompletionResult`]. The worker hands
//! its body, status and diagnostic back as the thread's return value, so the
//! join is the only synchronization point and nothing can read transfer state
//! before it.

mod buffer;
mod error;
mod join;
mod launch;
mod request;
mod worker;

use std::thread::JoinHandle;

pub use buffer::ResponseBuffer;
pub use error::LaunchError;
pub use join::{CompletionResult, STATUS_OK};
pub use launch::{send, send_with_options};
pub(crate) use launch::{launch_with, Job};
pub use request::{TransferOptions, TransferRequest};
pub use worker::CompletionCode;

pub(crate) use worker::TransferOutcome;

/// Single-use handle to one dispatched transfer. Its only operation is
/// [`wait`](TransferHandle::wait), which consumes it.
///
/// Dropping a handle without waiting detaches the worker thread: the transfer
/// runs to completion and its result is discarded.
#[derive(Debug)]
pub struct TransferHandle {
    id: u64,
    worker: JoinHandle<TransferOutcome>,
    detach: DetachWarning,
}

/// Logs when a handle goes away unjoined. Disarmed by [`TransferHandle::wait`].
#[derive(Debug)]
struct DetachWarning {
    id: u64,
}

impl Drop for DetachWarning {
    fn drop(&mut self) {
        tracing::warn!(id = self.id, "transfer handle dropped without wait; detaching worker");
    }
}

impl TransferHandle {
    fn new(id: u64, worker: JoinHandle<TransferOutcome>) -> Self {
        Self {
            id,
            worker,
            detach: DetachWarning { id },
        }
    }

    /// Process-unique transfer id (also the worker thread's name suffix).
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Blocks until the transfer's thread terminates, then releases it.
    /// There is no timeout.
    pub fn wait(self) -> CompletionResult {
        let TransferHandle { id, worker, detach } = self;
        std::mem::forget(detach);
        join::join_worker(id, worker)
    }
}

/// Joins `handle` if present. An absent handle is nothing to wait for and
/// yields `None`, not an error.
pub fn wait(handle: Option<TransferHandle>) -> Option<CompletionResult> {
    handle.map(TransferHandle::wait)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn wait_on_absent_handle_is_empty() {
        assert!(wait(None).is_none());
    }

    #[test]
    fn empty_url_is_reported_at_wait_not_send() {
        let handle = send("", HashMap::new()).expect("launch");
        let result = wait(Some(handle)).expect("result");
        let (body, message, code) = result.into_parts();
        assert!(body.is_none());
        assert!(!message.trim().is_empty());
        assert_eq!(code, 0);
    }

    #[test]
    fn dropped_handle_worker_still_runs_to_completion() {
        let (tx, rx) = std::sync::mpsc::channel();
        let request = TransferRequest::new("", HashMap::new());
        let handle = launch_with(request, TransferOptions::default(), move |builder, job| {
            builder.spawn(move || {
                let outcome = job();
                let _ = tx.send(outcome.code);
                outcome
            })
        })
        .unwrap();
        drop(handle);
        let code = rx
            .recv_timeout(std::time::Duration::from_secs(30))
            .unwrap();
        assert_eq!(code, CompletionCode::TransportError);
    }
}
