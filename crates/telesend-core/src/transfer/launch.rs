//! Dispatching a transfer onto its own background thread.

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

use super::error::LaunchError;
use super::request::{TransferOptions, TransferRequest};
use super::worker::{self, TransferOutcome};
use super::TransferHandle;

/// Ids start at 1 so 0 never names a live transfer.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) type Job = Box<dyn FnOnce() -> TransferOutcome + Send + 'static>;

/// Starts a POST to `url` with `headers` on a new thread and returns at once.
pub fn send(url: &str, headers: HashMap<String, String>) -> Result<TransferHandle, LaunchError> {
    send_with_options(url, headers, &TransferOptions::default())
}

/// Like [`send`] with explicit engine options (timeouts, User-Agent, stack size).
pub fn send_with_options(
    url: &str,
    headers: HashMap<String, String>,
    options: &TransferOptions,
) -> Result<TransferHandle, LaunchError> {
    let request = TransferRequest::new(url, headers);
    launch_with(request, options.clone(), |builder, job| builder.spawn(job))
}

/// Spawn seam: production passes `Builder::spawn`, tests pass a failing spawner.
pub(crate) fn launch_with<S>(
    request: TransferRequest,
    options: TransferOptions,
    spawn: S,
) -> Result<TransferHandle, LaunchError>
where
    S: FnOnce(thread::Builder, Job) -> io::Result<JoinHandle<TransferOutcome>>,
{
    crate::engine::init();

    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let mut builder = thread::Builder::new().name(format!("telesend-{id}"));
    if let Some(size) = options.worker_stack_size {
        builder = builder.stack_size(size);
    }

    let host = request.host_for_log();
    // The job owns the request and options; if spawning fails it is dropped
    // with them and no handle exists.
    let job: Job = Box::new(move || worker::run(id, request, options));
    match spawn(builder, job) {
        Ok(worker) => {
            tracing::debug!(id, %host, "transfer dispatched");
            Ok(TransferHandle::new(id, worker))
        }
        Err(e) => {
            tracing::debug!(id, %host, error = %e, "transfer thread spawn failed");
            Err(LaunchError::Spawn(e))
        }
    }
}
