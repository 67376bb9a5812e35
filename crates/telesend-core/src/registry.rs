//! Index-based handles for hosts that cannot hold a Rust value.
//!
//! A scripting or C host gets a [`HandleId`] from [`HandleRegistry::send`] and
//! passes it back to [`HandleRegistry::wait`]. The registry owns the
//! [`TransferHandle`] in between. Waiting removes the entry, so a second wait
//! on the same id is a defined error instead of a double join.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::sync::{Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use thiserror::Error;

use crate::transfer::{
    self, CompletionResult, Job, LaunchError, TransferHandle, TransferOptions, TransferOutcome,
    TransferRequest,
};

/// Opaque id for a transfer owned by a [`HandleRegistry`]. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleId(u64);

impl HandleId {
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Rebuilds an id a host round-tripped as an integer.
    pub fn from_u64(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The id was never issued by this registry or was already waited on.
    #[error("unknown or already joined transfer handle {0}")]
    UnknownHandle(HandleId),
}

/// Owner of in-flight transfers keyed by [`HandleId`].
///
/// The lock guards only the id→handle map; transfer state is never behind it
/// and joins happen with the lock released.
#[derive(Debug, Default)]
pub struct HandleRegistry {
    options: TransferOptions,
    live: Mutex<HashMap<HandleId, TransferHandle>>,
}

impl HandleRegistry {
    pub fn new(options: TransferOptions) -> Self {
        Self {
            options,
            live: Mutex::new(HashMap::new()),
        }
    }

    fn live(&self) -> MutexGuard<'_, HashMap<HandleId, TransferHandle>> {
        // Every critical section is one map operation; a poisoned map is still consistent.
        self.live.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Dispatches a POST and registers its handle. Launch failures register nothing.
    pub fn send(
        &self,
        url: &str,
        headers: HashMap<String, String>,
    ) -> Result<HandleId, LaunchError> {
        self.send_with(url, headers, |builder, job| builder.spawn(job))
    }

    pub(crate) fn send_with<S>(
        &self,
        url: &str,
        headers: HashMap<String, String>,
        spawn: S,
    ) -> Result<HandleId, LaunchError>
    where
        S: FnOnce(thread::Builder, Job) -> io::Result<JoinHandle<TransferOutcome>>,
    {
        let request = TransferRequest::new(url, headers);
        let handle = transfer::launch_with(request, self.options.clone(), spawn)?;
        let id = HandleId(handle.id());
        self.live().insert(id, handle);
        tracing::trace!(%id, "handle registered");
        Ok(id)
    }

    /// Joins the transfer behind `id`. `None` is nothing to wait for and
    /// yields `Ok(None)`.
    pub fn wait(&self, id: Option<HandleId>) -> Result<Option<CompletionResult>, RegistryError> {
        let Some(id) = id else {
            return Ok(None);
        };
        let handle = self
            .live()
            .remove(&id)
            .ok_or(RegistryError::UnknownHandle(id))?;
        tracing::trace!(%id, "handle released for join");
        Ok(Some(handle.wait()))
    }

    /// Number of transfers dispatched but not yet waited on.
    pub fn len(&self) -> usize {
        self.live().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Joins every pending transfer, e.g. at host shutdown.
    pub fn join_all(&self) -> Vec<(HandleId, CompletionResult)> {
        let pending: Vec<(HandleId, TransferHandle)> = self.live().drain().collect();
        if !pending.is_empty() {
            tracing::debug!(count = pending.len(), "joining pending transfers");
        }
        pending
            .into_iter()
            .map(|(id, handle)| (id, handle.wait()))
            .collect()
    }
}
