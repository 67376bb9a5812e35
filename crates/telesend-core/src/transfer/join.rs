//! Turning a terminated worker into a [`CompletionResult`].

use std::thread::JoinHandle;

use super::worker::{CompletionCode, TransferOutcome};

/// Status text of every successful transfer.
pub const STATUS_OK: &str = "OK";

/// Outcome of one joined transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionResult {
    /// The transfer completed at the transport level. Any HTTP status,
    /// including 4xx/5xx, lands here.
    Success { body: Vec<u8>, http_code: u32 },
    /// Transport failure. Bytes received before the failure are discarded.
    Failure { message: String, http_code: u32 },
}

impl CompletionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, CompletionResult::Success { .. })
    }

    pub fn http_code(&self) -> u32 {
        match self {
            CompletionResult::Success { http_code, .. }
            | CompletionResult::Failure { http_code, .. } => *http_code,
        }
    }

    /// Response body; `None` for failures.
    pub fn body(&self) -> Option<&[u8]> {
        match self {
            CompletionResult::Success { body, .. } => Some(body),
            CompletionResult::Failure { .. } => None,
        }
    }

    /// `"OK"` on success, otherwise the diagnostic message.
    pub fn status_text(&self) -> &str {
        match self {
            CompletionResult::Success { .. } => STATUS_OK,
            CompletionResult::Failure { message, .. } => message,
        }
    }

    /// Flattens to the `(body, statusText, httpCode)` triple a host expects.
    pub fn into_parts(self) -> (Option<Vec<u8>>, String, u32) {
        match self {
            CompletionResult::Success { body, http_code } => {
                (Some(body), STATUS_OK.to_string(), http_code)
            }
            CompletionResult::Failure { message, http_code } => (None, message, http_code),
        }
    }
}

/// Blocks until `worker` terminates and converts what it left behind.
///
/// The join is the only synchronization with the worker thread.
pub(crate) fn join_worker(id: u64, worker: JoinHandle<TransferOutcome>) -> CompletionResult {
    let outcome = match worker.join() {
        Ok(outcome) => outcome,
        Err(_) => {
            tracing::warn!(id, "transfer worker panicked");
            TransferOutcome::not_started()
        }
    };
    let result = into_result(outcome);
    tracing::debug!(id, success = result.is_success(), http_code = result.http_code(), "transfer joined");
    result
}

fn into_result(outcome: TransferOutcome) -> CompletionResult {
    match outcome.code {
        CompletionCode::Ok => CompletionResult::Success {
            body: outcome.body.into_bytes(),
            http_code: outcome.http_code,
        },
        CompletionCode::TransportError => CompletionResult::Failure {
            message: outcome
                .diagnostic
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "transport error\n".to_string()),
            http_code: outcome.http_code,
        },
        CompletionCode::NotStarted => CompletionResult::Failure {
            message: "transfer worker terminated before recording a result\n".to_string(),
            http_code: 0,
        },
    }
}
