//! Body of the background thread: one blocking curl POST.

use curl::easy::{Easy2, Handler, List, WriteError};

use super::buffer::ResponseBuffer;
use super::request::{TransferOptions, TransferRequest};

/// Terminal classification of a transfer, set once by the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionCode {
    /// The worker never recorded a result (it terminated abnormally).
    NotStarted,
    Ok,
    TransportError,
}

/// Everything the worker leaves behind when its thread terminates.
///
/// Returned through the thread's `JoinHandle`, so the joiner only sees it
/// after the join.
#[derive(Debug)]
pub(crate) struct TransferOutcome {
    pub(crate) code: CompletionCode,
    pub(crate) http_code: u32,
    pub(crate) body: ResponseBuffer,
    /// Engine diagnostic, set only for `TransportError`.
    pub(crate) diagnostic: Option<String>,
}

impl TransferOutcome {
    /// Outcome substituted when the worker thread panicked.
    pub(crate) fn not_started() -> Self {
        Self {
            code: CompletionCode::NotStarted,
            http_code: 0,
            body: ResponseBuffer::new(),
            diagnostic: None,
        }
    }
}

/// Easy2 handler that streams the response body into a [`ResponseBuffer`].
struct Collector {
    buffer: ResponseBuffer,
}

impl Handler for Collector {
    fn write(&mut self, data: &[u8]) -> Result<usize, WriteError> {
        self.buffer.append(data);
        Ok(data.len())
    }
}

/// Runs one transfer to completion on the current thread.
pub(crate) fn run(id: u64, request: TransferRequest, options: TransferOptions) -> TransferOutcome {
    tracing::debug!(id, host = %request.host_for_log(), "transfer worker started");

    let mut easy = Easy2::new(Collector {
        buffer: ResponseBuffer::new(),
    });
    let performed = configure(&mut easy, &request, &options).and_then(|()| easy.perform());
    let http_code = easy.response_code().unwrap_or(0);
    let body = std::mem::take(&mut easy.get_mut().buffer);
    // Connection and session state are released here; the body is not.
    drop(easy);

    let outcome = match performed {
        Ok(()) => TransferOutcome {
            code: CompletionCode::Ok,
            http_code,
            body,
            diagnostic: None,
        },
        Err(e) => TransferOutcome {
            code: CompletionCode::TransportError,
            http_code,
            body,
            diagnostic: Some(transport_diagnostic(&e)),
        },
    };
    tracing::debug!(
        id,
        code = ?outcome.code,
        http_code,
        bytes = outcome.body.len(),
        "transfer worker finished"
    );
    outcome
}

fn configure(
    easy: &mut Easy2<Collector>,
    request: &TransferRequest,
    options: &TransferOptions,
) -> Result<(), curl::Error> {
    easy.url(request.url())?;
    easy.post(true)?;
    easy.post_fields_copy(&[])?;
    easy.connect_timeout(options.connect_timeout)?;
    if let Some(timeout) = options.timeout {
        easy.timeout(timeout)?;
    }
    if let Some(ua) = &options.user_agent {
        easy.useragent(ua)?;
    }

    let mut list = List::new();
    for line in request.header_lines() {
        list.append(&line)?;
    }
    if !request.headers().is_empty() {
        easy.http_headers(list)?;
    }
    Ok(())
}

/// `<strerror>\n<error buffer>\n`, the shape hosts already parse.
fn transport_diagnostic(e: &curl::Error) -> String {
    format!(
        "{}\n{}\n",
        e.description(),
        e.extra_description().unwrap_or("")
    )
}
