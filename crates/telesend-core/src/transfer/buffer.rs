//! Append-only accumulator for streamed response bytes.

/// Bytes received for one transfer, in receipt order.
///
/// Written only by the transfer worker's curl write callback; consumed once
/// by the joiner via [`ResponseBuffer::into_bytes`].
#[derive(Debug, Default)]
pub struct ResponseBuffer {
    data: Vec<u8>,
}

impl ResponseBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk as delivered by the engine.
    pub fn append(&mut self, chunk: &[u8]) {
        self.data.extend_from_slice(chunk);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Hands the accumulated body to the caller, consuming the buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}
