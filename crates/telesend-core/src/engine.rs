//! Process-wide libcurl initialization.
//!
//! `curl_global_init` is not thread-safe, so it must complete once before the
//! first transfer thread creates an easy handle. The launcher calls [`init`]
//! before every spawn; only the first call does any work.

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize libcurl exactly once for this process.
pub fn init() {
    INIT.call_once(|| {
        curl::init();
        tracing::debug!(libcurl = %version(), "transfer engine initialized");
    });
}

/// libcurl version string, e.g. `8.5.0`.
pub fn version() -> String {
    curl::Version::get().version().to_string()
}
