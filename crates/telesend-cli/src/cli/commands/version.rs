//! `telesend version`.

use telesend_core::engine;

pub fn run_version() {
    println!(
        "telesend {} (libcurl {})",
        env!("CARGO_PKG_VERSION"),
        engine::version()
    );
}
