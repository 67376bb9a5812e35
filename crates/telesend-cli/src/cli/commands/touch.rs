//! `telesend touch <path>` – mark a file modified, creating it if missing.

use anyhow::Result;
use std::path::Path;
use telesend_core::fsutil;

/// Prints the host result code (0 touched, 1 created, -1 failed).
pub fn run_touch(path: &Path) -> Result<()> {
    let (code, message) = fsutil::touch_result(path);
    println!("{code}");
    if let Some(message) = message {
        anyhow::bail!(message);
    }
    Ok(())
}
