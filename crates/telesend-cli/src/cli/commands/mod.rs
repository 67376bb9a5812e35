//! CLI command handlers, one per file.

mod is_file;
mod send;
mod touch;
mod version;

pub use is_file::run_is_file;
pub use send::run_send;
pub use touch::run_touch;
pub use version::run_version;
