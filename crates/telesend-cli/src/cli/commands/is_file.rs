//! `telesend is-file <path>` – print whether a regular (non-directory) file exists.

use std::path::Path;
use telesend_core::fsutil;

pub fn run_is_file(path: &Path) {
    println!("{}", fsutil::is_file(path));
}
