//! File helpers exposed to hosts next to the transfer API: existence check
//! and touch.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// True if `path` exists (following symlinks) and is not a directory.
pub fn is_file(path: &Path) -> bool {
    fs::metadata(path).map(|m| !m.is_dir()).unwrap_or(false)
}

/// What [`touch_file`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchOutcome {
    /// Existing file marked modified, content unchanged.
    Touched,
    /// No file existed; an empty one was created.
    Created,
}

impl TouchOutcome {
    /// Host result code: 0 touched, 1 created.
    pub fn code(self) -> i32 {
        match self {
            TouchOutcome::Touched => 0,
            TouchOutcome::Created => 1,
        }
    }
}

#[derive(Debug, Error)]
pub enum TouchError {
    #[error("unable to touch file '{}'", path.display())]
    Touch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to create file to '{}'", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TouchError {
    /// Host result code for every failure.
    pub const CODE: i32 = -1;
}

/// Marks `path` as modified without changing its content, or creates it
/// empty if it is not an existing file.
pub fn touch_file(path: &Path) -> Result<TouchOutcome, TouchError> {
    if is_file(path) {
        rewrite_in_place(path).map_err(|source| TouchError::Touch {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "touched file");
        return Ok(TouchOutcome::Touched);
    }

    File::create(path).map_err(|source| TouchError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "created empty file");
    Ok(TouchOutcome::Created)
}

/// `(code, message)` as a host returns it: `(0, None)`, `(1, None)` or
/// `(-1, Some(message))`.
pub fn touch_result(path: &Path) -> (i32, Option<String>) {
    match touch_file(path) {
        Ok(outcome) => (outcome.code(), None),
        Err(e) => (TouchError::CODE, Some(e.to_string())),
    }
}

/// Appends one byte and truncates back so the filesystem records a write.
fn rewrite_in_place(path: &Path) -> io::Result<()> {
    let mut file = OpenOptions::new().append(true).open(path)?;
    let size = file.seek(SeekFrom::End(0))?;
    file.write_all(b" ")?;
    file.set_len(size)?;
    Ok(())
}
