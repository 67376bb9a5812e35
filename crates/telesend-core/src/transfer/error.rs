//! The only synchronous failure of `send`.

use thiserror::Error;

/// The background thread could not be created. Nothing was dispatched and
/// everything allocated for the transfer has already been dropped.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("could not start transfer thread: {0}")]
    Spawn(#[from] std::io::Error),
}
