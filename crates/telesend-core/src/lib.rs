pub mod config;
pub mod engine;
pub mod fsutil;
pub mod logging;
pub mod registry;
pub mod transfer;

pub use registry::{HandleId, HandleRegistry, RegistryError};
pub use transfer::{send, wait, CompletionResult, LaunchError, TransferHandle};
