use crate::{
    config::ConfigError,
    services::{heartbeat::HeartbeatError, storage_service::StorageError},
};
use thiserror::Error;

/// Everything that can end a cleanup run early.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Heartbeat(#[from] HeartbeatError),
}

impl AppError {
    /// Process exit status for this error.
    ///
    /// Every failure exits with 1; configuration problems are the only ones
    /// reported before any storage call is attempted.
    pub fn exit_code(&self) -> u8 {
        1
    }

    pub fn is_config(&self) -> bool {
        matches!(self, AppError::Config(_))
    }
}
