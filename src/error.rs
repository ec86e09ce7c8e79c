use thiserror::Error;

pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("chart operation failed: {0}")]
    Chart(String),

    #[error("synchronization handle has already been detached")]
    Detached,
}
