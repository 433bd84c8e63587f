//! Error types for the lifecycle controller.

use kruxdesk_core::error::DeskError;
use kruxdesk_core::types::ConversationStatus;
use kruxdesk_store::StoreError;

/// Errors from lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("invalid status transition: {0} -> {1}")]
    InvalidTransition(ConversationStatus, ConversationStatus),
    #[error("chat session is closed")]
    SessionClosed,
    #[error("dialogue state lock poisoned: {0}")]
    Lock(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<LifecycleError> for DeskError {
    fn from(err: LifecycleError) -> Self {
        DeskError::Lifecycle(err.to_string())
    }
}
