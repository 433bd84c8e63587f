//! Error types for the conversation store.

use kruxdesk_core::error::DeskError;
use kruxdesk_core::types::ConversationId;

/// Errors from conversation store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("conversation not found: {0}")]
    NotFound(ConversationId),
    #[error("conversation store lock poisoned: {0}")]
    Lock(String),
}

impl From<StoreError> for DeskError {
    fn from(err: StoreError) -> Self {
        DeskError::Conversation(err.to_string())
    }
}
