//! Conversation status state machine.
//!
//! Allowed transitions:
//! Waiting -> Active (agent requested, no other active ticket)
//! Waiting -> Resolved (resolution intent, no agent assigned)
//! Active -> Resolved (agent resolves)
//! Active -> Escalated (agent escalates)
//! Resolved -> Active (a message matching both keyword tables resolves
//! first, then the escalation check re-opens the ticket in the same turn)

use kruxdesk_core::types::ConversationStatus;

use crate::error::LifecycleError;

/// Validate that a status transition is allowed.
pub fn validate_transition(
    from: ConversationStatus,
    to: ConversationStatus,
) -> Result<(), LifecycleError> {
    let valid = matches!(
        (from, to),
        (ConversationStatus::Waiting, ConversationStatus::Active)
            | (ConversationStatus::Waiting, ConversationStatus::Resolved)
            | (ConversationStatus::Active, ConversationStatus::Resolved)
            | (ConversationStatus::Active, ConversationStatus::Escalated)
            | (ConversationStatus::Resolved, ConversationStatus::Active)
    );

    if valid {
        Ok(())
    } else {
        Err(LifecycleError::InvalidTransition(from, to))
    }
}
