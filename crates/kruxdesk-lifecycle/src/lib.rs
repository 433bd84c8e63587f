//! Conversation lifecycle rules for kruxdesk.
//!
//! Classifies free-text customer input, validates status transitions, drives
//! the conversation store, and schedules deferred bot replies behind the
//! simulated typing delay.

pub mod classifier;
pub mod controller;
pub mod error;
pub mod session;
pub mod transitions;

pub use classifier::{
    bot_asks_for_more, classify, matches_agent_request, matches_resolution, MessageIntent,
};
pub use controller::{BotPrompt, CustomerTurn, LifecycleController, ACTIVE_TICKET_REFUSAL};
pub use error::LifecycleError;
pub use session::{ChatSession, TypingDelay};
pub use transitions::validate_transition;
