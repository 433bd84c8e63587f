//! Lifecycle controller: business rules driving conversation status.
//!
//! Sits above the conversation store and the dialogue engine. Classifies
//! free-text customer input, applies status transitions, appends messages,
//! and decides what the bot's next turn is. The bot turn itself (response
//! computation and append) is carried out by the chat session, usually behind
//! the typing delay.

use std::sync::Arc;

use tracing::{debug, info};

use kruxdesk_bot::{check_status, handle_selection, respond, BotFlow, BotOption, BotResponse, DialogueState};
use kruxdesk_core::types::{
    AgentProfile, ConversationId, ConversationStatus, CustomerProfile, MessageId, NoteId, Rating,
};
use kruxdesk_directory::LoanBook;
use kruxdesk_store::{ConversationStore, NewMessage};

use crate::classifier;
use crate::error::LifecycleError;
use crate::transitions::validate_transition;

/// Bot message sent when escalation is refused because the customer already
/// has an active ticket.
pub const ACTIVE_TICKET_REFUSAL: &str = "You already have an active ticket. Please wait for it \
                                         to be resolved before creating a new one.";

// =============================================================================
// BotPrompt
// =============================================================================

/// A pending bot turn. The response is computed when the turn fires, not
/// when it is decided.
#[derive(Clone, Debug, PartialEq)]
pub enum BotPrompt {
    /// Render a scripted flow.
    Flow(BotFlow),
    /// Handle a selected option value.
    Selection(String),
    /// Look up an application id supplied as free text.
    StatusLookup(String),
    /// Decline escalation because another ticket is already active.
    Refusal,
}

impl BotPrompt {
    /// Compute the bot response for this prompt.
    ///
    /// Returns the flow that was rendered (when the prompt names one) so the
    /// dialogue state can track it.
    pub fn render(&self, loans: &LoanBook) -> (Option<BotFlow>, BotResponse) {
        match self {
            BotPrompt::Flow(flow) => (Some(*flow), respond(*flow)),
            BotPrompt::Selection(value) => (None, handle_selection(value)),
            BotPrompt::StatusLookup(input) => (None, check_status(input, loans)),
            BotPrompt::Refusal => (None, BotResponse::with_options(ACTIVE_TICKET_REFUSAL, vec![])),
        }
    }
}

/// Outcome of handling a free-text customer message.
#[derive(Debug)]
pub struct CustomerTurn {
    /// The bot turn to schedule, if any.
    pub prompt: Option<BotPrompt>,
    /// Id of the appended customer message. `None` when the message was
    /// dropped because escalation was refused.
    pub message_id: Option<MessageId>,
    /// Whether this message auto-resolved the conversation.
    pub resolved: bool,
    /// Whether this message turned the query into an active ticket.
    pub escalated: bool,
    /// Whether escalation was refused because another ticket is active.
    pub refused: bool,
}

// =============================================================================
// LifecycleController
// =============================================================================

/// Applies status transition rules over the conversation store.
pub struct LifecycleController {
    store: Arc<ConversationStore>,
}

impl LifecycleController {
    pub fn new(store: Arc<ConversationStore>) -> Self {
        Self { store }
    }

    /// The underlying conversation store.
    pub fn store(&self) -> &Arc<ConversationStore> {
        &self.store
    }

    /// Open a new `waiting` query for a customer.
    pub fn begin(&self, customer: &CustomerProfile) -> Result<ConversationId, LifecycleError> {
        Ok(self.store.create(customer)?)
    }

    // -----------------------------------------------------------------
    // Customer turns
    // -----------------------------------------------------------------

    /// Handle a free-text customer message.
    ///
    /// Resolution intent is evaluated before agent-request intent on every
    /// message; both may fire, in which case the resolution is applied first
    /// and the escalation check may re-open the just-resolved conversation.
    pub fn customer_message(
        &self,
        id: ConversationId,
        customer: &CustomerProfile,
        text: &str,
        dialogue: &mut DialogueState,
    ) -> Result<CustomerTurn, LifecycleError> {
        let conversation = self.store.get(id)?;
        let mut resolved = false;
        let mut escalated = false;

        if classifier::matches_resolution(text) {
            resolved = self.try_auto_resolve(id)?;

            // Reinforcement: the bot just asked "anything else" and the reply
            // loosely declines. Subsumed by the resolution table, so this is
            // a no-op after the check above.
            let bot_asked = conversation
                .last_bot_message()
                .map(|m| classifier::bot_asks_for_more(&m.content))
                .unwrap_or(false);
            if bot_asked && classifier::reinforces_resolution(text) {
                resolved = self.try_auto_resolve(id)? || resolved;
            }
        }

        if classifier::matches_agent_request(text) {
            if self
                .store
                .active_for_customer(&conversation.customer_id, Some(id))
                .is_some()
            {
                // Refused: the customer's message is dropped and the bot
                // declines immediately, with no status mutation.
                self.store.append(id, NewMessage::bot(ACTIVE_TICKET_REFUSAL))?;
                debug!("Escalation refused for conversation {}: another ticket is active", id);
                return Ok(CustomerTurn {
                    prompt: None,
                    message_id: None,
                    resolved,
                    escalated: false,
                    refused: true,
                });
            }

            let current = self.store.get(id)?.status;
            if current != ConversationStatus::Active {
                escalated = self.transition_if_valid(id, current, ConversationStatus::Active)?;
            }
        }

        let message_id = self.store.append(id, NewMessage::customer(customer, text))?;

        // The bot's turn: a status lookup when we were waiting on an
        // application id, otherwise the general-query response.
        let prompt = if dialogue.awaiting_input && dialogue.flow == BotFlow::StatusCheck {
            dialogue.awaiting_input = false;
            BotPrompt::StatusLookup(text.to_string())
        } else {
            BotPrompt::Flow(BotFlow::GeneralQuery)
        };

        Ok(CustomerTurn {
            prompt: Some(prompt),
            message_id: Some(message_id),
            resolved,
            escalated,
            refused: false,
        })
    }

    /// Handle a quick-option selection.
    ///
    /// The option label is appended as the customer's message. The `agent`
    /// token (or an escalation `next_flow`) runs the single-active-ticket
    /// check and converts the query into an active ticket.
    pub fn option_selected(
        &self,
        id: ConversationId,
        customer: &CustomerProfile,
        option: &BotOption,
    ) -> Result<BotPrompt, LifecycleError> {
        self.store
            .append(id, NewMessage::customer(customer, option.label.clone()))?;

        if option.value == "agent" || option.next_flow == Some(BotFlow::Escalation) {
            let conversation = self.store.get(id)?;
            if self
                .store
                .active_for_customer(&conversation.customer_id, Some(id))
                .is_some()
            {
                debug!("Escalation refused for conversation {}: another ticket is active", id);
                return Ok(BotPrompt::Refusal);
            }
            if conversation.status != ConversationStatus::Active {
                self.transition_if_valid(id, conversation.status, ConversationStatus::Active)?;
            }
            return Ok(BotPrompt::Flow(BotFlow::Escalation));
        }

        if let Some(flow) = option.next_flow {
            return Ok(BotPrompt::Flow(flow));
        }

        Ok(BotPrompt::Selection(option.value.clone()))
    }

    // -----------------------------------------------------------------
    // Agent actions
    // -----------------------------------------------------------------

    /// Assign an agent; the conversation becomes an active ticket.
    pub fn agent_claim(
        &self,
        id: ConversationId,
        agent: &AgentProfile,
    ) -> Result<(), LifecycleError> {
        self.store.assign_agent(id, &agent.id, &agent.name)?;
        info!("Conversation {} claimed by agent {}", id, agent.id);
        Ok(())
    }

    /// Agent marks the conversation resolved.
    pub fn agent_resolve(&self, id: ConversationId) -> Result<(), LifecycleError> {
        let conversation = self.store.get(id)?;
        validate_transition(conversation.status, ConversationStatus::Resolved)?;
        self.store.set_status(id, ConversationStatus::Resolved)?;
        info!("Conversation {} resolved by agent", id);
        Ok(())
    }

    /// Agent escalates the conversation to a senior queue.
    pub fn agent_escalate(&self, id: ConversationId) -> Result<(), LifecycleError> {
        let conversation = self.store.get(id)?;
        validate_transition(conversation.status, ConversationStatus::Escalated)?;
        self.store.set_status(id, ConversationStatus::Escalated)?;
        info!("Conversation {} escalated by agent", id);
        Ok(())
    }

    /// Agent sends a message to the customer.
    pub fn agent_message(
        &self,
        id: ConversationId,
        agent: &AgentProfile,
        text: &str,
    ) -> Result<MessageId, LifecycleError> {
        Ok(self.store.append(id, NewMessage::agent(agent, text))?)
    }

    /// Agent attaches an internal note.
    pub fn agent_note(
        &self,
        id: ConversationId,
        agent: &AgentProfile,
        text: &str,
    ) -> Result<NoteId, LifecycleError> {
        Ok(self.store.add_note(id, &agent.id, &agent.name, text)?)
    }

    /// Record the customer's satisfaction rating.
    pub fn rate(&self, id: ConversationId, rating: Rating) -> Result<(), LifecycleError> {
        Ok(self.store.set_rating(id, rating)?)
    }

    // -----------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------

    /// Auto-resolve when the conversation has no assigned agent and is not
    /// already resolved. Returns whether the transition was applied.
    fn try_auto_resolve(&self, id: ConversationId) -> Result<bool, LifecycleError> {
        let conversation = self.store.get(id)?;
        if conversation.assigned_agent_id.is_some()
            || conversation.status == ConversationStatus::Resolved
        {
            return Ok(false);
        }
        let applied =
            self.transition_if_valid(id, conversation.status, ConversationStatus::Resolved)?;
        if applied {
            info!("Conversation {} auto-resolved", id);
        }
        Ok(applied)
    }

    /// Apply a heuristic transition only when the state machine allows it.
    fn transition_if_valid(
        &self,
        id: ConversationId,
        from: ConversationStatus,
        to: ConversationStatus,
    ) -> Result<bool, LifecycleError> {
        if validate_transition(from, to).is_err() {
            debug!("Skipping transition {} -> {} for conversation {}", from, to, id);
            return Ok(false);
        }
        self.store.set_status(id, to)?;
        info!("Conversation {} moved {} -> {}", id, from, to);
        Ok(true)
    }
}

// =============================================================================
// Tests
// =============================================================================
