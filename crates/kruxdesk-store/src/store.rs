//! In-memory conversation store with JSON snapshot mirroring.
//!
//! The store is the system of record for conversations. Every operation is
//! atomic from the caller's point of view; reads return cloned snapshots.
//! When a storage adapter is attached, the full conversation list is mirrored
//! to it after each mutation. Persistence failures are logged and swallowed:
//! the in-memory state keeps going and diverges from storage until the next
//! successful save.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{debug, warn};

use kruxdesk_core::types::{
    AgentProfile, Category, Conversation, ConversationId, ConversationStatus, CustomerProfile,
    FileAttachment, InternalNote, Message, MessageId, NoteId, Rating, Sender, BOT_DISPLAY_NAME,
    BOT_SENDER_ID,
};

use crate::error::StoreError;
use crate::persist::{keys, KeyValueStorage};

// =============================================================================
// NewMessage
// =============================================================================

/// A message to append, before the store assigns its id and timestamp.
#[derive(Clone, Debug)]
pub struct NewMessage {
    pub sender: Sender,
    pub sender_id: Option<String>,
    pub sender_name: String,
    pub content: String,
    pub attachments: Vec<FileAttachment>,
}

impl NewMessage {
    /// A message authored by the customer. Customer messages are born read.
    pub fn customer(customer: &CustomerProfile, content: impl Into<String>) -> Self {
        Self {
            sender: Sender::Customer,
            sender_id: Some(customer.id.clone()),
            sender_name: customer.name.clone(),
            content: content.into(),
            attachments: Vec::new(),
        }
    }

    /// A message authored by the bot.
    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            sender_id: Some(BOT_SENDER_ID.to_string()),
            sender_name: BOT_DISPLAY_NAME.to_string(),
            content: content.into(),
            attachments: Vec::new(),
        }
    }

    /// A message authored by a support agent.
    pub fn agent(agent: &AgentProfile, content: impl Into<String>) -> Self {
        Self {
            sender: Sender::Agent,
            sender_id: Some(agent.id.clone()),
            sender_name: agent.name.clone(),
            content: content.into(),
            attachments: Vec::new(),
        }
    }

    /// Attach file metadata to the message.
    pub fn with_attachments(mut self, attachments: Vec<FileAttachment>) -> Self {
        self.attachments = attachments;
        self
    }
}

// =============================================================================
// ConversationStore
// =============================================================================

/// Owns the authoritative conversation list.
///
/// Conversations are never deleted.
pub struct ConversationStore {
    conversations: Mutex<Vec<Conversation>>,
    storage: Option<Arc<dyn KeyValueStorage>>,
}

impl ConversationStore {
    /// Create an empty store with no storage mirroring.
    pub fn new() -> Self {
        Self {
            conversations: Mutex::new(Vec::new()),
            storage: None,
        }
    }

    /// Create a store mirrored to the given storage adapter.
    ///
    /// Any conversation list already present under [`keys::CONVERSATIONS`] is
    /// loaded; an unreadable or incompatible document is logged and the store
    /// starts empty.
    pub fn with_storage(storage: Arc<dyn KeyValueStorage>) -> Self {
        let conversations = match storage.get(keys::CONVERSATIONS) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<Conversation>>(&json) {
                Ok(list) => {
                    debug!("Loaded {} conversations from storage", list.len());
                    list
                }
                Err(e) => {
                    warn!("Failed to parse stored conversations: {}. Starting empty.", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read stored conversations: {}. Starting empty.", e);
                Vec::new()
            }
        };

        Self {
            conversations: Mutex::new(conversations),
            storage: Some(storage),
        }
    }

    // -----------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------

    /// Open a new `waiting` conversation for a customer.
    pub fn create(&self, customer: &CustomerProfile) -> Result<ConversationId, StoreError> {
        let conversation = Conversation::open(customer);
        let id = conversation.id;
        {
            let mut convs = self.lock()?;
            convs.push(conversation);
            self.mirror(&convs);
        }
        debug!("Conversation {} created for customer {}", id, customer.id);
        Ok(id)
    }

    /// Append a message and bump `last_message_at`.
    ///
    /// Customer messages are marked read at creation; bot and agent messages
    /// stay unread until [`mark_read`](Self::mark_read).
    pub fn append(&self, id: ConversationId, message: NewMessage) -> Result<MessageId, StoreError> {
        let mut convs = self.lock()?;
        let conv = find_mut(&mut convs, id)?;
        let now = Utc::now();
        let message_id = MessageId::new();
        conv.messages.push(Message {
            id: message_id,
            conversation_id: id,
            sender: message.sender,
            sender_name: message.sender_name,
            sender_id: message.sender_id,
            content: message.content,
            attachments: message.attachments,
            timestamp: now,
            read: message.sender == Sender::Customer,
        });
        conv.last_message_at = now;
        self.mirror(&convs);
        Ok(message_id)
    }

    /// Set the conversation status.
    ///
    /// Entering `resolved` stamps `resolved_at`; leaving it again does not
    /// clear the stamp.
    pub fn set_status(
        &self,
        id: ConversationId,
        status: ConversationStatus,
    ) -> Result<(), StoreError> {
        let mut convs = self.lock()?;
        let conv = find_mut(&mut convs, id)?;
        conv.status = status;
        if status == ConversationStatus::Resolved {
            conv.resolved_at = Some(Utc::now());
        }
        self.mirror(&convs);
        Ok(())
    }

    /// Assign an agent to the conversation.
    ///
    /// Assignment forces status `active` and upgrades a `general` category to
    /// `escalation`.
    pub fn assign_agent(
        &self,
        id: ConversationId,
        agent_id: &str,
        agent_name: &str,
    ) -> Result<(), StoreError> {
        let mut convs = self.lock()?;
        let conv = find_mut(&mut convs, id)?;
        conv.assigned_agent_id = Some(agent_id.to_string());
        conv.assigned_agent_name = Some(agent_name.to_string());
        conv.status = ConversationStatus::Active;
        if conv.category == Category::General {
            conv.category = Category::Escalation;
        }
        self.mirror(&convs);
        Ok(())
    }

    /// Append an internal note visible only to agents.
    pub fn add_note(
        &self,
        id: ConversationId,
        agent_id: &str,
        agent_name: &str,
        content: impl Into<String>,
    ) -> Result<NoteId, StoreError> {
        let mut convs = self.lock()?;
        let conv = find_mut(&mut convs, id)?;
        let note_id = NoteId::new();
        conv.internal_notes.push(InternalNote {
            id: note_id,
            agent_id: agent_id.to_string(),
            agent_name: agent_name.to_string(),
            content: content.into(),
            timestamp: Utc::now(),
        });
        self.mirror(&convs);
        Ok(note_id)
    }

    /// Mark every message in the conversation as read. Idempotent.
    pub fn mark_read(&self, id: ConversationId) -> Result<(), StoreError> {
        let mut convs = self.lock()?;
        let conv = find_mut(&mut convs, id)?;
        for message in &mut conv.messages {
            message.read = true;
        }
        self.mirror(&convs);
        Ok(())
    }

    /// Record the customer's satisfaction rating.
    pub fn set_rating(&self, id: ConversationId, rating: Rating) -> Result<(), StoreError> {
        let mut convs = self.lock()?;
        let conv = find_mut(&mut convs, id)?;
        conv.rating = Some(rating);
        self.mirror(&convs);
        Ok(())
    }

    // -----------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------

    /// Get a cloned snapshot of a conversation.
    pub fn get(&self, id: ConversationId) -> Result<Conversation, StoreError> {
        let convs = self.lock()?;
        convs
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Snapshot of every conversation, in creation order.
    pub fn list(&self) -> Vec<Conversation> {
        match self.lock() {
            Ok(convs) => convs.clone(),
            Err(_) => Vec::new(),
        }
    }

    /// Snapshot of a customer's conversations, in creation order.
    pub fn for_customer(&self, customer_id: &str) -> Vec<Conversation> {
        match self.lock() {
            Ok(convs) => convs
                .iter()
                .filter(|c| c.customer_id == customer_id)
                .cloned()
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Find the customer's `active` conversation, if any, skipping
    /// `excluding`. Used for the single-active-ticket check before
    /// escalation.
    pub fn active_for_customer(
        &self,
        customer_id: &str,
        excluding: Option<ConversationId>,
    ) -> Option<ConversationId> {
        let convs = self.lock().ok()?;
        convs
            .iter()
            .find(|c| {
                c.customer_id == customer_id
                    && c.status == ConversationStatus::Active
                    && Some(c.id) != excluding
            })
            .map(|c| c.id)
    }

    /// Count of unread non-customer messages, used to badge ticket cards.
    pub fn unread_count(&self, id: ConversationId) -> Result<usize, StoreError> {
        Ok(self.get(id)?.unread_count())
    }

    // -----------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Conversation>>, StoreError> {
        self.conversations
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }

    /// Mirror the conversation list to storage, logging failures.
    fn mirror(&self, conversations: &[Conversation]) {
        let Some(storage) = &self.storage else {
            return;
        };
        let json = match serde_json::to_string(conversations) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize conversations: {}", e);
                return;
            }
        };
        if let Err(e) = storage.put(keys::CONVERSATIONS, &json) {
            warn!("Failed to persist conversations: {}", e);
        }
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

fn find_mut(
    conversations: &mut [Conversation],
    id: ConversationId,
) -> Result<&mut Conversation, StoreError> {
    conversations
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or(StoreError::NotFound(id))
}

// =============================================================================
// Tests
// =============================================================================
