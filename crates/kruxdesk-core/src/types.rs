use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sender id used for every bot-authored message.
pub const BOT_SENDER_ID: &str = "bot-1";

/// Display name used for every bot-authored message.
pub const BOT_DISPLAY_NAME: &str = "KRUX Bot";

// =============================================================================
// Enums
// =============================================================================

/// Lifecycle status of a conversation.
///
/// A conversation starts as a `waiting` query and becomes an `active` ticket
/// only when the customer asks for an agent. `resolved` and `escalated` are
/// terminal for automated transitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    #[default]
    Waiting,
    Active,
    Resolved,
    Escalated,
}

impl std::fmt::Display for ConversationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConversationStatus::Waiting => "waiting",
            ConversationStatus::Active => "active",
            ConversationStatus::Resolved => "resolved",
            ConversationStatus::Escalated => "escalated",
        };
        f.write_str(s)
    }
}

/// Ticket priority shown on the agent dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Coarse topic classification of a conversation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    LoanApplication,
    DocumentQuery,
    StatusCheck,
    #[default]
    General,
    Escalation,
}

/// Who authored a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Customer,
    Bot,
    Agent,
}

/// Presence status of a support agent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentPresence {
    #[default]
    Online,
    Offline,
    Busy,
}

/// Product line of a loan application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanType {
    Business,
    Personal,
    #[serde(rename = "MSME")]
    Msme,
}

impl std::fmt::Display for LoanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LoanType::Business => "Business",
            LoanType::Personal => "Personal",
            LoanType::Msme => "MSME",
        };
        f.write_str(s)
    }
}

/// Processing status of a loan application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Pending,
    UnderReview,
    Approved,
    Rejected,
    Disbursed,
}

impl LoanStatus {
    /// Wire spelling of the status (`under_review` etc.).
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Pending => "pending",
            LoanStatus::UnderReview => "under_review",
            LoanStatus::Approved => "approved",
            LoanStatus::Rejected => "rejected",
            LoanStatus::Disbursed => "disbursed",
        }
    }
}

// =============================================================================
// Newtype Wrappers - Identity
// =============================================================================

/// Unique identifier for a conversation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub Uuid);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a message within a conversation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for an internal note.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteId(pub Uuid);

impl NoteId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Principals
// =============================================================================

/// A signed-in customer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub username: String,
}

/// A signed-in support agent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentProfile {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub status: AgentPresence,
}

/// An authenticated identity, tagged by role on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Principal {
    Customer(CustomerProfile),
    Agent(AgentProfile),
}

impl Principal {
    pub fn id(&self) -> &str {
        match self {
            Principal::Customer(c) => &c.id,
            Principal::Agent(a) => &a.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Principal::Customer(c) => &c.name,
            Principal::Agent(a) => &a.name,
        }
    }
}

// =============================================================================
// Messages & Notes
// =============================================================================

/// Metadata for a file attached to a message. The file contents themselves
/// are never stored here, only descriptive fields and an optional preview URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAttachment {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// One entry in a conversation's append-only message log.
///
/// Messages are immutable once appended; the `read` flag is the only field
/// the store ever touches afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender: Sender,
    pub sender_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<FileAttachment>,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

/// Agent-only annotation on a conversation, hidden from the customer view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalNote {
    pub id: NoteId,
    pub agent_id: String,
    pub agent_name: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Customer satisfaction rating collected after resolution.
///
/// Invariant: score is between 1 and 5 inclusive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Rating {
    pub fn new(score: u8, comment: Option<String>) -> std::result::Result<Self, &'static str> {
        if !(1..=5).contains(&score) {
            return Err("Rating score must be between 1 and 5");
        }
        Ok(Self { score, comment })
    }
}

// =============================================================================
// Conversations
// =============================================================================

/// The unit of support interaction: a query while `waiting`, a ticket once
/// `active`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: ConversationId,
    pub customer_id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub status: ConversationStatus,
    pub priority: Priority,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_agent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_agent_name: Option<String>,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub internal_notes: Vec<InternalNote>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl Conversation {
    /// Start a fresh `waiting` query for a customer with an empty message log.
    pub fn open(customer: &CustomerProfile) -> Self {
        let now = Utc::now();
        Self {
            id: ConversationId::new(),
            customer_id: customer.id.clone(),
            customer_name: customer.name.clone(),
            customer_phone: customer.phone.clone(),
            status: ConversationStatus::Waiting,
            priority: Priority::Medium,
            category: Category::General,
            assigned_agent_id: None,
            assigned_agent_name: None,
            messages: Vec::new(),
            created_at: now,
            last_message_at: now,
            resolved_at: None,
            internal_notes: Vec::new(),
            rating: None,
        }
    }

    /// Most recent bot-authored message, if any.
    pub fn last_bot_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.sender == Sender::Bot)
    }

    /// Count of unread messages not authored by the owning customer.
    pub fn unread_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| !m.read && m.sender != Sender::Customer)
            .count()
    }
}

// =============================================================================
// Loan applications & quick replies
// =============================================================================

/// A loan application record consulted by the status-check flow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanApplication {
    pub id: String,
    pub customer_id: String,
    #[serde(rename = "type")]
    pub loan_type: LoanType,
    pub amount: u64,
    pub status: LoanStatus,
    pub applied_date: NaiveDate,
    pub last_updated: NaiveDate,
    pub documents: Vec<String>,
}

/// Category-tagged canned text for the agent console.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickReply {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
}

// =============================================================================
// Tests
// =============================================================================
