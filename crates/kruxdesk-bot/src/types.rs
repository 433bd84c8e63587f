use serde::{Deserialize, Serialize};

// =============================================================================
// Flows
// =============================================================================

/// A named state in the bot's scripted dialogue graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotFlow {
    #[default]
    Greeting,
    LoanApplication,
    DocumentRequirements,
    StatusCheck,
    Escalation,
    GeneralQuery,
}

/// Kind of free-text input a flow expects from the customer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Text,
    Number,
    Phone,
}

// =============================================================================
// Responses
// =============================================================================

/// A selectable quick option offered with a bot response.
///
/// `value` is an opaque selection token; `next_flow` routes the dialogue when
/// the option is chosen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotOption {
    pub id: String,
    pub label: String,
    pub value: String,
    pub next_flow: Option<BotFlow>,
}

/// The bot's scripted reply: fixed text plus either quick options or a
/// request for free-text input.
#[derive(Clone, Debug, PartialEq)]
pub struct BotResponse {
    pub message: String,
    pub options: Vec<BotOption>,
    pub requires_input: bool,
    pub input_kind: Option<InputKind>,
    pub next_flow: Option<BotFlow>,
}

impl BotResponse {
    /// A response presenting fixed text and quick options.
    pub fn with_options(message: impl Into<String>, options: Vec<BotOption>) -> Self {
        Self {
            message: message.into(),
            options,
            requires_input: false,
            input_kind: None,
            next_flow: None,
        }
    }

    /// A response requesting free-text input of the given kind.
    pub fn requesting_input(message: impl Into<String>, kind: InputKind) -> Self {
        Self {
            message: message.into(),
            options: Vec::new(),
            requires_input: true,
            input_kind: Some(kind),
            next_flow: None,
        }
    }
}

// =============================================================================
// Dialogue state
// =============================================================================

/// Transient per-session dialogue position: the current flow and whether the
/// bot is waiting for free-text input. Never persisted; reset when a new
/// conversation starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DialogueState {
    pub flow: BotFlow,
    pub awaiting_input: bool,
}

impl DialogueState {
    /// Record the response the bot just rendered.
    ///
    /// The flow advances to the response's `next_flow` when present, else to
    /// the flow that was rendered; the pending-input flag follows
    /// `requires_input`.
    pub fn note_response(&mut self, rendered_flow: Option<BotFlow>, response: &BotResponse) {
        if let Some(flow) = response.next_flow.or(rendered_flow) {
            self.flow = flow;
        }
        self.awaiting_input = response.requires_input;
    }
}
