//! Customer chat session.
//!
//! Wires the lifecycle controller, the dialogue engine, and the typing-delay
//! scheduling for one open conversation. The bot's response computation and
//! store append are deferred behind a fixed-plus-random delay on a spawned
//! task that races the session's cancellation signal; closing the session
//! cancels every pending reply, so a torn-down session can never append a
//! stale deferred write.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::warn;

use kruxdesk_bot::{BotFlow, BotOption, DialogueState};
use kruxdesk_core::config::BotConfig;
use kruxdesk_core::types::{ConversationId, CustomerProfile};
use kruxdesk_directory::SharedLoanBook;
use kruxdesk_store::NewMessage;

use crate::controller::{BotPrompt, LifecycleController};
use crate::error::LifecycleError;

// =============================================================================
// TypingDelay
// =============================================================================

/// Simulated typing delay sampled per bot reply.
#[derive(Clone, Copy, Debug)]
pub struct TypingDelay {
    min: Duration,
    max: Duration,
}

impl TypingDelay {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(
            Duration::from_millis(config.typing_delay_min_ms),
            Duration::from_millis(config.typing_delay_max_ms),
        )
    }

    /// No delay at all; replies fire as soon as the task is polled.
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Sample a delay uniformly between min and max.
    pub fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let min_ms = self.min.as_millis() as u64;
        let max_ms = self.max.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min_ms..=max_ms))
    }
}

impl Default for TypingDelay {
    fn default() -> Self {
        Self::from_config(&BotConfig::default())
    }
}

// =============================================================================
// ChatSession
// =============================================================================

/// One customer's open chat over a single conversation.
pub struct ChatSession {
    conversation_id: ConversationId,
    customer: CustomerProfile,
    controller: Arc<LifecycleController>,
    loans: SharedLoanBook,
    dialogue: Arc<Mutex<DialogueState>>,
    typing: TypingDelay,
    cancel: Arc<Notify>,
    closed: Arc<AtomicBool>,
}

impl ChatSession {
    /// Start a brand-new conversation and schedule the greeting.
    ///
    /// Returns the session and the handle of the deferred greeting reply.
    pub fn start(
        controller: Arc<LifecycleController>,
        loans: SharedLoanBook,
        customer: CustomerProfile,
        typing: TypingDelay,
    ) -> Result<(Self, JoinHandle<()>), LifecycleError> {
        let conversation_id = controller.begin(&customer)?;
        let session = Self::attach(controller, loans, customer, typing, conversation_id);
        let greeting = session.schedule(BotPrompt::Flow(BotFlow::Greeting))?;
        Ok((session, greeting))
    }

    /// Resume an existing conversation.
    ///
    /// The greeting is scheduled only when the message log is still empty,
    /// so re-opening a conversation never duplicates it.
    pub fn resume(
        controller: Arc<LifecycleController>,
        loans: SharedLoanBook,
        customer: CustomerProfile,
        typing: TypingDelay,
        conversation_id: ConversationId,
    ) -> Result<(Self, Option<JoinHandle<()>>), LifecycleError> {
        let conversation = controller.store().get(conversation_id)?;
        let session = Self::attach(controller, loans, customer, typing, conversation_id);
        let greeting = if conversation.messages.is_empty() {
            Some(session.schedule(BotPrompt::Flow(BotFlow::Greeting))?)
        } else {
            None
        };
        Ok((session, greeting))
    }

    fn attach(
        controller: Arc<LifecycleController>,
        loans: SharedLoanBook,
        customer: CustomerProfile,
        typing: TypingDelay,
        conversation_id: ConversationId,
    ) -> Self {
        Self {
            conversation_id,
            customer,
            controller,
            loans,
            dialogue: Arc::new(Mutex::new(DialogueState::default())),
            typing,
            cancel: Arc::new(Notify::new()),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn conversation_id(&self) -> ConversationId {
        self.conversation_id
    }

    /// Snapshot of the current dialogue position.
    pub fn dialogue(&self) -> Result<DialogueState, LifecycleError> {
        self.dialogue
            .lock()
            .map(|d| *d)
            .map_err(|e| LifecycleError::Lock(e.to_string()))
    }

    /// Send a free-text customer message.
    ///
    /// Returns the handle of the deferred bot reply, or `None` when
    /// escalation was refused (the refusal is appended immediately).
    pub fn send_text(&self, text: &str) -> Result<Option<JoinHandle<()>>, LifecycleError> {
        self.ensure_open()?;
        let turn = {
            let mut dialogue = self
                .dialogue
                .lock()
                .map_err(|e| LifecycleError::Lock(e.to_string()))?;
            self.controller.customer_message(
                self.conversation_id,
                &self.customer,
                text,
                &mut dialogue,
            )?
        };
        match turn.prompt {
            Some(prompt) => Ok(Some(self.schedule(prompt)?)),
            None => Ok(None),
        }
    }

    /// Select one of the bot's quick options.
    pub fn select_option(&self, option: &BotOption) -> Result<JoinHandle<()>, LifecycleError> {
        self.ensure_open()?;
        let prompt =
            self.controller
                .option_selected(self.conversation_id, &self.customer, option)?;
        self.schedule(prompt)
    }

    /// Close the session, cancelling every pending deferred reply.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.cancel.notify_waiters();
    }

    fn ensure_open(&self) -> Result<(), LifecycleError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(LifecycleError::SessionClosed);
        }
        Ok(())
    }

    /// Defer a bot turn behind the typing delay.
    ///
    /// The response is computed when the task fires, not when it is
    /// scheduled; a cancelled or closed session fires nothing.
    fn schedule(&self, prompt: BotPrompt) -> Result<JoinHandle<()>, LifecycleError> {
        self.ensure_open()?;
        let delay = self.typing.sample();
        let store = Arc::clone(self.controller.store());
        let loans = Arc::clone(&self.loans);
        let dialogue = Arc::clone(&self.dialogue);
        let cancel = Arc::clone(&self.cancel);
        let closed = Arc::clone(&self.closed);
        let conversation_id = self.conversation_id;

        Ok(tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    if closed.load(Ordering::SeqCst) {
                        return;
                    }
                    let (rendered_flow, response) = prompt.render(&loans);
                    if let Err(e) = store.append(conversation_id, NewMessage::bot(response.message.clone())) {
                        warn!("Failed to append deferred bot reply: {}", e);
                        return;
                    }
                    match dialogue.lock() {
                        Ok(mut state) => state.note_response(rendered_flow, &response),
                        Err(e) => warn!("Dialogue state lock poisoned: {}", e),
                    }
                }
                _ = cancel.notified() => {}
            }
        }))
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.close();
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kruxdesk_core::types::Sender;
    use kruxdesk_directory::{seed_customers, LoanBook};
    use kruxdesk_store::ConversationStore;

    fn setup() -> (Arc<LifecycleController>, SharedLoanBook, CustomerProfile) {
        let controller = Arc::new(LifecycleController::new(Arc::new(ConversationStore::new())));
        let loans = Arc::new(LoanBook::seeded());
        let customer = seed_customers().remove(0);
        (controller, loans, customer)
    }

    // ---- Typing delay sampling ----

    #[test]
    fn test_sample_within_bounds() {
        let typing = TypingDelay::new(Duration::from_millis(10), Duration::from_millis(20));
        for _ in 0..50 {
            let d = typing.sample();
            assert!(d >= Duration::from_millis(10));
            assert!(d <= Duration::from_millis(20));
        }
    }

    #[test]
    fn test_sample_zero_delay() {
        assert_eq!(TypingDelay::none().sample(), Duration::ZERO);
    }

    #[test]
    fn test_sample_degenerate_range() {
        let typing = TypingDelay::new(Duration::from_millis(30), Duration::from_millis(30));
        assert_eq!(typing.sample(), Duration::from_millis(30));
    }

    #[test]
    fn test_default_matches_config() {
        let typing = TypingDelay::default();
        let d = typing.sample();
        assert!(d >= Duration::from_millis(1000));
        assert!(d <= Duration::from_millis(2000));
    }

    // ---- Deferred greeting ----

    #[tokio::test]
    async fn test_start_delivers_greeting() {
        let (controller, loans, customer) = setup();
        let (session, greeting) =
            ChatSession::start(Arc::clone(&controller), loans, customer, TypingDelay::none())
                .unwrap();
        greeting.await.unwrap();

        let conv = controller.store().get(session.conversation_id()).unwrap();
        assert_eq!(conv.messages.len(), 1);
        assert_eq!(conv.messages[0].sender, Sender::Bot);
        assert!(conv.messages[0].content.contains("Welcome to KRUX Finance"));
        assert_eq!(session.dialogue().unwrap().flow, BotFlow::Greeting);
    }

    #[tokio::test]
    async fn test_resume_existing_conversation_skips_greeting() {
        let (controller, loans, customer) = setup();
        let (session, greeting) = ChatSession::start(
            Arc::clone(&controller),
            Arc::clone(&loans),
            customer.clone(),
            TypingDelay::none(),
        )
        .unwrap();
        greeting.await.unwrap();
        let id = session.conversation_id();
        drop(session);

        let (resumed, greeting) =
            ChatSession::resume(Arc::clone(&controller), loans, customer, TypingDelay::none(), id)
                .unwrap();
        assert!(greeting.is_none());
        let conv = controller.store().get(resumed.conversation_id()).unwrap();
        assert_eq!(conv.messages.len(), 1);
    }

    // ---- Deferred replies ----

    #[tokio::test]
    async fn test_send_text_appends_customer_then_bot() {
        let (controller, loans, customer) = setup();
        let (session, greeting) =
            ChatSession::start(Arc::clone(&controller), loans, customer, TypingDelay::none())
                .unwrap();
        greeting.await.unwrap();

        let reply = session.send_text("hello").unwrap().unwrap();
        reply.await.unwrap();

        let conv = controller.store().get(session.conversation_id()).unwrap();
        let senders: Vec<Sender> = conv.messages.iter().map(|m| m.sender).collect();
        assert_eq!(senders, vec![Sender::Bot, Sender::Customer, Sender::Bot]);
        assert!(conv.messages[2].content.contains("I'm here to help"));
    }

    #[tokio::test]
    async fn test_select_status_option_then_lookup() {
        let (controller, loans, customer) = setup();
        let (session, greeting) = ChatSession::start(
            Arc::clone(&controller),
            Arc::clone(&loans),
            customer,
            TypingDelay::none(),
        )
        .unwrap();
        greeting.await.unwrap();

        let status_option = kruxdesk_bot::respond(BotFlow::Greeting)
            .options
            .into_iter()
            .find(|o| o.value == "status")
            .unwrap();
        session.select_option(&status_option).unwrap().await.unwrap();

        let dialogue = session.dialogue().unwrap();
        assert_eq!(dialogue.flow, BotFlow::StatusCheck);
        assert!(dialogue.awaiting_input);

        let reply = session.send_text("LA-2024-001").unwrap().unwrap();
        reply.await.unwrap();

        let conv = controller.store().get(session.conversation_id()).unwrap();
        let last = conv.messages.last().unwrap();
        assert!(last.content.contains("UNDER REVIEW"));
        assert!(!session.dialogue().unwrap().awaiting_input);
    }

    // ---- Cancellation ----

    #[tokio::test]
    async fn test_close_cancels_pending_reply() {
        let (controller, loans, customer) = setup();
        let typing = TypingDelay::new(Duration::from_millis(200), Duration::from_millis(200));
        let (session, greeting) =
            ChatSession::start(Arc::clone(&controller), loans, customer, typing).unwrap();
        session.close();
        greeting.await.unwrap();

        let conv = controller.store().get(session.conversation_id()).unwrap();
        assert!(conv.messages.is_empty(), "Cancelled reply must not append");
    }

    #[tokio::test]
    async fn test_drop_cancels_pending_reply() {
        let (controller, loans, customer) = setup();
        let typing = TypingDelay::new(Duration::from_millis(200), Duration::from_millis(200));
        let (session, greeting) =
            ChatSession::start(Arc::clone(&controller), loans, customer, typing).unwrap();
        let id = session.conversation_id();
        drop(session);
        greeting.await.unwrap();

        let conv = controller.store().get(id).unwrap();
        assert!(conv.messages.is_empty());
    }

    #[tokio::test]
    async fn test_closed_session_rejects_sends() {
        let (controller, loans, customer) = setup();
        let (session, greeting) =
            ChatSession::start(controller, loans, customer, TypingDelay::none()).unwrap();
        greeting.await.unwrap();
        session.close();
        let err = session.send_text("hello").unwrap_err();
        assert!(matches!(err, LifecycleError::SessionClosed));
    }

    #[tokio::test]
    async fn test_refusal_returns_no_handle() {
        let (controller, loans, customer) = setup();
        let (first, greeting) = ChatSession::start(
            Arc::clone(&controller),
            Arc::clone(&loans),
            customer.clone(),
            TypingDelay::none(),
        )
        .unwrap();
        greeting.await.unwrap();
        first.send_text("talk to agent").unwrap().unwrap().await.unwrap();

        let (second, greeting) = ChatSession::start(
            Arc::clone(&controller),
            loans,
            customer,
            TypingDelay::none(),
        )
        .unwrap();
        greeting.await.unwrap();
        let handle = second.send_text("escalate please").unwrap();
        assert!(handle.is_none());

        let conv = controller.store().get(second.conversation_id()).unwrap();
        let last = conv.messages.last().unwrap();
        assert!(last.content.contains("already have an active ticket"));
    }
}
