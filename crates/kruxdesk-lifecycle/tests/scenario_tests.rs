//! End-to-end conversation scenarios.
//!
//! Each test drives a full customer journey through the chat session with a
//! zero typing delay: greeting, quick options, status lookup, escalation,
//! and auto-resolution, asserting the conversation lifecycle along the way.

use std::sync::Arc;

use kruxdesk_bot::{respond, BotFlow, BotOption};
use kruxdesk_core::types::{ConversationStatus, CustomerProfile, Sender};
use kruxdesk_directory::{seed_customers, LoanBook, SharedLoanBook};
use kruxdesk_lifecycle::{ChatSession, LifecycleController, TypingDelay};
use kruxdesk_store::ConversationStore;

// =============================================================================
// Helpers
// =============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn make_controller() -> Arc<LifecycleController> {
    Arc::new(LifecycleController::new(Arc::new(ConversationStore::new())))
}

fn make_loans() -> SharedLoanBook {
    Arc::new(LoanBook::seeded())
}

fn rahul() -> CustomerProfile {
    seed_customers().remove(0)
}

/// Start a session, await the greeting, and return it.
async fn open_session(
    controller: &Arc<LifecycleController>,
    loans: &SharedLoanBook,
    customer: CustomerProfile,
) -> ChatSession {
    let (session, greeting) = ChatSession::start(
        Arc::clone(controller),
        Arc::clone(loans),
        customer,
        TypingDelay::none(),
    )
    .unwrap();
    greeting.await.unwrap();
    session
}

fn greeting_option(value: &str) -> BotOption {
    respond(BotFlow::Greeting)
        .options
        .into_iter()
        .find(|o| o.value == value)
        .unwrap()
}

/// Send free text and await the deferred bot reply, if one was scheduled.
async fn send(session: &ChatSession, text: &str) {
    if let Some(reply) = session.send_text(text).unwrap() {
        reply.await.unwrap();
    }
}

// =============================================================================
// Status-check journey
// =============================================================================

#[tokio::test]
async fn test_status_check_journey_stays_waiting() {
    init_tracing();
    let controller = make_controller();
    let loans = make_loans();
    let session = open_session(&controller, &loans, rahul()).await;
    let id = session.conversation_id();

    // Fresh query: waiting, greeting delivered.
    let conv = controller.store().get(id).unwrap();
    assert_eq!(conv.status, ConversationStatus::Waiting);
    assert_eq!(conv.messages.len(), 1);
    assert!(conv.messages[0].content.contains("Welcome to KRUX Finance"));

    // Select the status-check option: the bot asks for an application id.
    session
        .select_option(&greeting_option("status"))
        .unwrap()
        .await
        .unwrap();
    let dialogue = session.dialogue().unwrap();
    assert_eq!(dialogue.flow, BotFlow::StatusCheck);
    assert!(dialogue.awaiting_input);

    // Supply the application id: formatted summary comes back.
    send(&session, "LA-2024-001").await;
    let conv = controller.store().get(id).unwrap();
    let last = conv.messages.last().unwrap();
    assert_eq!(last.sender, Sender::Bot);
    assert!(last.content.contains("UNDER REVIEW"));
    assert!(last.content.contains("Business Loan"));

    // Status checks alone never trigger escalation.
    assert_eq!(conv.status, ConversationStatus::Waiting);
    assert!(!session.dialogue().unwrap().awaiting_input);
}

#[tokio::test]
async fn test_status_check_unknown_id_offers_retry() {
    init_tracing();
    let controller = make_controller();
    let loans = make_loans();
    let session = open_session(&controller, &loans, rahul()).await;

    session
        .select_option(&greeting_option("status"))
        .unwrap()
        .await
        .unwrap();
    send(&session, "LA-2024-999").await;

    let conv = controller.store().get(session.conversation_id()).unwrap();
    let last = conv.messages.last().unwrap();
    assert!(last.content.contains("couldn't find an application"));
    assert_eq!(conv.status, ConversationStatus::Waiting);
}

// =============================================================================
// Escalation
// =============================================================================

#[tokio::test]
async fn test_free_text_escalation_activates_ticket() {
    init_tracing();
    let controller = make_controller();
    let loans = make_loans();
    let session = open_session(&controller, &loans, rahul()).await;
    let id = session.conversation_id();

    send(&session, "I want to talk to an agent").await;

    let conv = controller.store().get(id).unwrap();
    assert_eq!(conv.status, ConversationStatus::Active);
}

#[tokio::test]
async fn test_second_escalation_refused_while_ticket_active() {
    init_tracing();
    let controller = make_controller();
    let loans = make_loans();

    let first = open_session(&controller, &loans, rahul()).await;
    send(&first, "I want to talk to an agent").await;
    assert_eq!(
        controller.store().get(first.conversation_id()).unwrap().status,
        ConversationStatus::Active
    );

    // A second waiting conversation for the same customer cannot escalate.
    let second = open_session(&controller, &loans, rahul()).await;
    send(&second, "I want to talk to an agent").await;

    let conv = controller.store().get(second.conversation_id()).unwrap();
    assert_eq!(conv.status, ConversationStatus::Waiting);
    let last = conv.messages.last().unwrap();
    assert_eq!(last.sender, Sender::Bot);
    assert!(last.content.contains("already have an active ticket"));

    // Exactly one active conversation for the customer.
    let active = controller
        .store()
        .for_customer("cust-1")
        .into_iter()
        .filter(|c| c.status == ConversationStatus::Active)
        .count();
    assert_eq!(active, 1);
}

#[tokio::test]
async fn test_agent_quick_option_runs_escalation_flow() {
    init_tracing();
    let controller = make_controller();
    let loans = make_loans();
    let session = open_session(&controller, &loans, rahul()).await;

    session
        .select_option(&greeting_option("agent"))
        .unwrap()
        .await
        .unwrap();

    let conv = controller.store().get(session.conversation_id()).unwrap();
    assert_eq!(conv.status, ConversationStatus::Active);
    let last = conv.messages.last().unwrap();
    assert!(last.content.contains("human agent"));
}

// =============================================================================
// Auto-resolution
// =============================================================================

#[tokio::test]
async fn test_thanks_resolves_and_stamps_resolved_at() {
    init_tracing();
    let controller = make_controller();
    let loans = make_loans();
    let session = open_session(&controller, &loans, rahul()).await;
    let id = session.conversation_id();

    send(&session, "thanks, that's all").await;

    let conv = controller.store().get(id).unwrap();
    assert_eq!(conv.status, ConversationStatus::Resolved);
    assert!(conv.resolved_at.is_some());
}

#[tokio::test]
async fn test_full_document_journey_then_resolution() {
    init_tracing();
    let controller = make_controller();
    let loans = make_loans();
    let session = open_session(&controller, &loans, rahul()).await;
    let id = session.conversation_id();

    // Ask about documents, pick business, proceed.
    session
        .select_option(&greeting_option("documents"))
        .unwrap()
        .await
        .unwrap();
    let docs = respond(BotFlow::DocumentRequirements)
        .options
        .into_iter()
        .find(|o| o.value == "business_docs")
        .unwrap();
    session.select_option(&docs).unwrap().await.unwrap();

    let conv = controller.store().get(id).unwrap();
    let checklist = conv.messages.last().unwrap();
    assert!(checklist.content.contains("Business Loan Requirements"));

    // Close out; no agent ever got involved.
    send(&session, "great, thanks!").await;
    let conv = controller.store().get(id).unwrap();
    assert_eq!(conv.status, ConversationStatus::Resolved);
    assert!(conv.resolved_at.is_some());
    assert!(conv.assigned_agent_id.is_none());

    // Customer turns alternate with bot turns in append order.
    assert!(conv.messages.len() >= 6);
    assert_eq!(conv.messages[0].sender, Sender::Bot);
}
