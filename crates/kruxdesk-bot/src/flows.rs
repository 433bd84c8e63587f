//! Scripted dialogue flows.
//!
//! Pure flow -> response mapping for the loan-support script. The same flow
//! always produces the same response; every piece of copy is fixed.

use crate::types::{BotFlow, BotOption, BotResponse, InputKind};

fn option(id: &str, label: &str, value: &str, next_flow: Option<BotFlow>) -> BotOption {
    BotOption {
        id: id.to_string(),
        label: label.to_string(),
        value: value.to_string(),
        next_flow,
    }
}

/// Compute the bot's scripted response for a flow.
pub fn respond(flow: BotFlow) -> BotResponse {
    match flow {
        BotFlow::Greeting => BotResponse::with_options(
            "Hello! Welcome to KRUX Finance. I'm here to help you with your loan application \
             needs. How can I assist you today?",
            vec![
                option(
                    "opt-1",
                    "\u{1f4bc} Apply for a loan",
                    "apply_loan",
                    Some(BotFlow::LoanApplication),
                ),
                option(
                    "opt-2",
                    "\u{1f4c4} Document requirements",
                    "documents",
                    Some(BotFlow::DocumentRequirements),
                ),
                option(
                    "opt-3",
                    "\u{1f50d} Check application status",
                    "status",
                    Some(BotFlow::StatusCheck),
                ),
                option(
                    "opt-4",
                    "\u{1f464} Speak with an agent",
                    "agent",
                    Some(BotFlow::Escalation),
                ),
            ],
        ),

        BotFlow::LoanApplication => BotResponse::with_options(
            "Great! I can help you with your loan application. We offer three types of loans:",
            vec![
                option("loan-1", "\u{1f3e2} Business Loan", "business", None),
                option("loan-2", "\u{1f464} Personal Loan", "personal", None),
                option("loan-3", "\u{1f3ed} MSME Loan", "msme", None),
            ],
        ),

        BotFlow::DocumentRequirements => BotResponse::with_options(
            "I can help you understand the document requirements. Which type of loan are you \
             interested in?",
            vec![
                option("doc-1", "Business Loan", "business_docs", None),
                option("doc-2", "Personal Loan", "personal_docs", None),
                option("doc-3", "MSME Loan", "msme_docs", None),
            ],
        ),

        BotFlow::StatusCheck => BotResponse::requesting_input(
            "I can help you check your application status. Please provide your Application ID \
             (e.g., LA-2024-001):",
            InputKind::Text,
        ),

        BotFlow::Escalation => BotResponse::with_options(
            "I understand you'd like to speak with a human agent. Let me connect you with one \
             of our customer support executives. They'll be with you shortly.",
            vec![],
        ),

        BotFlow::GeneralQuery => BotResponse::with_options(
            "I'm here to help! Could you please provide more details about your query, or \
             choose from one of the main options?",
            vec![
                option(
                    "gen-1",
                    "Loan Application",
                    "apply_loan",
                    Some(BotFlow::LoanApplication),
                ),
                option(
                    "gen-2",
                    "Document Requirements",
                    "documents",
                    Some(BotFlow::DocumentRequirements),
                ),
                option("gen-3", "Check Status", "status", Some(BotFlow::StatusCheck)),
                option("gen-4", "Talk to Agent", "agent", Some(BotFlow::Escalation)),
            ],
        ),
    }
}
