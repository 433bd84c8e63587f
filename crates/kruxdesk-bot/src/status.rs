//! Application status lookup.
//!
//! Turns free-text status-check input into a formatted status summary, or a
//! modeled "not found" response with retry options.

use std::sync::LazyLock;

use regex::Regex;

use kruxdesk_core::types::LoanStatus;
use kruxdesk_directory::LoanBook;

use crate::types::{BotFlow, BotOption, BotResponse};

static APPLICATION_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bLA-\d{4}-\d{3}\b").expect("Invalid application id regex"));

/// Pull an application-id token out of free text.
///
/// Falls back to the whole trimmed input when no `LA-NNNN-NNN` token is
/// present; the result is uppercased either way so lookups are
/// case-insensitive.
pub fn extract_application_id(input: &str) -> String {
    match APPLICATION_ID_RE.find(input) {
        Some(m) => m.as_str().to_uppercase(),
        None => input.trim().to_uppercase(),
    }
}

/// Fixed narrative sentence per application status.
fn status_narrative(status: LoanStatus) -> &'static str {
    match status {
        LoanStatus::Pending => {
            "Your application is pending review. Our team will review it within 1-2 business days."
        }
        LoanStatus::UnderReview => {
            "Your application is currently under review by our loan committee."
        }
        LoanStatus::Approved => "\u{1f389} Congratulations! Your application has been approved.",
        LoanStatus::Rejected => {
            "Unfortunately, your application was not approved at this time."
        }
        LoanStatus::Disbursed => "\u{2705} Your loan has been disbursed to your account.",
    }
}

/// Format an amount in Indian digit grouping (e.g. 500000 -> "5,00,000").
pub fn format_inr(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<String> = Vec::new();
    let head_bytes = head.as_bytes();
    let mut i = head_bytes.len();
    while i > 2 {
        groups.push(String::from_utf8_lossy(&head_bytes[i - 2..i]).to_string());
        i -= 2;
    }
    groups.push(String::from_utf8_lossy(&head_bytes[..i]).to_string());
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Look up an application id and compose the status response.
pub fn check_status(input: &str, loans: &LoanBook) -> BotResponse {
    let application_id = extract_application_id(input);

    let Some(application) = loans.find_by_id(&application_id) else {
        return BotResponse::with_options(
            format!(
                "I couldn't find an application with ID \"{}\". Please check the Application ID \
                 and try again, or contact our support team for assistance.",
                input.trim()
            ),
            vec![
                BotOption {
                    id: "status-retry".to_string(),
                    label: "Try again".to_string(),
                    value: "status".to_string(),
                    next_flow: Some(BotFlow::StatusCheck),
                },
                BotOption {
                    id: "status-agent".to_string(),
                    label: "Talk to agent".to_string(),
                    value: "agent".to_string(),
                    next_flow: Some(BotFlow::Escalation),
                },
                BotOption {
                    id: "status-menu".to_string(),
                    label: "Main menu".to_string(),
                    value: "main_menu".to_string(),
                    next_flow: Some(BotFlow::Greeting),
                },
            ],
        );
    };

    let status_label = application.status.as_str().replace('_', " ").to_uppercase();
    BotResponse::with_options(
        format!(
            "**Application Status for {}**\n\n\u{1f4cb} Loan Type: {} Loan\n\u{1f4b0} Amount: \
             \u{20b9}{}\n\u{1f4c5} Applied: {}\n\u{1f504} Status: {}\n\n{}\n\nLast Updated: {}",
            application.id,
            application.loan_type,
            format_inr(application.amount),
            application.applied_date.format("%Y-%m-%d"),
            status_label,
            status_narrative(application.status),
            application.last_updated.format("%Y-%m-%d"),
        ),
        vec![
            BotOption {
                id: "status-details".to_string(),
                label: "Talk to agent for details".to_string(),
                value: "agent".to_string(),
                next_flow: Some(BotFlow::Escalation),
            },
            BotOption {
                id: "status-menu".to_string(),
                label: "Back to main menu".to_string(),
                value: "main_menu".to_string(),
                next_flow: Some(BotFlow::Greeting),
            },
        ],
    )
}
