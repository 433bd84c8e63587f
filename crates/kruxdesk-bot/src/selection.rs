//! Quick-option selection handling.
//!
//! Maps opaque option value tokens to informational responses. Unrecognized
//! tokens fall back to the general-query response rather than erroring.

use crate::flows::respond;
use crate::types::{BotFlow, BotOption, BotResponse};

fn option(id: &str, label: &str, value: &str, next_flow: Option<BotFlow>) -> BotOption {
    BotOption {
        id: id.to_string(),
        label: label.to_string(),
        value: value.to_string(),
        next_flow,
    }
}

fn proceed_options(proceed_value: &str) -> Vec<BotOption> {
    vec![
        option("proceed-1", "Yes, proceed", proceed_value, None),
        option("proceed-2", "Talk to agent", "agent", Some(BotFlow::Escalation)),
        option(
            "proceed-3",
            "Back to main menu",
            "main_menu",
            Some(BotFlow::Greeting),
        ),
    ]
}

/// Compute the bot's response to a selected option value.
pub fn handle_selection(value: &str) -> BotResponse {
    match value {
        "business" | "business_docs" => BotResponse::with_options(
            "**Business Loan Requirements:**\n\n\u{2713} PAN Card\n\u{2713} Aadhaar Card\n\
             \u{2713} Business Registration Certificate\n\u{2713} Last 6 months bank statements\n\
             \u{2713} ITR for last 2 years\n\u{2713} Business address proof\n\n\
             **Loan Amount:** Up to \u{20b9}50 lakhs\n**Interest Rate:** Starting from 10.5% p.a.\n\
             **Processing Time:** 3-5 business days\n\n\
             Would you like to proceed with the application?",
            proceed_options("proceed_business"),
        ),

        "personal" | "personal_docs" => BotResponse::with_options(
            "**Personal Loan Requirements:**\n\n\u{2713} PAN Card\n\u{2713} Aadhaar Card\n\
             \u{2713} Last 3 months salary slips\n\u{2713} Bank statements for last 6 months\n\
             \u{2713} Employment proof\n\n\
             **Loan Amount:** Up to \u{20b9}25 lakhs\n**Interest Rate:** Starting from 11.5% p.a.\n\
             **Processing Time:** 2-3 business days\n\n\
             Would you like to proceed with the application?",
            proceed_options("proceed_personal"),
        ),

        "msme" | "msme_docs" => BotResponse::with_options(
            "**MSME Loan Requirements:**\n\n\u{2713} PAN Card\n\u{2713} Aadhaar Card\n\
             \u{2713} MSME Registration Certificate\n\u{2713} Last 12 months bank statements\n\
             \u{2713} ITR for last 3 years\n\u{2713} Business financials\n\n\
             **Loan Amount:** Up to \u{20b9}1 crore\n**Interest Rate:** Starting from 9.5% p.a.\n\
             **Processing Time:** 5-7 business days\n\n\
             Would you like to proceed with the application?",
            proceed_options("proceed_msme"),
        ),

        _ if value.starts_with("proceed_") => {
            let loan_type = capitalize_first(value.trim_start_matches("proceed_"));
            BotResponse::with_options(
                format!(
                    "Great! To proceed with your {} Loan application, I'll connect you with one \
                     of our loan specialists who will guide you through the process.\n\n\
                     You can also start your application online at our website or visit the \
                     nearest KRUX Finance branch.\n\n\
                     Is there anything else I can help you with?",
                    loan_type
                ),
                vec![
                    option(
                        "final-1",
                        "Talk to specialist",
                        "agent",
                        Some(BotFlow::Escalation),
                    ),
                    option(
                        "final-2",
                        "Back to main menu",
                        "main_menu",
                        Some(BotFlow::Greeting),
                    ),
                ],
            )
        }

        // Silent fallback for anything unrecognized.
        _ => respond(BotFlow::GeneralQuery),
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
