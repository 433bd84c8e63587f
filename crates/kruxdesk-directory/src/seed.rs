//! Seeded demo data: customers, agents, credentials, loan applications,
//! and quick-reply templates.

use chrono::NaiveDate;

use kruxdesk_core::types::{
    AgentPresence, AgentProfile, CustomerProfile, LoanApplication, LoanStatus, LoanType,
    QuickReply,
};

/// Username -> password pairs for demo customers.
pub(crate) const CUSTOMER_CREDENTIALS: &[(&str, &str)] = &[
    ("rahul.sharma", "password123"),
    ("priya.patel", "password123"),
];

/// Username -> password pairs for demo agents.
pub(crate) const AGENT_CREDENTIALS: &[(&str, &str)] = &[
    ("amit.kumar", "password123"),
    ("sneha.singh", "password123"),
];

/// The demo customer roster.
pub fn seed_customers() -> Vec<CustomerProfile> {
    vec![
        CustomerProfile {
            id: "cust-1".to_string(),
            name: "Rahul Sharma".to_string(),
            phone: "+919876543210".to_string(),
            email: "rahul.sharma@example.com".to_string(),
            username: "rahul.sharma".to_string(),
        },
        CustomerProfile {
            id: "cust-2".to_string(),
            name: "Priya Patel".to_string(),
            phone: "+919876543211".to_string(),
            email: "priya.patel@example.com".to_string(),
            username: "priya.patel".to_string(),
        },
    ]
}

/// The demo agent roster.
pub fn seed_agents() -> Vec<AgentProfile> {
    vec![
        AgentProfile {
            id: "agent-1".to_string(),
            name: "Amit Kumar".to_string(),
            username: "amit.kumar".to_string(),
            email: "amit.kumar@krux.com".to_string(),
            status: AgentPresence::Online,
        },
        AgentProfile {
            id: "agent-2".to_string(),
            name: "Sneha Singh".to_string(),
            username: "sneha.singh".to_string(),
            email: "sneha.singh@krux.com".to_string(),
            status: AgentPresence::Online,
        },
    ]
}

/// The demo loan application book.
pub fn seed_loan_applications() -> Vec<LoanApplication> {
    vec![
        LoanApplication {
            id: "LA-2024-001".to_string(),
            customer_id: "cust-1".to_string(),
            loan_type: LoanType::Business,
            amount: 500_000,
            status: LoanStatus::UnderReview,
            applied_date: date(2024, 10, 15),
            last_updated: date(2024, 10, 28),
            documents: vec![
                "PAN Card".to_string(),
                "Aadhaar Card".to_string(),
                "Business Registration".to_string(),
            ],
        },
        LoanApplication {
            id: "LA-2024-002".to_string(),
            customer_id: "cust-2".to_string(),
            loan_type: LoanType::Personal,
            amount: 200_000,
            status: LoanStatus::Approved,
            applied_date: date(2024, 10, 10),
            last_updated: date(2024, 10, 25),
            documents: vec![
                "PAN Card".to_string(),
                "Aadhaar Card".to_string(),
                "Salary Slips".to_string(),
            ],
        },
    ]
}

/// Canned responses for the agent console.
pub fn seed_quick_replies() -> Vec<QuickReply> {
    vec![
        QuickReply {
            id: "qr-1".to_string(),
            title: "Welcome Message".to_string(),
            content: "Hello! Welcome to KRUX Finance. How may I assist you today?".to_string(),
            category: "greeting".to_string(),
        },
        QuickReply {
            id: "qr-2".to_string(),
            title: "Document List - Business Loan".to_string(),
            content: "For a Business Loan, you need: 1) PAN Card 2) Aadhaar Card 3) Business \
                      Registration Certificate 4) Last 6 months bank statements 5) ITR for last 2 years"
                .to_string(),
            category: "documents".to_string(),
        },
        QuickReply {
            id: "qr-3".to_string(),
            title: "Document List - Personal Loan".to_string(),
            content: "For a Personal Loan, you need: 1) PAN Card 2) Aadhaar Card 3) Last 3 months \
                      salary slips 4) Bank statements for last 6 months"
                .to_string(),
            category: "documents".to_string(),
        },
        QuickReply {
            id: "qr-4".to_string(),
            title: "Application Status Query".to_string(),
            content: "Let me check your application status. Could you please provide your \
                      Application ID?"
                .to_string(),
            category: "status".to_string(),
        },
        QuickReply {
            id: "qr-5".to_string(),
            title: "Transfer to Senior Agent".to_string(),
            content: "I understand your concern. Let me transfer you to a senior agent who can \
                      better assist you."
                .to_string(),
            category: "escalation".to_string(),
        },
        QuickReply {
            id: "qr-6".to_string(),
            title: "Closing Message".to_string(),
            content: "Thank you for contacting KRUX Finance. Is there anything else I can help \
                      you with today?"
                .to_string(),
            category: "closing".to_string(),
        },
    ]
}

/// Filter quick replies by category tag.
pub fn quick_replies_for_category<'a>(
    replies: &'a [QuickReply],
    category: &str,
) -> Vec<&'a QuickReply> {
    replies.iter().filter(|r| r.category == category).collect()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("Invalid seed date")
}
