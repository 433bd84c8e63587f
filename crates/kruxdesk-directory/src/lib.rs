//! Seeded directory data for the kruxdesk demo: principals, credentials,
//! loan applications, and quick-reply templates, plus credential
//! verification.

pub mod auth;
pub mod loans;
pub mod seed;

pub use auth::Authenticator;
pub use loans::{LoanBook, SharedLoanBook};
pub use seed::{
    quick_replies_for_category, seed_agents, seed_customers, seed_loan_applications,
    seed_quick_replies,
};
