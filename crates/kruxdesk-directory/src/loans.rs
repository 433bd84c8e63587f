//! Loan application lookups for the status-check flow.

use std::sync::Arc;

use tracing::warn;

use kruxdesk_core::types::LoanApplication;
use kruxdesk_store::persist::{keys, KeyValueStorage};

use crate::seed;

/// Read-mostly collection of loan applications.
///
/// Application ids are stored uppercase; lookups fold the query to uppercase
/// so `la-2024-001` and `LA-2024-001` hit the same record.
pub struct LoanBook {
    applications: Vec<LoanApplication>,
}

impl LoanBook {
    /// Build a book over the given applications.
    pub fn new(applications: Vec<LoanApplication>) -> Self {
        Self { applications }
    }

    /// The seeded demo book.
    pub fn seeded() -> Self {
        Self::new(seed::seed_loan_applications())
    }

    /// Load the book from storage, falling back to the seeded data when the
    /// document is missing or unreadable.
    pub fn load_or_seed(storage: &dyn KeyValueStorage) -> Self {
        match storage.get(keys::LOAN_APPLICATIONS) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(applications) => Self::new(applications),
                Err(e) => {
                    warn!("Failed to parse stored loan applications: {}. Using seed data.", e);
                    Self::seeded()
                }
            },
            Ok(None) => Self::seeded(),
            Err(e) => {
                warn!("Failed to read stored loan applications: {}. Using seed data.", e);
                Self::seeded()
            }
        }
    }

    /// Mirror the book to storage, logging failures.
    pub fn save(&self, storage: &dyn KeyValueStorage) {
        match serde_json::to_string(&self.applications) {
            Ok(json) => {
                if let Err(e) = storage.put(keys::LOAN_APPLICATIONS, &json) {
                    warn!("Failed to persist loan applications: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize loan applications: {}", e),
        }
    }

    /// Case-insensitive lookup by application id.
    pub fn find_by_id(&self, application_id: &str) -> Option<&LoanApplication> {
        let id = application_id.to_uppercase();
        self.applications.iter().find(|a| a.id == id)
    }

    /// All applications filed by a customer.
    pub fn for_customer(&self, customer_id: &str) -> Vec<&LoanApplication> {
        self.applications
            .iter()
            .filter(|a| a.customer_id == customer_id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.applications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }
}

/// Convenience for sharing the book across sessions.
pub type SharedLoanBook = Arc<LoanBook>;
