//! Credential verification and signed-in principal persistence.
//!
//! Verifies usernames and passwords against the seeded credential tables and
//! snapshots the signed-in principal to the storage adapter. Verification
//! failure is reported as `None` with no distinction between an unknown user
//! and a wrong password.

use std::sync::Arc;

use tracing::{info, warn};

use kruxdesk_core::types::{AgentProfile, CustomerProfile, Principal};
use kruxdesk_store::persist::{keys, KeyValueStorage};

use crate::seed::{self, AGENT_CREDENTIALS, CUSTOMER_CREDENTIALS};

/// Verifies credentials and tracks the signed-in principal.
pub struct Authenticator {
    customers: Vec<CustomerProfile>,
    agents: Vec<AgentProfile>,
    storage: Option<Arc<dyn KeyValueStorage>>,
}

impl Authenticator {
    /// Create an authenticator over the seeded demo directory.
    pub fn seeded() -> Self {
        Self {
            customers: seed::seed_customers(),
            agents: seed::seed_agents(),
            storage: None,
        }
    }

    /// Create a seeded authenticator that persists the signed-in principal.
    pub fn seeded_with_storage(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            customers: seed::seed_customers(),
            agents: seed::seed_agents(),
            storage: Some(storage),
        }
    }

    // -----------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------

    pub fn customer_by_username(&self, username: &str) -> Option<&CustomerProfile> {
        self.customers.iter().find(|c| c.username == username)
    }

    pub fn customer_by_phone(&self, phone: &str) -> Option<&CustomerProfile> {
        self.customers.iter().find(|c| c.phone == phone)
    }

    pub fn agent_by_username(&self, username: &str) -> Option<&AgentProfile> {
        self.agents.iter().find(|a| a.username == username)
    }

    // -----------------------------------------------------------------
    // Login / logout
    // -----------------------------------------------------------------

    /// Verify customer credentials and sign the customer in.
    pub fn login_customer(&self, username: &str, password: &str) -> Option<CustomerProfile> {
        let valid = CUSTOMER_CREDENTIALS
            .iter()
            .any(|(u, p)| *u == username && *p == password);
        if !valid {
            return None;
        }
        let customer = self.customer_by_username(username)?.clone();
        info!("Customer {} signed in", customer.id);
        self.persist_principal(&Principal::Customer(customer.clone()));
        Some(customer)
    }

    /// Demo phone-number login: signs the customer in when the phone number
    /// is on the roster. No password is involved on this path.
    pub fn login_customer_by_phone(&self, phone: &str) -> Option<CustomerProfile> {
        let customer = self.customer_by_phone(phone)?.clone();
        info!("Customer {} signed in by phone", customer.id);
        self.persist_principal(&Principal::Customer(customer.clone()));
        Some(customer)
    }

    /// Verify agent credentials and sign the agent in.
    pub fn login_agent(&self, username: &str, password: &str) -> Option<AgentProfile> {
        let valid = AGENT_CREDENTIALS
            .iter()
            .any(|(u, p)| *u == username && *p == password);
        if !valid {
            return None;
        }
        let agent = self.agent_by_username(username)?.clone();
        info!("Agent {} signed in", agent.id);
        self.persist_principal(&Principal::Agent(agent.clone()));
        Some(agent)
    }

    /// Re-hydrate the signed-in principal from storage, if any.
    pub fn current(&self) -> Option<Principal> {
        let storage = self.storage.as_ref()?;
        let json = match storage.get(keys::AUTH_USER) {
            Ok(json) => json?,
            Err(e) => {
                warn!("Failed to read auth snapshot: {}", e);
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(principal) => Some(principal),
            Err(e) => {
                warn!("Failed to parse auth snapshot: {}", e);
                None
            }
        }
    }

    /// Clear the signed-in principal.
    pub fn logout(&self) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.remove(keys::AUTH_USER) {
                warn!("Failed to clear auth snapshot: {}", e);
            }
        }
    }

    fn persist_principal(&self, principal: &Principal) {
        let Some(storage) = &self.storage else {
            return;
        };
        match serde_json::to_string(principal) {
            Ok(json) => {
                if let Err(e) = storage.put(keys::AUTH_USER, &json) {
                    warn!("Failed to persist auth snapshot: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize auth snapshot: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kruxdesk_store::persist::MemoryStorage;

    // ---- Credential verification ----

    #[test]
    fn test_login_customer_success() {
        let auth = Authenticator::seeded();
        let customer = auth.login_customer("rahul.sharma", "password123").unwrap();
        assert_eq!(customer.id, "cust-1");
        assert_eq!(customer.name, "Rahul Sharma");
    }

    #[test]
    fn test_login_customer_wrong_password() {
        let auth = Authenticator::seeded();
        assert!(auth.login_customer("rahul.sharma", "hunter2").is_none());
    }

    #[test]
    fn test_login_customer_unknown_user() {
        let auth = Authenticator::seeded();
        assert!(auth.login_customer("nobody", "password123").is_none());
    }

    #[test]
    fn test_login_agent_success() {
        let auth = Authenticator::seeded();
        let agent = auth.login_agent("amit.kumar", "password123").unwrap();
        assert_eq!(agent.id, "agent-1");
    }

    #[test]
    fn test_agent_credentials_do_not_open_customer_login() {
        let auth = Authenticator::seeded();
        assert!(auth.login_customer("amit.kumar", "password123").is_none());
        assert!(auth.login_agent("rahul.sharma", "password123").is_none());
    }

    // ---- Lookups ----

    #[test]
    fn test_customer_by_phone() {
        let auth = Authenticator::seeded();
        let customer = auth.customer_by_phone("+919876543211").unwrap();
        assert_eq!(customer.id, "cust-2");
    }

    #[test]
    fn test_customer_by_phone_unknown() {
        let auth = Authenticator::seeded();
        assert!(auth.customer_by_phone("+910000000000").is_none());
    }

    #[test]
    fn test_login_by_phone() {
        let auth = Authenticator::seeded();
        let customer = auth.login_customer_by_phone("+919876543210").unwrap();
        assert_eq!(customer.id, "cust-1");
        assert!(auth.login_customer_by_phone("+910000000000").is_none());
    }

    // ---- Principal persistence ----

    #[test]
    fn test_login_persists_snapshot() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        let auth = Authenticator::seeded_with_storage(Arc::clone(&storage));
        auth.login_customer("priya.patel", "password123").unwrap();

        let current = auth.current().unwrap();
        assert_eq!(current.id(), "cust-2");
        assert_eq!(current.name(), "Priya Patel");
    }

    #[test]
    fn test_logout_clears_snapshot() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        let auth = Authenticator::seeded_with_storage(Arc::clone(&storage));
        auth.login_agent("sneha.singh", "password123").unwrap();
        assert!(auth.current().is_some());
        auth.logout();
        assert!(auth.current().is_none());
    }

    #[test]
    fn test_current_without_storage_is_none() {
        let auth = Authenticator::seeded();
        auth.login_customer("rahul.sharma", "password123").unwrap();
        assert!(auth.current().is_none());
    }

    #[test]
    fn test_current_with_corrupt_snapshot_is_none() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        storage.put(keys::AUTH_USER, "not json").unwrap();
        let auth = Authenticator::seeded_with_storage(storage);
        assert!(auth.current().is_none());
    }

    #[test]
    fn test_failed_login_leaves_no_snapshot() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        let auth = Authenticator::seeded_with_storage(storage);
        assert!(auth.login_customer("rahul.sharma", "wrong").is_none());
        assert!(auth.current().is_none());
    }
}
