//! In-memory repository implementations
//!
//! Used for tests and local development without a database. Uniqueness and
//! the one-edge-per-referred-account invariant are enforced under a single
//! lock per repository, mirroring what the database constraints guarantee.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::auth::{
    entities::Account,
    errors::AuthError,
    repositories::IAccountRepository,
    value_objects::{AccountId, Email, Username},
};
use crate::domain::referral::{
    entities::{ReferralEdge, ReferralRecord, ReferralStatus},
    errors::ReferralError,
    repositories::IReferralRepository,
};

/// In-memory account repository
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IAccountRepository for InMemoryAccountRepository {
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AuthError> {
        let accounts = self.accounts.read().unwrap();
        Ok(accounts.values().find(|a| &a.email == email).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<Account>, AuthError> {
        let accounts = self.accounts.read().unwrap();
        Ok(accounts.values().find(|a| &a.username == username).cloned())
    }

    async fn find_by_email_or_username(
        &self,
        identifier: &str,
    ) -> Result<Option<Account>, AuthError> {
        let accounts = self.accounts.read().unwrap();
        Ok(accounts
            .values()
            .find(|a| a.email.as_str() == identifier.to_lowercase() || a.username.as_str() == identifier)
            .cloned())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> Result<Option<Account>, AuthError> {
        let accounts = self.accounts.read().unwrap();
        Ok(accounts.get(account_id).cloned())
    }

    async fn find_by_referral_code(&self, code: &str) -> Result<Option<Account>, AuthError> {
        let accounts = self.accounts.read().unwrap();
        Ok(accounts
            .values()
            .find(|a| a.referral_code.as_ref().is_some_and(|c| c.as_str() == code))
            .cloned())
    }

    async fn create(&self, account: &Account) -> Result<(), AuthError> {
        let mut accounts = self.accounts.write().unwrap();

        let taken = accounts.values().any(|a| {
            a.email == account.email
                || a.username == account.username
                || (a.referral_code.is_some() && a.referral_code == account.referral_code)
        });
        if taken {
            return Err(AuthError::IdentityTaken);
        }

        accounts.insert(account.account_id, account.clone());
        Ok(())
    }

    async fn set_referred_by(
        &self,
        account_id: &AccountId,
        referrer_id: &AccountId,
    ) -> Result<(), AuthError> {
        let mut accounts = self.accounts.write().unwrap();
        match accounts.get_mut(account_id) {
            Some(account) => {
                account.referred_by = Some(*referrer_id);
                Ok(())
            }
            None => Err(AuthError::AccountNotFound),
        }
    }
}

/// In-memory referral repository
///
/// Edges are keyed by referred account id, so the map itself enforces the
/// at-most-one-edge invariant. Listings join against the account repository
/// the same way the database implementation joins against the accounts table.
pub struct InMemoryReferralRepository {
    edges: RwLock<HashMap<AccountId, ReferralEdge>>,
    accounts: std::sync::Arc<InMemoryAccountRepository>,
}

impl InMemoryReferralRepository {
    pub fn new(accounts: std::sync::Arc<InMemoryAccountRepository>) -> Self {
        Self {
            edges: RwLock::new(HashMap::new()),
            accounts,
        }
    }
}

#[async_trait]
impl IReferralRepository for InMemoryReferralRepository {
    async fn create_edge(&self, edge: &ReferralEdge) -> Result<bool, ReferralError> {
        let mut edges = self.edges.write().unwrap();
        match edges.entry(edge.referred_account_id) {
            std::collections::hash_map::Entry::Occupied(_) => Ok(false),
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(edge.clone());
                Ok(true)
            }
        }
    }

    async fn list_for_referrer(
        &self,
        referrer_id: &AccountId,
    ) -> Result<Vec<ReferralRecord>, ReferralError> {
        // Snapshot under the lock, join afterwards
        let edges: Vec<ReferralEdge> = {
            let edges = self.edges.read().unwrap();
            edges
                .values()
                .filter(|e| &e.referrer_id == referrer_id)
                .cloned()
                .collect()
        };

        let mut records = Vec::with_capacity(edges.len());
        for edge in edges {
            let account = self
                .accounts
                .find_by_id(&edge.referred_account_id)
                .await
                .map_err(|e| ReferralError::DatabaseError {
                    message: e.to_string(),
                })?;
            if let Some(account) = account {
                records.push(ReferralRecord {
                    referred_account_id: edge.referred_account_id,
                    username: account.username.as_str().to_string(),
                    email: account.email.as_str().to_string(),
                    status: edge.status,
                    created_at: edge.created_at,
                });
            }
        }
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn count_successful(&self, referrer_id: &AccountId) -> Result<i64, ReferralError> {
        let edges = self.edges.read().unwrap();
        Ok(edges
            .values()
            .filter(|e| {
                &e.referrer_id == referrer_id && e.status == ReferralStatus::Successful
            })
            .count() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::value_objects::{PasswordHash, ReferralCode};
    use chrono::{Duration, Utc};

    fn account(email: &str, username: &str) -> Account {
        Account::new(
            AccountId::generate(),
            Email::new(email.to_string()).unwrap(),
            Username::new(username.to_string()).unwrap(),
            PasswordHash::new("hash".to_string()),
            ReferralCode::generate(),
            Utc::now() + Duration::days(30),
        )
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let repo = InMemoryAccountRepository::new();
        let first = account("a@example.com", "alice");
        repo.create(&first).await.unwrap();

        let mut second = account("a@example.com", "bob");
        second.account_id = AccountId::generate();
        assert!(matches!(
            repo.create(&second).await,
            Err(AuthError::IdentityTaken)
        ));
    }

    #[tokio::test]
    async fn test_find_by_email_or_username() {
        let repo = InMemoryAccountRepository::new();
        let alice = account("alice@example.com", "alice");
        repo.create(&alice).await.unwrap();

        assert!(
            repo.find_by_email_or_username("alice@example.com")
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            repo.find_by_email_or_username("alice")
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            repo.find_by_email_or_username("carol")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_find_by_referral_code() {
        let repo = InMemoryAccountRepository::new();
        let alice = account("alice@example.com", "alice");
        let code = alice.referral_code.clone().unwrap();
        repo.create(&alice).await.unwrap();

        let found = repo.find_by_referral_code(code.as_str()).await.unwrap();
        assert_eq!(found.unwrap().account_id, alice.account_id);
        assert!(repo.find_by_referral_code("NOPE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_edge_is_written_at_most_once_per_account() {
        let accounts = std::sync::Arc::new(InMemoryAccountRepository::new());
        let repo = InMemoryReferralRepository::new(accounts);
        let referrer = AccountId::generate();
        let referred = AccountId::generate();

        let edge = ReferralEdge::successful(referrer, referred);
        assert!(repo.create_edge(&edge).await.unwrap());
        assert!(!repo.create_edge(&edge).await.unwrap());
        assert_eq!(repo.count_successful(&referrer).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_edge_writes_record_exactly_one() {
        let accounts = std::sync::Arc::new(InMemoryAccountRepository::new());
        let repo = std::sync::Arc::new(InMemoryReferralRepository::new(accounts));
        let referrer = AccountId::generate();
        let referred = AccountId::generate();

        let mut handles = Vec::new();
        for _ in 0..10 {
            let repo = repo.clone();
            let edge = ReferralEdge::successful(referrer, referred);
            handles.push(tokio::spawn(async move { repo.create_edge(&edge).await }));
        }

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(repo.count_successful(&referrer).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_for_referrer_joins_identity() {
        let accounts = std::sync::Arc::new(InMemoryAccountRepository::new());
        let repo = InMemoryReferralRepository::new(accounts.clone());
        let referrer = AccountId::generate();

        let bob = account("bob@example.com", "bob");
        accounts.create(&bob).await.unwrap();
        repo.create_edge(&ReferralEdge::successful(referrer, bob.account_id))
            .await
            .unwrap();

        let records = repo.list_for_referrer(&referrer).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].username, "bob");
        assert_eq!(records[0].email, "bob@example.com");
    }
}
