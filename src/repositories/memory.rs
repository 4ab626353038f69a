use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::models::balances::Balance;
use crate::models::documents::{Document, DocumentStatus};
use crate::models::transactions::{BalanceChange, Transaction, TransactionKind};
use crate::models::users::User;
use crate::repositories::balances::BalanceRepository;
use crate::repositories::documents::DocumentRepository;
use crate::repositories::transactions::TransactionRepository;
use crate::repositories::users::UserRepository;

#[derive(Default)]
struct Store {
    users: Vec<User>,
    balances: HashMap<String, Balance>,
    transactions: Vec<Transaction>,
    documents: Vec<Document>,
}

/// All four ports over one mutex-guarded store. The store mutex gives the
/// mutation path the same serialization the Postgres adapter gets from its
/// row lock.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    store: Arc<Mutex<Store>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn now() -> chrono::NaiveDateTime {
        chrono::Utc::now().naive_utc()
    }

    fn next_id() -> String {
        Uuid::new_v4().hyphenated().to_string()
    }
}

#[async_trait]
impl UserRepository for MemoryRepository {
    async fn insert_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, ServiceError> {
        let mut store = self.store.lock().unwrap();
        let now = Self::now();
        let user = User {
            id: Self::next_id(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        store.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, ServiceError> {
        let store = self.store.lock().unwrap();
        Ok(store.users.iter().find(|user| user.id == user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        let store = self.store.lock().unwrap();
        Ok(store.users.iter().find(|user| user.email == email).cloned())
    }
}

#[async_trait]
impl BalanceRepository for MemoryRepository {
    async fn find_by_user(&self, user_id: &str) -> Result<Option<Balance>, ServiceError> {
        let store = self.store.lock().unwrap();
        Ok(store.balances.get(user_id).cloned())
    }

    async fn create(
        &self,
        user_id: &str,
        amount: i64,
        currency: &str,
    ) -> Result<Balance, ServiceError> {
        let mut store = self.store.lock().unwrap();
        let now = Self::now();
        let balance = Balance {
            id: Self::next_id(),
            user_id: user_id.to_string(),
            amount,
            currency: currency.to_string(),
            created_at: now,
            updated_at: now,
        };
        store.balances.insert(user_id.to_string(), balance.clone());
        Ok(balance)
    }
}

#[async_trait]
impl TransactionRepository for MemoryRepository {
    async fn record_change(
        &self,
        user_id: &str,
        kind: TransactionKind,
        amount: i64,
        description: &str,
    ) -> Result<BalanceChange, ServiceError> {
        let mut store = self.store.lock().unwrap();

        let balance = {
            let entry = store.balances.get_mut(user_id).ok_or_else(|| match kind {
                TransactionKind::Recharge => {
                    ServiceError::NotFound("User not found".to_string())
                }
                TransactionKind::Expense => {
                    ServiceError::NotFound("Balance not found".to_string())
                }
            })?;

            match kind {
                TransactionKind::Recharge => entry.amount += amount,
                TransactionKind::Expense => {
                    if entry.amount < amount {
                        return Err(ServiceError::InsufficientFunds);
                    }
                    entry.amount -= amount;
                }
            }
            entry.updated_at = Self::now();
            entry.clone()
        };

        let transaction = Transaction {
            id: Self::next_id(),
            user_id: user_id.to_string(),
            kind: kind.as_str().to_string(),
            amount,
            description: description.to_string(),
            created_at: Self::now(),
        };
        store.transactions.push(transaction.clone());

        Ok(BalanceChange {
            transaction,
            balance,
        })
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Transaction>, ServiceError> {
        let store = self.store.lock().unwrap();
        Ok(store
            .transactions
            .iter()
            .rev()
            .filter(|transaction| transaction.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DocumentRepository for MemoryRepository {
    async fn insert_document(&self, user_id: &str, name: &str) -> Result<Document, ServiceError> {
        let mut store = self.store.lock().unwrap();
        let now = Self::now();
        let document = Document {
            id: Self::next_id(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            status: DocumentStatus::Pending.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        store.documents.push(document.clone());
        Ok(document)
    }

    async fn find_by_id(&self, document_id: &str) -> Result<Option<Document>, ServiceError> {
        let store = self.store.lock().unwrap();
        Ok(store
            .documents
            .iter()
            .find(|document| document.id == document_id)
            .cloned())
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Document>, ServiceError> {
        let store = self.store.lock().unwrap();
        Ok(store
            .documents
            .iter()
            .rev()
            .filter(|document| document.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_status(
        &self,
        document_id: &str,
        status: DocumentStatus,
    ) -> Result<Document, ServiceError> {
        let mut store = self.store.lock().unwrap();
        let document = store
            .documents
            .iter_mut()
            .find(|document| document.id == document_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Document not found: {document_id}")))?;
        document.status = status.as_str().to_string();
        document.updated_at = Self::now();
        Ok(document.clone())
    }
}
