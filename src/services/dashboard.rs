use std::sync::Arc;

use serde::Serialize;

use crate::error::ServiceError;
use crate::models::documents::Document;
use crate::models::transactions::Transaction;
use crate::repositories::balances::BalanceRepository;
use crate::repositories::documents::DocumentRepository;
use crate::repositories::transactions::TransactionRepository;
use crate::repositories::users::UserRepository;

#[derive(Clone, Debug, Serialize)]
pub struct DashboardData {
    pub balance: i64,
    pub documents: Vec<Document>,
    pub transactions: Vec<Transaction>,
}

pub struct DashboardService {
    users: Arc<dyn UserRepository>,
    balances: Arc<dyn BalanceRepository>,
    documents: Arc<dyn DocumentRepository>,
    transactions: Arc<dyn TransactionRepository>,
}

impl DashboardService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        balances: Arc<dyn BalanceRepository>,
        documents: Arc<dyn DocumentRepository>,
        transactions: Arc<dyn TransactionRepository>,
    ) -> Self {
        DashboardService {
            users,
            balances,
            documents,
            transactions,
        }
    }

    /// Fan-out/join over the per-user fetches; any failing fetch fails the
    /// whole aggregate, and a missing user is a failure even when the other
    /// fetches succeed.
    pub async fn get_dashboard(&self, user_id: &str) -> Result<DashboardData, ServiceError> {
        let (user, balance, documents, transactions) = tokio::try_join!(
            self.users.find_by_id(user_id),
            self.balances.find_by_user(user_id),
            self.documents.find_by_user(user_id),
            self.transactions.find_by_user(user_id),
        )?;

        if user.is_none() {
            return Err(ServiceError::NotFound("User not found".to_string()));
        }

        Ok(DashboardData {
            balance: balance.map(|balance| balance.amount).unwrap_or(0),
            documents,
            transactions,
        })
    }
}
