use std::sync::Arc;

use crate::error::ServiceError;
use crate::models::balances::{Balance, DEFAULT_CURRENCY};
use crate::models::transactions::{BalanceChange, BalanceChangeRequest, Transaction, TransactionKind};
use crate::repositories::balances::BalanceRepository;
use crate::repositories::transactions::TransactionRepository;

pub struct TransactionService {
    balances: Arc<dyn BalanceRepository>,
    transactions: Arc<dyn TransactionRepository>,
}

impl TransactionService {
    pub fn new(
        balances: Arc<dyn BalanceRepository>,
        transactions: Arc<dyn TransactionRepository>,
    ) -> Self {
        TransactionService {
            balances,
            transactions,
        }
    }

    /// Reading a balance creates a zero record for a never-seen user; the
    /// mutation paths do not.
    pub async fn get_balance(&self, user_id: &str) -> Result<Balance, ServiceError> {
        match self.balances.find_by_user(user_id).await? {
            Some(balance) => Ok(balance),
            None => self.balances.create(user_id, 0, DEFAULT_CURRENCY).await,
        }
    }

    pub async fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>, ServiceError> {
        self.transactions.find_by_user(user_id).await
    }

    pub async fn add_balance(
        &self,
        user_id: &str,
        request: BalanceChangeRequest,
    ) -> Result<BalanceChange, ServiceError> {
        self.apply(user_id, TransactionKind::Recharge, request).await
    }

    pub async fn deduct_balance(
        &self,
        user_id: &str,
        request: BalanceChangeRequest,
    ) -> Result<BalanceChange, ServiceError> {
        self.apply(user_id, TransactionKind::Expense, request).await
    }

    async fn apply(
        &self,
        user_id: &str,
        kind: TransactionKind,
        request: BalanceChangeRequest,
    ) -> Result<BalanceChange, ServiceError> {
        if request.amount <= 0 {
            return Err(ServiceError::Validation(
                "Amount must be greater than 0".to_string(),
            ));
        }

        let description = request.description.unwrap_or_default();
        self.transactions
            .record_change(user_id, kind, request.amount, &description)
            .await
    }
}
