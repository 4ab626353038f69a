use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::models::balances::Balance;
use crate::models::transactions::{BalanceChange, Transaction, TransactionKind};

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Applies a balance mutation and appends the matching ledger entry as one
    /// atomic unit.
    async fn record_change(
        &self,
        user_id: &str,
        kind: TransactionKind,
        amount: i64,
        description: &str,
    ) -> Result<BalanceChange, ServiceError>;

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Transaction>, ServiceError>;
}

#[derive(Clone)]
pub struct PgTransactionRepository {
    conn: PgPool,
}

impl PgTransactionRepository {
    pub fn new(conn: PgPool) -> Self {
        PgTransactionRepository { conn }
    }
}

#[async_trait]
impl TransactionRepository for PgTransactionRepository {
    async fn record_change(
        &self,
        user_id: &str,
        kind: TransactionKind,
        amount: i64,
        description: &str,
    ) -> Result<BalanceChange, ServiceError> {
        let mut tx = self.conn.begin().await?;

        // Lock the balance row for the duration of the read-modify-write so
        // concurrent mutations for the same user serialize.
        let balance = sqlx::query_as::<_, Balance>(
            "SELECT * FROM balances WHERE user_id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(balance) = balance else {
            return Err(match kind {
                TransactionKind::Recharge => ServiceError::NotFound("User not found".to_string()),
                TransactionKind::Expense => {
                    ServiceError::NotFound("Balance not found".to_string())
                }
            });
        };

        let new_amount = match kind {
            TransactionKind::Recharge => balance.amount + amount,
            TransactionKind::Expense => {
                if balance.amount < amount {
                    return Err(ServiceError::InsufficientFunds);
                }
                balance.amount - amount
            }
        };

        let balance = sqlx::query_as::<_, Balance>(
            r#"
                UPDATE balances
                SET amount = $1, updated_at = CURRENT_TIMESTAMP
                WHERE user_id = $2
                RETURNING *
            "#,
        )
        .bind(new_amount)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let transaction_id = Uuid::new_v4().hyphenated().to_string();

        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
                INSERT INTO transactions (id, user_id, kind, amount, description)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
            "#,
        )
        .bind(&transaction_id)
        .bind(user_id)
        .bind(kind.as_str())
        .bind(amount)
        .bind(description)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(BalanceChange {
            transaction,
            balance,
        })
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Transaction>, ServiceError> {
        let transactions = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.conn)
        .await?;

        Ok(transactions)
    }
}
