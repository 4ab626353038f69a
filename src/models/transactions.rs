use serde::{Deserialize, Serialize};

use crate::models::balances::Balance;

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub amount: i64,
    pub description: String,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionKind {
    Recharge,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Recharge => "recharge",
            TransactionKind::Expense => "expense",
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct BalanceChangeRequest {
    #[serde(default)]
    pub amount: i64,
    pub description: Option<String>,
}

/// Result of an applied balance mutation: the appended ledger entry plus the
/// balance row it left behind.
#[derive(Clone, Debug, Serialize)]
pub struct BalanceChange {
    pub transaction: Transaction,
    pub balance: Balance,
}
