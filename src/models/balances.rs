use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct Balance {
    pub id: String,
    pub user_id: String,
    pub amount: i64,
    pub currency: String,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

pub const DEFAULT_CURRENCY: &str = "USD";

/// Balance granted to every freshly registered user.
pub const INITIAL_BALANCE: i64 = 1000;
