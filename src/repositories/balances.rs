use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::models::balances::Balance;

#[async_trait]
pub trait BalanceRepository: Send + Sync {
    async fn find_by_user(&self, user_id: &str) -> Result<Option<Balance>, ServiceError>;

    async fn create(
        &self,
        user_id: &str,
        amount: i64,
        currency: &str,
    ) -> Result<Balance, ServiceError>;
}

#[derive(Clone)]
pub struct PgBalanceRepository {
    conn: PgPool,
}

impl PgBalanceRepository {
    pub fn new(conn: PgPool) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl BalanceRepository for PgBalanceRepository {
    async fn find_by_user(&self, user_id: &str) -> Result<Option<Balance>, ServiceError> {
        let balance = sqlx::query_as::<_, Balance>("SELECT * FROM balances WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.conn)
            .await?;

        Ok(balance)
    }

    async fn create(
        &self,
        user_id: &str,
        amount: i64,
        currency: &str,
    ) -> Result<Balance, ServiceError> {
        let balance_id = Uuid::new_v4().hyphenated().to_string();

        let balance = sqlx::query_as::<_, Balance>(
            r#"
                INSERT INTO balances (id, user_id, amount, currency)
                VALUES ($1, $2, $3, $4)
                RETURNING *
            "#,
        )
        .bind(&balance_id)
        .bind(user_id)
        .bind(amount)
        .bind(currency)
        .fetch_one(&self.conn)
        .await?;

        Ok(balance)
    }
}
