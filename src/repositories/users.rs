use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::models::users::User;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, ServiceError>;

    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, ServiceError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    conn: PgPool,
}

impl PgUserRepository {
    pub fn new(conn: PgPool) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, ServiceError> {
        let user_id = Uuid::new_v4().hyphenated().to_string();

        let user = sqlx::query_as::<_, User>(
            r#"
                INSERT INTO users (id, name, email, password_hash)
                VALUES ($1, $2, $3, $4)
                RETURNING *
            "#,
        )
        .bind(&user_id)
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.conn)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, ServiceError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.conn)
            .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.conn)
            .await?;

        Ok(user)
    }
}
