use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::models::documents::{Document, DocumentStatus};

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn insert_document(&self, user_id: &str, name: &str) -> Result<Document, ServiceError>;

    async fn find_by_id(&self, document_id: &str) -> Result<Option<Document>, ServiceError>;

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Document>, ServiceError>;

    async fn update_status(
        &self,
        document_id: &str,
        status: DocumentStatus,
    ) -> Result<Document, ServiceError>;
}

#[derive(Clone)]
pub struct PgDocumentRepository {
    conn: PgPool,
}

impl PgDocumentRepository {
    pub fn new(conn: PgPool) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    async fn insert_document(&self, user_id: &str, name: &str) -> Result<Document, ServiceError> {
        let document_id = Uuid::new_v4().hyphenated().to_string();

        let document = sqlx::query_as::<_, Document>(
            r#"
                INSERT INTO documents (id, user_id, name, status)
                VALUES ($1, $2, $3, $4)
                RETURNING *
            "#,
        )
        .bind(&document_id)
        .bind(user_id)
        .bind(name)
        .bind(DocumentStatus::Pending.as_str())
        .fetch_one(&self.conn)
        .await?;

        Ok(document)
    }

    async fn find_by_id(&self, document_id: &str) -> Result<Option<Document>, ServiceError> {
        let document = sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = $1")
            .bind(document_id)
            .fetch_optional(&self.conn)
            .await?;

        Ok(document)
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Document>, ServiceError> {
        let documents = sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.conn)
        .await?;

        Ok(documents)
    }

    async fn update_status(
        &self,
        document_id: &str,
        status: DocumentStatus,
    ) -> Result<Document, ServiceError> {
        let document = sqlx::query_as::<_, Document>(
            r#"
                UPDATE documents
                SET status = $1, updated_at = CURRENT_TIMESTAMP
                WHERE id = $2
                RETURNING *
            "#,
        )
        .bind(status.as_str())
        .bind(document_id)
        .fetch_optional(&self.conn)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Document not found: {document_id}")))?;

        Ok(document)
    }
}
