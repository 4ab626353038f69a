use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::error::ServiceError;
use crate::models::documents::{Document, DocumentStatus, GenerateDocumentRequest};
use crate::repositories::documents::DocumentRepository;

/// Unit of work queued for the document worker.
#[derive(Debug)]
pub enum DocumentJob {
    Finalize { document_id: String },
}

pub struct DocumentService {
    repository: Arc<dyn DocumentRepository>,
    jobs: mpsc::Sender<DocumentJob>,
}

impl DocumentService {
    pub fn new(repository: Arc<dyn DocumentRepository>, jobs: mpsc::Sender<DocumentJob>) -> Self {
        DocumentService { repository, jobs }
    }

    /// Creates the document in `pending` state and hands the finalize step to
    /// the worker queue; the caller gets the pending record back immediately.
    pub async fn generate(
        &self,
        user_id: &str,
        request: GenerateDocumentRequest,
    ) -> Result<Document, ServiceError> {
        if request.name.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Document name is required".to_string(),
            ));
        }

        let document = self.repository.insert_document(user_id, &request.name).await?;

        self.jobs
            .send(DocumentJob::Finalize {
                document_id: document.id.clone(),
            })
            .await
            .map_err(|e| ServiceError::Internal(format!("Document worker unavailable: {e}")))?;

        Ok(document)
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<Document>, ServiceError> {
        self.repository.find_by_user(user_id).await
    }
}

/// Drains the job queue for the lifetime of the process; each job runs on its
/// own task so a slow job does not hold back the queue.
#[derive(Clone)]
pub struct DocumentWorker {
    repository: Arc<dyn DocumentRepository>,
    processing_delay: Duration,
}

impl DocumentWorker {
    pub fn new(repository: Arc<dyn DocumentRepository>, processing_delay: Duration) -> Self {
        DocumentWorker {
            repository,
            processing_delay,
        }
    }

    pub async fn run(self, mut receiver: mpsc::Receiver<DocumentJob>) {
        while let Some(job) = receiver.recv().await {
            let worker = self.clone();

            tokio::spawn(async move {
                worker.process(job).await;
            });
        }
    }

    async fn process(&self, job: DocumentJob) {
        match job {
            DocumentJob::Finalize { document_id } => {
                tokio::time::sleep(self.processing_delay).await;

                match self
                    .repository
                    .update_status(&document_id, DocumentStatus::Completed)
                    .await
                {
                    Ok(_) => log::info!("Finalized document {document_id}."),
                    Err(e) => log::error!("Could not finalize document {document_id}: {e}"),
                }
            }
        }
    }
}
