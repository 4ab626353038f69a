use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use tokio::sync::mpsc;

use crate::repositories::balances::{BalanceRepository, PgBalanceRepository};
use crate::repositories::documents::{DocumentRepository, PgDocumentRepository};
use crate::repositories::transactions::{PgTransactionRepository, TransactionRepository};
use crate::repositories::users::{PgUserRepository, UserRepository};
use crate::settings::Settings;

pub mod auth;
pub mod dashboard;
pub mod documents;
pub mod http;
pub mod transactions;

/// Wires repositories, services, the document worker, and the HTTP server.
/// Returns when the server stops.
pub async fn start_services(pool: PgPool, settings: Settings) -> Result<(), anyhow::Error> {
    let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool.clone()));
    let balances: Arc<dyn BalanceRepository> = Arc::new(PgBalanceRepository::new(pool.clone()));
    let transactions: Arc<dyn TransactionRepository> =
        Arc::new(PgTransactionRepository::new(pool.clone()));
    let documents: Arc<dyn DocumentRepository> = Arc::new(PgDocumentRepository::new(pool));

    let (job_tx, job_rx) = mpsc::channel(512);

    log::info!("Starting document worker.");
    let worker = documents::DocumentWorker::new(
        documents.clone(),
        Duration::from_secs(settings.documents.processing_delay_secs),
    );
    let worker_handle = tokio::spawn(worker.run(job_rx));

    let auth_service = Arc::new(auth::AuthService::new(
        users.clone(),
        balances.clone(),
        settings.auth.clone(),
    ));
    let transaction_service = Arc::new(transactions::TransactionService::new(
        balances.clone(),
        transactions.clone(),
    ));
    let document_service = Arc::new(documents::DocumentService::new(documents.clone(), job_tx));
    let dashboard_service = Arc::new(dashboard::DashboardService::new(
        users,
        balances,
        documents,
        transactions,
    ));

    log::info!("Starting HTTP server.");
    http::start_http_server(
        auth_service,
        transaction_service,
        document_service,
        dashboard_service,
        &settings,
    )
    .await?;

    // Server stopped; the job queue sender is gone with it, so the worker
    // loop drains and exits. Abort covers jobs still sleeping.
    worker_handle.abort();

    Ok(())
}
