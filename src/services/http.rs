use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::AuthService;
use super::dashboard::DashboardService;
use super::documents::DocumentService;
use super::transactions::TransactionService;
use crate::error::ServiceError;
use crate::settings::Settings;

mod auth;
mod dashboard;
mod documents;
pub mod middleware;
mod transactions;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub transactions: Arc<TransactionService>,
    pub documents: Arc<DocumentService>,
    pub dashboard: Arc<DashboardService>,
    pub fixed_token: String,
    pub session_secret: String,
    pub expose_internal_errors: bool,
}

impl AppState {
    pub fn render_error(&self, error: ServiceError) -> Response {
        let status = match &error {
            ServiceError::Validation(_)
            | ServiceError::NotFound(_)
            | ServiceError::Conflict(_)
            | ServiceError::InsufficientFunds => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Internal(detail) => {
                log::error!("Internal error: {detail}");
                let body = if self.expose_internal_errors {
                    json!({"error": "Internal server error", "message": detail})
                } else {
                    json!({"error": "Internal server error"})
                };
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
            }
        };

        (status, Json(json!({"error": error.to_string()}))).into_response()
    }
}

async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({"status": "OK", "message": "Server is running"})),
    )
}

async fn route_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({"error": "Route not found"})))
}

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/documents", get(documents::get_documents))
        .route("/documents/generate", post(documents::generate_document))
        .route("/transactions", get(transactions::get_transactions))
        .route("/transactions/balance", get(transactions::get_balance))
        .route("/transactions/add-balance", post(transactions::add_balance))
        .route(
            "/transactions/deduct-balance",
            post(transactions::deduct_balance),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::session_token_layer,
        ));

    // The fixed-token gate fronts every /api route; the session gate only the
    // protected subset.
    let api = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .merge(protected)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::fixed_token_layer,
        ));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_http_server(
    auth_service: Arc<AuthService>,
    transaction_service: Arc<TransactionService>,
    document_service: Arc<DocumentService>,
    dashboard_service: Arc<DashboardService>,
    settings: &Settings,
) -> Result<(), anyhow::Error> {
    let state = AppState {
        auth: auth_service,
        transactions: transaction_service,
        documents: document_service,
        dashboard: dashboard_service,
        fixed_token: settings.auth.fixed_token.clone(),
        session_secret: settings.auth.session_secret.clone(),
        expose_internal_errors: settings.server.environment == "development",
    };

    let app = router(state);

    let listener =
        tokio::net::TcpListener::bind(format!("0.0.0.0:{}", settings.server.port)).await?;
    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
