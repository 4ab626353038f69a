use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::json;

use super::middleware::AuthUser;
use super::AppState;
use crate::models::documents::GenerateDocumentRequest;

pub async fn get_documents(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Response {
    match state.documents.list(&user_id).await {
        Ok(documents) => (
            StatusCode::OK,
            Json(json!({"success": true, "documents": documents})),
        )
            .into_response(),
        Err(error) => state.render_error(error),
    }
}

pub async fn generate_document(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(request): Json<GenerateDocumentRequest>,
) -> Response {
    match state.documents.generate(&user_id, request).await {
        Ok(document) => (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "Document generation started",
                "document": document,
            })),
        )
            .into_response(),
        Err(error) => state.render_error(error),
    }
}
