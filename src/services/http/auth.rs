use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::AppState;
use crate::models::users::{LoginRequest, RegisterRequest};

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Response {
    match state.auth.register(request).await {
        Ok(user) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "User registered successfully",
                "user": user,
            })),
        )
            .into_response(),
        Err(error) => state.render_error(error),
    }
}

pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Response {
    match state.auth.login(request).await {
        Ok(response) => (
            StatusCode::OK,
            Json(json!({
                "message": "Login successful",
                "token": response.token,
                "user": response.user,
            })),
        )
            .into_response(),
        Err(error) => state.render_error(error),
    }
}
