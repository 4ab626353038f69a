use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::json;

use super::middleware::AuthUser;
use super::AppState;
use crate::models::transactions::BalanceChangeRequest;

pub async fn get_transactions(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Response {
    match state.transactions.list_transactions(&user_id).await {
        Ok(transactions) => (
            StatusCode::OK,
            Json(json!({"success": true, "transactions": transactions})),
        )
            .into_response(),
        Err(error) => state.render_error(error),
    }
}

pub async fn get_balance(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Response {
    match state.transactions.get_balance(&user_id).await {
        Ok(balance) => {
            (StatusCode::OK, Json(json!({"success": true, "balance": balance}))).into_response()
        }
        Err(error) => state.render_error(error),
    }
}

pub async fn add_balance(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(request): Json<BalanceChangeRequest>,
) -> Response {
    match state.transactions.add_balance(&user_id, request).await {
        Ok(change) => (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "transaction": change.transaction,
                "newBalance": change.balance.amount,
            })),
        )
            .into_response(),
        Err(error) => state.render_error(error),
    }
}

pub async fn deduct_balance(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(request): Json<BalanceChangeRequest>,
) -> Response {
    match state.transactions.deduct_balance(&user_id, request).await {
        Ok(change) => (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "transaction": change.transaction,
                "newBalance": change.balance.amount,
            })),
        )
            .into_response(),
        Err(error) => state.render_error(error),
    }
}
