use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::json;

use super::middleware::AuthUser;
use super::AppState;

pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Response {
    match state.dashboard.get_dashboard(&user_id).await {
        Ok(data) => {
            (StatusCode::OK, Json(json!({"success": true, "data": data}))).into_response()
        }
        Err(error) => state.render_error(error),
    }
}
