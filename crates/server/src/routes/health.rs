use axum::{Router, response::Json as ResponseJson, routing::get};
use utils::response::MessageResponse;

use crate::AppState;

pub async fn health_check() -> ResponseJson<MessageResponse> {
    ResponseJson(MessageResponse::new("ok"))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
