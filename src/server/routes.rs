use super::error::ServerError;
use super::state::AppState;
use crate::pipeline::Turn;
use crate::providers::ChatMessage;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::Arc;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/chat/query", post(chat_query))
        .route("/health", get(health))
}

/// Answer the last message of a conversation. The body is the whole
/// conversation so far, oldest message first.
async fn chat_query(
    State(state): State<Arc<AppState>>,
    Json(messages): Json<Vec<ChatMessage>>,
) -> Result<String, ServerError> {
    let turn = Turn::from_conversation(&messages).ok_or(ServerError::EmptyConversation)?;
    Ok(state.dispatcher.dispatch(&turn).await)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
