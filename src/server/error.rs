//! Transport-level errors.
//!
//! Raised only before a request reaches the dispatcher. Detail is logged;
//! the caller sees a generic body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// The request carried no message to answer.
    #[error("conversation is empty")]
    EmptyConversation,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        error!(error = %self, "chat request rejected");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Chat API response error" })),
        )
            .into_response()
    }
}
