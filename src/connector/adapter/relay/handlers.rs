use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, instrument};

use crate::application::Categorizer;
use crate::domain::GenerationResult;

use super::RelayState;

pub const NO_INPUT_REPLY: &str = "No input provided";
pub const ONLY_POST: &str = "Only POST allowed";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Debug, Deserialize)]
pub struct CategorizeRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategorizeReply {
    pub category: String,
}

fn reply(status: StatusCode, text: impl Into<String>) -> Response {
    (status, Json(ChatReply { reply: text.into() })).into_response()
}

/// `POST /chat`: relay one message to the provider.
#[instrument(skip_all)]
pub async fn chat(
    State(state): State<RelayState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let message = match payload {
        Ok(Json(body)) => body.message.unwrap_or_default(),
        Err(rejection) => {
            debug!("Unreadable chat body: {}", rejection.body_text());
            String::new()
        }
    };

    match state.chat.execute(&message).await {
        Ok(GenerationResult::Success { text }) => reply(StatusCode::OK, text),
        Ok(GenerationResult::Failure { reason, .. }) => {
            error!("Final provider error: {}", reason);
            reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Server error: {reason}"),
            )
        }
        Err(e) if e.is_invalid_input() => reply(StatusCode::BAD_REQUEST, NO_INPUT_REPLY),
        Err(e) => {
            error!("Chat relay unavailable: {}", e);
            reply(StatusCode::INTERNAL_SERVER_ERROR, format!("Server error: {e}"))
        }
    }
}

/// `POST /categorize`: label complaint text server-side.
#[instrument(skip_all)]
pub async fn categorize(
    State(state): State<RelayState>,
    payload: Result<Json<CategorizeRequest>, JsonRejection>,
) -> Response {
    let text = payload
        .ok()
        .and_then(|Json(body)| body.text)
        .unwrap_or_default();

    if text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": NO_INPUT_REPLY })),
        )
            .into_response();
    }

    let category = state.categorizer.categorize(&text).await;
    (StatusCode::OK, Json(CategorizeReply { category })).into_response()
}

/// Health check endpoint.
#[instrument(skip_all)]
pub async fn health(State(state): State<RelayState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "model": state.model,
            "categorization_fallbacks": state.categorizer.fallback_count(),
        })),
    )
}

/// Any non-POST method on a POST-only route.
pub async fn only_post() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, ONLY_POST)
}
