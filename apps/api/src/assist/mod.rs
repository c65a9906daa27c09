// Résumé-builder text generation: a thin proxy in front of a hosted chat model.
// Prompt wording lives in the front end; this side only carries `{prompt}` in and
// `{message}` out.

pub mod client;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub message: String,
}

/// POST /api/ai/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, AppError> {
    let assist = state.assist.as_ref().ok_or(AppError::NotImplemented)?;
    let Json(request) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    if request.prompt.trim().is_empty() {
        return Err(AppError::Validation("prompt cannot be empty".to_string()));
    }
    let message = assist
        .chat(&request.prompt)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;
    Ok(Json(ChatReply { message }))
}
