use axum::{
    extract::{State, rejection::JsonRejection},
    http::{HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::core::explain::{ExplanationRequest, ExplanationResponse};
use crate::core::header_codec;
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

/// Header carrying the spoken text alongside the audio body
pub const AI_TEXT_HEADER: &str = "x-ai-text-response";

/// Handler for the /api/explain endpoint
///
/// Responds with `audio/mpeg` and the explanation text in [`AI_TEXT_HEADER`] when
/// synthesis succeeds, or with `{"text_response", "audio_error"}` JSON when it does
/// not.
pub async fn explain_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ExplanationRequest>, JsonRejection>,
) -> AppResult<Response> {
    let explainer = state
        .core_state
        .explainer
        .as_ref()
        .ok_or_else(|| AppError::NotConfigured("OpenAI API key is not set.".to_string()))?;

    let Json(request) = payload.map_err(|e| {
        tracing::debug!("Rejected explain body: {}", e);
        AppError::BadRequest("Invalid JSON body".to_string())
    })?;

    info!(
        "Explain request received - topic length: {}, has user explanation: {}",
        request.topic.as_deref().map_or(0, str::len),
        request
            .user_explanation
            .as_deref()
            .is_some_and(|e| !e.is_empty())
    );

    let response = match explainer.explain(&request).await? {
        ExplanationResponse::AudioWithText { audio, text } => {
            let encoded = header_codec::encode(&text);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg")),
                    (header::CONTENT_LENGTH, HeaderValue::from(audio.len())),
                    (HeaderName::from_static(AI_TEXT_HEADER), encoded.to_header_value()),
                    (
                        header::ACCESS_CONTROL_EXPOSE_HEADERS,
                        HeaderValue::from_static("X-AI-Text-Response"),
                    ),
                ],
                audio,
            )
                .into_response()
        }
        ExplanationResponse::TextOnly { text, reason } => Json(json!({
            "text_response": text,
            "audio_error": reason,
        }))
        .into_response(),
    };

    Ok(response)
}
