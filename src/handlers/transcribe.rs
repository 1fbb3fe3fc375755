use axum::{
    extract::{Multipart, State},
    response::Json,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

use crate::core::stt::AudioUpload;
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

/// Multipart field carrying the recording
pub const AUDIO_FIELD: &str = "audio_file";

/// Largest upload accepted by the transcribe route (the Whisper API limit)
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

const ALLOWED_EXTENSIONS: [&str; 4] = [".mp3", ".wav", ".m4a", ".webm"];

fn has_allowed_extension(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Handler for the /api/transcribe endpoint
pub async fn transcribe_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> AppResult<Json<Value>> {
    let transcriber = state
        .core_state
        .transcriber
        .as_ref()
        .ok_or_else(|| AppError::NotConfigured("OpenAI API key is not set.".to_string()))?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read audio file: {e}")))?;

        upload = Some(AudioUpload {
            file_name,
            content_type,
            data: data.to_vec(),
        });
        break;
    }

    let upload = upload.ok_or_else(|| AppError::BadRequest("No audio file provided.".to_string()))?;

    if !has_allowed_extension(&upload.file_name) {
        return Err(AppError::BadRequest(format!(
            "Invalid file type. Allowed types: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }

    info!(
        "Transcribe request received - file: {}, {} bytes",
        upload.file_name,
        upload.data.len()
    );

    let transcript = transcriber.transcribe(upload).await?;

    Ok(Json(json!({ "transcript": transcript })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extensions() {
        assert!(has_allowed_extension("answer.webm"));
        assert!(has_allowed_extension("ANSWER.MP3"));
        assert!(has_allowed_extension("clip.m4a"));
        assert!(has_allowed_extension("clip.wav"));
        assert!(!has_allowed_extension("notes.txt"));
        assert!(!has_allowed_extension("webm"));
        assert!(!has_allowed_extension(""));
    }
}
