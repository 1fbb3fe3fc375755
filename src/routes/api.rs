use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue},
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::handlers::{api, explain, speak, transcribe};
use crate::state::AppState;
use std::sync::Arc;

pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(api::health_check))
        .route("/api/test", get(api::status))
        .route(
            "/api/transcribe",
            post(transcribe::transcribe_handler)
                .layer(DefaultBodyLimit::max(transcribe::MAX_UPLOAD_BYTES)),
        )
        .route("/api/explain", post(explain::explain_handler))
        .route("/api/text-to-speech", post(speak::speak_handler))
        .route("/api/test-tts", post(speak::test_tts_handler))
        .layer(TraceLayer::new_for_http())
}

/// CORS policy for the browser client
///
/// Allows `CORS_ALLOW_ORIGIN` (any origin when unset) and exposes the explanation
/// text header so scripts can read it.
pub fn cors_layer(config: &ServerConfig) -> anyhow::Result<CorsLayer> {
    let origin = match config.cors_allow_origin.as_deref() {
        None | Some("*") => AllowOrigin::from(Any),
        Some(origin) => AllowOrigin::exact(
            HeaderValue::from_str(origin)
                .map_err(|e| anyhow::anyhow!("Invalid CORS_ALLOW_ORIGIN '{origin}': {e}"))?,
        ),
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(explain::AI_TEXT_HEADER)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_rejects_invalid_origin() {
        let config = ServerConfig {
            cors_allow_origin: Some("bad\norigin".to_string()),
            ..Default::default()
        };
        assert!(cors_layer(&config).is_err());
    }

    #[test]
    fn test_cors_layer_accepts_wildcard_and_exact() {
        let mut config = ServerConfig::default();
        assert!(cors_layer(&config).is_ok());

        config.cors_allow_origin = Some("http://localhost:5173".to_string());
        assert!(cors_layer(&config).is_ok());
    }
}
