use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::infrastructure::{encoder::VideoEncoder, repositories::TtsRepository};

/// External processes and services the pipeline depends on
pub struct Readiness {
    encoder: Arc<dyn VideoEncoder>,
    tts_repo: Arc<dyn TtsRepository>,
}

impl Readiness {
    pub fn new(encoder: Arc<dyn VideoEncoder>, tts_repo: Arc<dyn TtsRepository>) -> Self {
        Self { encoder, tts_repo }
    }
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(readiness): State<Arc<Readiness>>) -> impl IntoResponse {
    let (encoder_ok, tts_ok) = tokio::join!(
        readiness.encoder.is_available(),
        readiness.tts_repo.is_available()
    );

    let status = if encoder_ok && tts_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if status == StatusCode::OK { "ready" } else { "not_ready" },
            "encoder": if encoder_ok { "available" } else { "unavailable" },
            "tts": if tts_ok { "available" } else { "unavailable" }
        })),
    )
}
