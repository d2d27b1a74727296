use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

use crate::{
    domain::tts::{TtsRequest, TtsResponse, TtsService, TtsServiceApi},
    error::{AppError, AppResult},
};

pub struct TtsController {
    tts_service: Arc<TtsService>,
}

impl TtsController {
    pub fn new(tts_service: Arc<TtsService>) -> Self {
        Self { tts_service }
    }

    /// POST /api/tts - Convert text to speech
    pub async fn synthesize(
        State(controller): State<Arc<TtsController>>,
        payload: Result<Json<TtsRequest>, JsonRejection>,
    ) -> AppResult<Json<TtsResponse>> {
        let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

        let result = controller.tts_service.synthesize(request).await?;

        Ok(Json(TtsResponse {
            audio_url: result.audio.to_data_uri(),
        }))
    }
}
