use super::error::TtsServiceError;
use super::{TtsRequest, VoiceEngine};
use crate::domain::shared::inline_asset::{InlineAsset, MIME_AUDIO_WAV};
use crate::infrastructure::repositories::TtsRepository;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub const MIN_SPEED: f64 = 0.5;
pub const MAX_SPEED: f64 = 2.0;

/// Query field the backend reads the speaking rate from
const SPEED_SCALE_FIELD: &str = "speedScale";

#[derive(Debug, Clone)]
pub struct SynthesisResult {
    pub audio: InlineAsset,
}

/// Out-of-range rates are pulled to the nearest bound rather than rejected
pub fn clamp_speed(speed: f64) -> f64 {
    speed.clamp(MIN_SPEED, MAX_SPEED)
}

pub struct TtsService {
    tts_repo: Arc<dyn TtsRepository>,
}

impl TtsService {
    pub fn new(tts_repo: Arc<dyn TtsRepository>) -> Self {
        Self { tts_repo }
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Synthesize text to speech
    ///
    /// This operation:
    /// - Rejects blank text and engines without a backend
    /// - Builds the synthesis query, applying the requested speed
    /// - Renders the query to WAV audio
    ///
    /// Returns the audio as an inline asset
    async fn synthesize(&self, request: TtsRequest) -> Result<SynthesisResult, TtsServiceError>;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn synthesize(&self, request: TtsRequest) -> Result<SynthesisResult, TtsServiceError> {
        let text = request.text.trim();
        if text.is_empty() {
            return Err(TtsServiceError::Invalid("text is required".to_string()));
        }

        if let VoiceEngine::Unimplemented(name) = &request.engine {
            return Err(TtsServiceError::NotImplemented(name.clone()));
        }

        let speaker = request.speaker();

        tracing::info!(
            engine = %request.engine,
            speaker = speaker,
            preset = ?request.preset,
            speed = ?request.speed,
            text_length = text.len(),
            "TTS synthesis request"
        );

        // 1. Build the query
        let mut query = self
            .tts_repo
            .audio_query(text, speaker)
            .await
            .map_err(TtsServiceError::Dependency)?;

        // 2. Apply the speaking rate
        if let Some(speed) = request.speed {
            apply_speed(&mut query, speed)?;
        }

        // 3. Render audio
        let audio_data = self
            .tts_repo
            .synthesis(&query, speaker)
            .await
            .map_err(TtsServiceError::Dependency)?;

        tracing::info!(
            speaker = speaker,
            audio_size = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(SynthesisResult {
            audio: InlineAsset::new(MIME_AUDIO_WAV, audio_data),
        })
    }
}

fn apply_speed(query: &mut Value, speed: f64) -> Result<(), TtsServiceError> {
    let clamped = clamp_speed(speed);
    if clamped != speed {
        tracing::debug!(requested = speed, applied = clamped, "Speed clamped");
    }

    let fields = query.as_object_mut().ok_or_else(|| {
        TtsServiceError::Dependency("audio_query failed: response is not a JSON object".to_string())
    })?;
    fields.insert(SPEED_SCALE_FIELD.to_string(), Value::from(clamped));
    Ok(())
}
