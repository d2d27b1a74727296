pub mod engine;
pub mod error;
pub mod service;

pub use engine::VoiceEngine;
pub use error::TtsServiceError;
pub use service::{clamp_speed, SynthesisResult, TtsService, TtsServiceApi};

use serde::{Deserialize, Deserializer, Serialize};

/// Style used when the caller does not pick one (VOICEVOX "Zundamon / normal")
pub const DEFAULT_SPEAKER_ID: &str = "3";

/// Request for POST /api/tts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TtsRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub engine: VoiceEngine,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(
        default,
        deserialize_with = "deserialize_speaker_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub speaker_id: Option<String>,
}

impl TtsRequest {
    /// Speaker style to send to the backend, falling back to the default
    pub fn speaker(&self) -> &str {
        self.speaker_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SPEAKER_ID)
    }
}

/// Response for POST /api/tts
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TtsResponse {
    pub audio_url: String,
}

/// Clients send the style id either as a string or as a bare number
fn deserialize_speaker_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SpeakerId {
        Text(String),
        Number(u64),
    }

    Ok(Option::<SpeakerId>::deserialize(deserializer)?.map(|id| match id {
        SpeakerId::Text(s) => s,
        SpeakerId::Number(n) => n.to_string(),
    }))
}
