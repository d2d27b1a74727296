use super::tts_repository::TtsRepository;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// VOICEVOX engine implementation of TTS repository
pub struct VoicevoxTtsRepository {
    base_url: String,
    http_client: reqwest::Client,
}

impl VoicevoxTtsRepository {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    fn audio_query_url(&self, text: &str, speaker: &str) -> String {
        format!(
            "{}/audio_query?text={}&speaker={}",
            self.base_url,
            urlencoding::encode(text),
            urlencoding::encode(speaker)
        )
    }

    fn synthesis_url(&self, speaker: &str) -> String {
        format!(
            "{}/synthesis?speaker={}&enable_interrogative_upspeak=true",
            self.base_url,
            urlencoding::encode(speaker)
        )
    }

    /// Read the body of a failed response as diagnostic text
    async fn failure_text(response: reqwest::Response) -> String {
        response
            .text()
            .await
            .unwrap_or_else(|e| format!("<unreadable body: {}>", e))
    }
}

#[async_trait]
impl TtsRepository for VoicevoxTtsRepository {
    async fn audio_query(&self, text: &str, speaker: &str) -> Result<Value, String> {
        tracing::info!(
            speaker = speaker,
            text_length = text.len(),
            "Calling VOICEVOX audio_query"
        );

        let response = self
            .http_client
            .post(self.audio_query_url(text, speaker))
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, speaker = speaker, "VOICEVOX audio_query request failed");
                format!("audio_query failed: {}", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = Self::failure_text(response).await;
            tracing::error!(status = %status, body = %body, "VOICEVOX audio_query rejected");
            return Err(format!("audio_query failed: {}", body));
        }

        let query: Value = response
            .json()
            .await
            .map_err(|e| format!("audio_query failed: invalid JSON response: {}", e))?;

        if !query.is_object() {
            return Err("audio_query failed: response is not a JSON object".to_string());
        }

        Ok(query)
    }

    async fn synthesis(&self, query: &Value, speaker: &str) -> Result<Vec<u8>, String> {
        tracing::info!(speaker = speaker, "Calling VOICEVOX synthesis");

        let response = self
            .http_client
            .post(self.synthesis_url(speaker))
            .json(query)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, speaker = speaker, "VOICEVOX synthesis request failed");
                format!("synthesis failed: {}", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = Self::failure_text(response).await;
            tracing::error!(status = %status, body = %body, "VOICEVOX synthesis rejected");
            return Err(format!("synthesis failed: {}", body));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| format!("synthesis failed: could not read audio: {}", e))?;

        tracing::debug!(audio_size = audio.len(), "VOICEVOX audio received");

        Ok(audio.to_vec())
    }

    async fn is_available(&self) -> bool {
        self.http_client
            .get(format!("{}/version", self.base_url))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}
