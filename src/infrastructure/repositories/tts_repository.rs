use async_trait::async_trait;
use serde_json::Value;

/// Repository for the two-phase speech synthesis backend.
///
/// The backend first builds a synthesis query (prosody and timing parameters)
/// for a text and speaker, then renders that query into WAV audio. The query
/// is handed back to the caller in between so it can be adjusted.
///
/// Errors are plain diagnostic strings that name the failing phase and carry
/// the backend response body verbatim.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Build the synthesis query for `text` spoken by `speaker`
    async fn audio_query(&self, text: &str, speaker: &str) -> Result<Value, String>;

    /// Render a (possibly modified) query into WAV bytes
    async fn synthesis(&self, query: &Value, speaker: &str) -> Result<Vec<u8>, String>;

    /// Whether the backend answers at all
    async fn is_available(&self) -> bool;
}
