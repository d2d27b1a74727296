use serde::{Deserialize, Serialize};
use std::fmt;

/// Speech engine selected by the caller.
///
/// Only VOICEVOX is wired to a backend. Every other name is kept verbatim so
/// the service can refuse it explicitly instead of quietly using VOICEVOX.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VoiceEngine {
    #[default]
    Voicevox,
    Unimplemented(String),
}

impl VoiceEngine {
    pub fn name(&self) -> &str {
        match self {
            VoiceEngine::Voicevox => "voicevox",
            VoiceEngine::Unimplemented(name) => name,
        }
    }
}

impl From<String> for VoiceEngine {
    fn from(value: String) -> Self {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "" | "voicevox" => VoiceEngine::Voicevox,
            _ => VoiceEngine::Unimplemented(normalized),
        }
    }
}

impl From<VoiceEngine> for String {
    fn from(engine: VoiceEngine) -> Self {
        engine.name().to_string()
    }
}

impl fmt::Display for VoiceEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
