use base64::{
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD},
    Engine,
};
use std::fmt;

pub const MIME_AUDIO_WAV: &str = "audio/wav";
pub const MIME_VIDEO_MP4: &str = "video/mp4";

const DATA_SCHEME: &str = "data:";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum InlineAssetError {
    #[error("not a data URI")]
    NotDataUri,
    #[error("data URI has no payload separator")]
    MissingPayload,
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),
}

/// A self-contained media payload carried as a `data:` URI instead of a hosted file
#[derive(Debug, Clone, PartialEq)]
pub struct InlineAsset {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl InlineAsset {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    pub fn is_data_uri(value: &str) -> bool {
        value
            .get(..DATA_SCHEME.len())
            .map(|scheme| scheme.eq_ignore_ascii_case(DATA_SCHEME))
            .unwrap_or(false)
    }

    /// Parse `data:[<mime>][;param...][;base64],<payload>`.
    ///
    /// Non-base64 payloads are percent-decoded. A missing MIME type falls back
    /// to `text/plain` as RFC 2397 prescribes.
    pub fn parse(value: &str) -> Result<Self, InlineAssetError> {
        if !Self::is_data_uri(value) {
            return Err(InlineAssetError::NotDataUri);
        }

        let rest = &value[DATA_SCHEME.len()..];
        let (header, payload) = rest.split_once(',').ok_or(InlineAssetError::MissingPayload)?;

        let mut params = header.split(';');
        let mime_type = params
            .next()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or("text/plain")
            .to_string();
        let is_base64 = params.any(|p| p.trim().eq_ignore_ascii_case("base64"));

        let data = if is_base64 {
            // Browsers and some encoders wrap long payloads
            let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            decode_base64(&compact)?
        } else {
            urlencoding::decode_binary(payload.as_bytes()).into_owned()
        };

        Ok(Self { mime_type, data })
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }
}

/// Standard alphabet first, then unpadded and URL-safe variants
fn decode_base64(payload: &str) -> Result<Vec<u8>, InlineAssetError> {
    STANDARD.decode(payload).or_else(|err| {
        [STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD]
            .iter()
            .find_map(|engine| engine.decode(payload).ok())
            .ok_or_else(|| InlineAssetError::InvalidBase64(err.to_string()))
    })
}

impl fmt::Display for InlineAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_data_uri())
    }
}
