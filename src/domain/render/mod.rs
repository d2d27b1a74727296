pub mod error;
pub mod image_format;
pub mod service;

pub use error::RenderServiceError;
pub use service::{CompositionResult, RenderService, RenderServiceApi};

use crate::domain::shared::inline_asset::InlineAsset;
use serde::{Deserialize, Serialize};

/// JSON body for POST /api/render
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
}

/// Response for POST /api/render
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResponse {
    pub video_url: String,
}

/// Where the still image comes from
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Bytes uploaded with the request
    Upload(Vec<u8>),
    /// `http://` or `https://` URL to download
    Remote(String),
    /// `data:` URI, decoded when the request is rendered
    Inline(String),
}

impl ImageSource {
    pub fn from_reference(reference: &str) -> Result<Self, RenderServiceError> {
        let reference = reference.trim();
        if InlineAsset::is_data_uri(reference) {
            return Ok(ImageSource::Inline(reference.to_string()));
        }

        let lower = reference.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(ImageSource::Remote(reference.to_string()));
        }

        Err(RenderServiceError::Invalid(
            "imageUrl must be an http(s) URL or a data URI".to_string(),
        ))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ImageSource::Upload(_) => "upload",
            ImageSource::Remote(_) => "remote",
            ImageSource::Inline(_) => "inline",
        }
    }
}

/// Where the narration comes from.
///
/// Only inline assets are accepted; remote audio is deliberately refused.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioSource {
    Inline(String),
}

impl AudioSource {
    pub fn from_reference(reference: &str) -> Result<Self, RenderServiceError> {
        let reference = reference.trim();
        if InlineAsset::is_data_uri(reference) {
            Ok(AudioSource::Inline(reference.to_string()))
        } else {
            Err(RenderServiceError::Invalid(
                "audioUrl must be an inline data URI".to_string(),
            ))
        }
    }
}

/// One image plus one narration track to combine
#[derive(Debug, Clone)]
pub struct CompositionRequest {
    pub image: ImageSource,
    pub audio: AudioSource,
}
