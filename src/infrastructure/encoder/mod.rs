pub mod ffmpeg;

pub use ffmpeg::{EncoderConfig, FfmpegEncoder};

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

/// Inputs and output of a single still-image encode
#[derive(Debug, Clone)]
pub struct EncodeJob {
    pub image: PathBuf,
    pub audio: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum EncoderError {
    #[error("could not start encoder: {0}")]
    Spawn(String),
    #[error("encoder exited with {status}: {diagnostic}")]
    Failed { status: String, diagnostic: String },
    #[error("encoder timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

/// Turns one still image plus one audio track into a video file.
///
/// `encode` resolves only once the encoder has finished; the output file is
/// complete when it returns `Ok`.
#[async_trait]
pub trait VideoEncoder: Send + Sync {
    async fn encode(&self, job: &EncodeJob) -> Result<(), EncoderError>;

    async fn is_available(&self) -> bool;
}
