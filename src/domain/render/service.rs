use super::error::RenderServiceError;
use super::image_format::image_extension;
use super::{AudioSource, CompositionRequest, ImageSource};
use crate::domain::shared::inline_asset::{InlineAsset, MIME_VIDEO_MP4};
use crate::infrastructure::encoder::{EncodeJob, EncoderError, VideoEncoder};
use crate::infrastructure::repositories::AssetRepository;
use crate::infrastructure::workdir::WorkingDirectory;
use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

const AUDIO_FILE: &str = "audio.wav";
const OUTPUT_FILE: &str = "out.mp4";

#[derive(Debug, Clone)]
pub struct CompositionResult {
    pub video: InlineAsset,
}

pub struct RenderService {
    asset_repo: Arc<dyn AssetRepository>,
    encoder: Arc<dyn VideoEncoder>,
    work_root: PathBuf,
}

impl RenderService {
    pub fn new(
        asset_repo: Arc<dyn AssetRepository>,
        encoder: Arc<dyn VideoEncoder>,
        work_root: PathBuf,
    ) -> Self {
        Self {
            asset_repo,
            encoder,
            work_root,
        }
    }
}

#[async_trait]
pub trait RenderServiceApi: Send + Sync {
    /// Combine one still image and one narration track into an MP4
    ///
    /// This operation:
    /// - Allocates a private working directory
    /// - Resolves and stages the image and the audio
    /// - Runs the encoder and reads back its output
    /// - Removes the working directory, whatever the outcome
    ///
    /// Returns the video as an inline asset
    async fn render(
        &self,
        request: CompositionRequest,
    ) -> Result<CompositionResult, RenderServiceError>;
}

#[async_trait]
impl RenderServiceApi for RenderService {
    async fn render(
        &self,
        request: CompositionRequest,
    ) -> Result<CompositionResult, RenderServiceError> {
        let start_time = Instant::now();
        let image_kind = request.image.kind();

        // 1. Allocate
        let workdir = WorkingDirectory::allocate(&self.work_root).await?;

        tracing::info!(
            image_source = image_kind,
            workdir = %workdir.path().display(),
            "Render request"
        );

        // 2-6. Resolve, stage, encode, collect
        let outcome = self.render_in(&workdir, request).await;

        // 7. Release
        workdir.release().await;

        match &outcome {
            Ok(result) => tracing::info!(
                image_source = image_kind,
                video_size = result.video.data.len(),
                latency_ms = start_time.elapsed().as_millis(),
                "Render completed"
            ),
            Err(e) => tracing::warn!(
                image_source = image_kind,
                error = %e,
                latency_ms = start_time.elapsed().as_millis(),
                "Render failed"
            ),
        }

        outcome
    }
}

impl RenderService {
    async fn render_in(
        &self,
        workdir: &WorkingDirectory,
        request: CompositionRequest,
    ) -> Result<CompositionResult, RenderServiceError> {
        let image = self.resolve_image(request.image).await?;
        let audio = resolve_audio(&request.audio)?;

        let job = EncodeJob {
            image: workdir.file(&format!("image.{}", image_extension(&image))),
            audio: workdir.file(AUDIO_FILE),
            output: workdir.file(OUTPUT_FILE),
        };

        tokio::fs::write(&job.image, &image).await?;
        tokio::fs::write(&job.audio, &audio).await?;

        tracing::debug!(
            image_size = image.len(),
            audio_size = audio.len(),
            "Inputs staged"
        );

        self.encoder.encode(&job).await?;

        let video = tokio::fs::read(&job.output).await.map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                RenderServiceError::Encoder(EncoderError::Failed {
                    status: "success".to_string(),
                    diagnostic: "no output file was produced".to_string(),
                })
            } else {
                RenderServiceError::Io(e)
            }
        })?;

        Ok(CompositionResult {
            video: InlineAsset::new(MIME_VIDEO_MP4, video),
        })
    }

    async fn resolve_image(&self, source: ImageSource) -> Result<Vec<u8>, RenderServiceError> {
        let bytes = match source {
            ImageSource::Upload(bytes) => bytes,
            ImageSource::Inline(reference) => InlineAsset::parse(&reference)
                .map_err(|e| RenderServiceError::Invalid(format!("imageUrl: {}", e)))?
                .data,
            ImageSource::Remote(url) => self
                .asset_repo
                .fetch(&url)
                .await
                .map_err(RenderServiceError::Fetch)?,
        };

        if bytes.is_empty() {
            return Err(RenderServiceError::Invalid("image is empty".to_string()));
        }

        Ok(bytes)
    }
}

fn resolve_audio(source: &AudioSource) -> Result<Vec<u8>, RenderServiceError> {
    let AudioSource::Inline(reference) = source;
    let bytes = InlineAsset::parse(reference)
        .map_err(|e| RenderServiceError::Invalid(format!("audioUrl: {}", e)))?
        .data;

    if bytes.is_empty() {
        return Err(RenderServiceError::Invalid("audio is empty".to_string()));
    }

    Ok(bytes)
}
