use super::{EncodeJob, EncoderError, VideoEncoder};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Longest stderr excerpt kept in an error
const MAX_DIAGNOSTIC_LEN: usize = 2000;

/// Where the encoder lives and how it is driven.
///
/// Passed to [`FfmpegEncoder::new`]; several encoders with different settings
/// can coexist in one process.
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    pub binary: PathBuf,
    pub timeout: Duration,
    /// Output width in pixels; height follows the source aspect ratio
    pub output_width: u32,
    pub audio_bitrate: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("ffmpeg"),
            timeout: Duration::from_secs(300),
            output_width: 1280,
            audio_bitrate: "192k".to_string(),
        }
    }
}

/// Still-image to H.264/AAC MP4 encoder backed by the ffmpeg CLI
pub struct FfmpegEncoder {
    config: EncoderConfig,
}

impl FfmpegEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Command line for one encode.
    ///
    /// The image loops forever and `-shortest` stops at the end of the audio,
    /// so the video is exactly as long as the narration. `-2` keeps the scaled
    /// height even, which libx264 with yuv420p requires.
    pub fn build_args(&self, job: &EncodeJob) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-y", "-hide_banner", "-loglevel", "error", "-loop", "1", "-i"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(job.image.clone().into_os_string());
        args.push("-i".into());
        args.push(job.audio.clone().into_os_string());
        args.extend(
            [
                "-c:v",
                "libx264",
                "-tune",
                "stillimage",
                "-c:a",
                "aac",
                "-b:a",
                self.config.audio_bitrate.as_str(),
                "-pix_fmt",
                "yuv420p",
                "-shortest",
                "-movflags",
                "+faststart",
                "-vf",
            ]
            .into_iter()
            .map(OsString::from),
        );
        args.push(format!("scale={}:-2", self.config.output_width).into());
        args.push(job.output.clone().into_os_string());
        args
    }
}

#[async_trait]
impl VideoEncoder for FfmpegEncoder {
    async fn encode(&self, job: &EncodeJob) -> Result<(), EncoderError> {
        let start_time = Instant::now();

        tracing::info!(
            binary = %self.config.binary.display(),
            image = %job.image.display(),
            audio = %job.audio.display(),
            output = %job.output.display(),
            "Starting encoder"
        );

        let child = Command::new(&self.config.binary)
            .args(self.build_args(job))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                tracing::error!(error = %e, binary = %self.config.binary.display(), "Encoder spawn failed");
                EncoderError::Spawn(e.to_string())
            })?;

        // Dropping the future on timeout drops the child, which kills it
        let output = match tokio::time::timeout(self.config.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(EncoderError::Spawn(e.to_string())),
            Err(_) => {
                tracing::error!(timeout_secs = self.config.timeout.as_secs(), "Encoder timed out");
                return Err(EncoderError::Timeout(self.config.timeout));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let diagnostic = tail(stderr.trim(), MAX_DIAGNOSTIC_LEN).to_string();
            tracing::error!(
                status = %output.status,
                diagnostic = %diagnostic,
                "Encoder failed"
            );
            return Err(EncoderError::Failed {
                status: output.status.to_string(),
                diagnostic,
            });
        }

        tracing::info!(
            latency_ms = start_time.elapsed().as_millis(),
            output = %job.output.display(),
            "Encoder finished"
        );

        Ok(())
    }

    async fn is_available(&self) -> bool {
        let probe = Command::new(&self.config.binary)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status();

        matches!(
            tokio::time::timeout(Duration::from_secs(5), probe).await,
            Ok(Ok(status)) if status.success()
        )
    }
}

/// Last `max` bytes of `text`, cut on a char boundary
fn tail(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut start = text.len() - max;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..]
}
