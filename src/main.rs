use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use narrator_backend::controllers::{health::Readiness, render::RenderController, tts::TtsController};
use narrator_backend::domain::{render::RenderService, tts::TtsService};
use narrator_backend::infrastructure::config::{Config, LogFormat};
use narrator_backend::infrastructure::encoder::{EncoderConfig, FfmpegEncoder};
use narrator_backend::infrastructure::http::start_http_server;
use narrator_backend::infrastructure::repositories::{HttpAssetRepository, VoicevoxTtsRepository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Narrator Backend on {}:{}",
        config.host,
        config.port
    );
    tracing::info!(
        voicevox_base_url = %config.voicevox_base_url,
        ffmpeg_path = %config.ffmpeg_path.display(),
        work_dir = %config.work_dir.display(),
        max_body_bytes = config.max_body_bytes,
        "Configuration loaded"
    );

    tokio::fs::create_dir_all(&config.work_dir).await?;

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories and the encoder
    tracing::info!("Instantiating repositories...");
    let tts_repo = Arc::new(VoicevoxTtsRepository::new(
        config.voicevox_base_url.clone(),
        Duration::from_secs(config.tts_backend_timeout_secs),
    )?);
    let asset_repo = Arc::new(HttpAssetRepository::new(
        Duration::from_secs(config.image_fetch_timeout_secs),
        config.max_body_bytes,
    )?);
    let encoder = Arc::new(FfmpegEncoder::new(EncoderConfig {
        binary: config.ffmpeg_path.clone(),
        timeout: Duration::from_secs(config.encoder_timeout_secs),
        ..EncoderConfig::default()
    }));

    // 2. Instantiate services (inject repositories and encoder)
    tracing::info!("Instantiating services...");
    let tts_service = Arc::new(TtsService::new(tts_repo.clone()));
    let render_service = Arc::new(RenderService::new(
        asset_repo,
        encoder.clone(),
        config.work_dir.clone(),
    ));

    // 3. Instantiate controllers (inject services)
    tracing::info!("Instantiating controllers...");
    let tts_controller = Arc::new(TtsController::new(tts_service));
    let render_controller = Arc::new(RenderController::new(render_service));
    let readiness = Arc::new(Readiness::new(encoder, tts_repo));

    // Start HTTP server with all routes
    start_http_server(config, tts_controller, render_controller, readiness).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "narrator_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "narrator_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
