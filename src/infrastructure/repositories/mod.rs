pub mod asset_repository;
pub mod tts_repository;
pub mod voicevox_tts_repository;

pub use asset_repository::{AssetRepository, HttpAssetRepository};
pub use tts_repository::TtsRepository;
pub use voicevox_tts_repository::VoicevoxTtsRepository;
