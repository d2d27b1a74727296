pub mod render;
pub mod shared;
pub mod tts;
