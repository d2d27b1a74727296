use crate::error::AppError;
use crate::infrastructure::encoder::EncoderError;

#[derive(Debug, thiserror::Error)]
pub enum RenderServiceError {
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    Fetch(String),
    #[error(transparent)]
    Encoder(#[from] EncoderError),
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<RenderServiceError> for AppError {
    fn from(err: RenderServiceError) -> Self {
        match err {
            RenderServiceError::Invalid(msg) => AppError::BadRequest(msg),
            RenderServiceError::Fetch(msg) => AppError::BadGateway(msg),
            RenderServiceError::Encoder(e) => AppError::Encoder(e.to_string()),
            RenderServiceError::Io(e) => AppError::Internal(format!("storage error: {}", e)),
            RenderServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
