use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum TtsServiceError {
    #[error("{0}")]
    Dependency(String),
    #[error("{0}")]
    Invalid(String),
    #[error("engine '{0}' is not implemented")]
    NotImplemented(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<TtsServiceError> for AppError {
    fn from(err: TtsServiceError) -> Self {
        match err {
            TtsServiceError::Invalid(msg) => AppError::BadRequest(msg),
            TtsServiceError::NotImplemented(_) => AppError::NotImplemented(err.to_string()),
            TtsServiceError::Dependency(msg) => AppError::ExternalService(msg),
            TtsServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
