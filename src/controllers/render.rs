use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request, State},
    http::header,
    Json,
};
use std::sync::Arc;

use crate::{
    domain::render::{
        AudioSource, CompositionRequest, ImageSource, RenderRequest, RenderResponse,
        RenderService, RenderServiceApi,
    },
    error::{AppError, AppResult},
};

pub struct RenderController {
    render_service: Arc<RenderService>,
}

impl RenderController {
    pub fn new(render_service: Arc<RenderService>) -> Self {
        Self { render_service }
    }

    /// POST /api/render - Combine a still image and narration into an MP4
    ///
    /// Accepts `multipart/form-data` with an `image` file and an `audioUrl`
    /// field, or JSON `{ imageUrl, audioUrl }`.
    pub async fn render(
        State(controller): State<Arc<RenderController>>,
        request: Request,
    ) -> AppResult<Json<RenderResponse>> {
        let composition = if is_multipart(&request) {
            Self::from_multipart(request).await?
        } else {
            Self::from_json(request).await?
        };

        let result = controller.render_service.render(composition).await?;

        Ok(Json(RenderResponse {
            video_url: result.video.to_data_uri(),
        }))
    }

    async fn from_multipart(request: Request) -> AppResult<CompositionRequest> {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let mut image = None;
        let mut audio_url = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "image" => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.body_text()))?;
                    image = Some(bytes.to_vec());
                }
                "audioUrl" => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.body_text()))?;
                    audio_url = Some(text);
                }
                other => tracing::debug!(field = other, "Ignoring unknown multipart field"),
            }
        }

        match (image, non_blank(audio_url)) {
            (Some(image), Some(audio_url)) => Ok(CompositionRequest {
                image: ImageSource::Upload(image),
                audio: AudioSource::from_reference(&audio_url)?,
            }),
            _ => Err(AppError::BadRequest("image and audioUrl required".to_string())),
        }
    }

    async fn from_json(request: Request) -> AppResult<CompositionRequest> {
        // Any non-multipart body is read as JSON, whatever its declared content type
        let bytes = Bytes::from_request(request, &())
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        let body: RenderRequest = if bytes.iter().all(u8::is_ascii_whitespace) {
            RenderRequest::default()
        } else {
            serde_json::from_slice(&bytes)
                .map_err(|e| AppError::BadRequest(format!("invalid JSON body: {}", e)))?
        };

        match (non_blank(body.image_url), non_blank(body.audio_url)) {
            (Some(image_url), Some(audio_url)) => Ok(CompositionRequest {
                image: ImageSource::from_reference(&image_url)?,
                audio: AudioSource::from_reference(&audio_url)?,
            }),
            _ => Err(AppError::BadRequest(
                "imageUrl and audioUrl required".to_string(),
            )),
        }
    }
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase().contains("multipart/form-data"))
        .unwrap_or(false)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
