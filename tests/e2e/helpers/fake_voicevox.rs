use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use super::fixtures;

/// Which backend phase should answer with an error
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FailPhase {
    AudioQuery,
    Synthesis,
}

/// In-process stand-in for the VOICEVOX engine.
///
/// Also serves `/images/<name>` so remote image sources can be exercised.
#[derive(Default)]
pub struct FakeVoicevox {
    pub query_calls: Mutex<Vec<HashMap<String, String>>>,
    pub synthesis_calls: Mutex<Vec<(HashMap<String, String>, Value)>>,
    pub fail_phase: Mutex<Option<FailPhase>>,
}

impl FakeVoicevox {
    /// Start the fake on an ephemeral port and return its base URL
    pub async fn start() -> (Arc<Self>, String) {
        let fake = Arc::new(Self::default());

        let app = Router::new()
            .route("/audio_query", post(audio_query))
            .route("/synthesis", post(synthesis))
            .route("/version", get(|| async { Json("0.14.0") }))
            .route("/images/:name", get(image))
            .with_state(fake.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake VOICEVOX");
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (fake, base_url)
    }

    pub fn fail(&self, phase: FailPhase) {
        *self.fail_phase.lock().unwrap() = Some(phase);
    }

    pub fn backend_calls(&self) -> usize {
        self.query_calls.lock().unwrap().len() + self.synthesis_calls.lock().unwrap().len()
    }

    fn failing(&self, phase: FailPhase) -> bool {
        *self.fail_phase.lock().unwrap() == Some(phase)
    }
}

async fn audio_query(
    State(fake): State<Arc<FakeVoicevox>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    fake.query_calls.lock().unwrap().push(params.clone());

    if fake.failing(FailPhase::AudioQuery) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":"speaker not found"}"#,
        )
            .into_response();
    }

    Json(json!({
        "accent_phrases": [],
        "speedScale": 1.0,
        "pitchScale": 0.0,
        "intonationScale": 1.0,
        "volumeScale": 1.0,
        "prePhonemeLength": 0.1,
        "postPhonemeLength": 0.1,
        "outputSamplingRate": 24000,
        "outputStereo": false,
        "kana": params.get("text").cloned().unwrap_or_default()
    }))
    .into_response()
}

async fn synthesis(
    State(fake): State<Arc<FakeVoicevox>>,
    Query(params): Query<HashMap<String, String>>,
    Json(query): Json<Value>,
) -> impl IntoResponse {
    fake.synthesis_calls.lock().unwrap().push((params, query));

    if fake.failing(FailPhase::Synthesis) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error: engine crashed")
            .into_response();
    }

    ([("content-type", "audio/wav")], fixtures::wav_bytes()).into_response()
}

async fn image(Path(name): Path<String>) -> impl IntoResponse {
    match name.as_str() {
        "still.png" => ([("content-type", "image/png")], fixtures::png_bytes()).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}
