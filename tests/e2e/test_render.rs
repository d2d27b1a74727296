use crate::e2e::helpers;

use helpers::api_client::FormPart;
use helpers::fake_encoder::{CORRUPT_MARKER, FAKE_VIDEO};
use helpers::{fixtures, TestContext};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_render_inline_image_and_audio(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/render",
            &json!({
                "imageUrl": fixtures::png_data_uri(),
                "audioUrl": fixtures::wav_data_uri()
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let video = fixtures::decode_data_uri(response.field("videoUrl"), "video/mp4");
    assert_eq!(video, FAKE_VIDEO);

    ctx.assert_no_working_directories();
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_invoke_encoder_with_still_image_settings(ctx: &TestContext) {
    ctx.client
        .post(
            "/api/render",
            &json!({
                "imageUrl": fixtures::png_data_uri(),
                "audioUrl": fixtures::wav_data_uri()
            }),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let args = ctx.encoder_args();
    let flags: Vec<&str> = args
        .iter()
        .map(String::as_str)
        .filter(|a| !a.starts_with('/'))
        .collect();
    assert_eq!(
        flags,
        vec![
            "-y", "-hide_banner", "-loglevel", "error",
            "-loop", "1", "-i",
            "-i",
            "-c:v", "libx264", "-tune", "stillimage",
            "-c:a", "aac", "-b:a", "192k",
            "-pix_fmt", "yuv420p",
            "-shortest",
            "-movflags", "+faststart",
            "-vf", "scale=1280:-2",
        ]
    );
    assert!(args[7].ends_with("/image.png"), "image input: {}", args[7]);
    assert!(args[9].ends_with("/audio.wav"), "audio input: {}", args[9]);
    assert!(args.last().unwrap().ends_with("/out.mp4"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_render_remote_image(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/render",
            &json!({
                "imageUrl": format!("{}/images/still.png", ctx.voicevox_url),
                "audioUrl": fixtures::wav_data_uri()
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let video = fixtures::decode_data_uri(response.field("videoUrl"), "video/mp4");
    assert_eq!(video, FAKE_VIDEO);

    ctx.assert_no_working_directories();
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_render_uploaded_image(ctx: &TestContext) {
    let png = fixtures::png_bytes();
    let audio_url = fixtures::wav_data_uri();

    let response = ctx
        .client
        .post_multipart(
            "/api/render",
            &[
                FormPart::File {
                    name: "image",
                    filename: "still.png",
                    content_type: "image/png",
                    data: &png,
                },
                FormPart::Text("audioUrl", &audio_url),
            ],
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let video = fixtures::decode_data_uri(response.field("videoUrl"), "video/mp4");
    assert_eq!(video, FAKE_VIDEO);

    // Same encoder contract as the JSON variant
    let args = ctx.encoder_args();
    assert!(args.contains(&"scale=1280:-2".to_string()));
    assert!(args.contains(&"-shortest".to_string()));

    ctx.assert_no_working_directories();
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_feed_synthesized_audio_into_render(ctx: &TestContext) {
    let tts = ctx
        .client
        .post("/api/tts", &json!({ "text": "Hello, this is a test." }))
        .await
        .unwrap();
    tts.assert_status(StatusCode::OK);

    let response = ctx
        .client
        .post(
            "/api/render",
            &json!({
                "imageUrl": fixtures::png_data_uri(),
                "audioUrl": tts.field("audioUrl")
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert!(response.field("videoUrl").starts_with("data:video/mp4;base64,"));
    ctx.assert_no_working_directories();
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_remote_audio(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/render",
            &json!({
                "imageUrl": fixtures::png_data_uri(),
                "audioUrl": "http://example.com/narration.wav"
            }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("audioUrl must be an inline data URI");
    assert!(response.body.as_ref().unwrap().get("videoUrl").is_none());
    ctx.assert_no_working_directories();
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_unreachable_image_host(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/render",
            &json!({
                "imageUrl": "http://127.0.0.1:1/still.png",
                "audioUrl": fixtures::wav_data_uri()
            }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_error_message("failed to fetch image");
    ctx.assert_no_working_directories();
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_missing_remote_image(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/render",
            &json!({
                "imageUrl": format!("{}/images/missing.png", ctx.voicevox_url),
                "audioUrl": fixtures::wav_data_uri()
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_GATEWAY);
    assert_eq!(response.message(), "failed to fetch image: 404");
    ctx.assert_no_working_directories();
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_surface_encoder_diagnostics(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/render",
            &json!({
                "imageUrl": fixtures::png_data_uri(),
                "audioUrl": fixtures::data_uri("audio/wav", CORRUPT_MARKER.as_bytes())
            }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("Invalid data found when processing input");
    ctx.assert_no_working_directories();
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_both_json_fields(ctx: &TestContext) {
    let bodies = [
        json!({ "audioUrl": fixtures::wav_data_uri() }),
        json!({ "imageUrl": fixtures::png_data_uri() }),
        json!({ "imageUrl": "", "audioUrl": fixtures::wav_data_uri() }),
        json!({}),
    ];

    for body in bodies {
        ctx.client
            .post("/api/render", &body)
            .await
            .unwrap()
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_error_message("imageUrl and audioUrl required");
    }

    ctx.assert_no_working_directories();
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_both_multipart_fields(ctx: &TestContext) {
    let png = fixtures::png_bytes();

    let response = ctx
        .client
        .post_multipart(
            "/api/render",
            &[FormPart::File {
                name: "image",
                filename: "still.png",
                content_type: "image/png",
                data: &png,
            }],
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("image and audioUrl required");

    let wav_url = fixtures::wav_data_uri();
    let response = ctx
        .client
        .post_multipart("/api/render", &[FormPart::Text("audioUrl", &wav_url)])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("image and audioUrl required");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unsupported_image_schemes(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/render",
            &json!({
                "imageUrl": "file:///etc/hosts",
                "audioUrl": fixtures::wav_data_uri()
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    ctx.assert_no_working_directories();
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_undecodable_inline_audio(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/render",
            &json!({
                "imageUrl": fixtures::png_data_uri(),
                "audioUrl": "data:audio/wav;base64,%%%"
            }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("audioUrl");
    ctx.assert_no_working_directories();
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_isolate_concurrent_renders(ctx: &TestContext) {
    let body = json!({
        "imageUrl": fixtures::png_data_uri(),
        "audioUrl": fixtures::wav_data_uri()
    });

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let client = ctx.client.clone();
            let body = body.clone();
            tokio::spawn(async move { client.post("/api/render", &body).await })
        })
        .collect();

    for handle in handles {
        handle
            .await
            .unwrap()
            .unwrap()
            .assert_status(StatusCode::OK);
    }
    ctx.assert_no_working_directories();
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_accept_json_sent_as_plain_text(ctx: &TestContext) {
    // Unpadded base64, as some browser encoders produce it
    let audio_url = fixtures::wav_data_uri().trim_end_matches('=').to_string();
    let body = json!({
        "imageUrl": fixtures::png_data_uri(),
        "audioUrl": audio_url
    })
    .to_string();

    let response = ctx
        .client
        .post_raw("/api/render", "text/plain;charset=UTF-8", body)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let video = fixtures::decode_data_uri(response.field("videoUrl"), "video/mp4");
    assert_eq!(video, FAKE_VIDEO);
    ctx.assert_no_working_directories();
}
