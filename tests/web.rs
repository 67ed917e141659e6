//! Integration tests for the classifier web page.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use candle_core::Device;
use http_body_util::BodyExt;
use imdb_sentiment::error::{PipelineError, Result};
use imdb_sentiment::sentiment::{Label, SentimentModel, SentimentPipeline, Vocabulary};
use imdb_sentiment::web::{self, AppState, SAMPLE_REVIEWS};
use tower::ServiceExt;

/// Positive whenever one chosen word index appears in the encoded review.
struct KeywordModel {
    good_index: u32,
    calls: AtomicUsize,
    device: Device,
}

impl SentimentModel for KeywordModel {
    fn probability(&self, input_ids: &[u32]) -> Result<f32> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if input_ids.contains(&self.good_index) {
            Ok(0.912_345)
        } else {
            Ok(0.123_456)
        }
    }

    fn device(&self) -> &Device {
        &self.device
    }
}

/// Always fails, to exercise the error path.
struct BrokenModel {
    device: Device,
}

impl SentimentModel for BrokenModel {
    fn probability(&self, _input_ids: &[u32]) -> Result<f32> {
        Err(PipelineError::Unexpected("forward pass exploded".into()))
    }

    fn device(&self) -> &Device {
        &self.device
    }
}

fn vocabulary() -> Vocabulary {
    // "storyline" -> 5_000 + 3
    Vocabulary::new([("storyline", 5_000), ("stunning", 1_640), ("boring", 354)]).unwrap()
}

fn keyword_state() -> Arc<AppState<KeywordModel>> {
    let model = KeywordModel {
        good_index: 5_003,
        calls: AtomicUsize::new(0),
        device: Device::Cpu,
    };
    let pipeline = SentimentPipeline::new(model, vocabulary());
    Arc::new(AppState::new(pipeline).unwrap())
}

fn model_calls(state: &AppState<KeywordModel>) -> usize {
    state.pipeline.model().calls.load(Ordering::SeqCst)
}

async fn body_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn classify_request(form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/classify")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

// ========== Index Tests ==========

#[tokio::test]
async fn test_index_shows_form_and_examples() {
    let app = web::router(keyword_state());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response.into_body()).await;
    assert!(html.contains("IMDB Movie Review Classifier"));
    assert!(html.contains("name=\"review\""));
    assert!(html.contains("Example Reviews and Predictions"));
    for i in 1..=SAMPLE_REVIEWS.len() {
        assert!(html.contains(&format!("Review {i}")));
    }
    assert!(!html.contains("Prediction: Positive"));
}

#[tokio::test]
async fn test_examples_are_precomputed_once() {
    let state = keyword_state();
    assert_eq!(state.samples.len(), 5);
    assert_eq!(state.samples[0].number, 1);
    assert_eq!(state.samples[0].prediction.label, Label::Positive);
    assert_eq!(state.samples[1].prediction.label, Label::Negative);
    assert_eq!(model_calls(&state), SAMPLE_REVIEWS.len());

    let app = web::router(Arc::clone(&state));
    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = body_string(response.into_body()).await;
        assert!(html.contains("Confidence 0.912"));
        assert!(html.contains("Confidence 0.123"));
    }
    assert_eq!(model_calls(&state), SAMPLE_REVIEWS.len());
}

// ========== Classify Tests ==========

#[tokio::test]
async fn test_classify_positive_review() {
    let app = web::router(keyword_state());

    let response = app
        .oneshot(classify_request("review=A+great+storyline"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response.into_body()).await;
    assert!(html.contains("Prediction: Positive"));
    assert!(html.contains("Confidence: 0.9123"));
    assert!(html.contains("#00C851"));
    assert!(html.contains("A great storyline"));
}

#[tokio::test]
async fn test_classify_negative_review() {
    let app = web::router(keyword_state());

    let response = app
        .oneshot(classify_request("review=So+boring"))
        .await
        .unwrap();

    let html = body_string(response.into_body()).await;
    assert!(html.contains("Prediction: Negative"));
    assert!(html.contains("Confidence: 0.1235"));
    assert!(html.contains("#ff4444"));
}

#[tokio::test]
async fn test_blank_review_warns_without_inference() {
    let state = keyword_state();
    let calls_before = model_calls(&state);
    let app = web::router(Arc::clone(&state));

    let response = app
        .oneshot(classify_request("review=+++%0A%09"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response.into_body()).await;
    assert!(html.contains("Please write a review to classify."));
    assert!(!html.contains("Prediction: "));
    assert_eq!(model_calls(&state), calls_before);
}

#[tokio::test]
async fn test_control_separator_review_is_blank() {
    let state = keyword_state();
    let calls_before = model_calls(&state);
    let app = web::router(Arc::clone(&state));

    let response = app
        .oneshot(classify_request("review=%1F%1C+%1E"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response.into_body()).await;
    assert!(html.contains("Please write a review to classify."));
    assert_eq!(model_calls(&state), calls_before);
}

#[tokio::test]
async fn test_missing_field_treated_as_blank() {
    let app = web::router(keyword_state());

    let response = app.oneshot(classify_request("")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response.into_body()).await;
    assert!(html.contains("Please write a review to classify."));
}

#[tokio::test]
async fn test_review_is_escaped() {
    let app = web::router(keyword_state());

    let response = app
        .oneshot(classify_request("review=%3Cscript%3Ealert(1)%3C%2Fscript%3E"))
        .await
        .unwrap();

    let html = body_string(response.into_body()).await;
    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(html.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn test_inference_failure_renders_error() {
    let model = KeywordModel {
        good_index: 5_003,
        calls: AtomicUsize::new(0),
        device: Device::Cpu,
    };
    let samples = AppState::new(SentimentPipeline::new(model, vocabulary()))
        .unwrap()
        .samples;
    let state = Arc::new(AppState {
        pipeline: SentimentPipeline::new(
            BrokenModel {
                device: Device::Cpu,
            },
            vocabulary(),
        ),
        samples,
    });
    let app = web::router(state);

    let response = app
        .oneshot(classify_request("review=anything"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let html = body_string(response.into_body()).await;
    assert!(html.contains("Could not classify the review"));
    assert!(html.contains("forward pass exploded"));
}

#[test]
fn test_broken_model_fails_startup() {
    let pipeline = SentimentPipeline::new(
        BrokenModel {
            device: Device::Cpu,
        },
        vocabulary(),
    );
    assert!(AppState::new(pipeline).is_err());
}

