//! In-process mock of the HireSense backend.
//!
//! Every request is recorded so tests can assert on what the client sent
//! (and on what it did not send).

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

/// Questions returned by the mock start-interview endpoint.
pub const QUESTIONS: [&str; 3] = [
    "Tell me about a system you scaled.",
    "How do you approach code review?",
    "Describe a production incident you handled.",
];

/// Rewritten bullet returned by the mock STAR endpoint.
pub const REWRITTEN: &str =
    "Led a team of 4 engineers (Rust, Kafka) to rebuild billing, cutting failed charges 38%";

/// Bullet that makes the mock STAR endpoint fail.
pub const FAILING_BULLET: &str = "explode";

/// Detail sent back when the STAR endpoint fails.
pub const REWRITE_FAILURE_DETAIL: &str = "STAR rewrite failed: model unavailable";

/// A request the mock received.
#[derive(Debug, Clone)]
pub struct Recorded {
    /// Endpoint path.
    pub path: &'static str,
    /// JSON body, or the text fields of a multipart body.
    pub body: Value,
}

/// Behaviour switches and request log.
#[derive(Default)]
pub struct MockState {
    /// Every request received, in arrival order.
    pub requests: Mutex<Vec<Recorded>>,
    /// Number of evaluate-answer calls so far.
    pub evaluations: AtomicUsize,
    /// Zero-based evaluation calls that answer 500.
    pub failing_evaluations: Vec<usize>,
    /// Whether complete-interview answers 500.
    pub fail_summary: bool,
}

impl MockState {
    fn record(&self, path: &'static str, body: Value) {
        self.requests
            .lock()
            .expect("request log poisoned")
            .push(Recorded { path, body });
    }

    /// Returns every recorded request.
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("request log poisoned").clone()
    }

    /// Returns the recorded requests for `path`.
    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

/// A running mock backend.
pub struct MockBackend {
    /// Base URL to point the client at.
    pub url: String,
    /// Shared state.
    pub state: Arc<MockState>,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Starts a mock backend on an ephemeral port.
pub async fn spawn(state: MockState) -> MockBackend {
    let state = Arc::new(state);
    let router = Router::new()
        .route("/api/resume/upload", post(upload))
        .route("/api/jd/submit", post(submit_jd))
        .route("/api/analyze", post(analyze))
        .route("/api/interview/start-interview", post(start_interview))
        .route("/api/interview/generate-questions", post(generate_questions))
        .route("/api/interview/evaluate-answer", post(evaluate_answer))
        .route("/api/interview/complete-interview", post(complete_interview))
        .route("/api/rewriter/star-rewrite", post(star_rewrite))
        .route("/api/rewriter/generate-scorecard", post(generate_scorecard))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get local addr");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server failed");
    });

    MockBackend {
        url: format!("http://{addr}"),
        state,
        handle,
    }
}

/// Returns a base URL where nothing is listening.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let port = listener.local_addr().expect("Failed to get local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// A minimal PDF body.
pub fn pdf_bytes() -> Vec<u8> {
    b"%PDF-1.4\n1 0 obj << /Type /Catalog >> endobj\n%%EOF".to_vec()
}

fn error(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

/// Collects the text fields and the file name of a multipart body.
async fn read_multipart(mut multipart: Multipart) -> Value {
    let mut fields = serde_json::Map::new();
    while let Some(field) = multipart.next_field().await.expect("bad multipart") {
        let name = field.name().unwrap_or_default().to_string();
        if let Some(file_name) = field.file_name().map(ToString::to_string) {
            let content_type = field.content_type().unwrap_or_default().to_string();
            let data = field.bytes().await.expect("bad file part");
            fields.insert(
                name,
                json!({ "file_name": file_name, "content_type": content_type, "size": data.len() }),
            );
        } else {
            let text = field.text().await.expect("bad text part");
            fields.insert(name, Value::String(text));
        }
    }
    Value::Object(fields)
}

/// Analysis document returned by start-interview, as raw text so key order
/// and number formatting reach the client untouched.
pub const ANALYSIS_JSON: &str = r#"{
    "match_score": 72.4,
    "overall_assessment": "Strong backend engineer; infrastructure depth is thin.",
    "why_not_passing": {
        "main_reasons": ["Kubernetes never mentioned"],
        "ats_perspective": "Keyword filters drop this resume for platform roles."
    },
    "missing_keywords": [
        {"keyword": "Kubernetes", "importance": "critical", "why_matters": "Core of the platform"},
        "Terraform"
    ],
    "gap_analysis": {
        "experience_gaps": "No on-call ownership",
        "skills_gaps": "Container orchestration",
        "qualification_gaps": "None"
    },
    "section_detailed_feedback": {
        "Summary": {"current_state": "Generic", "problem": "No focus", "impact": "Skimmed"},
        "Experience": {"current_state": "Duties", "problem": "No metrics", "impact": "Undersold"}
    },
    "actionable_next_steps": [],
    "interview_readiness": "medium"
}"#;

/// Parses [`ANALYSIS_JSON`].
pub fn analysis() -> Value {
    serde_json::from_str(ANALYSIS_JSON).expect("valid analysis fixture")
}

async fn upload(State(state): State<Arc<MockState>>, multipart: Multipart) -> Response {
    let body = read_multipart(multipart).await;
    let file_name = body["file"]["file_name"].as_str().unwrap_or_default().to_string();
    state.record("/api/resume/upload", body);
    Json(json!({
        "filename": file_name,
        "resume_text": "Jane Doe\nSenior Backend Engineer\nRust, Go, Postgres"
    }))
    .into_response()
}

async fn submit_jd(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    let text = body["job_description"].as_str().unwrap_or_default().trim().to_string();
    state.record("/api/jd/submit", body);
    Json(json!({ "cleaned_job_description": text })).into_response()
}

async fn analyze(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.record("/api/analyze", body);
    Json(json!({
        "match_score": 58,
        "missing_keywords": ["Kubernetes", "Terraform"],
        "section_feedback": {
            "Summary": "Lead with platform work",
            "Experience": "Add numbers",
            "Skills": "List cloud tooling"
        }
    }))
    .into_response()
}

async fn start_interview(State(state): State<Arc<MockState>>, multipart: Multipart) -> Response {
    let body = read_multipart(multipart).await;
    let file_name = body["file"]["file_name"].as_str().unwrap_or_default().to_string();
    state.record("/api/interview/start-interview", body);
    Json(json!({
        "resume_text": "Jane Doe\nSenior Backend Engineer",
        "filename": file_name,
        "analysis": analysis(),
        "interview": {
            "questions": QUESTIONS,
            "focus_areas": [{"keyword": "Kubernetes", "importance": "critical"}]
        }
    }))
    .into_response()
}

async fn generate_questions(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> Response {
    let count = usize::try_from(body["question_count"].as_u64().unwrap_or(5)).unwrap_or(5);
    state.record("/api/interview/generate-questions", body);
    let questions: Vec<String> = (1..=count).map(|i| format!("Generated question {i}")).collect();
    Json(json!({
        "questions": questions,
        "total": count,
        "focus_areas": ["Kubernetes"]
    }))
    .into_response()
}

async fn evaluate_answer(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    let call = state.evaluations.fetch_add(1, Ordering::SeqCst);
    state.record("/api/interview/evaluate-answer", body);
    if state.failing_evaluations.contains(&call) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Evaluation failed");
    }
    Json(json!({
        "score": 81.6,
        "suggestion": "Quantify the impact.",
        "strengths": ["Concrete example"]
    }))
    .into_response()
}

async fn complete_interview(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> Response {
    state.record("/api/interview/complete-interview", body);
    if state.fail_summary {
        return error(StatusCode::BAD_GATEWAY, "Summary unavailable");
    }
    Json(json!({
        "overall_score": 78,
        "strengths": ["Clear communication"],
        "improvements": ["Use more metrics"],
        "recommendations": ["Practice the STAR method"]
    }))
    .into_response()
}

async fn star_rewrite(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    let original = body["original_bullet"].as_str().unwrap_or_default().to_string();
    state.record("/api/rewriter/star-rewrite", body);
    if original == FAILING_BULLET {
        return error(StatusCode::INTERNAL_SERVER_ERROR, REWRITE_FAILURE_DETAIL);
    }
    Json(json!({
        "original": original,
        "rewritten": REWRITTEN,
        "improvements": {
            "before_issues": ["No metrics"],
            "after_strengths": ["Quantified outcome"]
        },
        "star_breakdown": {
            "situation": "Billing failures were rising",
            "task": "Rebuild the billing pipeline",
            "action": "Led 4 engineers",
            "result": "38% fewer failed charges"
        },
        "impact_score_improvement": 35,
        "keywords_added": ["Rust", "Kafka"]
    }))
    .into_response()
}

async fn generate_scorecard(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> Response {
    state.record("/api/rewriter/generate-scorecard", body);
    (
        [(header::CONTENT_TYPE, "application/pdf")],
        b"%PDF-1.4 scorecard".to_vec(),
    )
        .into_response()
}
