//! One-shot flow tests against an in-process backend: upload/analyze, the
//! three-step legacy flow, question generation, STAR rewriting and
//! scorecard download.

mod mock_backend;

use chrono::NaiveDate;
use hiresense_client::ApiClient;
use hiresense_core::forms::{
    analyze_text, download_scorecard, generate_questions, scorecard_failure_message,
    submit_job_description, upload_resume, ANALYZE_FAILED_MESSAGE,
    SCORECARD_DOWNLOAD_FAILED_MESSAGE,
};
use hiresense_core::{
    endpoints, HireSenseError, InterviewContext, MissingKeyword, ResumeDocument, StarRewriter,
    UploadForm, ValidationError, CONNECT_FAILED_MESSAGE,
};
use hiresense_report::{MarkdownGenerator, Report};
use mock_backend::{MockState, FAILING_BULLET, REWRITE_FAILURE_DETAIL, REWRITTEN};

fn client_for(url: &str) -> ApiClient {
    ApiClient::new(url, None).expect("client")
}

#[tokio::test]
async fn test_upload_form_sends_multipart_and_keeps_response() {
    let mock = mock_backend::spawn(MockState::default()).await;
    let client = client_for(&mock.url);

    let mut form = UploadForm::new();
    form.select_file("jane_doe.pdf", mock_backend::pdf_bytes());
    form.job_description = "Platform Engineer".into();
    let result = form.submit(&client).await.expect("analysis");

    let sent = &mock.state.requests_to(endpoints::START_INTERVIEW)[0].body;
    assert_eq!(sent["file"]["file_name"], "jane_doe.pdf");
    assert_eq!(sent["file"]["content_type"], "application/pdf");
    assert_eq!(sent["file"]["size"], mock_backend::pdf_bytes().len());
    assert_eq!(sent["job_description"], "Platform Engineer");

    assert_eq!(result.job_description, "Platform Engineer");
    assert_eq!(result.response.filename.as_deref(), Some("jane_doe.pdf"));
    assert_eq!(result.questions().len(), 3);

    let analysis = result.analysis();
    assert_eq!(analysis.match_score.value(), 72);
    assert_eq!(analysis.missing_keywords.len(), 2);
    assert_eq!(
        analysis.section_detailed_feedback.keys().collect::<Vec<_>>(),
        ["Summary", "Experience"]
    );
    assert_eq!(analysis.extra["interview_readiness"], "medium");

    let markdown = MarkdownGenerator::new(Report::Analysis(&result)).generate();
    assert!(markdown.contains("**72%**"));
    assert!(markdown.contains("Kubernetes never mentioned"));
}

#[tokio::test]
async fn test_non_pdf_is_rejected_without_a_request() {
    let mock = mock_backend::spawn(MockState::default()).await;
    let client = client_for(&mock.url);

    let mut form = UploadForm::new();
    form.select_file("resume.docx", b"PK\x03\x04 not a pdf".to_vec());
    form.job_description = "Platform Engineer".into();
    let err = form.submit(&client).await.expect_err("not a pdf");

    assert!(matches!(
        err,
        HireSenseError::Validation(ValidationError::NotPdf)
    ));
    assert_eq!(UploadForm::failure_message(&err), "Please upload a PDF file");

    let mut form = UploadForm::new();
    form.select_file("resume.pdf", mock_backend::pdf_bytes());
    let err = form.submit(&client).await.expect_err("missing jd");
    assert!(matches!(
        err,
        HireSenseError::Validation(ValidationError::EmptyJobDescription)
    ));

    assert!(mock.state.requests().is_empty());
}

#[tokio::test]
async fn test_unreachable_backend_shows_generic_analysis_message() {
    let client = client_for(&mock_backend::unreachable_url());

    let mut form = UploadForm::new();
    form.select_file("resume.pdf", mock_backend::pdf_bytes());
    form.job_description = "Platform Engineer".into();
    let err = form.submit(&client).await.expect_err("unreachable");

    assert!(matches!(err, HireSenseError::Transport { .. }));
    assert_eq!(UploadForm::failure_message(&err), ANALYZE_FAILED_MESSAGE);
}

#[tokio::test]
async fn test_legacy_three_step_flow() {
    let mock = mock_backend::spawn(MockState::default()).await;
    let client = client_for(&mock.url);

    let resume =
        ResumeDocument::from_bytes("jane_doe.pdf", mock_backend::pdf_bytes()).expect("pdf");
    let upload = upload_resume(&client, &resume).await.expect("upload");
    assert_eq!(upload.filename, "jane_doe.pdf");

    let jd = submit_job_description(&client, "  Platform Engineer  ")
        .await
        .expect("jd");
    assert_eq!(jd, "Platform Engineer");

    let analysis = analyze_text(&client, &upload.resume_text, &jd)
        .await
        .expect("analysis");
    assert_eq!(analysis.match_score.value(), 58);
    assert_eq!(analysis.missing_keywords[0], MissingKeyword::plain("Kubernetes"));
    assert_eq!(analysis.section_feedback.skills, "List cloud tooling");

    let sent = &mock.state.requests_to(endpoints::ANALYZE)[0].body;
    assert_eq!(sent["job_description"], "Platform Engineer");
    assert!(sent["resume_text"]
        .as_str()
        .is_some_and(|t| t.starts_with("Jane Doe")));

    let err = analyze_text(&client, " ", &jd).await.expect_err("empty text");
    assert!(err.is_client_side());
    assert_eq!(mock.state.requests_to(endpoints::ANALYZE).len(), 1);
}

#[tokio::test]
async fn test_generate_questions_sends_count() {
    let mock = mock_backend::spawn(MockState::default()).await;
    let client = client_for(&mock.url);
    let context = InterviewContext {
        resume_text: "Jane Doe".into(),
        job_description: "Platform Engineer".into(),
        ..InterviewContext::default()
    };

    let generated = generate_questions(&client, &context, 4).await.expect("questions");
    assert_eq!(generated.total, 4);
    assert_eq!(generated.questions.len(), 4);
    assert_eq!(
        mock.state.requests_to(endpoints::GENERATE_QUESTIONS)[0].body["question_count"],
        4
    );

    assert!(generate_questions(&client, &context, 0).await.is_err());
    assert!(generate_questions(&client, &context, 21).await.is_err());
    assert_eq!(mock.state.requests_to(endpoints::GENERATE_QUESTIONS).len(), 1);
}

#[tokio::test]
async fn test_star_rewrite_is_rendered_verbatim() {
    let mock = mock_backend::spawn(MockState::default()).await;
    let client = client_for(&mock.url);

    let mut rewriter = StarRewriter::new("Platform Engineer");
    rewriter.bullet = "Worked on billing".into();
    let result = rewriter.rewrite(&client).await.expect("rewrite").clone();

    assert_eq!(result.rewritten, REWRITTEN);
    assert_eq!(result.impact_score_improvement.map(|s| s.value()), Some(35));
    assert_eq!(result.keywords_added, ["Rust", "Kafka"]);
    assert!(rewriter.error().is_none());

    let sent = &mock.state.requests_to(endpoints::STAR_REWRITE)[0].body;
    assert_eq!(sent["original_bullet"], "Worked on billing");
    assert_eq!(sent["job_description"], "Platform Engineer");
    assert_eq!(sent["resume_context"], "");

    let markdown = MarkdownGenerator::new(Report::StarRewrite(&result)).generate();
    assert!(markdown.contains(REWRITTEN));
    assert!(markdown.contains("38% fewer failed charges"));

    rewriter.reset();
    assert!(rewriter.result().is_none());
    assert!(rewriter.bullet.is_empty());
    assert_eq!(rewriter.job_description, "Platform Engineer");
}

#[tokio::test]
async fn test_star_rewrite_surfaces_backend_detail() {
    let mock = mock_backend::spawn(MockState::default()).await;
    let client = client_for(&mock.url);

    let mut rewriter = StarRewriter::new("Platform Engineer");
    rewriter.bullet = FAILING_BULLET.into();
    let err = rewriter.rewrite(&client).await.expect_err("backend failure");

    match &err {
        HireSenseError::Http { status, detail, .. } => {
            assert_eq!(*status, 500);
            assert_eq!(detail.as_deref(), Some(REWRITE_FAILURE_DETAIL));
        }
        other => panic!("expected Http error, got {other:?}"),
    }
    assert_eq!(rewriter.error(), Some(REWRITE_FAILURE_DETAIL));
    assert!(rewriter.result().is_none());
}

#[tokio::test]
async fn test_star_rewrite_without_backend() {
    let client = client_for(&mock_backend::unreachable_url());

    let mut rewriter = StarRewriter::new("Platform Engineer");
    rewriter.bullet = "Worked on billing".into();
    assert!(rewriter.rewrite(&client).await.is_err());
    assert_eq!(rewriter.error(), Some(CONNECT_FAILED_MESSAGE));

    let mut rewriter = StarRewriter::new("");
    rewriter.bullet = "Worked on billing".into();
    assert!(rewriter.rewrite(&client).await.is_err());
    assert_eq!(
        rewriter.error(),
        Some(ValidationError::JobDescriptionRequired.to_string().as_str())
    );
}

#[tokio::test]
async fn test_scorecard_is_saved_with_dated_name() {
    let mock = mock_backend::spawn(MockState::default()).await;
    let client = client_for(&mock.url);

    let mut form = UploadForm::new();
    form.select_file("jane_doe.pdf", mock_backend::pdf_bytes());
    form.job_description = "Platform Engineer".into();
    let result = form.submit(&client).await.expect("analysis");

    let date = NaiveDate::from_ymd_opt(2026, 3, 9).expect("date");
    let pdf = download_scorecard(&client, result.analysis(), "  ", None, date)
        .await
        .expect("scorecard");
    assert_eq!(pdf.file_name, "HireSense_Scorecard_2026-03-09.pdf");
    assert!(pdf.bytes.starts_with(b"%PDF-"));

    let sent = &mock.state.requests_to(endpoints::GENERATE_SCORECARD)[0].body;
    assert_eq!(sent["candidate_name"], "Candidate");
    assert_eq!(sent["analysis"], mock_backend::analysis());
    assert_eq!(
        serde_json::to_string(result.analysis()).expect("serialize"),
        serde_json::to_string(&mock_backend::analysis()).expect("serialize")
    );

    let dir = std::env::temp_dir().join(format!("hiresense-scorecard-{}", std::process::id()));
    let path = pdf.save(&dir).expect("save");
    assert_eq!(std::fs::read(&path).expect("read back"), &pdf.bytes[..]);
    std::fs::remove_dir_all(&dir).expect("cleanup");
}

#[tokio::test]
async fn test_scorecard_transport_failure_message() {
    let client = client_for(&mock_backend::unreachable_url());
    let date = NaiveDate::from_ymd_opt(2026, 3, 9).expect("date");

    let err = download_scorecard(&client, &Default::default(), "Jane", None, date)
        .await
        .expect_err("unreachable");
    assert_eq!(
        scorecard_failure_message(&err),
        SCORECARD_DOWNLOAD_FAILED_MESSAGE
    );
}
