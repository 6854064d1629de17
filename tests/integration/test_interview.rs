//! End-to-end mock interview tests against an in-process backend.
//!
//! Drives the real `ApiClient` through upload, interview and summary, and
//! checks what the backend actually received.

mod mock_backend;

use hiresense_client::ApiClient;
use hiresense_core::session::{COMPLETION_MESSAGE, EVALUATION_FAILED_MESSAGE, SUMMARY_FAILED_MESSAGE};
use hiresense_core::{
    endpoints, AnswerOutcome, InterviewContext, InterviewDriver, InterviewSession, MessageKind,
    ResumeAnalysis, SessionPhase, UploadForm,
};
use hiresense_report::{json::JsonGenerator, MarkdownGenerator, Report};
use mock_backend::{MockState, QUESTIONS};

async fn analyze(client: &ApiClient) -> ResumeAnalysis {
    let mut form = UploadForm::new();
    form.select_file("jane_doe.pdf", mock_backend::pdf_bytes());
    form.job_description = "Senior Platform Engineer. Kubernetes, Terraform, Rust.".into();
    form.submit(client).await.expect("analysis should succeed")
}

#[tokio::test]
async fn test_failed_evaluation_advances_to_next_question() {
    let mock = mock_backend::spawn(MockState {
        failing_evaluations: vec![0],
        ..MockState::default()
    })
    .await;
    let client = ApiClient::new(&mock.url, None).expect("client");
    let analysis = analyze(&client).await;

    let mut driver = InterviewDriver::from_analysis(&client, &analysis, &[]);
    assert_eq!(driver.start().expect("start"), QUESTIONS[0]);

    let outcome = driver.answer("I led a team of 4").await.expect("answer");
    assert_eq!(outcome, AnswerOutcome::NextQuestion(QUESTIONS[1].to_string()));
    assert_eq!(driver.session().phase(), SessionPhase::AwaitingAnswer { index: 1 });

    let record = &driver.session().answers()[0];
    assert_eq!(record.question, QUESTIONS[0]);
    assert_eq!(record.answer, "I led a team of 4");
    assert!(record.feedback.is_none());

    let warnings: Vec<_> = driver
        .session()
        .messages()
        .iter()
        .filter(|m| m.kind == MessageKind::Warning)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].content, EVALUATION_FAILED_MESSAGE);
}

#[tokio::test]
async fn test_full_interview_sends_every_answer_before_summary() {
    let mock = mock_backend::spawn(MockState {
        failing_evaluations: vec![0],
        ..MockState::default()
    })
    .await;
    let client = ApiClient::new(&mock.url, None).expect("client");
    let analysis = analyze(&client).await;

    let mut driver = InterviewDriver::from_analysis(&client, &analysis, &[]);
    driver.start().expect("start");
    driver.answer("I led a team of 4").await.expect("answer 1");
    driver
        .answer("Small diffs, reviewed within a day")
        .await
        .expect("answer 2");
    let outcome = driver
        .answer("Rolled back a bad migration at 3am")
        .await
        .expect("answer 3");
    assert_eq!(outcome, AnswerOutcome::Finished);

    let session = driver.session();
    assert_eq!(session.phase(), SessionPhase::Done);
    assert_eq!(session.progress_percent(), 100);
    assert_eq!(session.summary().expect("summary").strengths, ["Clear communication"]);
    assert!(session
        .messages()
        .iter()
        .any(|m| m.kind == MessageKind::Completion && m.content == COMPLETION_MESSAGE));

    // Request order: start, three evaluations, one summary.
    let paths: Vec<_> = mock.state.requests().iter().map(|r| r.path).collect();
    assert_eq!(
        paths,
        [
            endpoints::START_INTERVIEW,
            endpoints::EVALUATE_ANSWER,
            endpoints::EVALUATE_ANSWER,
            endpoints::EVALUATE_ANSWER,
            endpoints::COMPLETE_INTERVIEW,
        ]
    );

    let evaluation = &mock.state.requests_to(endpoints::EVALUATE_ANSWER)[0].body;
    assert_eq!(evaluation["question"], QUESTIONS[0]);
    assert_eq!(evaluation["answer"], "I led a team of 4");
    assert_eq!(
        evaluation["job_description"],
        "Senior Platform Engineer. Kubernetes, Terraform, Rust."
    );

    let summary = &mock.state.requests_to(endpoints::COMPLETE_INTERVIEW)[0].body;
    assert_eq!(summary["session_id"], session.session_id.as_str());
    assert_eq!(summary["questions"].as_array().map(Vec::len), Some(3));
    assert_eq!(
        summary["answers"][0],
        serde_json::json!({
            "question": QUESTIONS[0],
            "answer": "I led a team of 4",
            "feedback": null
        })
    );
    assert_eq!(summary["answers"][1]["feedback"]["score"], 82);
    // The analysis goes back exactly as the backend produced it.
    assert_eq!(summary["analysis"], mock_backend::analysis());
    assert_eq!(summary["analysis"]["match_score"], 72.4);
    assert_eq!(summary["analysis"]["missing_keywords"][1], "Terraform");
    assert_eq!(summary["analysis"]["actionable_next_steps"], serde_json::json!([]));
}

#[tokio::test]
async fn test_summary_failure_still_finishes() {
    let mock = mock_backend::spawn(MockState {
        fail_summary: true,
        ..MockState::default()
    })
    .await;
    let client = ApiClient::new(&mock.url, None).expect("client");
    let analysis = analyze(&client).await;

    let mut driver = InterviewDriver::from_analysis(&client, &analysis, &[]);
    driver.start().expect("start");
    for answer in ["One", "Two", "Three"] {
        driver.answer(answer).await.expect("answer");
    }

    let session = driver.session();
    assert_eq!(session.phase(), SessionPhase::Done);
    assert!(session.summary().is_none());
    assert!(session.answers().iter().all(|a| a.feedback.is_some()));
    let last = session.messages().last().expect("messages");
    assert_eq!(last.kind, MessageKind::Error);
    assert_eq!(last.content, SUMMARY_FAILED_MESSAGE);
}

#[tokio::test]
async fn test_unreachable_backend_never_blocks_the_interview() {
    let client = ApiClient::new(mock_backend::unreachable_url(), None).expect("client");
    let context = InterviewContext {
        resume_text: "Jane Doe".into(),
        job_description: "Platform role".into(),
        ..InterviewContext::default()
    };
    let session = InterviewSession::new(vec!["Q1".into(), "Q2".into()]);
    let mut driver = InterviewDriver::new(&client, context, session);

    driver.start().expect("start");
    assert_eq!(
        driver.answer("First").await.expect("answer"),
        AnswerOutcome::NextQuestion("Q2".into())
    );
    assert_eq!(
        driver.answer("Second").await.expect("answer"),
        AnswerOutcome::Finished
    );

    let session = driver.into_session();
    assert_eq!(session.phase(), SessionPhase::Done);
    assert_eq!(session.answers().len(), 2);
    assert!(session.answers().iter().all(|a| a.feedback.is_none()));
}

#[tokio::test]
async fn test_blank_answer_is_not_sent() {
    let mock = mock_backend::spawn(MockState::default()).await;
    let client = ApiClient::new(&mock.url, None).expect("client");
    let analysis = analyze(&client).await;

    let mut driver = InterviewDriver::from_analysis(&client, &analysis, &[]);
    driver.start().expect("start");
    let err = driver.answer("   ").await.expect_err("blank answer");
    assert!(err.is_client_side());
    assert_eq!(driver.session().phase(), SessionPhase::AwaitingAnswer { index: 0 });
    assert!(mock.state.requests_to(endpoints::EVALUATE_ANSWER).is_empty());
}

#[tokio::test]
async fn test_restart_clears_transcript_and_keeps_questions() {
    let mock = mock_backend::spawn(MockState::default()).await;
    let client = ApiClient::new(&mock.url, None).expect("client");
    let analysis = analyze(&client).await;

    let mut driver = InterviewDriver::from_analysis(&client, &analysis, &[]);
    assert!(driver.restart().is_err(), "restart before completion");

    driver.start().expect("start");
    for answer in ["One", "Two", "Three"] {
        driver.answer(answer).await.expect("answer");
    }
    let first_id = driver.session().session_id.clone();

    driver.restart().expect("restart");
    let session = driver.session();
    assert_eq!(session.phase(), SessionPhase::NotStarted);
    assert_ne!(session.session_id, first_id);
    assert!(session.messages().is_empty());
    assert!(session.answers().is_empty());
    assert!(session.summary().is_none());
    assert_eq!(session.questions(), QUESTIONS);

    assert_eq!(driver.start().expect("start again"), QUESTIONS[0]);
}

#[tokio::test]
async fn test_interview_reports_render_transcript() {
    let mock = mock_backend::spawn(MockState {
        failing_evaluations: vec![1],
        ..MockState::default()
    })
    .await;
    let client = ApiClient::new(&mock.url, None).expect("client");
    let analysis = analyze(&client).await;

    let mut driver = InterviewDriver::from_analysis(&client, &analysis, &[]);
    driver.start().expect("start");
    for answer in ["One", "Two", "Three"] {
        driver.answer(answer).await.expect("answer");
    }
    let session = driver.into_session();

    let markdown = MarkdownGenerator::new(Report::Interview(&session)).generate();
    assert!(markdown.starts_with("# Mock Interview"));
    assert!(markdown.contains(QUESTIONS[2]));
    assert!(markdown.contains(EVALUATION_FAILED_MESSAGE));
    assert!(markdown.contains("## Interview Feedback"));
    assert!(markdown.contains("Practice the STAR method"));

    let json = JsonGenerator::new(Report::Interview(&session))
        .generate()
        .expect("json");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value["phase"]["phase"], "done");
    assert_eq!(value["answers"][1]["feedback"], serde_json::Value::Null);
    assert_eq!(value["answers"][2]["feedback"]["suggestion"], "Quantify the impact.");
}
