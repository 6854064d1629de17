//! The seam between the flows and the remote HireSense backend.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;
use crate::models::{
    AnalyzeRequest, AnswerFeedback, BasicAnalysis, CleanedJobDescription,
    CompleteInterviewRequest, EvaluateAnswerRequest, GenerateQuestionsRequest,
    GeneratedQuestions, InterviewSummary, ScorecardRequest, StarRewriteRequest,
    StarRewriteResult, StartInterviewResponse, UploadResponse,
};

/// Endpoint paths, relative to the configured base URL.
pub mod endpoints {
    /// Legacy résumé upload.
    pub const RESUME_UPLOAD: &str = "/api/resume/upload";
    /// Legacy job description cleanup.
    pub const JD_SUBMIT: &str = "/api/jd/submit";
    /// Legacy basic analysis.
    pub const ANALYZE: &str = "/api/analyze";
    /// Upload, analyze and generate questions in one request.
    pub const START_INTERVIEW: &str = "/api/interview/start-interview";
    /// Question generation for an existing analysis.
    pub const GENERATE_QUESTIONS: &str = "/api/interview/generate-questions";
    /// Per-answer evaluation.
    pub const EVALUATE_ANSWER: &str = "/api/interview/evaluate-answer";
    /// Final interview summary.
    pub const COMPLETE_INTERVIEW: &str = "/api/interview/complete-interview";
    /// STAR bullet rewrite.
    pub const STAR_REWRITE: &str = "/api/rewriter/star-rewrite";
    /// PDF scorecard.
    pub const GENERATE_SCORECARD: &str = "/api/rewriter/generate-scorecard";
}

/// A PDF file ready to be sent as a multipart `file` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfUpload {
    /// File name sent with the part.
    pub file_name: String,
    /// File contents.
    pub bytes: Bytes,
}

/// Operations the HireSense backend offers.
///
/// Every method issues exactly one request. Implementations map transport
/// failures to [`HireSenseError::Transport`](crate::HireSenseError::Transport),
/// non-2xx responses to [`HireSenseError::Http`](crate::HireSenseError::Http)
/// and malformed bodies to [`HireSenseError::Decode`](crate::HireSenseError::Decode).
#[async_trait]
pub trait HireSenseBackend: Send + Sync {
    /// `POST /api/resume/upload`.
    async fn upload_resume(&self, file: &PdfUpload) -> Result<UploadResponse>;

    /// `POST /api/jd/submit`.
    async fn submit_job_description(&self, job_description: &str)
        -> Result<CleanedJobDescription>;

    /// `POST /api/analyze`.
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<BasicAnalysis>;

    /// `POST /api/interview/start-interview`.
    async fn start_interview(
        &self,
        file: &PdfUpload,
        job_description: &str,
    ) -> Result<StartInterviewResponse>;

    /// `POST /api/interview/generate-questions`.
    async fn generate_questions(
        &self,
        request: &GenerateQuestionsRequest,
    ) -> Result<GeneratedQuestions>;

    /// `POST /api/interview/evaluate-answer`.
    async fn evaluate_answer(&self, request: &EvaluateAnswerRequest) -> Result<AnswerFeedback>;

    /// `POST /api/interview/complete-interview`.
    async fn complete_interview(
        &self,
        request: &CompleteInterviewRequest,
    ) -> Result<InterviewSummary>;

    /// `POST /api/rewriter/star-rewrite`.
    async fn star_rewrite(&self, request: &StarRewriteRequest) -> Result<StarRewriteResult>;

    /// `POST /api/rewriter/generate-scorecard`; returns the raw PDF.
    async fn generate_scorecard(&self, request: &ScorecardRequest) -> Result<Bytes>;
}
