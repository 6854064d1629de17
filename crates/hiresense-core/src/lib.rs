//! HireSense core
//!
//! Data model, configuration, validation and the interview session state
//! machine for the HireSense résumé analysis client.

pub mod backend;
pub mod config;
pub mod document;
pub mod error;
pub mod forms;
pub mod interview;
pub mod models;
pub mod session;

pub use backend::{endpoints, HireSenseBackend, PdfUpload};
pub use config::{Config, API_URL_ENV, FALLBACK_QUESTIONS, MAX_QUESTION_COUNT};
pub use document::{ResumeDocument, MAX_RESUME_SIZE};
pub use error::{HireSenseError, Result, ValidationError, CONNECT_FAILED_MESSAGE};
pub use forms::{StarRewriter, UploadForm};
pub use interview::{AnswerOutcome, InterviewContext, InterviewDriver};
pub use models::{
    AnalysisResult, AnalyzeRequest, AnswerFeedback, AnswerRecord, BasicAnalysis,
    BasicSectionFeedback, CleanedJobDescription, CompleteInterviewRequest, ErrorBody,
    EvaluateAnswerRequest, GapAnalysis, GenerateQuestionsRequest, GeneratedQuestions,
    InterviewPlan, InterviewSummary, JobDescriptionRequest, MissingKeyword, ResumeAnalysis,
    RewriteImprovements, ScorecardPdf, ScorecardRequest, Score, ScoreTier, SectionFeedback,
    StarBreakdown, StarRewriteRequest, StarRewriteResult, StartInterviewResponse,
    UploadResponse, WhyNotPassing,
};
pub use session::{InterviewSession, Message, MessageKind, SessionPhase, Speaker};
