//! Drives an [`InterviewSession`] against a backend.
//!
//! The driver owns the one-request-at-a-time contract: every call awaits its
//! request to completion before returning, and the session rejects anything
//! submitted in between.

use tracing::info;

use crate::backend::HireSenseBackend;
use crate::error::Result;
use crate::models::{
    AnalysisResult, CompleteInterviewRequest, EvaluateAnswerRequest, ResumeAnalysis,
};
use crate::session::{InterviewSession, SessionPhase};

/// Data the interview requests carry along with each answer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterviewContext {
    /// Extracted résumé text.
    pub resume_text: String,
    /// Job description text.
    pub job_description: String,
    /// Analysis the interview is based on.
    pub analysis: AnalysisResult,
}

impl From<&ResumeAnalysis> for InterviewContext {
    fn from(result: &ResumeAnalysis) -> Self {
        Self {
            resume_text: result.response.resume_text.clone(),
            job_description: result.job_description.clone(),
            analysis: result.response.analysis.clone(),
        }
    }
}

/// What happened after an answer was submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The next question was presented.
    NextQuestion(String),
    /// Every question has been answered and the summary step has run.
    Finished,
}

/// Runs an interview session, issuing the requests its transitions call for.
pub struct InterviewDriver<'a, B: HireSenseBackend + ?Sized> {
    backend: &'a B,
    context: InterviewContext,
    session: InterviewSession,
}

impl<'a, B: HireSenseBackend + ?Sized> InterviewDriver<'a, B> {
    /// Creates a driver for `session`.
    pub const fn new(backend: &'a B, context: InterviewContext, session: InterviewSession) -> Self {
        Self {
            backend,
            context,
            session,
        }
    }

    /// Creates a driver from an upload/analyze result, falling back to
    /// `fallback` when the backend generated no questions.
    pub fn from_analysis(backend: &'a B, result: &ResumeAnalysis, fallback: &[String]) -> Self {
        let session = InterviewSession::with_fallback(result.questions().to_vec(), fallback);
        Self::new(backend, InterviewContext::from(result), session)
    }

    /// Returns the session.
    pub const fn session(&self) -> &InterviewSession {
        &self.session
    }

    /// Returns the context sent with each request.
    pub const fn context(&self) -> &InterviewContext {
        &self.context
    }

    /// Starts the interview and returns the first question.
    pub fn start(&mut self) -> Result<String> {
        self.session.start()?;
        self.session.present_question()
    }

    /// Submits an answer to the current question.
    ///
    /// Evaluation failures never surface here; they are recorded in the
    /// session and the interview moves on. Once the last answer is in, the
    /// summary is requested before this returns. Only local errors (blank
    /// answer, wrong phase) are returned.
    pub async fn answer(&mut self, text: &str) -> Result<AnswerOutcome> {
        let question = self.session.submit_answer(text)?;

        let request = EvaluateAnswerRequest {
            question,
            answer: text.to_string(),
            job_description: self.context.job_description.clone(),
            resume_context: Some(self.context.resume_text.clone())
                .filter(|r| !r.trim().is_empty()),
        };
        let outcome = self.backend.evaluate_answer(&request).await;

        match self.session.record_evaluation(outcome)? {
            SessionPhase::Completed => {
                self.summarize().await?;
                Ok(AnswerOutcome::Finished)
            }
            _ => Ok(AnswerOutcome::NextQuestion(self.session.present_question()?)),
        }
    }

    async fn summarize(&mut self) -> Result<()> {
        self.session.begin_summary()?;

        let request = CompleteInterviewRequest {
            session_id: self.session.session_id.clone(),
            resume_text: self.context.resume_text.clone(),
            job_description: self.context.job_description.clone(),
            analysis: self.context.analysis.clone(),
            questions: self.session.questions().to_vec(),
            answers: self.session.answers().to_vec(),
        };
        info!(
            session = %request.session_id,
            answers = request.answers.len(),
            "Requesting interview summary"
        );
        let outcome = self.backend.complete_interview(&request).await;
        self.session.record_summary(outcome)
    }

    /// Resets the session so the interview can be run again.
    pub fn restart(&mut self) -> Result<()> {
        self.session.restart()
    }

    /// Consumes the driver and returns the session.
    pub fn into_session(self) -> InterviewSession {
        self.session
    }
}
