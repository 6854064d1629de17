//! One-shot flows: upload/analyze, the legacy three-step flow, STAR
//! rewriting, question generation and scorecard download.
//!
//! Each flow validates locally before touching the network and issues at
//! most one request. Failures are terminal for the step; nothing retries.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::backend::HireSenseBackend;
use crate::config::MAX_QUESTION_COUNT;
use crate::document::ResumeDocument;
use crate::error::{HireSenseError, Result, ValidationError, CONNECT_FAILED_MESSAGE};
use crate::interview::InterviewContext;
use crate::models::{
    AnalysisResult, AnalyzeRequest, BasicAnalysis, GenerateQuestionsRequest, GeneratedQuestions,
    InterviewSummary, ResumeAnalysis, ScorecardPdf, ScorecardRequest, StarRewriteRequest,
    StarRewriteResult, UploadResponse,
};

/// Shown when the upload/analyze request fails for any reason.
pub const ANALYZE_FAILED_MESSAGE: &str = "Failed to analyze resume. Please try again.";

/// Shown when the STAR rewrite fails without a `detail`.
pub const REWRITE_FAILED_MESSAGE: &str = "Failed to rewrite bullet point";

/// Shown when the backend rejects the scorecard request.
pub const SCORECARD_FAILED_MESSAGE: &str = "Failed to generate PDF. Please try again.";

/// Shown when the scorecard request never gets a response.
pub const SCORECARD_DOWNLOAD_FAILED_MESSAGE: &str = "Failed to download PDF. Please try again.";

/// Default name printed on scorecards.
pub const DEFAULT_CANDIDATE_NAME: &str = "Candidate";

// ============================================================================
// Upload / analyze
// ============================================================================

/// The résumé upload form.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    file: Option<(String, Bytes)>,

    /// Job description text.
    pub job_description: String,
}

impl UploadForm {
    /// Creates an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a file. Validation happens on [`submit`](Self::submit).
    pub fn select_file(&mut self, file_name: impl Into<String>, bytes: impl Into<Bytes>) {
        self.file = Some((file_name.into(), bytes.into()));
    }

    /// Selects a file from disk.
    ///
    /// The size is checked from metadata before the file is read. On error
    /// the current selection is left unchanged.
    pub fn select_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let doc = ResumeDocument::load(path)?;
        self.file = Some((doc.file_name, doc.bytes));
        Ok(())
    }

    /// Checks the form, in field order: file present, file is a PDF, job
    /// description present.
    pub fn validate(&self) -> Result<ResumeDocument> {
        let (name, bytes) = self.file.as_ref().ok_or(ValidationError::MissingResume)?;
        let doc = ResumeDocument::from_bytes(name.clone(), bytes.clone())?;
        if self.job_description.trim().is_empty() {
            return Err(ValidationError::EmptyJobDescription.into());
        }
        Ok(doc)
    }

    /// Validates and submits the form to the start-interview endpoint.
    ///
    /// The response is returned unmodified together with the submitted job
    /// description.
    pub async fn submit<B>(&self, backend: &B) -> Result<ResumeAnalysis>
    where
        B: HireSenseBackend + ?Sized,
    {
        let doc = self.validate()?;
        info!(file = %doc.file_name, size = doc.size_bytes(), "Submitting resume for analysis");

        let response = backend
            .start_interview(&doc.to_upload(), &self.job_description)
            .await?;
        Ok(ResumeAnalysis {
            response,
            job_description: self.job_description.clone(),
        })
    }

    /// Returns the message to show for a failed submission.
    #[must_use]
    pub fn failure_message(err: &HireSenseError) -> String {
        if err.is_client_side() {
            err.to_string()
        } else {
            ANALYZE_FAILED_MESSAGE.to_string()
        }
    }
}

// ============================================================================
// Legacy three-step flow
// ============================================================================

/// Uploads a résumé on its own and returns the extracted text.
pub async fn upload_resume<B>(backend: &B, resume: &ResumeDocument) -> Result<UploadResponse>
where
    B: HireSenseBackend + ?Sized,
{
    info!(file = %resume.file_name, "Uploading resume");
    backend.upload_resume(&resume.to_upload()).await
}

/// Submits a job description for cleanup and returns the cleaned text.
pub async fn submit_job_description<B>(backend: &B, job_description: &str) -> Result<String>
where
    B: HireSenseBackend + ?Sized,
{
    if job_description.trim().is_empty() {
        return Err(ValidationError::EmptyJobDescription.into());
    }
    let cleaned = backend.submit_job_description(job_description).await?;
    Ok(cleaned.cleaned_job_description)
}

/// Runs the basic analysis over already-extracted text.
pub async fn analyze_text<B>(
    backend: &B,
    resume_text: &str,
    job_description: &str,
) -> Result<BasicAnalysis>
where
    B: HireSenseBackend + ?Sized,
{
    if resume_text.trim().is_empty() {
        return Err(ValidationError::EmptyResumeText.into());
    }
    if job_description.trim().is_empty() {
        return Err(ValidationError::EmptyJobDescription.into());
    }
    debug!(
        resume_len = resume_text.len(),
        jd_len = job_description.len(),
        "Requesting basic analysis"
    );
    backend
        .analyze(&AnalyzeRequest {
            resume_text: resume_text.to_string(),
            job_description: job_description.to_string(),
        })
        .await
}

// ============================================================================
// Question generation
// ============================================================================

/// Asks the backend for `count` interview questions.
pub async fn generate_questions<B>(
    backend: &B,
    context: &InterviewContext,
    count: usize,
) -> Result<GeneratedQuestions>
where
    B: HireSenseBackend + ?Sized,
{
    if count == 0 || count > MAX_QUESTION_COUNT {
        return Err(HireSenseError::config_validation(
            format!("question count must be between 1 and {MAX_QUESTION_COUNT}, got {count}"),
            format!("Ask for between 1 and {MAX_QUESTION_COUNT} questions"),
        ));
    }
    if context.resume_text.trim().is_empty() {
        return Err(ValidationError::EmptyResumeText.into());
    }
    if context.job_description.trim().is_empty() {
        return Err(ValidationError::EmptyJobDescription.into());
    }

    info!(count, "Generating interview questions");
    backend
        .generate_questions(&GenerateQuestionsRequest {
            resume_text: context.resume_text.clone(),
            job_description: context.job_description.clone(),
            analysis: context.analysis.clone(),
            question_count: count,
        })
        .await
}

// ============================================================================
// STAR rewriter
// ============================================================================

/// The STAR bullet rewriter form.
#[derive(Debug, Clone, Default)]
pub struct StarRewriter {
    /// Bullet point to rewrite.
    pub bullet: String,

    /// Job description carried over from the upload step.
    pub job_description: String,

    /// Optional résumé context.
    pub resume_context: String,

    result: Option<StarRewriteResult>,
    error: Option<String>,
}

impl StarRewriter {
    /// Creates a rewriter for `job_description`.
    #[must_use]
    pub fn new(job_description: impl Into<String>) -> Self {
        Self {
            job_description: job_description.into(),
            ..Self::default()
        }
    }

    /// Returns the last successful result.
    #[must_use]
    pub const fn result(&self) -> Option<&StarRewriteResult> {
        self.result.as_ref()
    }

    /// Returns the last error message.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Checks the form and builds the request.
    pub fn validate(&self) -> Result<StarRewriteRequest> {
        if self.bullet.trim().is_empty() {
            return Err(ValidationError::EmptyBullet.into());
        }
        if self.job_description.trim().is_empty() {
            return Err(ValidationError::JobDescriptionRequired.into());
        }
        Ok(StarRewriteRequest {
            original_bullet: self.bullet.clone(),
            job_description: self.job_description.clone(),
            resume_context: self.resume_context.clone(),
        })
    }

    /// Submits the bullet for rewriting.
    ///
    /// Any previous result and error are cleared first. On failure the
    /// user-facing message is kept in [`error`](Self::error).
    pub async fn rewrite<B>(&mut self, backend: &B) -> Result<&StarRewriteResult>
    where
        B: HireSenseBackend + ?Sized,
    {
        self.result = None;
        self.error = None;

        let outcome = match self.validate() {
            Ok(request) => {
                info!(bullet_len = request.original_bullet.len(), "Rewriting bullet");
                backend.star_rewrite(&request).await
            }
            Err(err) => Err(err),
        };

        match outcome {
            Ok(result) => Ok(&*self.result.insert(result)),
            Err(err) => {
                self.error = Some(Self::failure_message(&err));
                Err(err)
            }
        }
    }

    /// Clears the bullet, context, result and error for another rewrite.
    /// The job description is kept.
    pub fn reset(&mut self) {
        self.bullet.clear();
        self.resume_context.clear();
        self.result = None;
        self.error = None;
    }

    /// Returns the message to show for a failed rewrite.
    #[must_use]
    pub fn failure_message(err: &HireSenseError) -> String {
        err.user_message(REWRITE_FAILED_MESSAGE)
    }
}

// ============================================================================
// Scorecard
// ============================================================================

/// Requests a PDF scorecard for `analysis`.
///
/// A blank `candidate_name` is sent as "Candidate".
pub async fn download_scorecard<B>(
    backend: &B,
    analysis: &AnalysisResult,
    candidate_name: &str,
    interview_summary: Option<&InterviewSummary>,
    date: NaiveDate,
) -> Result<ScorecardPdf>
where
    B: HireSenseBackend + ?Sized,
{
    let candidate_name = if candidate_name.trim().is_empty() {
        DEFAULT_CANDIDATE_NAME.to_string()
    } else {
        candidate_name.to_string()
    };
    info!(candidate = %candidate_name, "Requesting scorecard");

    let bytes = backend
        .generate_scorecard(&ScorecardRequest {
            analysis: analysis.clone(),
            candidate_name,
            interview_summary: interview_summary.cloned(),
        })
        .await?;
    debug!(size = bytes.len(), "Scorecard received");

    Ok(ScorecardPdf {
        file_name: ScorecardPdf::file_name_for(date),
        bytes,
    })
}

/// Returns the message to show for a failed scorecard download.
#[must_use]
pub fn scorecard_failure_message(err: &HireSenseError) -> String {
    match err {
        HireSenseError::Transport { .. } => SCORECARD_DOWNLOAD_FAILED_MESSAGE.to_string(),
        e if e.is_client_side() => e.to_string(),
        _ => SCORECARD_FAILED_MESSAGE.to_string(),
    }
}

impl ScorecardPdf {
    /// Writes the scorecard into `dir`, creating it if needed, and returns
    /// the full path.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        info!(path = %path.display(), "Scorecard saved");
        Ok(path)
    }
}

/// Returns the message to show when a backend call fails in a flow that
/// has no message of its own.
#[must_use]
pub fn generic_failure_message(err: &HireSenseError) -> String {
    err.user_message(CONNECT_FAILED_MESSAGE)
}
