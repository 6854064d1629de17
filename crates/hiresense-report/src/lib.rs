//! HireSense Report Rendering
//!
//! Pure text projections of HireSense results. Nothing here talks to the
//! backend or mutates its input; every generator borrows an immutable value
//! and produces a string.
//!
//! # Generators
//!
//! - [`MarkdownGenerator`] - Human-readable Markdown for the terminal
//! - [`json::JsonGenerator`] - Compact or pretty JSON for scripting
//!
//! # Example
//!
//! ```rust
//! use hiresense_core::StarRewriteResult;
//! use hiresense_report::{MarkdownGenerator, Report};
//!
//! let result = StarRewriteResult {
//!     original: "Worked on the billing API".to_string(),
//!     rewritten: "Rebuilt the billing API, cutting p99 latency 40%".to_string(),
//!     ..Default::default()
//! };
//!
//! let markdown = MarkdownGenerator::new(Report::StarRewrite(&result)).generate();
//! assert!(markdown.contains("Rebuilt the billing API, cutting p99 latency 40%"));
//! ```

pub mod json;
mod markdown;

pub use markdown::MarkdownGenerator;

use hiresense_core::{
    BasicAnalysis, GeneratedQuestions, InterviewSession, MissingKeyword, ResumeAnalysis,
    StarRewriteResult, UploadResponse,
};
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while rendering or writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to serialize the value to JSON.
    #[error("failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to write the report file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

// ============================================================================
// Report
// ============================================================================

/// A value that can be rendered.
///
/// Serializes as the wrapped value itself, so JSON output matches what the
/// backend sent (plus the submitted job description for analyses).
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum Report<'a> {
    /// Result of the upload/analyze flow.
    Analysis(&'a ResumeAnalysis),
    /// Result of the legacy basic analysis.
    BasicAnalysis(&'a BasicAnalysis),
    /// Result of the legacy upload step.
    Upload(&'a UploadResponse),
    /// A cleaned job description.
    JobDescription(&'a str),
    /// Generated interview questions.
    Questions(&'a GeneratedQuestions),
    /// An interview transcript, with its summary once available.
    Interview(&'a InterviewSession),
    /// A STAR bullet rewrite.
    StarRewrite(&'a StarRewriteResult),
}

impl Report<'_> {
    /// Returns the report title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Analysis(_) | Self::BasicAnalysis(_) => "Resume Analysis",
            Self::Upload(_) => "Resume Upload",
            Self::JobDescription(_) => "Job Description",
            Self::Questions(_) => "Interview Questions",
            Self::Interview(_) => "Mock Interview",
            Self::StarRewrite(_) => "STAR Rewrite",
        }
    }
}

// ============================================================================
// Keyword counts
// ============================================================================

/// Missing keyword counts by importance tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeywordCounts {
    /// Keywords marked "critical".
    pub critical: usize,
    /// Keywords marked "high".
    pub high: usize,
    /// Keywords with any other or no tier.
    pub other: usize,
}

impl KeywordCounts {
    /// Counts `keywords` by importance tier (case-insensitive).
    #[must_use]
    pub fn from_keywords(keywords: &[MissingKeyword]) -> Self {
        let mut counts = Self::default();
        for keyword in keywords {
            match keyword.importance.as_deref().map(str::to_ascii_lowercase) {
                Some(tier) if tier == "critical" => counts.critical += 1,
                Some(tier) if tier == "high" => counts.high += 1,
                _ => counts.other += 1,
            }
        }
        counts
    }

    /// Returns the total number of keywords.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.critical + self.high + self.other
    }
}
