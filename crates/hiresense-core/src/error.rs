//! Error types for the HireSense client.
//!
//! This module defines the error hierarchy for every client operation:
//! configuration loading, client-side form validation, transport and HTTP
//! failures against the backend, and interview state machine misuse.

use std::path::PathBuf;

/// A specialized `Result` type for HireSense client operations.
pub type Result<T> = std::result::Result<T, HireSenseError>;

/// Generic message shown when the backend cannot be reached.
pub const CONNECT_FAILED_MESSAGE: &str = "Failed to connect to server. Please try again.";

/// Errors that can occur while driving a HireSense flow.
///
/// Variants are grouped into the three failure categories the client
/// distinguishes: client-side validation, transport, and non-2xx responses.
/// Configuration and state machine errors are local programming or setup
/// problems and carry an actionable suggestion where possible.
#[derive(Debug, thiserror::Error)]
pub enum HireSenseError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid JSON syntax in configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your hiresense.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    // ========================================================================
    // Client-side Validation
    // ========================================================================
    /// A form failed client-side validation; no request was issued.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    // ========================================================================
    // Backend Errors
    // ========================================================================
    /// The request never produced an HTTP response.
    #[error("{message}")]
    Transport {
        /// Endpoint path that was being called.
        endpoint: String,
        /// Description of the transport failure.
        message: String,
    },

    /// The backend answered with a non-2xx status.
    #[error("Backend returned {status} for {endpoint}{}", detail_suffix(.detail))]
    Http {
        /// Endpoint path that was called.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// The `detail` field of the error body, if present.
        detail: Option<String>,
    },

    /// The backend answered 2xx but the body did not match the expected shape.
    #[error("Unexpected response from {endpoint}: {message}")]
    Decode {
        /// Endpoint path that was called.
        endpoint: String,
        /// Description of the decoding failure.
        message: String,
    },

    // ========================================================================
    // State Machine Errors
    // ========================================================================
    /// Invalid state transition attempted.
    #[error("Invalid state transition: cannot go from {from} to {to}")]
    InvalidStateTransition {
        /// The current state.
        from: String,
        /// The attempted target state.
        to: String,
    },

    /// A request is already outstanding for this session.
    #[error("A request is already in flight ({phase}); wait for it to finish")]
    RequestInFlight {
        /// The busy phase.
        phase: String,
    },

    // ========================================================================
    // General I/O Errors
    // ========================================================================
    /// General I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Client-side validation failures.
///
/// The display strings are the exact messages shown inline next to the
/// offending form field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// No résumé file was selected.
    #[error("Please upload a resume")]
    MissingResume,

    /// The selected file is not a PDF.
    #[error("Please upload a PDF file")]
    NotPdf,

    /// The selected file exceeds the upload size limit.
    #[error("Resume file is too large ({size_kb}KB, limit {limit_kb}KB)")]
    ResumeTooLarge {
        /// Actual size in kilobytes.
        size_kb: u64,
        /// Allowed size in kilobytes.
        limit_kb: u64,
    },

    /// The job description field is empty on the upload form.
    #[error("Please enter a job description")]
    EmptyJobDescription,

    /// The job description is missing when rewriting a bullet.
    #[error("Job description is required. Please go back and enter it.")]
    JobDescriptionRequired,

    /// The bullet point field is empty.
    #[error("Please enter a resume bullet point")]
    EmptyBullet,

    /// The résumé text field is empty.
    #[error("Resume text cannot be empty")]
    EmptyResumeText,

    /// The interview answer is empty.
    #[error("Please enter an answer")]
    EmptyAnswer,
}

/// Formats the optional `detail` of an HTTP error as a `: detail` suffix.
fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map_or_else(String::new, |d| format!(": {d}"))
}

impl HireSenseError {
    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Creates a new `Transport` error.
    #[must_use]
    pub fn transport(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Creates a new `Http` error.
    #[must_use]
    pub fn http(endpoint: impl Into<String>, status: u16, detail: Option<String>) -> Self {
        Self::Http {
            endpoint: endpoint.into(),
            status,
            detail,
        }
    }

    /// Creates a new `Decode` error.
    #[must_use]
    pub fn decode(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Creates a new `InvalidStateTransition` error.
    #[must_use]
    pub fn invalid_transition(from: impl std::fmt::Display, to: impl std::fmt::Display) -> Self {
        Self::InvalidStateTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Creates a new `RequestInFlight` error.
    #[must_use]
    pub fn request_in_flight(phase: impl std::fmt::Display) -> Self {
        Self::RequestInFlight {
            phase: phase.to_string(),
        }
    }

    /// Returns `true` if the error was raised locally before any request.
    #[must_use]
    pub const fn is_client_side(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns the message a user should see for this failure.
    ///
    /// Validation errors keep their own text. A non-2xx response shows the
    /// backend's `detail` when it sent one, otherwise `generic`. Transport
    /// failures always show the connection message, and anything else falls
    /// back to `generic`.
    #[must_use]
    pub fn user_message(&self, generic: &str) -> String {
        match self {
            Self::Validation(v) => v.to_string(),
            Self::Http {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => detail.clone(),
            Self::Transport { .. } => CONNECT_FAILED_MESSAGE.to_string(),
            _ => generic.to_string(),
        }
    }
}
