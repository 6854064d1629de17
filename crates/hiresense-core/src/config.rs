//! Configuration types for the HireSense client.
//!
//! Configuration is read from `hiresense.json` (camelCase keys, every field
//! optional), then overridden by the `HIRESENSE_API_URL` environment variable,
//! and finally by CLI flags. Validation runs after every layer is applied.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{HireSenseError, Result};

/// The default config file name.
const CONFIG_FILE_NAME: &str = "hiresense.json";

/// Environment variable that overrides the backend base URL.
pub const API_URL_ENV: &str = "HIRESENSE_API_URL";

/// Upper bound on the number of interview questions a session may ask.
pub const MAX_QUESTION_COUNT: usize = 20;

/// Questions asked when the backend did not supply any.
pub const FALLBACK_QUESTIONS: [&str; 5] = [
    "Can you walk me through your most relevant work experience for this position?",
    "What technical skills from your resume align best with this role?",
    "Describe a challenging project you've worked on and how you overcame obstacles.",
    "How do you stay updated with the latest technologies and industry trends?",
    "Why do you think you're a good fit for this position based on the job requirements?",
];

/// Default backend base URL.
fn default_api_url() -> String {
    "http://localhost:8000".to_string()
}

/// Default candidate name printed on scorecards.
fn default_candidate_name() -> String {
    "Candidate".to_string()
}

/// Default output directory for downloaded scorecards and reports.
fn default_output_dir() -> String {
    ".".to_string()
}

/// Default number of questions requested from the backend.
const fn default_question_count() -> usize {
    5
}

/// Default fallback question list.
fn default_fallback_questions() -> Vec<String> {
    FALLBACK_QUESTIONS.iter().map(ToString::to_string).collect()
}

/// Main configuration for the HireSense client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Base URL of the HireSense backend.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout in seconds; `None` keeps the HTTP client default.
    #[serde(default)]
    pub request_timeout_seconds: Option<u64>,

    /// Candidate name sent with scorecard requests.
    #[serde(default = "default_candidate_name")]
    pub candidate_name: String,

    /// Directory where scorecards and reports are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Number of questions to request when generating an interview.
    #[serde(default = "default_question_count")]
    pub question_count: usize,

    /// Questions used when the analysis carried none.
    #[serde(default = "default_fallback_questions")]
    pub fallback_questions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_seconds: None,
            candidate_name: default_candidate_name(),
            output_dir: default_output_dir(),
            question_count: default_question_count(),
            fallback_questions: default_fallback_questions(),
        }
    }
}

impl Config {
    /// Loads configuration from the current working directory.
    ///
    /// Looks for `hiresense.json` in the current directory. If not found,
    /// returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but contains invalid JSON.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            HireSenseError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads configuration from `hiresense.json` in a specific directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but contains invalid JSON.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from a specific file path.
    ///
    /// If the file does not exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns `HireSenseError::ConfigParseError` if the file exists but
    /// cannot be read or parsed, and `HireSenseError::ConfigValidationError`
    /// if the parsed values are invalid.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(HireSenseError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| HireSenseError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Applies an API URL taken from the environment, if one is set.
    ///
    /// Blank values are ignored. Returns `true` when the URL was replaced.
    pub fn apply_env_override(&mut self, value: Option<String>) -> bool {
        match value {
            Some(url) if !url.trim().is_empty() => {
                self.api_url = url.trim().to_string();
                true
            }
            _ => false,
        }
    }

    /// Returns the configured request timeout, if any.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds.map(Duration::from_secs)
    }

    /// Returns the API URL without trailing slashes.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `HireSenseError::ConfigValidationError` if any check fails.
    pub fn validate(&self) -> Result<()> {
        let url = self.api_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(HireSenseError::config_validation(
                format!("apiUrl must be an http(s) URL, got '{}'", self.api_url),
                "Set apiUrl in hiresense.json or HIRESENSE_API_URL to e.g. http://localhost:8000",
            ));
        }

        if self.request_timeout_seconds == Some(0) {
            return Err(HireSenseError::config_validation(
                "requestTimeoutSeconds must be greater than 0",
                "Remove requestTimeoutSeconds or set it to at least 1 in your hiresense.json",
            ));
        }

        if self.candidate_name.trim().is_empty() {
            return Err(HireSenseError::config_validation(
                "candidateName must not be empty",
                "Set candidateName in your hiresense.json (defaults to 'Candidate')",
            ));
        }

        if self.output_dir.trim().is_empty() {
            return Err(HireSenseError::config_validation(
                "outputDir must not be empty",
                "Provide a valid output directory path in your hiresense.json (use '.' for current directory)",
            ));
        }

        if self.question_count == 0 || self.question_count > MAX_QUESTION_COUNT {
            return Err(HireSenseError::config_validation(
                format!(
                    "questionCount must be between 1 and {MAX_QUESTION_COUNT}, got {}",
                    self.question_count
                ),
                "Set questionCount to a value such as 5 in your hiresense.json",
            ));
        }

        if self
            .fallback_questions
            .iter()
            .all(|q| q.trim().is_empty())
        {
            return Err(HireSenseError::config_validation(
                "fallbackQuestions must contain at least one question",
                "Remove fallbackQuestions from hiresense.json to use the built-in set",
            ));
        }

        Ok(())
    }
}
