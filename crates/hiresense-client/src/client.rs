//! `reqwest` client for the HireSense REST API.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use hiresense_core::backend::endpoints;
use hiresense_core::{
    AnalyzeRequest, AnswerFeedback, BasicAnalysis, CleanedJobDescription,
    CompleteInterviewRequest, Config, ErrorBody, EvaluateAnswerRequest, GenerateQuestionsRequest,
    GeneratedQuestions, HireSenseBackend, HireSenseError, InterviewSummary, JobDescriptionRequest,
    PdfUpload, Result, ScorecardRequest, StarRewriteRequest, StarRewriteResult,
    StartInterviewResponse, UploadResponse,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

/// MIME type sent with résumé uploads.
const PDF_MIME: &str = "application/pdf";

/// Client for the HireSense backend.
///
/// Issues one request per call and never retries.
///
/// # Example
///
/// ```no_run
/// use hiresense_client::ApiClient;
/// use hiresense_core::{Config, HireSenseBackend, StarRewriteRequest};
///
/// # async fn example() -> hiresense_core::Result<()> {
/// let client = ApiClient::from_config(&Config::default())?;
/// let result = client
///     .star_rewrite(&StarRewriteRequest {
///         original_bullet: "Worked on the API".into(),
///         job_description: "Backend engineer".into(),
///         resume_context: String::new(),
///     })
///     .await?;
/// println!("{}", result.rewritten);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for `base_url` with an optional request timeout.
    ///
    /// # Errors
    ///
    /// Returns `HireSenseError::ConfigValidationError` if the HTTP client
    /// cannot be built (for example, no TLS backend is available).
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| {
            HireSenseError::config_validation(
                format!("failed to build HTTP client: {e}"),
                "Check that the system TLS libraries are installed",
            )
        })?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    /// Creates a client from a loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.base_url(), config.request_timeout())
    }

    /// Returns the base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sends a request and checks its status.
    async fn send(&self, path: &str, request: RequestBuilder) -> Result<Response> {
        info!(endpoint = path, "Sending request");

        let response = request.send().await.map_err(|e| {
            warn!(endpoint = path, error = %e, "Request failed before a response");
            HireSenseError::transport(path, e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(endpoint = path, status = status.as_u16(), "Request succeeded");
            return Ok(response);
        }

        // A body that cannot be read or parsed just means no detail.
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.detail_text());
        warn!(
            endpoint = path,
            status = status.as_u16(),
            detail = detail.as_deref().unwrap_or(""),
            "Backend returned an error"
        );
        Err(HireSenseError::http(path, status.as_u16(), detail))
    }

    /// Reads a successful response body as JSON.
    async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T> {
        let body = response
            .text()
            .await
            .map_err(|e| HireSenseError::transport(path, e.to_string()))?;
        debug!(endpoint = path, bytes = body.len(), "Response body received");
        serde_json::from_str(&body).map_err(|e| HireSenseError::decode(path, e.to_string()))
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = self.http.post(self.url(path)).json(body);
        let response = self.send(path, request).await?;
        Self::decode(path, response).await
    }

    async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T> {
        let request = self.http.post(self.url(path)).multipart(form);
        let response = self.send(path, request).await?;
        Self::decode(path, response).await
    }

    fn pdf_part(path: &str, file: &PdfUpload) -> Result<Part> {
        debug!(file = %file.file_name, bytes = file.bytes.len(), "Attaching PDF");
        Part::bytes(file.bytes.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(PDF_MIME)
            .map_err(|e| HireSenseError::transport(path, e.to_string()))
    }
}

#[async_trait]
impl HireSenseBackend for ApiClient {
    async fn upload_resume(&self, file: &PdfUpload) -> Result<UploadResponse> {
        let path = endpoints::RESUME_UPLOAD;
        let form = Form::new().part("file", Self::pdf_part(path, file)?);
        self.post_multipart(path, form).await
    }

    async fn submit_job_description(
        &self,
        job_description: &str,
    ) -> Result<CleanedJobDescription> {
        let body = JobDescriptionRequest {
            job_description: job_description.to_string(),
        };
        self.post_json(endpoints::JD_SUBMIT, &body).await
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> Result<BasicAnalysis> {
        self.post_json(endpoints::ANALYZE, request).await
    }

    async fn start_interview(
        &self,
        file: &PdfUpload,
        job_description: &str,
    ) -> Result<StartInterviewResponse> {
        let path = endpoints::START_INTERVIEW;
        let form = Form::new()
            .part("file", Self::pdf_part(path, file)?)
            .text("job_description", job_description.to_string());
        self.post_multipart(path, form).await
    }

    async fn generate_questions(
        &self,
        request: &GenerateQuestionsRequest,
    ) -> Result<GeneratedQuestions> {
        self.post_json(endpoints::GENERATE_QUESTIONS, request).await
    }

    async fn evaluate_answer(&self, request: &EvaluateAnswerRequest) -> Result<AnswerFeedback> {
        self.post_json(endpoints::EVALUATE_ANSWER, request).await
    }

    async fn complete_interview(
        &self,
        request: &CompleteInterviewRequest,
    ) -> Result<InterviewSummary> {
        self.post_json(endpoints::COMPLETE_INTERVIEW, request).await
    }

    async fn star_rewrite(&self, request: &StarRewriteRequest) -> Result<StarRewriteResult> {
        self.post_json(endpoints::STAR_REWRITE, request).await
    }

    async fn generate_scorecard(&self, request: &ScorecardRequest) -> Result<Bytes> {
        let path = endpoints::GENERATE_SCORECARD;
        let response = self
            .send(path, self.http.post(self.url(path)).json(request))
            .await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| HireSenseError::transport(path, e.to_string()))?;
        debug!(endpoint = path, bytes = bytes.len(), "Scorecard downloaded");
        Ok(bytes)
    }
}
