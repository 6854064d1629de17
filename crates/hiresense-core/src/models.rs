//! Wire types exchanged with the HireSense backend.
//!
//! Field names follow the backend's snake_case JSON. Response types are
//! lenient: every field the client does not strictly need is defaulted.
//! Unknown feedback fields are kept, and the analysis document is held as
//! received so it can be sent back verbatim (complete-interview, scorecard).

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Score
// ============================================================================

/// A score presented as an integer percentage in `0..=100`.
///
/// The backend may send integers, floats or numeric strings such as `"78%"`;
/// all are rounded and clamped on the way in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Score(u8);

impl Score {
    /// Creates a score from a raw value, rounding and clamping to `0..=100`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hiresense_core::Score;
    ///
    /// assert_eq!(Score::from_f64(72.6).value(), 73);
    /// assert_eq!(Score::from_f64(140.0).value(), 100);
    /// assert_eq!(Score::from_f64(-3.0).value(), 0);
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_f64(raw: f64) -> Self {
        if raw.is_nan() {
            return Self(0);
        }
        Self(raw.round().clamp(0.0, 100.0) as u8)
    }

    /// Returns the score as an integer percentage.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns the presentation tier for this score.
    #[must_use]
    pub const fn tier(self) -> ScoreTier {
        if self.0 >= 70 {
            ScoreTier::Good
        } else if self.0 >= 50 {
            ScoreTier::Moderate
        } else {
            ScoreTier::NeedsImprovement
        }
    }
}

impl From<u8> for Score {
    fn from(value: u8) -> Self {
        Self(value.min(100))
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Self::from_f64(n)),
            Raw::Text(s) => s
                .trim()
                .trim_start_matches('+')
                .trim_end_matches('%')
                .trim()
                .parse::<f64>()
                .map(Self::from_f64)
                .map_err(|_| de::Error::custom(format!("invalid score '{s}'"))),
        }
    }
}

/// Presentation tier of a match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    /// 70 and above.
    Good,
    /// 50 to 69.
    Moderate,
    /// Below 50.
    NeedsImprovement,
}

impl ScoreTier {
    /// Returns the label shown next to the score.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Good => "Good Match",
            Self::Moderate => "Moderate Match",
            Self::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl std::fmt::Display for ScoreTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Analysis
// ============================================================================

/// A keyword from the job description that the résumé lacks.
///
/// The basic analysis endpoint sends bare strings; the full analysis sends
/// objects with an importance tier and an explanation. Both deserialize here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MissingKeywordRepr")]
pub struct MissingKeyword {
    /// The keyword itself.
    pub keyword: String,

    /// Importance tier as reported by the backend (e.g. "critical", "high").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<String>,

    /// Why the keyword matters for this role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub why_matters: Option<String>,
}

impl MissingKeyword {
    /// Creates a keyword without tier or explanation.
    #[must_use]
    pub fn plain(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            importance: None,
            why_matters: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MissingKeywordRepr {
    Plain(String),
    Detailed {
        keyword: String,
        #[serde(default)]
        importance: Option<String>,
        #[serde(default)]
        why_matters: Option<String>,
    },
}

impl From<MissingKeywordRepr> for MissingKeyword {
    fn from(repr: MissingKeywordRepr) -> Self {
        match repr {
            MissingKeywordRepr::Plain(keyword) => Self::plain(keyword),
            MissingKeywordRepr::Detailed {
                keyword,
                importance,
                why_matters,
            } => Self {
                keyword,
                importance,
                why_matters,
            },
        }
    }
}

/// Why the résumé is not passing automated screening.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhyNotPassing {
    /// Main reasons, most important first.
    #[serde(default)]
    pub main_reasons: Vec<String>,

    /// How an ATS is likely to read the résumé.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ats_perspective: Option<String>,
}

impl WhyNotPassing {
    /// Returns `true` if there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.main_reasons.is_empty() && self.ats_perspective.is_none()
    }
}

/// Experience, skills and qualification gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapAnalysis {
    /// Experience gap narrative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_gaps: Option<String>,

    /// Skills gap narrative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills_gaps: Option<String>,

    /// Qualification gap narrative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualification_gaps: Option<String>,
}

impl GapAnalysis {
    /// Returns `true` if no gap text is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.experience_gaps.is_none()
            && self.skills_gaps.is_none()
            && self.qualification_gaps.is_none()
    }
}

/// Detailed feedback for one résumé section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionFeedback {
    /// What the section currently says.
    #[serde(default)]
    pub current_state: String,

    /// What is wrong with it.
    #[serde(default)]
    pub problem: String,

    /// Effect of the problem on the application.
    #[serde(default)]
    pub impact: String,
}

/// Full analysis produced by the start-interview endpoint.
///
/// Immutable once received. The typed fields are a rounded, defaulted view
/// for presentation; serialization always emits the JSON exactly as the
/// backend sent it, so complete-interview and the scorecard receive the
/// original document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisResult {
    /// Résumé/job-description alignment.
    pub match_score: Score,

    /// Overall assessment paragraph.
    pub overall_assessment: String,

    /// Why the résumé is not passing screening.
    pub why_not_passing: WhyNotPassing,

    /// Keywords missing from the résumé.
    pub missing_keywords: Vec<MissingKeyword>,

    /// Gap narratives.
    pub gap_analysis: GapAnalysis,

    /// Per-section feedback in the order the backend sent it.
    pub section_detailed_feedback: IndexMap<String, SectionFeedback>,

    /// Ordered list of next steps.
    pub actionable_next_steps: Vec<String>,

    /// Fields this client does not interpret.
    pub extra: Map<String, Value>,

    /// The document as received; `Null` for a locally built value.
    raw: Value,
}

/// Typed view of an analysis document.
#[derive(Serialize, Deserialize)]
struct AnalysisFields<A, W, K, G, S, N, E> {
    #[serde(default)]
    match_score: Score,
    #[serde(default)]
    overall_assessment: A,
    #[serde(default)]
    why_not_passing: W,
    #[serde(default)]
    missing_keywords: K,
    #[serde(default)]
    gap_analysis: G,
    #[serde(default)]
    section_detailed_feedback: S,
    #[serde(default)]
    actionable_next_steps: N,
    #[serde(flatten)]
    extra: E,
}

type OwnedAnalysisFields = AnalysisFields<
    String,
    WhyNotPassing,
    Vec<MissingKeyword>,
    GapAnalysis,
    IndexMap<String, SectionFeedback>,
    Vec<String>,
    Map<String, Value>,
>;

impl AnalysisResult {
    /// Returns the document as the backend sent it, or `Null` when the
    /// value was not deserialized from a response.
    #[must_use]
    pub const fn raw(&self) -> &Value {
        &self.raw
    }
}

impl Serialize for AnalysisResult {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if !self.raw.is_null() {
            return self.raw.serialize(serializer);
        }
        AnalysisFields {
            match_score: self.match_score,
            overall_assessment: &self.overall_assessment,
            why_not_passing: &self.why_not_passing,
            missing_keywords: &self.missing_keywords,
            gap_analysis: &self.gap_analysis,
            section_detailed_feedback: &self.section_detailed_feedback,
            actionable_next_steps: &self.actionable_next_steps,
            extra: &self.extra,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AnalysisResult {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        let fields: OwnedAnalysisFields =
            serde_json::from_value(raw.clone()).map_err(de::Error::custom)?;
        Ok(Self {
            match_score: fields.match_score,
            overall_assessment: fields.overall_assessment,
            why_not_passing: fields.why_not_passing,
            missing_keywords: fields.missing_keywords,
            gap_analysis: fields.gap_analysis,
            section_detailed_feedback: fields.section_detailed_feedback,
            actionable_next_steps: fields.actionable_next_steps,
            extra: fields.extra,
            raw,
        })
    }
}

/// Plain-text section feedback from the basic analyze endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicSectionFeedback {
    /// Feedback on the summary section.
    #[serde(rename = "Summary", default)]
    pub summary: String,

    /// Feedback on the experience section.
    #[serde(rename = "Experience", default)]
    pub experience: String,

    /// Feedback on the skills section.
    #[serde(rename = "Skills", default)]
    pub skills: String,
}

/// Response of `POST /api/analyze`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicAnalysis {
    /// Résumé/job-description alignment.
    pub match_score: Score,

    /// Keywords missing from the résumé.
    #[serde(default)]
    pub missing_keywords: Vec<MissingKeyword>,

    /// Feedback per section.
    #[serde(default)]
    pub section_feedback: BasicSectionFeedback,
}

/// Request body for `POST /api/analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Extracted résumé text.
    pub resume_text: String,
    /// Job description text.
    pub job_description: String,
}

// ============================================================================
// Upload and job description
// ============================================================================

/// Response of `POST /api/resume/upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Name of the uploaded file as the backend saw it.
    #[serde(default)]
    pub filename: String,
    /// Text extracted from the PDF.
    pub resume_text: String,
}

/// Request body for `POST /api/jd/submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptionRequest {
    /// Raw job description text.
    pub job_description: String,
}

/// Response of `POST /api/jd/submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedJobDescription {
    /// Job description with boilerplate removed.
    pub cleaned_job_description: String,
}

// ============================================================================
// Interview
// ============================================================================

/// Interview plan embedded in the start-interview response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewPlan {
    /// Questions to ask, in order.
    #[serde(default)]
    pub questions: Vec<String>,

    /// Keywords the questions focus on.
    #[serde(default)]
    pub focus_areas: Vec<MissingKeyword>,
}

/// Response of `POST /api/interview/start-interview`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StartInterviewResponse {
    /// Text extracted from the uploaded PDF.
    #[serde(default)]
    pub resume_text: String,

    /// Name of the uploaded file.
    #[serde(default)]
    pub filename: Option<String>,

    /// Full analysis.
    #[serde(default)]
    pub analysis: AnalysisResult,

    /// Generated interview questions.
    #[serde(default)]
    pub interview: InterviewPlan,
}

/// Result of the upload/analyze flow: the backend response, untouched, plus
/// the job description that was submitted with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    /// Backend response.
    #[serde(flatten)]
    pub response: StartInterviewResponse,

    /// Job description the analysis was run against.
    pub job_description: String,
}

impl ResumeAnalysis {
    /// Returns the analysis part of the response.
    #[must_use]
    pub const fn analysis(&self) -> &AnalysisResult {
        &self.response.analysis
    }

    /// Returns the questions the backend generated, possibly empty.
    #[must_use]
    pub fn questions(&self) -> &[String] {
        &self.response.interview.questions
    }
}

/// Request body for `POST /api/interview/generate-questions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateQuestionsRequest {
    /// Extracted résumé text.
    pub resume_text: String,
    /// Job description text.
    pub job_description: String,
    /// Previous analysis.
    pub analysis: AnalysisResult,
    /// Number of questions to generate.
    pub question_count: usize,
}

/// Response of `POST /api/interview/generate-questions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedQuestions {
    /// Generated questions.
    #[serde(default)]
    pub questions: Vec<String>,

    /// Number of questions the backend reports.
    #[serde(default)]
    pub total: usize,

    /// Keywords the questions focus on.
    #[serde(default)]
    pub focus_areas: Vec<MissingKeyword>,
}

/// Request body for `POST /api/interview/evaluate-answer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluateAnswerRequest {
    /// The question that was asked.
    pub question: String,
    /// The candidate's answer.
    pub answer: String,
    /// Job description the interview is for.
    pub job_description: String,
    /// Résumé text for context.
    pub resume_context: Option<String>,
}

/// Feedback on one interview answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerFeedback {
    /// Score for the answer.
    #[serde(default)]
    pub score: Option<Score>,

    /// Suggestion for improving the answer.
    #[serde(default)]
    pub suggestion: Option<String>,

    /// Fields this client does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One answered question in an interview session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// The question that was asked.
    pub question: String,
    /// The candidate's answer, verbatim.
    pub answer: String,
    /// Evaluator feedback; `None` when evaluation failed.
    pub feedback: Option<AnswerFeedback>,
}

/// Request body for `POST /api/interview/complete-interview`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompleteInterviewRequest {
    /// Client-generated session identifier.
    pub session_id: String,
    /// Extracted résumé text.
    pub resume_text: String,
    /// Job description text.
    pub job_description: String,
    /// Analysis the interview was based on.
    pub analysis: AnalysisResult,
    /// Questions asked, in order.
    pub questions: Vec<String>,
    /// Every answer, including those whose evaluation failed.
    pub answers: Vec<AnswerRecord>,
}

/// Final interview summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterviewSummary {
    /// Overall interview score.
    #[serde(default)]
    pub overall_score: Score,

    /// What went well.
    #[serde(default)]
    pub strengths: Vec<String>,

    /// What to work on.
    #[serde(default)]
    pub improvements: Vec<String>,

    /// Preparation advice.
    #[serde(default)]
    pub recommendations: Vec<String>,

    /// Fields this client does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// STAR rewriter
// ============================================================================

/// Request body for `POST /api/rewriter/star-rewrite`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarRewriteRequest {
    /// Bullet point to rewrite.
    pub original_bullet: String,
    /// Job description to tailor the bullet to.
    pub job_description: String,
    /// Optional résumé context; sent as an empty string when absent.
    pub resume_context: String,
}

/// Issues before and strengths after the rewrite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteImprovements {
    /// Problems with the original bullet.
    #[serde(default)]
    pub before_issues: Vec<String>,

    /// Strengths of the rewritten bullet.
    #[serde(default)]
    pub after_strengths: Vec<String>,
}

/// Situation/Task/Action/Result breakdown of the rewritten bullet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarBreakdown {
    /// Context.
    #[serde(default)]
    pub situation: String,
    /// What needed doing.
    #[serde(default)]
    pub task: String,
    /// What the candidate did.
    #[serde(default)]
    pub action: String,
    /// Measurable impact.
    #[serde(default)]
    pub result: String,
}

/// Response of `POST /api/rewriter/star-rewrite`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarRewriteResult {
    /// The bullet as submitted.
    #[serde(default)]
    pub original: String,

    /// The rewritten bullet.
    pub rewritten: String,

    /// Before/after comparison.
    #[serde(default)]
    pub improvements: RewriteImprovements,

    /// STAR breakdown, if the backend produced one.
    #[serde(default)]
    pub star_breakdown: Option<StarBreakdown>,

    /// Estimated impact improvement in percentage points.
    #[serde(default)]
    pub impact_score_improvement: Option<Score>,

    /// Job keywords worked into the rewrite.
    #[serde(default)]
    pub keywords_added: Vec<String>,
}

// ============================================================================
// Scorecard
// ============================================================================

/// Request body for `POST /api/rewriter/generate-scorecard`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScorecardRequest {
    /// Analysis to print.
    pub analysis: AnalysisResult,
    /// Name printed on the scorecard.
    pub candidate_name: String,
    /// Interview summary, or `null` if no interview was completed.
    pub interview_summary: Option<InterviewSummary>,
}

/// A downloaded scorecard PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScorecardPdf {
    /// File name to save the scorecard under.
    pub file_name: String,
    /// Raw PDF bytes.
    pub bytes: bytes::Bytes,
}

impl ScorecardPdf {
    /// Returns the download file name for a scorecard generated on `date`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use hiresense_core::ScorecardPdf;
    ///
    /// let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap_or_default();
    /// assert_eq!(ScorecardPdf::file_name_for(date), "HireSense_Scorecard_2026-03-09.pdf");
    /// ```
    #[must_use]
    pub fn file_name_for(date: NaiveDate) -> String {
        format!("HireSense_Scorecard_{}.pdf", date.format("%Y-%m-%d"))
    }
}

// ============================================================================
// Error body
// ============================================================================

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    /// Either a message string or a list of validation errors.
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    /// Returns the detail as display text, if present.
    #[must_use]
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
