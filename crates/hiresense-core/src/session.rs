//! Interview session state machine.
//!
//! An [`InterviewSession`] sequences through a fixed list of questions. Each
//! transition is an explicit method; the session never performs I/O itself.
//! Callers (see [`crate::interview::InterviewDriver`]) issue the network
//! request that a transition asks for and feed the outcome back in.
//!
//! ```text
//! not_started -> asking(0) -> awaiting_answer(0) -> evaluating(0)
//!     -> asking(1) -> ... -> evaluating(n-1) -> completed -> summarizing -> done
//! ```

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::FALLBACK_QUESTIONS;
use crate::error::{HireSenseError, Result, ValidationError};
use crate::models::{AnswerFeedback, AnswerRecord, InterviewSummary};

/// Message appended once every question has been answered.
pub const COMPLETION_MESSAGE: &str = "Great job! You've completed the interview. I've assessed your responses and will now provide comprehensive feedback.";

/// Message appended when an answer could not be evaluated.
pub const EVALUATION_FAILED_MESSAGE: &str =
    "I couldn't evaluate that answer right now, but let's keep going.";

/// Message appended when the final summary could not be generated.
pub const SUMMARY_FAILED_MESSAGE: &str =
    "Sorry, I couldn't generate your interview feedback. Please try again later.";

/// Feedback text used when the evaluator sent no suggestion.
const DEFAULT_FEEDBACK: &str = "Thank you for your answer.";

// ============================================================================
// SessionPhase
// ============================================================================

/// Where an interview session currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SessionPhase {
    /// Nothing has happened yet.
    #[default]
    NotStarted,
    /// Question `index` is next to be presented.
    Asking {
        /// Zero-based question index.
        index: usize,
    },
    /// Question `index` has been presented; waiting for the candidate.
    AwaitingAnswer {
        /// Zero-based question index.
        index: usize,
    },
    /// The answer to question `index` is being evaluated.
    Evaluating {
        /// Zero-based question index.
        index: usize,
    },
    /// Every question has been answered.
    Completed,
    /// The final summary request is in flight.
    Summarizing,
    /// The session is over, with or without a summary.
    Done,
}

impl SessionPhase {
    /// Returns `true` while a network request is outstanding.
    ///
    /// # Examples
    ///
    /// ```
    /// use hiresense_core::SessionPhase;
    ///
    /// assert!(SessionPhase::Evaluating { index: 0 }.is_busy());
    /// assert!(SessionPhase::Summarizing.is_busy());
    /// assert!(!SessionPhase::AwaitingAnswer { index: 0 }.is_busy());
    /// ```
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Evaluating { .. } | Self::Summarizing)
    }

    /// Returns `true` once every question has been answered.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Summarizing | Self::Done)
    }

    /// Returns the number of questions fully processed in this phase.
    const fn answered(&self, total: usize) -> usize {
        match self {
            Self::NotStarted => 0,
            Self::Asking { index } | Self::AwaitingAnswer { index } | Self::Evaluating { index } => {
                *index
            }
            Self::Completed | Self::Summarizing | Self::Done => total,
        }
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotStarted => f.write_str("not_started"),
            Self::Asking { index } => write!(f, "asking({index})"),
            Self::AwaitingAnswer { index } => write!(f, "awaiting_answer({index})"),
            Self::Evaluating { index } => write!(f, "evaluating({index})"),
            Self::Completed => f.write_str("completed"),
            Self::Summarizing => f.write_str("summarizing"),
            Self::Done => f.write_str("done"),
        }
    }
}

// ============================================================================
// Messages
// ============================================================================

/// Who wrote a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The AI interviewer.
    Interviewer,
    /// The candidate.
    Candidate,
}

/// What a transcript message is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Opening message naming the question count.
    Welcome,
    /// A question.
    Question,
    /// A candidate answer.
    Answer,
    /// Evaluator feedback on an answer.
    Feedback,
    /// Non-fatal failure notice; the session continued.
    Warning,
    /// All questions answered.
    Completion,
    /// Terminal failure notice.
    Error,
}

/// One entry in the interview transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Author.
    pub speaker: Speaker,
    /// Kind of message.
    pub kind: MessageKind,
    /// Message text.
    pub content: String,
    /// When the message was appended.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn interviewer(kind: MessageKind, content: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Interviewer,
            kind,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    fn candidate(content: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Candidate,
            kind: MessageKind::Answer,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Returns the welcome message for an interview of `count` questions.
#[must_use]
pub fn welcome_message(count: usize) -> String {
    format!(
        "Hello! I'm your AI interviewer. I'll be conducting a mock interview based on the job \
         description you provided. This interview will consist of {count} questions covering \
         technical skills, experience, and behavioral aspects. Let's begin!"
    )
}

/// Formats evaluator feedback as transcript text.
fn feedback_text(feedback: &AnswerFeedback) -> String {
    let suggestion = feedback
        .suggestion
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(DEFAULT_FEEDBACK);
    match feedback.score {
        Some(score) => format!("Score: {score}. {suggestion}"),
        None => suggestion.to_string(),
    }
}

/// Generates a session identifier from the current time and a per-process
/// sequence number.
fn generate_session_id() -> String {
    static SEQUENCE: AtomicU32 = AtomicU32::new(0);
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("session_{:x}_{seq}", Utc::now().timestamp_millis())
}

// ============================================================================
// InterviewSession
// ============================================================================

/// State of one mock interview.
///
/// The message list and the answer list are append-only until
/// [`restart`](Self::restart).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewSession {
    /// Identifier sent with the completion request.
    pub session_id: String,

    /// Current phase.
    phase: SessionPhase,

    /// Questions in the order they are asked. Never empty.
    questions: Vec<String>,

    /// Transcript.
    messages: Vec<Message>,

    /// One record per submitted answer.
    answers: Vec<AnswerRecord>,

    /// Final summary, if one was received.
    summary: Option<InterviewSummary>,

    /// When the session was created or last restarted.
    pub started_at: DateTime<Utc>,

    /// When the session last changed.
    pub updated_at: DateTime<Utc>,
}

impl InterviewSession {
    /// Creates a session over `questions`, using the built-in fallback set
    /// when none are usable.
    ///
    /// # Examples
    ///
    /// ```
    /// use hiresense_core::InterviewSession;
    ///
    /// let session = InterviewSession::new(Vec::new());
    /// assert_eq!(session.questions().len(), 5);
    /// assert_eq!(session.progress_percent(), 0);
    /// ```
    #[must_use]
    pub fn new(questions: Vec<String>) -> Self {
        let fallback: Vec<String> = FALLBACK_QUESTIONS.iter().map(ToString::to_string).collect();
        Self::with_fallback(questions, &fallback)
    }

    /// Creates a session over `questions`, using `fallback` when none are
    /// usable. Blank questions are dropped.
    #[must_use]
    pub fn with_fallback(questions: Vec<String>, fallback: &[String]) -> Self {
        let mut usable: Vec<String> = questions
            .into_iter()
            .filter(|q| !q.trim().is_empty())
            .collect();
        if usable.is_empty() {
            usable = fallback
                .iter()
                .filter(|q| !q.trim().is_empty())
                .cloned()
                .collect();
        }
        if usable.is_empty() {
            usable = FALLBACK_QUESTIONS.iter().map(ToString::to_string).collect();
        }

        let now = Utc::now();
        Self {
            session_id: generate_session_id(),
            phase: SessionPhase::NotStarted,
            questions: usable,
            messages: Vec::new(),
            answers: Vec::new(),
            summary: None,
            started_at: now,
            updated_at: now,
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Returns the questions in order.
    #[must_use]
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    /// Returns the transcript.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns every answer submitted so far.
    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    /// Returns the final summary, if one was received.
    #[must_use]
    pub const fn summary(&self) -> Option<&InterviewSummary> {
        self.summary.as_ref()
    }

    /// Returns `true` while a request is outstanding.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    /// Returns the question currently being asked or evaluated.
    #[must_use]
    pub fn current_question(&self) -> Option<&str> {
        match self.phase {
            SessionPhase::Asking { index }
            | SessionPhase::AwaitingAnswer { index }
            | SessionPhase::Evaluating { index } => self.questions.get(index).map(String::as_str),
            _ => None,
        }
    }

    /// Returns progress as `round(answered / total * 100)`.
    ///
    /// Reaches 100 only once the session is completed.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn progress_percent(&self) -> u8 {
        let total = self.questions.len();
        let answered = self.phase.answered(total);
        if total == 0 || answered >= total {
            return if self.phase.is_finished() { 100 } else { 0 };
        }
        ((answered as f64 / total as f64) * 100.0).round() as u8
    }

    /// Returns the header label, "Question k of n".
    ///
    /// # Examples
    ///
    /// ```
    /// use hiresense_core::InterviewSession;
    ///
    /// let session = InterviewSession::new(vec!["Q1".into(), "Q2".into()]);
    /// assert_eq!(session.question_label(), "Question 1 of 2");
    /// ```
    #[must_use]
    pub fn question_label(&self) -> String {
        let total = self.questions.len();
        let k = (self.phase.answered(total) + 1).min(total);
        format!("Question {k} of {total}")
    }

    fn set_phase(&mut self, next: SessionPhase) {
        info!(session = %self.session_id, from = %self.phase, to = %next, "Interview transition");
        self.phase = next;
        self.updated_at = Utc::now();
    }

    fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.updated_at = Utc::now();
    }

    fn reject(&self, to: &str) -> HireSenseError {
        if self.phase.is_busy() {
            HireSenseError::request_in_flight(self.phase)
        } else {
            HireSenseError::invalid_transition(self.phase, to)
        }
    }

    /// Starts the interview: appends the welcome message and moves to
    /// `asking(0)`.
    pub fn start(&mut self) -> Result<()> {
        if self.phase != SessionPhase::NotStarted {
            return Err(self.reject("asking(0)"));
        }
        self.push(Message::interviewer(
            MessageKind::Welcome,
            welcome_message(self.questions.len()),
        ));
        self.set_phase(SessionPhase::Asking { index: 0 });
        Ok(())
    }

    /// Presents the next question and returns its text.
    pub fn present_question(&mut self) -> Result<String> {
        let SessionPhase::Asking { index } = self.phase else {
            return Err(self.reject("awaiting_answer"));
        };
        let question = self
            .questions
            .get(index)
            .cloned()
            .ok_or_else(|| HireSenseError::invalid_transition(self.phase, "awaiting_answer"))?;
        self.push(Message::interviewer(MessageKind::Question, question.clone()));
        self.set_phase(SessionPhase::AwaitingAnswer { index });
        Ok(question)
    }

    /// Records the candidate's answer and moves to `evaluating`.
    ///
    /// The raw answer is appended to the transcript and to the answer list
    /// before any request is made. Returns the question being answered so the
    /// caller can request an evaluation. Blank answers are rejected and the
    /// session is left untouched.
    pub fn submit_answer(&mut self, answer: &str) -> Result<String> {
        let SessionPhase::AwaitingAnswer { index } = self.phase else {
            return Err(self.reject("evaluating"));
        };
        if answer.trim().is_empty() {
            return Err(ValidationError::EmptyAnswer.into());
        }
        let question = self
            .questions
            .get(index)
            .cloned()
            .ok_or_else(|| HireSenseError::invalid_transition(self.phase, "evaluating"))?;

        debug!(index, answer_len = answer.len(), "Answer submitted");
        self.push(Message::candidate(answer));
        self.answers.push(AnswerRecord {
            question: question.clone(),
            answer: answer.to_string(),
            feedback: None,
        });
        self.set_phase(SessionPhase::Evaluating { index });
        Ok(question)
    }

    /// Applies the outcome of an evaluation request.
    ///
    /// Failures are downgraded to a warning message; the answer keeps a
    /// `null` feedback and the session advances either way. Returns the next
    /// phase.
    pub fn record_evaluation(
        &mut self,
        outcome: std::result::Result<AnswerFeedback, HireSenseError>,
    ) -> Result<SessionPhase> {
        let SessionPhase::Evaluating { index } = self.phase else {
            return Err(HireSenseError::invalid_transition(self.phase, "asking"));
        };

        match outcome {
            Ok(feedback) => {
                self.push(Message::interviewer(
                    MessageKind::Feedback,
                    feedback_text(&feedback),
                ));
                if let Some(record) = self.answers.last_mut() {
                    record.feedback = Some(feedback);
                }
            }
            Err(err) => {
                warn!(session = %self.session_id, index, error = %err, "Answer evaluation failed, continuing");
                self.push(Message::interviewer(
                    MessageKind::Warning,
                    EVALUATION_FAILED_MESSAGE,
                ));
            }
        }

        let next = index + 1;
        if next >= self.questions.len() {
            self.push(Message::interviewer(
                MessageKind::Completion,
                COMPLETION_MESSAGE,
            ));
            self.set_phase(SessionPhase::Completed);
        } else {
            self.set_phase(SessionPhase::Asking { index: next });
        }
        Ok(self.phase)
    }

    /// Moves from `completed` to `summarizing`.
    pub fn begin_summary(&mut self) -> Result<()> {
        if self.phase != SessionPhase::Completed {
            return Err(self.reject("summarizing"));
        }
        self.set_phase(SessionPhase::Summarizing);
        Ok(())
    }

    /// Applies the outcome of the summary request and moves to `done`.
    ///
    /// On failure a terminal error message is appended and the summary stays
    /// empty.
    pub fn record_summary(
        &mut self,
        outcome: std::result::Result<InterviewSummary, HireSenseError>,
    ) -> Result<()> {
        if self.phase != SessionPhase::Summarizing {
            return Err(HireSenseError::invalid_transition(self.phase, "done"));
        }
        match outcome {
            Ok(summary) => self.summary = Some(summary),
            Err(err) => {
                warn!(session = %self.session_id, error = %err, "Interview summary failed");
                self.push(Message::interviewer(MessageKind::Error, SUMMARY_FAILED_MESSAGE));
            }
        }
        self.set_phase(SessionPhase::Done);
        Ok(())
    }

    /// Resets the session to `not_started`, keeping the question list.
    ///
    /// Only allowed once every question has been answered and no request is
    /// outstanding.
    pub fn restart(&mut self) -> Result<()> {
        if !matches!(self.phase, SessionPhase::Completed | SessionPhase::Done) {
            return Err(self.reject("not_started"));
        }
        let now = Utc::now();
        self.session_id = generate_session_id();
        self.messages.clear();
        self.answers.clear();
        self.summary = None;
        self.started_at = now;
        self.set_phase(SessionPhase::NotStarted);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
