//! Markdown rendering of HireSense results.
//!
//! Narrative text from the backend (assessments, feedback, the rewritten
//! bullet) is emitted exactly as received. Only values placed inside table
//! cells are escaped.
//!
//! # Example
//!
//! ```rust
//! use hiresense_core::InterviewSession;
//! use hiresense_report::{MarkdownGenerator, Report};
//!
//! let mut session = InterviewSession::new(vec!["Why this role?".to_string()]);
//! session.start().unwrap();
//! session.present_question().unwrap();
//!
//! let markdown = MarkdownGenerator::new(Report::Interview(&session)).generate();
//! assert!(markdown.contains("# Mock Interview"));
//! assert!(markdown.contains("Question 1 of 1"));
//! ```

use std::fmt::Write;

use chrono::{DateTime, Utc};
use hiresense_core::{
    AnalysisResult, BasicAnalysis, GeneratedQuestions, InterviewSession, InterviewSummary,
    MessageKind, MissingKeyword, ResumeAnalysis, Score, Speaker, StarRewriteResult,
    UploadResponse,
};

use crate::{KeywordCounts, Report};

/// Maximum length of résumé text previewed in upload reports.
const MAX_PREVIEW_LENGTH: usize = 500;

/// Generates Markdown from a [`Report`].
pub struct MarkdownGenerator<'a> {
    report: Report<'a>,
}

impl<'a> MarkdownGenerator<'a> {
    /// Creates a new Markdown generator.
    #[must_use]
    pub const fn new(report: Report<'a>) -> Self {
        Self { report }
    }

    /// Generates the complete Markdown document.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "# {}\n", self.report.title());

        match self.report {
            Report::Analysis(result) => write_analysis(&mut output, result),
            Report::BasicAnalysis(analysis) => write_basic_analysis(&mut output, analysis),
            Report::Upload(upload) => write_upload(&mut output, upload),
            Report::JobDescription(text) => {
                let _ = writeln!(output, "{text}\n");
            }
            Report::Questions(questions) => write_questions(&mut output, questions),
            Report::Interview(session) => write_interview(&mut output, session),
            Report::StarRewrite(result) => write_star_rewrite(&mut output, result),
        }

        write_footer(&mut output);
        output
    }
}

// ============================================================================
// Analysis
// ============================================================================

fn write_analysis(output: &mut String, result: &ResumeAnalysis) {
    let analysis = result.analysis();

    write_score(output, "Match Score", analysis.match_score);
    if !analysis.overall_assessment.is_empty() {
        let _ = writeln!(output, "{}\n", analysis.overall_assessment);
    }

    write_why_not_passing(output, analysis);
    write_keywords(output, &analysis.missing_keywords);
    write_gaps(output, analysis);
    write_section_feedback(output, analysis);
    write_numbered(output, "Next Steps", &analysis.actionable_next_steps);
    write_numbered(output, "Interview Questions", result.questions());
}

fn write_score(output: &mut String, heading: &str, score: Score) {
    let _ = writeln!(output, "## {heading}\n");
    let _ = writeln!(output, "**{score}** ({})\n", score.tier());
}

fn write_why_not_passing(output: &mut String, analysis: &AnalysisResult) {
    let why = &analysis.why_not_passing;
    if why.is_empty() {
        return;
    }

    let _ = writeln!(output, "## Why You're Not Passing\n");
    for reason in &why.main_reasons {
        let _ = writeln!(output, "- {reason}");
    }
    if !why.main_reasons.is_empty() {
        let _ = writeln!(output);
    }
    if let Some(ats) = &why.ats_perspective {
        let _ = writeln!(output, "**ATS perspective:** {ats}\n");
    }
}

fn write_keywords(output: &mut String, keywords: &[MissingKeyword]) {
    let _ = writeln!(output, "## Missing Keywords\n");
    if keywords.is_empty() {
        let _ = writeln!(output, "*No missing keywords.*\n");
        return;
    }

    let counts = KeywordCounts::from_keywords(keywords);
    let _ = writeln!(
        output,
        "{} missing ({} critical, {} high)\n",
        counts.total(),
        counts.critical,
        counts.high
    );

    let _ = writeln!(output, "| Keyword | Importance | Why It Matters |");
    let _ = writeln!(output, "|---------|------------|----------------|");
    for keyword in keywords {
        let _ = writeln!(
            output,
            "| {} | {} | {} |",
            escape_markdown(&keyword.keyword),
            keyword.importance.as_deref().map_or_else(|| "-".to_string(), escape_markdown),
            keyword.why_matters.as_deref().map_or_else(|| "-".to_string(), escape_markdown),
        );
    }
    let _ = writeln!(output);
}

fn write_gaps(output: &mut String, analysis: &AnalysisResult) {
    let gaps = &analysis.gap_analysis;
    if gaps.is_empty() {
        return;
    }

    let _ = writeln!(output, "## Gap Analysis\n");
    let labelled = [
        ("Experience", &gaps.experience_gaps),
        ("Skills", &gaps.skills_gaps),
        ("Qualifications", &gaps.qualification_gaps),
    ];
    for (label, text) in labelled {
        if let Some(text) = text {
            let _ = writeln!(output, "**{label}:** {text}\n");
        }
    }
}

fn write_section_feedback(output: &mut String, analysis: &AnalysisResult) {
    if analysis.section_detailed_feedback.is_empty() {
        return;
    }

    let _ = writeln!(output, "## Section Feedback\n");
    for (section, feedback) in &analysis.section_detailed_feedback {
        let _ = writeln!(output, "### {section}\n");
        let _ = writeln!(output, "- **Current state:** {}", feedback.current_state);
        let _ = writeln!(output, "- **Problem:** {}", feedback.problem);
        let _ = writeln!(output, "- **Impact:** {}\n", feedback.impact);
    }
}

fn write_basic_analysis(output: &mut String, analysis: &BasicAnalysis) {
    write_score(output, "Match Score", analysis.match_score);
    write_keywords(output, &analysis.missing_keywords);

    let _ = writeln!(output, "## Section Feedback\n");
    let sections = &analysis.section_feedback;
    for (name, text) in [
        ("Summary", &sections.summary),
        ("Experience", &sections.experience),
        ("Skills", &sections.skills),
    ] {
        let _ = writeln!(output, "**{name}:** {text}\n");
    }
}

fn write_upload(output: &mut String, upload: &UploadResponse) {
    let _ = writeln!(output, "| Field | Value |");
    let _ = writeln!(output, "|-------|-------|");
    let _ = writeln!(output, "| File | {} |", escape_markdown(&upload.filename));
    let _ = writeln!(
        output,
        "| Extracted characters | {} |",
        upload.resume_text.chars().count()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Extracted Text\n");
    let _ = writeln!(
        output,
        "```\n{}\n```\n",
        truncate_text(&upload.resume_text, MAX_PREVIEW_LENGTH)
    );
}

fn write_questions(output: &mut String, questions: &GeneratedQuestions) {
    write_numbered(output, "Questions", &questions.questions);
    if !questions.focus_areas.is_empty() {
        let areas: Vec<&str> = questions
            .focus_areas
            .iter()
            .map(|k| k.keyword.as_str())
            .collect();
        let _ = writeln!(output, "**Focus areas:** {}\n", areas.join(", "));
    }
}

fn write_numbered(output: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(output, "## {heading}\n");
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(output, "{}. {item}", i + 1);
    }
    let _ = writeln!(output);
}

fn write_bullets(output: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(output, "### {heading}\n");
    for item in items {
        let _ = writeln!(output, "- {item}");
    }
    let _ = writeln!(output);
}

// ============================================================================
// Interview
// ============================================================================

fn write_interview(output: &mut String, session: &InterviewSession) {
    let _ = writeln!(output, "| Metric | Value |");
    let _ = writeln!(output, "|--------|-------|");
    let _ = writeln!(output, "| Session | {} |", escape_markdown(&session.session_id));
    let _ = writeln!(output, "| Status | {} |", session.phase());
    let _ = writeln!(
        output,
        "| Progress | {} ({}%) |",
        session.question_label(),
        session.progress_percent()
    );
    let _ = writeln!(
        output,
        "| Answered | {} of {} |",
        session.answers().len(),
        session.questions().len()
    );
    let _ = writeln!(output);

    if !session.messages().is_empty() {
        let _ = writeln!(output, "## Transcript\n");
        for message in session.messages() {
            let who = match message.speaker {
                Speaker::Interviewer => "Interviewer",
                Speaker::Candidate => "You",
            };
            let marker = match message.kind {
                MessageKind::Warning => " (warning)",
                MessageKind::Error => " (error)",
                MessageKind::Feedback => " (feedback)",
                _ => "",
            };
            let _ = writeln!(
                output,
                "**{who}{marker}** _{}_\n\n{}\n",
                format_timestamp(&message.timestamp),
                message.content
            );
        }
    }

    if let Some(summary) = session.summary() {
        write_summary(output, summary);
    }
}

fn write_summary(output: &mut String, summary: &InterviewSummary) {
    write_score(output, "Interview Feedback", summary.overall_score);
    write_bullets(output, "Strengths", &summary.strengths);
    write_bullets(output, "Areas to Improve", &summary.improvements);
    write_bullets(output, "Recommendations", &summary.recommendations);
}

// ============================================================================
// STAR rewrite
// ============================================================================

fn write_star_rewrite(output: &mut String, result: &StarRewriteResult) {
    if !result.original.is_empty() {
        let _ = writeln!(output, "## Original\n");
        let _ = writeln!(output, "{}\n", result.original);
    }

    let _ = writeln!(output, "## Rewritten\n");
    let _ = writeln!(output, "{}\n", result.rewritten);

    if let Some(star) = &result.star_breakdown {
        let _ = writeln!(output, "## STAR Breakdown\n");
        let _ = writeln!(output, "- **Situation:** {}", star.situation);
        let _ = writeln!(output, "- **Task:** {}", star.task);
        let _ = writeln!(output, "- **Action:** {}", star.action);
        let _ = writeln!(output, "- **Result:** {}\n", star.result);
    }

    let improvements = &result.improvements;
    if !improvements.before_issues.is_empty() || !improvements.after_strengths.is_empty() {
        let _ = writeln!(output, "## Improvements\n");
        write_bullets(output, "Before", &improvements.before_issues);
        write_bullets(output, "After", &improvements.after_strengths);
    }

    if let Some(delta) = result.impact_score_improvement.filter(|d| d.value() > 0) {
        let _ = writeln!(output, "**Impact score:** +{delta}\n");
    }
    if !result.keywords_added.is_empty() {
        let keywords: Vec<String> = result
            .keywords_added
            .iter()
            .map(|k| format!("`{}`", escape_markdown_inline_code(k)))
            .collect();
        let _ = writeln!(output, "**Keywords added:** {}\n", keywords.join(", "));
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn write_footer(output: &mut String) {
    let _ = writeln!(output, "---");
    let timestamp = format_timestamp(&Utc::now());
    let _ = writeln!(output, "*Generated by HireSense at {timestamp}*");
}

/// Formats a timestamp as "YYYY-MM-DD HH:MM:SS UTC".
fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Escapes Markdown control characters in table cells.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for ch in text.chars() {
        match ch {
            '*' | '_' | '`' | '#' | '[' | ']' | '(' | ')' | '!' | '\\' | '<' | '>' | '|' => {
                result.push('\\');
                result.push(ch);
            }
            '\n' => result.push_str("<br>"),
            _ => result.push(ch),
        }
    }

    result
}

/// Escapes backticks in text intended for inline code.
fn escape_markdown_inline_code(text: &str) -> String {
    text.replace('`', "'")
}

/// Truncates text to `max_chars` characters, adding an ellipsis if needed.
fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================
