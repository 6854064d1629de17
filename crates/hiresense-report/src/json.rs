//! JSON rendering.
//!
//! # Example
//!
//! ```rust
//! use hiresense_core::GeneratedQuestions;
//! use hiresense_report::{json::JsonGenerator, Report};
//!
//! let questions = GeneratedQuestions {
//!     questions: vec!["Tell me about a migration you led.".to_string()],
//!     total: 1,
//!     focus_areas: vec![],
//! };
//!
//! let generator = JsonGenerator::new(Report::Questions(&questions));
//! let json = generator.generate().unwrap();
//! assert!(json.contains("migration"));
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::{Report, ReportError, Result};

/// JSON generator for a [`Report`].
pub struct JsonGenerator<'a> {
    report: Report<'a>,
}

impl<'a> JsonGenerator<'a> {
    /// Creates a new JSON generator.
    #[must_use]
    pub const fn new(report: Report<'a>) -> Self {
        Self { report }
    }

    /// Generates compact JSON (single line).
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Serialization`] if JSON serialization fails.
    pub fn generate(&self) -> Result<String> {
        serde_json::to_string(&self.report).map_err(ReportError::from)
    }

    /// Generates pretty-printed JSON with 2-space indentation.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Serialization`] if JSON serialization fails.
    pub fn generate_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.report).map_err(ReportError::from)
    }

    /// Writes the JSON to `path`, creating or overwriting it.
    /// Parent directories must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Serialization`] if JSON serialization fails.
    /// Returns [`ReportError::Io`] if file creation or writing fails.
    pub fn write_to_file(&self, path: &Path, pretty: bool) -> Result<()> {
        let json = if pretty {
            self.generate_pretty()?
        } else {
            self.generate()?
        };

        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(())
    }
}
