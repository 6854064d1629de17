//! Résumé file loading and client-side PDF checks.

use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::backend::PdfUpload;
use crate::error::{HireSenseError, Result, ValidationError};

/// Maximum accepted résumé size in bytes (10MB).
pub const MAX_RESUME_SIZE: u64 = 10 * 1024 * 1024;

/// Leading bytes of every PDF file.
const PDF_MAGIC: &[u8] = b"%PDF-";

/// A résumé PDF that passed client-side checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeDocument {
    /// Where the file was read from, if it came from disk.
    pub path: Option<PathBuf>,

    /// File name sent to the backend.
    pub file_name: String,

    /// Raw file contents.
    pub bytes: Bytes,
}

impl ResumeDocument {
    /// Loads and checks a résumé from disk.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingResume` if the file doesn't exist,
    /// `ValidationError::ResumeTooLarge` if it exceeds [`MAX_RESUME_SIZE`] and
    /// `ValidationError::NotPdf` if it is not a PDF.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let metadata = std::fs::metadata(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HireSenseError::Validation(ValidationError::MissingResume)
            } else {
                HireSenseError::Io(e)
            }
        })?;
        if !metadata.is_file() {
            return Err(ValidationError::MissingResume.into());
        }
        check_size(metadata.len())?;

        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("resume.pdf")
            .to_string();

        let mut doc = Self::from_bytes(file_name, bytes)?;
        doc.path = Some(path.to_path_buf());
        Ok(doc)
    }

    /// Checks an in-memory file.
    ///
    /// A file is a PDF when its name ends in `.pdf` (any case) and its
    /// contents start with `%PDF-`.
    pub fn from_bytes(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Result<Self> {
        let file_name = file_name.into();
        let bytes = bytes.into();

        check_size(bytes.len() as u64)?;
        if !has_pdf_extension(&file_name) || !bytes.starts_with(PDF_MAGIC) {
            return Err(ValidationError::NotPdf.into());
        }

        Ok(Self {
            path: None,
            file_name,
            bytes,
        })
    }

    /// Returns the size of the file in bytes.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// Returns the multipart part for this file.
    #[must_use]
    pub fn to_upload(&self) -> PdfUpload {
        PdfUpload {
            file_name: self.file_name.clone(),
            bytes: self.bytes.clone(),
        }
    }
}

fn has_pdf_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn check_size(size: u64) -> Result<()> {
    if size > MAX_RESUME_SIZE {
        return Err(ValidationError::ResumeTooLarge {
            size_kb: size / 1024,
            limit_kb: MAX_RESUME_SIZE / 1024,
        }
        .into());
    }
    Ok(())
}
