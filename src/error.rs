use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfSplitError {
    #[error("Invalid range: {reason}")]
    InvalidRange { reason: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("PDF file not found: {path}")]
    FileNotFound { path: String },

    #[error("{reason}: {path}")]
    InvalidPath { path: String, reason: String },

    #[error("Path is not a file: {path}")]
    NotAFile { path: String },

    #[error("File is not a PDF: {path} (expected .pdf extension)")]
    NotAPdf { path: String },

    #[error("Output directory error: {reason}")]
    OutputDirectory { reason: String },

    #[error("PDF processing failed: {reason}")]
    Processing { reason: String },
}

/// Coarse category of a [`PdfSplitError`], recorded on error results so
/// callers can tell bad input apart from a failed split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Validation,
    Input,
    Processing,
}

impl PdfSplitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRange { .. } | Self::InvalidConfig { .. } => ErrorKind::Validation,
            Self::FileNotFound { .. }
            | Self::InvalidPath { .. }
            | Self::NotAFile { .. }
            | Self::NotAPdf { .. }
            | Self::OutputDirectory { .. } => ErrorKind::Input,
            Self::Processing { .. } => ErrorKind::Processing,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    pub(crate) fn range(reason: impl Into<String>) -> Self {
        Self::InvalidRange {
            reason: reason.into(),
        }
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    pub(crate) fn processing(reason: impl Into<String>) -> Self {
        Self::Processing {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PdfSplitError>;
