//! Error types for the marksheet-verify library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`VerifyError`]: **Fatal** for one document: the file is missing, not
//!   a PDF or text file, encrypted, or pdfium cannot be loaded. Returned as
//!   `Err(VerifyError)` from the single-document `verify_*` functions.
//!
//! * [`DocumentError`]: **Non-fatal** inside a batch: one document failed
//!   but the others are fine. Stored inside [`crate::output::BatchEntry`] so a
//!   bulk run reports every file instead of stopping at the first bad one.
//!
//! An empty text layer, a transcript with no recognisable course rows, or a
//! document without reported totals are *not* errors. They surface as
//! [`crate::output::DocumentStatus`] and [`crate::output::ReportedSource`]
//! values on an otherwise successful report.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the marksheet-verify library.
#[derive(Debug, Error)]
pub enum VerifyError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Transcript file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file is neither a PDF nor UTF-8 text.
    #[error("Unsupported input '{path}': {reason}")]
    UnsupportedInput { path: PathBuf, reason: String },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Text extraction from PDF files needs the pdfium shared library.\n\
  • Set PDFIUM_LIB_PATH=/path/to/dir/containing/libpdfium, or\n\
  • place libpdfium next to the working directory, or\n\
  • install it system-wide.\n\
Plain-text transcripts (.txt) do not need pdfium.\n"
    )]
    PdfiumBindingFailed(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the JSON report file.
    #[error("Failed to write report file '{path}': {source}")]
    ReportWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed, or a custom grade scale was malformed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl VerifyError {
    /// Convert into the batch-level error for the named document.
    pub fn into_document_error(self, document: impl Into<String>) -> DocumentError {
        let document = document.into();
        let detail = self.to_string();
        match self {
            VerifyError::FileNotFound { .. }
            | VerifyError::PermissionDenied { .. }
            | VerifyError::UnsupportedInput { .. } => DocumentError::Input { document, detail },
            VerifyError::CorruptPdf { .. }
            | VerifyError::PasswordRequired { .. }
            | VerifyError::WrongPassword { .. }
            | VerifyError::PdfiumBindingFailed(_) => DocumentError::Extraction { document, detail },
            VerifyError::ReportWriteFailed { .. }
            | VerifyError::InvalidConfig(_)
            | VerifyError::Internal(_) => DocumentError::Internal { document, detail },
        }
    }
}

/// A non-fatal error for a single document in a batch.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum DocumentError {
    /// The file could not be opened or is not a supported format.
    #[error("{document}: {detail}")]
    Input { document: String, detail: String },

    /// The document opened but its text layer could not be read.
    #[error("{document}: text extraction failed: {detail}")]
    Extraction { document: String, detail: String },

    /// Anything else, including a panicked worker task.
    #[error("{document}: internal error: {detail}")]
    Internal { document: String, detail: String },
}

impl DocumentError {
    /// Name of the document this error belongs to.
    pub fn document(&self) -> &str {
        match self {
            DocumentError::Input { document, .. }
            | DocumentError::Extraction { document, .. }
            | DocumentError::Internal { document, .. } => document,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_display() {
        let e = VerifyError::FileNotFound {
            path: PathBuf::from("/tmp/missing.pdf"),
        };
        assert!(e.to_string().contains("missing.pdf"), "got: {e}");
    }

    #[test]
    fn input_errors_map_to_input_variant() {
        let e = VerifyError::UnsupportedInput {
            path: PathBuf::from("scan.bin"),
            reason: "not UTF-8".into(),
        };
        let doc = e.into_document_error("scan.bin");
        assert!(matches!(doc, DocumentError::Input { .. }));
        assert_eq!(doc.document(), "scan.bin");
        assert!(doc.to_string().contains("not UTF-8"));
    }

    #[test]
    fn pdf_errors_map_to_extraction_variant() {
        let e = VerifyError::PasswordRequired {
            path: PathBuf::from("locked.pdf"),
        };
        let doc = e.into_document_error("locked.pdf");
        assert!(matches!(doc, DocumentError::Extraction { .. }));
        assert!(doc.to_string().starts_with("locked.pdf"));
    }

    #[test]
    fn document_error_serialises() {
        let e = DocumentError::Internal {
            document: "a.pdf".into(),
            detail: "task panicked".into(),
        };
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("a.pdf"));
        let back: DocumentError = serde_json::from_str(&json).unwrap();
        assert_eq!(back.document(), "a.pdf");
    }
}
