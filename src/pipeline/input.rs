//! Input resolution: classify a user-supplied path as a PDF or a text file.
//!
//! The magic bytes decide, not the extension: a transcript saved as
//! `report.txt` that is really a PDF still goes through pdfium, and a text
//! dump saved with a `.pdf` name is read as text rather than handed to
//! pdfium to fail on.

use crate::error::VerifyError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extensions picked up when a directory is expanded.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["pdf", "txt"];

/// A document the pipeline knows how to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedInput {
    /// Starts with `%PDF`; text comes from pdfium.
    Pdf(PathBuf),
    /// Plain UTF-8 text, already in the form the extractors consume.
    Text { path: PathBuf, text: String },
}

impl ResolvedInput {
    /// Get the path regardless of the document kind.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedInput::Pdf(p) => p,
            ResolvedInput::Text { path, .. } => path,
        }
    }
}

/// Short name identifying a document in reports and batch output.
pub fn document_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Resolve a local path, validating existence, permission and format.
pub fn resolve_input(path: &Path) -> Result<ResolvedInput, VerifyError> {
    let path = path.to_path_buf();

    if !path.is_file() {
        return Err(VerifyError::FileNotFound { path });
    }

    let mut bytes = Vec::new();
    match std::fs::File::open(&path).and_then(|mut f| f.read_to_end(&mut bytes)) {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(VerifyError::PermissionDenied { path });
        }
        Err(_) => return Err(VerifyError::FileNotFound { path }),
    }

    if bytes.starts_with(b"%PDF") {
        debug!("Resolved PDF transcript: {}", path.display());
        return Ok(ResolvedInput::Pdf(path));
    }

    match String::from_utf8(bytes) {
        Ok(text) => {
            debug!("Resolved text transcript: {}", path.display());
            Ok(ResolvedInput::Text { path, text })
        }
        Err(_) => Err(VerifyError::UnsupportedInput {
            path,
            reason: "not a PDF and not UTF-8 text".into(),
        }),
    }
}

/// Expand directories to their supported files (non-recursive, sorted);
/// other paths are passed through untouched so that a missing file still
/// surfaces as its own error.
pub fn expand_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>, VerifyError> {
    let mut out = Vec::new();
    for path in paths {
        if !path.is_dir() {
            out.push(path.clone());
            continue;
        }
        let entries = std::fs::read_dir(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => {
                VerifyError::PermissionDenied { path: path.clone() }
            }
            _ => VerifyError::Internal(format!("read_dir {}: {e}", path.display())),
        })?;
        let mut files: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && has_supported_extension(p))
            .collect();
        files.sort();
        debug!("Expanded {} to {} documents", path.display(), files.len());
        out.extend(files);
    }
    Ok(out)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
