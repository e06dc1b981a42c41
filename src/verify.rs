//! Verification entry points.
//!
//! [`verify_text`] is the pure core: text in, [`DocumentReport`] out, no
//! I/O and no failure modes. Everything else here wraps it with document
//! loading ([`verify_file`], [`verify_bytes`]), batching ([`verify_batch`]),
//! or report writing ([`verify_to_file`]).

use crate::config::VerifierConfig;
use crate::error::VerifyError;
use crate::output::{BatchEntry, DocumentReport, DocumentStatus, ExtractionStats, ReportedTriple};
use crate::pipeline::input::{self, ResolvedInput};
use crate::pipeline::validate::Validator;
use crate::pipeline::{columns, normalize, patterns, reconcile, reported, score, text};
use futures::stream::{self, StreamExt};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Extract courses from transcript text and verify them against the
/// totals the text reports.
///
/// Never fails: empty text yields [`DocumentStatus::NoTextExtracted`], text
/// without valid course rows yields [`DocumentStatus::NoCoursesFound`], and
/// missing reported totals are compared as zeros.
///
/// # Example
/// ```rust
/// use marksheet_verify::{verify_text, DocumentStatus, VerifierConfig};
///
/// let text = "CS201 Data Structures 4.0 4.0 A\n\
///             MA202 Linear Algebra 3.0 3.0 B+\n\
///             Credits 7.0 EGP 60.0 SGPA 8.57\n";
/// let report = verify_text("sem3.txt", text, &VerifierConfig::default());
/// assert_eq!(report.status, DocumentStatus::Verified);
/// assert_eq!(report.courses.len(), 2);
/// ```
pub fn verify_text(
    document: impl Into<String>,
    raw_text: &str,
    config: &VerifierConfig,
) -> DocumentReport {
    let start = Instant::now();
    let document = document.into();

    if raw_text.trim().is_empty() {
        info!("{}: no text extracted", document);
        return DocumentReport {
            document,
            status: DocumentStatus::NoTextExtracted,
            courses: Vec::new(),
            reported: ReportedTriple::default(),
            verification: Vec::new(),
            stats: ExtractionStats {
                duration_ms: start.elapsed().as_millis() as u64,
                ..Default::default()
            },
        };
    }

    let text = normalize::normalise_text(raw_text);
    let validator = Validator::new(config);

    // ── Both strategies, column alignment first ──────────────────────────
    let by_columns = columns::extract(&text, &validator, config.grade_window);
    let by_patterns = patterns::extract(&text, &validator);
    let column_rows = by_columns.len();
    let pattern_rows = by_patterns.len();
    let (courses, duplicates_dropped) = reconcile::merge(by_columns.into_iter().chain(by_patterns));
    debug!(
        "{}: {} column rows, {} pattern rows, {} duplicates dropped",
        document, column_rows, pattern_rows, duplicates_dropped
    );

    // ── Reported totals ──────────────────────────────────────────────────
    let reported = reported::find(&text, &config.reported_ranges);
    debug!("{}: reported totals from {:?}", document, reported.source);

    // ── Verify ───────────────────────────────────────────────────────────
    let (status, verification) = if courses.is_empty() {
        (DocumentStatus::NoCoursesFound, Vec::new())
    } else {
        let verification = score::Verifier::new(config).verify(&courses, &reported);
        let status = if verification.iter().all(|v| v.matches) {
            DocumentStatus::Verified
        } else {
            DocumentStatus::Mismatch
        };
        (status, verification)
    };

    let stats = ExtractionStats {
        lines_scanned: normalize::clean_lines(&text).count(),
        column_rows,
        pattern_rows,
        duplicates_dropped,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "{}: {} courses, status {:?}, {}ms",
        document,
        courses.len(),
        status,
        stats.duration_ms
    );

    DocumentReport {
        document,
        status,
        courses,
        reported,
        verification,
        stats,
    }
}

/// Read a transcript's text, from pdfium for PDFs or directly for text files.
pub async fn extract_text(
    path: impl AsRef<Path>,
    config: &VerifierConfig,
) -> Result<String, VerifyError> {
    match input::resolve_input(path.as_ref())? {
        ResolvedInput::Text { text, .. } => Ok(text),
        ResolvedInput::Pdf(pdf) => {
            let pages = text::extract_pdf_text(&pdf, config.password.as_deref()).await?;
            Ok(text::assemble_text(&pages))
        }
    }
}

/// Verify one transcript file (PDF or UTF-8 text).
///
/// # Errors
/// Only when the document cannot be read at all: missing file, unsupported
/// format, encrypted or corrupt PDF, or pdfium unavailable.
pub async fn verify_file(
    path: impl AsRef<Path>,
    config: &VerifierConfig,
) -> Result<DocumentReport, VerifyError> {
    let start = Instant::now();
    let path = path.as_ref();
    let name = input::document_name(path);
    info!("Verifying {}", path.display());

    let text = extract_text(path, config).await?;
    let mut report = verify_text(name, &text, config);
    report.stats.duration_ms = start.elapsed().as_millis() as u64;
    Ok(report)
}

/// Synchronous wrapper around [`verify_file`].
///
/// Creates a temporary tokio runtime internally.
pub fn verify_file_sync(
    path: impl AsRef<Path>,
    config: &VerifierConfig,
) -> Result<DocumentReport, VerifyError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| VerifyError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(verify_file(path, config))
}

/// Verify a transcript held in memory, e.g. an uploaded file.
///
/// The bytes are written to a managed [`tempfile`] that is removed on
/// return; the report is named after `document`, not the temp file.
pub async fn verify_bytes(
    document: impl Into<String>,
    bytes: &[u8],
    config: &VerifierConfig,
) -> Result<DocumentReport, VerifyError> {
    let mut tmp = tempfile::NamedTempFile::new()
        .map_err(|e| VerifyError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| VerifyError::Internal(format!("tempfile write: {e}")))?;
    let mut report = verify_file(tmp.path(), config).await?;
    report.document = document.into();
    Ok(report)
}

/// Verify many transcripts concurrently.
///
/// Each document is isolated: a failure becomes a [`crate::DocumentError`]
/// in its own [`BatchEntry`] and the rest of the batch carries on. Entries
/// are returned in input order.
pub async fn verify_batch(paths: &[PathBuf], config: &VerifierConfig) -> Vec<BatchEntry> {
    let total = paths.len();
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let mut entries: Vec<(usize, BatchEntry)> = stream::iter(paths.iter().enumerate().map(
        |(idx, path)| async move {
            let doc_num = idx + 1;
            let name = input::document_name(path);
            if let Some(ref cb) = config.progress_callback {
                cb.on_document_start(doc_num, total, &name);
            }
            let result = verify_file(path, config).await.map_err(|e| {
                warn!("{}: {}", name, e);
                e.into_document_error(name.clone())
            });
            if let Some(ref cb) = config.progress_callback {
                match &result {
                    Ok(report) => cb.on_document_complete(doc_num, total, &name, report.status),
                    Err(e) => cb.on_document_error(doc_num, total, &name, &e.to_string()),
                }
            }
            (
                idx,
                BatchEntry {
                    document: name,
                    result,
                },
            )
        },
    ))
    .buffer_unordered(config.concurrency.max(1))
    .collect()
    .await;

    // Sort by input position for consistent output
    entries.sort_by_key(|(idx, _)| *idx);

    let succeeded = entries.iter().filter(|(_, e)| e.result.is_ok()).count();
    info!("Batch complete: {}/{} documents read", succeeded, total);
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total, succeeded);
    }

    entries.into_iter().map(|(_, e)| e).collect()
}

/// Verify a transcript and write its JSON report.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn verify_to_file(
    path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &VerifierConfig,
) -> Result<DocumentReport, VerifyError> {
    let report = verify_file(path, config).await?;
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| VerifyError::Internal(format!("serialise report: {e}")))?;
    write_atomic(output_path.as_ref(), json.as_bytes()).await?;
    Ok(report)
}

/// Write `contents` to `path` via a sibling temp file and a rename.
pub async fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), VerifyError> {
    let write_err = |source| VerifyError::ReportWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, contents).await.map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;
    Ok(())
}
