//! PDF text extraction via pdfium, and assembly of page text into the single
//! text blob the extractors consume.
//!
//! ## Why spawn_blocking?
//!
//! `pdfium-render` wraps the pdfium C++ library, which keeps thread-local
//! state and does blocking CPU work. [`extract_pdf_text`] therefore runs on
//! tokio's blocking pool so a batch of documents never stalls the runtime's
//! worker threads.
//!
//! ## Binding
//!
//! pdfium is loaded at runtime, first match wins:
//!
//! 1. the directory named by `PDFIUM_LIB_PATH`,
//! 2. the current working directory,
//! 3. the system library search path.

use crate::error::VerifyError;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

/// Text recovered from one page, plus any table rows a richer extractor
/// detected on it (pdfium itself does not detect tables).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageText {
    pub text: String,
    pub tables: Vec<Vec<Vec<String>>>,
}

/// Flatten pages into one document text.
///
/// Each page contributes its text and a newline, then every table row as a
/// line of trimmed cells joined by `" | "`. The column strategy treats the
/// pipes as ordinary tokens, which is what lets a table row whose cells were
/// split across text runs still parse as one course row.
pub fn assemble_text(pages: &[PageText]) -> String {
    let mut out = String::new();
    for page in pages {
        if !page.text.is_empty() {
            out.push_str(&page.text);
            out.push('\n');
        }
        for row in page.tables.iter().flatten() {
            let cells: Vec<&str> = row.iter().map(|c| c.trim()).collect();
            out.push_str(&cells.join(" | "));
            out.push('\n');
        }
    }
    out
}

/// Extract the text layer of every page of a PDF.
pub async fn extract_pdf_text(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<Vec<PageText>, VerifyError> {
    let path = pdf_path.to_path_buf();
    let pwd = password.map(|s| s.to_string());

    tokio::task::spawn_blocking(move || extract_pdf_text_blocking(&path, pwd.as_deref()))
        .await
        .map_err(|e| VerifyError::Internal(format!("Text extraction task panicked: {}", e)))?
}

fn bind_pdfium() -> Result<Pdfium, VerifyError> {
    let bindings = match std::env::var_os("PDFIUM_LIB_PATH") {
        Some(dir) => {
            let dir = dir.to_string_lossy().into_owned();
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir))
        }
        None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(|e| VerifyError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

/// Blocking implementation of text extraction.
fn extract_pdf_text_blocking(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<Vec<PageText>, VerifyError> {
    let pdfium = bind_pdfium()?;

    let document = pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                VerifyError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                VerifyError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            VerifyError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })?;

    let pages = document.pages();
    info!("PDF loaded: {} pages", pages.len());

    let mut results = Vec::with_capacity(pages.len() as usize);
    for (idx, page) in pages.iter().enumerate() {
        match page.text() {
            Ok(text) => {
                let text = text.all();
                debug!("Page {} → {} chars of text", idx + 1, text.len());
                results.push(PageText {
                    text,
                    tables: Vec::new(),
                });
            }
            Err(e) => warn!("Skipping page {} (no readable text layer): {:?}", idx + 1, e),
        }
    }

    Ok(results)
}
