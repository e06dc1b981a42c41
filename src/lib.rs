//! # marksheet-verify
//!
//! Extract course rows from academic transcripts (grade cards, mark sheets)
//! and check that the totals printed on the transcript agree with the
//! courses listed on it.
//!
//! A transcript states, per course, a code, the credit offered, the credit
//! earned, and a letter grade; and, once per semester, the total credits,
//! the earned grade points (EGP), and the semester GPA (SGPA). Those totals
//! are derived from the rows, so a transcript whose totals disagree with its
//! own rows has been mis-printed or altered. This crate recomputes them.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF / text
//!  │
//!  ├─ 1. Input      classify by magic bytes, read UTF-8 text directly
//!  ├─ 2. Text       pdfium text layer per page (CPU-bound, spawn_blocking)
//!  ├─ 3. Normalise  line endings, invisible characters, whitespace
//!  ├─ 4. Extract    column-alignment and fixed-template strategies
//!  ├─ 5. Reconcile  one row per course code, column reading first
//!  ├─ 6. Reported   labelled "Credits … EGP … SGPA …" or positional scan
//!  └─ 7. Verify     EGP, credits, GPA each within tolerance
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use marksheet_verify::{verify_file, DocumentStatus, VerifierConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = VerifierConfig::default();
//!     let report = verify_file("semester3.pdf", &config).await?;
//!     for course in &report.courses {
//!         println!("{} {} {} {}", course.code, course.credit, course.earned, course.grade);
//!     }
//!     if report.status != DocumentStatus::Verified {
//!         eprintln!("{}: {}", report.document, report.status);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `marksheet-verify` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! marksheet-verify = { version = "0.1", default-features = false }
//! ```
//!
//! ## Grade Scale
//!
//! | Grade | Points | | Grade | Points |
//! |-------|--------|-|-------|--------|
//! | `A+`  | 10     | | `C`   | 5      |
//! | `A`   | 9      | | `D`   | 4      |
//! | `B+`  | 8      | | `F` `FF` `U` `UU` | 0 |
//! | `B`   | 7      | | `P` `PP` `PASS` `COMP` | 5 |
//! | `C+`  | 6      | | `D+`  | accepted, scores 0 |
//!
//! Institutions with a different scale pass their own [`GradeScale`].

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod grade;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod verify;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ReportedRanges, VerifierConfig, VerifierConfigBuilder};
pub use error::{DocumentError, VerifyError};
pub use grade::GradeScale;
pub use output::{
    BatchEntry, BatchSummary, CourseRecord, DocumentReport, DocumentStatus, ExtractionStats,
    ReportedSource, ReportedTriple, VerificationField, VerificationResult,
};
pub use pipeline::input::expand_inputs;
pub use pipeline::text::{assemble_text, PageText};
pub use progress::{NoopProgressCallback, ProgressCallback, VerificationProgressCallback};
pub use verify::{
    extract_text, verify_batch, verify_bytes, verify_file, verify_file_sync, verify_text,
    verify_to_file,
};
