//! Result types: extracted course rows, reported totals, and verification.
//!
//! Everything here is plain data with `serde` derives so a report can be
//! written as JSON by the CLI or handed to a rendering layer unchanged.

use crate::error::DocumentError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One course row recovered from a transcript.
///
/// Only constructed after validation, so `credit` lies in the configured
/// credit range, `0 ≤ earned ≤ credit`, `code` has the course-code shape, and
/// `grade` is a cleaned symbol from the grade vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub code: String,
    pub credit: f64,
    pub earned: f64,
    pub grade: String,
}

/// Where the reported totals came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportedSource {
    /// `Credits … EGP … SGPA …` labels were found.
    Labelled,
    /// No labels; a run of three numbers fell in the plausible ranges.
    Positional,
    /// Nothing plausible found; all values are zero.
    #[default]
    Missing,
}

/// The totals a transcript states about itself.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportedTriple {
    pub credits: f64,
    pub earned_grade_points: f64,
    pub gpa: f64,
    pub source: ReportedSource,
}

/// Which aggregate a [`VerificationResult`] compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationField {
    Egp,
    Credits,
    Gpa,
}

impl fmt::Display for VerificationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VerificationField::Egp => "EGP",
            VerificationField::Credits => "Credits",
            VerificationField::Gpa => "SGPA",
        })
    }
}

/// A calculated aggregate compared against the reported one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub field: VerificationField,
    pub calculated: f64,
    pub reported: f64,
    pub matches: bool,
}

/// Overall outcome for one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// All three aggregates match the reported values.
    Verified,
    /// Courses were extracted but at least one aggregate disagrees.
    Mismatch,
    /// The text layer was empty or whitespace only.
    NoTextExtracted,
    /// Text was present but neither strategy produced a valid course row.
    NoCoursesFound,
}

impl DocumentStatus {
    /// `true` for the two statuses that carry no course data.
    pub fn is_empty(self) -> bool {
        matches!(self, DocumentStatus::NoTextExtracted | DocumentStatus::NoCoursesFound)
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocumentStatus::Verified => "Correct",
            DocumentStatus::Mismatch => "Wrong",
            DocumentStatus::NoTextExtracted => "No text extracted",
            DocumentStatus::NoCoursesFound => "No data extracted",
        })
    }
}

/// Counters describing how the course list was assembled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Non-empty lines examined.
    pub lines_scanned: usize,
    /// Rows accepted by the column-alignment strategy.
    pub column_rows: usize,
    /// Rows accepted by the fixed-template strategy.
    pub pattern_rows: usize,
    /// Rows discarded because their course code was already seen.
    pub duplicates_dropped: usize,
    /// Wall-clock time for the whole document, including text extraction.
    pub duration_ms: u64,
}

/// Full verification report for one transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Identity of the document, normally its file name.
    pub document: String,
    pub status: DocumentStatus,
    pub courses: Vec<CourseRecord>,
    pub reported: ReportedTriple,
    /// Empty when `status` is [`DocumentStatus::NoTextExtracted`] or
    /// [`DocumentStatus::NoCoursesFound`]; otherwise EGP, credits, GPA.
    pub verification: Vec<VerificationResult>,
    pub stats: ExtractionStats,
}

impl DocumentReport {
    /// Whether every verification row matched. `false` for empty reports.
    pub fn all_match(&self) -> bool {
        !self.verification.is_empty() && self.verification.iter().all(|v| v.matches)
    }

    /// Look up one verification row.
    pub fn result(&self, field: VerificationField) -> Option<&VerificationResult> {
        self.verification.iter().find(|v| v.field == field)
    }
}

/// One document's outcome inside a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEntry {
    pub document: String,
    #[serde(with = "entry_result")]
    pub result: Result<DocumentReport, DocumentError>,
}

/// Totals over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub verified: usize,
    pub mismatched: usize,
    pub empty: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_entries(entries: &[BatchEntry]) -> Self {
        let mut s = BatchSummary {
            total: entries.len(),
            ..Default::default()
        };
        for entry in entries {
            match &entry.result {
                Ok(r) if r.status == DocumentStatus::Verified => s.verified += 1,
                Ok(r) if r.status == DocumentStatus::Mismatch => s.mismatched += 1,
                Ok(_) => s.empty += 1,
                Err(_) => s.failed += 1,
            }
        }
        s
    }

    /// `true` when every document in the batch verified.
    pub fn all_verified(&self) -> bool {
        self.total > 0 && self.verified == self.total
    }
}

/// `Result` has no serde representation of its own; store it as
/// `{"report": …}` or `{"error": …}`.
mod entry_result {
    use super::{DocumentError, DocumentReport};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    enum Repr<R, E> {
        Report(R),
        Error(E),
    }

    pub fn serialize<S: Serializer>(
        value: &Result<DocumentReport, DocumentError>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Ok(r) => Repr::<&DocumentReport, &DocumentError>::Report(r).serialize(serializer),
            Err(e) => Repr::<&DocumentReport, &DocumentError>::Error(e).serialize(serializer),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Result<DocumentReport, DocumentError>, D::Error> {
        Ok(
            match Repr::<DocumentReport, DocumentError>::deserialize(deserializer)? {
                Repr::Report(r) => Ok(r),
                Repr::Error(e) => Err(e),
            },
        )
    }
}
