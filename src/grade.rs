//! Grade scale: letter grade → grade point.
//!
//! A [`GradeScale`] holds two things that are easy to conflate:
//!
//! * the **vocabulary**: which tokens are accepted as a grade when scanning
//!   a transcript line, and
//! * the **points**: what each grade is worth when computing EGP.
//!
//! They differ on purpose: `D+` is a recognised grade on some transcripts
//! but has no point entry on the default 10-point scale, so it is accepted
//! by extraction and scores 0. Lookup is therefore a total function
//! ([`GradeScale::point`]) rather than an `Option`.

use crate::error::VerifyError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Grades accepted on a transcript line, independent of their point value.
pub const DEFAULT_VOCABULARY: [&str; 16] = [
    "A", "A+", "B", "B+", "C", "C+", "D", "D+", "F", "FF", "U", "UU", "P", "PP", "PASS", "COMP",
];

const DEFAULT_POINTS: [(&str, u8); 15] = [
    ("A+", 10),
    ("A", 9),
    ("B+", 8),
    ("B", 7),
    ("C+", 6),
    ("C", 5),
    ("D", 4),
    ("F", 0),
    ("FF", 0),
    ("U", 0),
    ("UU", 0),
    ("P", 5),
    ("PP", 5),
    ("PASS", 5),
    ("COMP", 5),
];

/// Highest point any grade may carry.
pub const MAX_GRADE_POINT: u8 = 10;

/// Immutable mapping from grade symbol to grade point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeScale {
    points: BTreeMap<String, u8>,
    vocabulary: BTreeSet<String>,
}

impl Default for GradeScale {
    fn default() -> Self {
        Self {
            points: DEFAULT_POINTS
                .iter()
                .map(|(g, p)| (g.to_string(), *p))
                .collect(),
            vocabulary: DEFAULT_VOCABULARY.iter().map(|g| g.to_string()).collect(),
        }
    }
}

impl GradeScale {
    /// Build a scale from a custom point table.
    ///
    /// Symbols are upper-cased. The accepted vocabulary is the default
    /// vocabulary plus every symbol in the table.
    pub fn from_points<I, S>(points: I) -> Result<Self, VerifyError>
    where
        I: IntoIterator<Item = (S, u8)>,
        S: AsRef<str>,
    {
        let mut scale = Self {
            points: BTreeMap::new(),
            vocabulary: DEFAULT_VOCABULARY.iter().map(|g| g.to_string()).collect(),
        };
        for (symbol, point) in points {
            let symbol = symbol.as_ref().trim().to_uppercase();
            if symbol.is_empty() {
                return Err(VerifyError::InvalidConfig(
                    "Grade scale contains an empty grade symbol".into(),
                ));
            }
            if point > MAX_GRADE_POINT {
                return Err(VerifyError::InvalidConfig(format!(
                    "Grade '{symbol}' has point {point}, maximum is {MAX_GRADE_POINT}"
                )));
            }
            scale.vocabulary.insert(symbol.clone());
            scale.points.insert(symbol, point);
        }
        if scale.points.is_empty() {
            return Err(VerifyError::InvalidConfig("Grade scale is empty".into()));
        }
        Ok(scale)
    }

    /// Parse a JSON object of the form `{"A+": 10, "A": 9, ...}`.
    pub fn from_json(json: &str) -> Result<Self, VerifyError> {
        let table: BTreeMap<String, u8> = serde_json::from_str(json)
            .map_err(|e| VerifyError::InvalidConfig(format!("Grade scale JSON: {e}")))?;
        Self::from_points(table)
    }

    /// Grade point for `grade`, case-insensitive. Unknown grades score 0.
    pub fn point(&self, grade: &str) -> u8 {
        let key = grade.trim().to_uppercase();
        self.points.get(&key).copied().unwrap_or(0)
    }

    /// Whether an already-cleaned, upper-case symbol is an accepted grade.
    pub fn accepts(&self, symbol: &str) -> bool {
        self.vocabulary.contains(symbol)
    }

    /// Iterate over `(symbol, point)` pairs in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u8)> {
        self.points.iter().map(|(g, p)| (g.as_str(), *p))
    }
}
