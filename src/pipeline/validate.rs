//! Plausibility checks shared by both extraction strategies.
//!
//! A candidate row only becomes a [`CourseRecord`] after
//! [`Validator::is_valid_course_data`] accepts it. Rows that fail are noise
//! (page headers, totals lines, dates next to a code) and are dropped
//! without being reported.

use crate::config::VerifierConfig;
use crate::grade::GradeScale;
use crate::output::CourseRecord;
use once_cell::sync::Lazy;
use regex::Regex;

/// Course code shape used when *searching* a line: 2–4 capitals, 3–4 digits,
/// optional suffix letter, optional asterisk.
pub(crate) const CODE_PATTERN: &str = r"[A-Z]{2,4}\d{3,4}[A-Z]?\*?";

static RE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{CODE_PATTERN}$")).unwrap());

static RE_HYPHEN_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2,4}-\d{3,4}[A-Z]?\*?$").unwrap());

/// Strip everything outside `A–Z`, `+`, `-` from the upper-cased token.
pub fn clean_grade(token: &str) -> String {
    token
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase() || *c == '+' || *c == '-')
        .collect()
}

/// Predicates bound to one configuration's grade scale and credit range.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    scale: &'a GradeScale,
    min_credit: f64,
    max_credit: f64,
}

impl<'a> Validator<'a> {
    pub fn new(config: &'a VerifierConfig) -> Self {
        Self {
            scale: &config.grade_scale,
            min_credit: config.min_credit,
            max_credit: config.max_credit,
        }
    }

    /// Cleaned grade symbol if the token is an accepted grade.
    pub fn grade_symbol(&self, token: &str) -> Option<String> {
        let cleaned = clean_grade(token);
        (!cleaned.is_empty() && self.scale.accepts(&cleaned)).then_some(cleaned)
    }

    pub fn is_valid_grade(&self, token: &str) -> bool {
        self.grade_symbol(token).is_some()
    }

    pub fn is_valid_course_code(&self, token: &str) -> bool {
        let code = token.trim().to_uppercase();
        !code.is_empty() && (RE_CODE.is_match(&code) || RE_HYPHEN_CODE.is_match(&code))
    }

    pub fn is_valid_course_data(&self, code: &str, credit: f64, earned: f64, grade: &str) -> bool {
        self.is_valid_course_code(code)
            && self.min_credit <= credit
            && credit <= self.max_credit
            && 0.0 <= earned
            && earned <= credit
            && self.is_valid_grade(grade)
    }

    /// Validate a candidate row and build the record, normalising the code
    /// to upper case and the grade to its cleaned symbol.
    pub fn accept(&self, code: &str, credit: f64, earned: f64, grade: &str) -> Option<CourseRecord> {
        if !self.is_valid_course_data(code, credit, earned, grade) {
            tracing::trace!(code, credit, earned, grade, "rejected candidate row");
            return None;
        }
        Some(CourseRecord {
            code: code.trim().to_uppercase(),
            credit,
            earned,
            grade: self.grade_symbol(grade)?,
        })
    }
}
