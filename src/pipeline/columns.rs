//! Column-alignment strategy.
//!
//! Transcript rows look like
//!
//! ```text
//! 3  CS201  Data Structures and Algorithms  4.0  4.0  A
//! ```
//!
//! with a title of any length between the code and the numeric columns. The
//! grade is anchored to the end of the line, so it is searched for backwards
//! from there, and the credit/earned pair is taken as the *last two* numbers
//! before it. Anything numeric earlier in the row (a semester, a serial
//! number, a digit inside the title) is ignored.

use super::normalize::clean_lines;
use super::validate::{Validator, CODE_PATTERN};
use crate::output::CourseRecord;
use once_cell::sync::Lazy;
use regex::Regex;

static RE_CODE_SEARCH: Lazy<Regex> = Lazy::new(|| Regex::new(CODE_PATTERN).unwrap());

static RE_NUMBER_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.?\d*$").unwrap());

/// Extract course rows from every line of `text`.
pub fn extract(text: &str, validator: &Validator<'_>, grade_window: usize) -> Vec<CourseRecord> {
    clean_lines(text)
        .filter_map(|line| extract_line(&line, validator, grade_window))
        .collect()
}

/// Extract at most one course row from a single cleaned line.
pub fn extract_line(
    line: &str,
    validator: &Validator<'_>,
    grade_window: usize,
) -> Option<CourseRecord> {
    let code = RE_CODE_SEARCH.find(line)?.as_str();

    let tokens: Vec<&str> = line.split_whitespace().collect();
    // The code must be a whole token; `CS201:` or `(CS201)` is not a row start.
    let code_idx = tokens.iter().position(|t| *t == code)?;

    // Only the trailing `grade_window` tokens, and never the code itself.
    let floor = tokens.len().saturating_sub(grade_window).max(code_idx + 1);
    let grade_idx = (floor..tokens.len())
        .rev()
        .find(|&i| validator.is_valid_grade(tokens[i]))?;

    let numbers: Vec<f64> = tokens[code_idx + 1..grade_idx]
        .iter()
        .filter(|t| RE_NUMBER_TOKEN.is_match(t))
        .filter_map(|t| t.parse().ok())
        .collect();

    let [.., credit, earned] = numbers.as_slice() else {
        return None;
    };
    validator.accept(code, *credit, *earned, tokens[grade_idx])
}
