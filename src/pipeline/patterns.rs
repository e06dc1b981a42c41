//! Fixed-template strategy.
//!
//! Two regular templates, tried in order on each cleaned line:
//!
//! 1. `CODE credit earned GRADE` with nothing but whitespace in between;
//! 2. `CODE title… credit earned GRADE` where the title is letters and spaces.
//!
//! Unlike the column strategy this one can pick up several rows from a
//! single line, which happens when a two-column transcript layout is
//! flattened into one text line per visual row.

use super::normalize::clean_lines;
use super::validate::{Validator, CODE_PATTERN};
use crate::output::CourseRecord;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashSet;

static TEMPLATES: Lazy<[Regex; 2]> = Lazy::new(|| {
    let num = r"(\d+\.?\d*)";
    let grade = r"([A-Z][+-]?)";
    [
        Regex::new(&format!(r"({CODE_PATTERN})\s+{num}\s+{num}\s+{grade}")).unwrap(),
        Regex::new(&format!(
            r"({CODE_PATTERN})\s+[A-Za-z\s]+\s+{num}\s+{num}\s+{grade}"
        ))
        .unwrap(),
    ]
});

/// Extract course rows from every line of `text`.
pub fn extract(text: &str, validator: &Validator<'_>) -> Vec<CourseRecord> {
    clean_lines(text)
        .flat_map(|line| extract_line(&line, validator))
        .collect()
}

/// Extract all rows the templates find in one cleaned line.
///
/// A later template never re-captures a code an earlier one already took
/// from the same line.
pub fn extract_line(line: &str, validator: &Validator<'_>) -> Vec<CourseRecord> {
    let mut found = Vec::new();
    let mut taken: HashSet<String> = HashSet::new();

    for template in TEMPLATES.iter() {
        let mut from_this_template = Vec::new();
        for caps in template.captures_iter(line) {
            let Some(record) = accept_captures(&caps, validator) else {
                continue;
            };
            if !taken.contains(&record.code) {
                from_this_template.push(record);
            }
        }
        taken.extend(from_this_template.iter().map(|r| r.code.clone()));
        found.extend(from_this_template);
    }

    found
}

fn accept_captures(caps: &Captures<'_>, validator: &Validator<'_>) -> Option<CourseRecord> {
    let credit: f64 = caps[2].parse().ok()?;
    let earned: f64 = caps[3].parse().ok()?;
    validator.accept(&caps[1], credit, earned, &caps[4])
}
