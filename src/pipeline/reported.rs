//! Find the totals a transcript reports about itself.
//!
//! Most transcripts print a summary such as `Credits 20 EGP 180 SGPA 9.00`.
//! When the labels are present they are authoritative. When they are not
//! (labels rendered as images, split across table cells, or localised), the
//! fallback scans every number in the text for the first consecutive run of
//! three that looks like `(credits, EGP, GPA)` by magnitude alone.

use crate::config::ReportedRanges;
use crate::output::{ReportedSource, ReportedTriple};
use once_cell::sync::Lazy;
use regex::Regex;

static RE_LABELLED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Credits\s*(\d+\.?\d*)\s*EGP\s*(\d+\.?\d*)\s*SGPA\s*(\d+\.\d+)").unwrap()
});

static RE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+\.?\d*").unwrap());

/// Locate the reported `(credits, EGP, GPA)` triple in raw document text.
///
/// Returns an all-zero triple with [`ReportedSource::Missing`] when neither
/// search succeeds.
pub fn find(text: &str, ranges: &ReportedRanges) -> ReportedTriple {
    if let Some(triple) = find_labelled(text) {
        return triple;
    }
    find_positional(text, ranges).unwrap_or_default()
}

fn find_labelled(text: &str) -> Option<ReportedTriple> {
    let caps = RE_LABELLED.captures(text)?;
    Some(ReportedTriple {
        credits: caps[1].parse().ok()?,
        earned_grade_points: caps[2].parse().ok()?,
        gpa: caps[3].parse().ok()?,
        source: ReportedSource::Labelled,
    })
}

fn find_positional(text: &str, ranges: &ReportedRanges) -> Option<ReportedTriple> {
    let numbers: Vec<f64> = RE_NUMBER
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();

    numbers
        .windows(3)
        .find(|w| ranges.contains(w[0], w[1], w[2]))
        .map(|w| ReportedTriple {
            credits: w[0],
            earned_grade_points: w[1],
            gpa: w[2],
            source: ReportedSource::Positional,
        })
}
