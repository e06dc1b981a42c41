//! Merge the two strategies' rows into the canonical course list.
//!
//! Rows are keyed by course code alone. The first row seen for a code wins
//! and every later row with the same code is dropped, even when its credit
//! or grade differ. Callers pass column-alignment rows first, so on a
//! disagreement the column strategy's reading is the one kept.

use crate::output::CourseRecord;
use std::collections::HashSet;

/// Deduplicate by code, preserving first-seen order.
///
/// Returns the canonical list and the number of rows dropped.
pub fn merge(rows: impl IntoIterator<Item = CourseRecord>) -> (Vec<CourseRecord>, usize) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut dropped = 0;
    let unique = rows
        .into_iter()
        .filter(|row| {
            let fresh = seen.insert(row.code.clone());
            if !fresh {
                tracing::trace!(code = %row.code, "dropping duplicate course row");
                dropped += 1;
            }
            fresh
        })
        .collect();
    (unique, dropped)
}
