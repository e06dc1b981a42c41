//! Configuration types for transcript verification.
//!
//! All extraction and verification behaviour is controlled through
//! [`VerifierConfig`], built via its [`VerifierConfigBuilder`]. The grade
//! scale and numeric thresholds live here rather than in module-level
//! statics, so two runs with different scales can share a process.

use crate::error::VerifyError;
use crate::grade::GradeScale;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for transcript extraction and verification.
///
/// Built via [`VerifierConfig::builder()`] or using
/// [`VerifierConfig::default()`].
///
/// # Example
/// ```rust
/// use marksheet_verify::VerifierConfig;
///
/// let config = VerifierConfig::builder()
///     .tolerance(0.05)
///     .concurrency(8)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct VerifierConfig {
    /// Grade vocabulary and point table. Default: 10-point scale (A+ = 10).
    pub grade_scale: GradeScale,

    /// Maximum absolute difference for a calculated value to match the
    /// reported one. Default: 0.1.
    pub tolerance: f64,

    /// Smallest credit value a course row may carry. Default: 0.5.
    pub min_credit: f64,

    /// Largest credit value a course row may carry. Default: 5.0.
    pub max_credit: f64,

    /// Number of trailing tokens the column strategy inspects for a grade.
    /// Default: 4.
    ///
    /// Transcript rows end with `… credit earned grade` and occasionally a
    /// remark or a table pipe after the grade. Looking further back starts
    /// picking single-letter words out of course titles.
    pub grade_window: usize,

    /// Plausibility ranges for the positional reported-value fallback.
    pub reported_ranges: ReportedRanges,

    /// Number of documents verified at once by [`crate::verify_batch`].
    /// Default: 4.
    ///
    /// Text extraction is CPU-bound and runs on tokio's blocking pool, so
    /// values far above the core count buy nothing.
    pub concurrency: usize,

    /// PDF user password for encrypted transcripts.
    pub password: Option<String>,

    /// Optional per-document progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            grade_scale: GradeScale::default(),
            tolerance: 0.1,
            min_credit: 0.5,
            max_credit: 5.0,
            grade_window: 4,
            reported_ranges: ReportedRanges::default(),
            concurrency: 4,
            password: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for VerifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifierConfig")
            .field("grade_scale", &self.grade_scale)
            .field("tolerance", &self.tolerance)
            .field("min_credit", &self.min_credit)
            .field("max_credit", &self.max_credit)
            .field("grade_window", &self.grade_window)
            .field("reported_ranges", &self.reported_ranges)
            .field("concurrency", &self.concurrency)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn VerificationProgressCallback>"),
            )
            .finish()
    }
}

impl VerifierConfig {
    /// Create a new builder for `VerifierConfig`.
    pub fn builder() -> VerifierConfigBuilder {
        VerifierConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`VerifierConfig`].
#[derive(Debug)]
pub struct VerifierConfigBuilder {
    config: VerifierConfig,
}

impl VerifierConfigBuilder {
    pub fn grade_scale(mut self, scale: GradeScale) -> Self {
        self.config.grade_scale = scale;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    pub fn credit_range(mut self, min: f64, max: f64) -> Self {
        self.config.min_credit = min;
        self.config.max_credit = max;
        self
    }

    pub fn grade_window(mut self, n: usize) -> Self {
        self.config.grade_window = n.max(1);
        self
    }

    pub fn reported_ranges(mut self, ranges: ReportedRanges) -> Self {
        self.config.reported_ranges = ranges;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<VerifierConfig, VerifyError> {
        let c = &self.config;
        if !(c.tolerance.is_finite() && c.tolerance > 0.0) {
            return Err(VerifyError::InvalidConfig(format!(
                "Tolerance must be a positive number, got {}",
                c.tolerance
            )));
        }
        if !(c.min_credit >= 0.0 && c.min_credit <= c.max_credit && c.max_credit.is_finite()) {
            return Err(VerifyError::InvalidConfig(format!(
                "Credit range must satisfy 0 ≤ min ≤ max, got {}–{}",
                c.min_credit, c.max_credit
            )));
        }
        c.reported_ranges.validate()?;
        if c.concurrency == 0 {
            return Err(VerifyError::InvalidConfig("Concurrency must be ≥ 1".into()));
        }
        Ok(self.config)
    }
}

// ── Reported-value heuristic ranges ──────────────────────────────────────

/// Inclusive ranges a `(credits, EGP, GPA)` triple must fall into to be
/// taken as the transcript's reported totals when no labels are present.
///
/// The defaults describe a single semester on a 10-point scale: 10–40
/// credits, 100–400 grade points, and an average between 5 and 10.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportedRanges {
    pub credits: (f64, f64),
    pub egp: (f64, f64),
    pub gpa: (f64, f64),
}

impl Default for ReportedRanges {
    fn default() -> Self {
        Self {
            credits: (10.0, 40.0),
            egp: (100.0, 400.0),
            gpa: (5.0, 10.0),
        }
    }
}

impl ReportedRanges {
    /// Whether the three numbers fall in their respective ranges.
    pub fn contains(&self, credits: f64, egp: f64, gpa: f64) -> bool {
        within(self.credits, credits) && within(self.egp, egp) && within(self.gpa, gpa)
    }

    fn validate(&self) -> Result<(), VerifyError> {
        for (name, (lo, hi)) in [("credits", self.credits), ("egp", self.egp), ("gpa", self.gpa)] {
            if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
                return Err(VerifyError::InvalidConfig(format!(
                    "Reported {name} range is empty: {lo}–{hi}"
                )));
            }
        }
        Ok(())
    }
}

fn within((lo, hi): (f64, f64), v: f64) -> bool {
    lo <= v && v <= hi
}
