//! Aggregate arithmetic and the comparison against reported totals.

use crate::config::VerifierConfig;
use crate::grade::GradeScale;
use crate::output::{CourseRecord, ReportedTriple, VerificationField, VerificationResult};

/// Computes EGP, credits, and GPA for a course list.
#[derive(Debug, Clone, Copy)]
pub struct Verifier<'a> {
    scale: &'a GradeScale,
    tolerance: f64,
}

impl<'a> Verifier<'a> {
    pub fn new(config: &'a VerifierConfig) -> Self {
        Self {
            scale: &config.grade_scale,
            tolerance: config.tolerance,
        }
    }

    /// Σ grade point × earned credit. Grades missing from the scale count 0.
    pub fn earned_grade_points(&self, courses: &[CourseRecord]) -> f64 {
        courses
            .iter()
            .map(|c| f64::from(self.scale.point(&c.grade)) * c.earned)
            .sum()
    }

    /// Σ earned credit.
    pub fn total_credits(&self, courses: &[CourseRecord]) -> f64 {
        courses.iter().map(|c| c.earned).sum()
    }

    /// EGP / credits rounded to two decimals; exactly 0 when no credit was
    /// earned.
    pub fn gpa(&self, courses: &[CourseRecord]) -> f64 {
        let credits = self.total_credits(courses);
        if credits == 0.0 {
            return 0.0;
        }
        round2(self.earned_grade_points(courses) / credits)
    }

    /// Compare the three aggregates with the reported triple, in the order
    /// EGP, credits, GPA.
    pub fn verify(
        &self,
        courses: &[CourseRecord],
        reported: &ReportedTriple,
    ) -> Vec<VerificationResult> {
        let egp = self.earned_grade_points(courses);
        [
            (VerificationField::Egp, egp, reported.earned_grade_points),
            (VerificationField::Credits, self.total_credits(courses), reported.credits),
            (VerificationField::Gpa, self.gpa(courses), reported.gpa),
        ]
        .into_iter()
        .map(|(field, calculated, reported)| VerificationResult {
            field,
            calculated,
            reported,
            matches: (calculated - reported).abs() < self.tolerance,
        })
        .collect()
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::ReportedSource;

    fn course(code: &str, earned: f64, grade: &str) -> CourseRecord {
        CourseRecord {
            code: code.into(),
            credit: earned.max(0.5),
            earned,
            grade: grade.into(),
        }
    }

    fn with_verifier(f: impl FnOnce(Verifier<'_>)) {
        let config = VerifierConfig::default();
        f(Verifier::new(&config));
    }

    #[test]
    fn worked_example() {
        with_verifier(|v| {
            let courses = [course("CS201", 4.0, "A"), course("MA101", 3.0, "B+")];
            assert_eq!(v.earned_grade_points(&courses), 60.0);
            assert_eq!(v.total_credits(&courses), 7.0);
            assert_eq!(v.gpa(&courses), 8.57);
        });
    }

    #[test]
    fn total_credits_is_order_independent() {
        with_verifier(|v| {
            let mut courses = vec![
                course("A101", 4.0, "A"),
                course("B101", 1.5, "C"),
                course("C101", 3.0, "F"),
                course("D101", 0.5, "P"),
            ];
            let forward = v.total_credits(&courses);
            courses.reverse();
            assert_eq!(v.total_credits(&courses), forward);
            assert_eq!(forward, 4.0 + 1.5 + 3.0 + 0.5);
        });
    }

    #[test]
    fn gpa_zero_without_credit() {
        with_verifier(|v| {
            assert_eq!(v.gpa(&[]), 0.0);
            assert_eq!(v.gpa(&[course("CS201", 0.0, "F")]), 0.0);
        });
    }

    #[test]
    fn gpa_within_scale_bounds() {
        with_verifier(|v| {
            let grades = crate::grade::DEFAULT_VOCABULARY;
            for (i, g) in grades.iter().enumerate() {
                let courses: Vec<_> = grades[..=i]
                    .iter()
                    .map(|g2| course("CS101", 1.0 + (i % 4) as f64, g2))
                    .collect();
                let gpa = v.gpa(&courses);
                assert!((0.0..=10.0).contains(&gpa), "{g}: gpa {gpa}");
            }
            assert_eq!(v.gpa(&[course("CS101", 4.0, "A+")]), 10.0);
        });
    }

    #[test]
    fn unknown_grade_contributes_zero() {
        with_verifier(|v| {
            let courses = [course("CS201", 4.0, "A"), course("CS202", 2.0, "D+")];
            assert_eq!(v.earned_grade_points(&courses), 36.0);
            assert_eq!(v.total_credits(&courses), 6.0);
        });
    }

    #[test]
    fn empty_list_matches_zero_triple() {
        with_verifier(|v| {
            let results = v.verify(&[], &ReportedTriple::default());
            assert_eq!(results.len(), 3);
            assert!(results.iter().all(|r| r.matches));
        });
    }

    #[test]
    fn verify_compares_within_tolerance() {
        with_verifier(|v| {
            let courses = [course("CS201", 4.0, "A"), course("MA101", 3.0, "B+")];
            let reported = ReportedTriple {
                credits: 7.0,
                earned_grade_points: 60.05,
                gpa: 8.7,
                source: ReportedSource::Labelled,
            };
            let results = v.verify(&courses, &reported);
            let fields: Vec<_> = results.iter().map(|r| r.field).collect();
            assert_eq!(
                fields,
                vec![VerificationField::Egp, VerificationField::Credits, VerificationField::Gpa]
            );
            assert!(results[0].matches);
            assert!(results[1].matches);
            assert!(!results[2].matches, "8.57 vs 8.7 is outside 0.1");
            assert_eq!(results[2].calculated, 8.57);
            assert_eq!(results[2].reported, 8.7);
        });
    }
}
