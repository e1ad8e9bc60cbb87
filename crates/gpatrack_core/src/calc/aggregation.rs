//! Credit-weighted GPA aggregation.
//!
//! # Invariants
//! - Only records with finite grade point and finite credit > 0 contribute.
//! - No rounding happens during accumulation; rounding is display-only.
//! - Zero total credits yields a GPA of exactly `0.0`.

use crate::model::course::CourseRecord;

/// Aggregated totals over a record sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Aggregation {
    pub gpa: f64,
    pub total_credits: f64,
    pub total_points: f64,
    /// Number of records that contributed to the totals.
    pub course_count: usize,
}

impl Aggregation {
    pub fn gpa_display(&self) -> String {
        format_gpa(self.gpa)
    }

    pub fn credits_display(&self) -> String {
        format_credits(self.total_credits)
    }
}

/// Computes the weighted mean over `records`.
pub fn aggregate<'a>(records: impl IntoIterator<Item = &'a CourseRecord>) -> Aggregation {
    let mut result = Aggregation::default();
    for record in records {
        if !record.grade_point.is_finite() || !record.credit.is_finite() || record.credit <= 0.0 {
            continue;
        }
        result.total_points += record.quality_points();
        result.total_credits += record.credit;
        result.course_count += 1;
    }

    if result.total_credits > 0.0 {
        result.gpa = result.total_points / result.total_credits;
    }
    result
}

/// GPA rendered with two decimals.
pub fn format_gpa(value: f64) -> String {
    format!("{value:.2}")
}

/// Credit total rendered with one decimal.
pub fn format_credits(value: f64) -> String {
    format!("{value:.1}")
}

#[cfg(test)]
mod tests {
    use super::{aggregate, format_credits, format_gpa};
    use crate::model::course::CourseRecord;
    use crate::model::grade::{Grade, GradeScale};

    fn course(name: &str, grade: Grade, credit: f64) -> CourseRecord {
        CourseRecord::new(name, grade, credit, GradeScale::Campus).expect("valid course")
    }

    #[test]
    fn empty_sequence_has_zero_gpa() {
        let result = aggregate(&[]);
        assert_eq!(result.gpa, 0.0);
        assert_eq!(result.total_credits, 0.0);
        assert_eq!(result.course_count, 0);
    }

    #[test]
    fn weighted_mean_matches_worked_example() {
        let courses = vec![course("Calc I", Grade::A, 4.0), course("Phys I", Grade::B, 3.0)];
        let result = aggregate(&courses);

        assert_eq!(result.total_points, 25.0);
        assert_eq!(result.total_credits, 7.0);
        assert!((result.gpa - 25.0 / 7.0).abs() < 1e-12);
        assert_eq!(result.gpa_display(), "3.57");
        assert_eq!(result.credits_display(), "7.0");
    }

    #[test]
    fn zero_credit_records_are_skipped() {
        let mut zero = course("Seminar", Grade::A, 1.0);
        zero.credit = 0.0;
        let courses = vec![zero, course("Lab", Grade::F, 1.0)];

        let result = aggregate(&courses);
        assert_eq!(result.course_count, 1);
        assert_eq!(result.gpa, 0.0);
        assert_eq!(result.total_credits, 1.0);
    }

    #[test]
    fn all_zero_credit_records_give_exact_zero() {
        let mut a = course("A", Grade::A, 1.0);
        a.credit = 0.0;
        let mut b = course("B", Grade::B, 1.0);
        b.credit = 0.0;
        assert_eq!(aggregate(&[a, b]).gpa, 0.0);
    }

    #[test]
    fn gpa_stays_within_scale_bounds() {
        let courses: Vec<CourseRecord> = Grade::ALL
            .iter()
            .enumerate()
            .map(|(index, grade)| course("c", *grade, 0.5 + index as f64))
            .collect();
        let result = aggregate(&courses);
        assert!((0.0..=4.0).contains(&result.gpa));
    }

    #[test]
    fn display_formatting_uses_fixed_decimals() {
        assert_eq!(format_gpa(3.0), "3.00");
        assert_eq!(format_gpa(3.5714), "3.57");
        assert_eq!(format_credits(12.26), "12.3");
        assert_eq!(format_credits(7.0), "7.0");
    }
}
