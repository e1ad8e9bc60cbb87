//! Standalone calculators that never touch the ledger.
//!
//! # Responsibility
//! - Quick GPA: strict one-off weighted GPA over candidate rows.
//! - Semester CGPA: combine per-semester GPAs, weighted by credits when any
//!   credits are given, otherwise a simple mean.
//!
//! # Invariants
//! - The quick calculator accepts only complete rows; blank rows are errors.
//! - Semester rows without positive credits still count toward the simple
//!   mean but never toward the weighted one.

use crate::calc::aggregation::{aggregate, format_gpa};
use crate::input::{classify_row, parse_credit, CandidateRow, RowClass};
use crate::model::course::CourseRecord;
use crate::model::grade::GradeScale;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Input failures for the standalone calculators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculatorError {
    /// Quick calculator was given no rows.
    NoRows,
    /// Quick calculator row is blank or partially filled.
    InvalidRow { row_index: usize },
    /// Semester calculator was given no rows.
    NoSemesters,
    /// Semester GPA is missing, negative or not a number.
    InvalidGpa { row_index: usize },
}

impl Display for CalculatorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoRows => write!(f, "enter valid data for all rows"),
            Self::InvalidRow { row_index } => {
                write!(f, "row {} needs a name, grade and positive credit", row_index + 1)
            }
            Self::NoSemesters => write!(f, "add at least one semester"),
            Self::InvalidGpa { row_index } => {
                write!(f, "semester {} needs a GPA of 0 or more", row_index + 1)
            }
        }
    }
}

impl Error for CalculatorError {}

/// Computes a GPA from rows without committing them anywhere.
pub fn quick_gpa(rows: &[CandidateRow], scale: GradeScale) -> Result<f64, CalculatorError> {
    if rows.is_empty() {
        return Err(CalculatorError::NoRows);
    }

    let mut records: Vec<CourseRecord> = Vec::with_capacity(rows.len());
    for (row_index, row) in rows.iter().enumerate() {
        match classify_row(row, scale) {
            RowClass::Complete(record) => records.push(record),
            RowClass::Blank | RowClass::Partial => {
                return Err(CalculatorError::InvalidRow { row_index })
            }
        }
    }

    Ok(aggregate(&records).gpa)
}

/// One semester entry of the CGPA calculator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SemesterRow {
    pub label: String,
    pub gpa: String,
    /// Optional credit total; blank or non-positive means "not weighted".
    pub credits: String,
}

impl SemesterRow {
    pub fn new(
        label: impl Into<String>,
        gpa: impl Into<String>,
        credits: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            gpa: gpa.into(),
            credits: credits.into(),
        }
    }
}

/// Result of combining semester GPAs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cgpa {
    /// Credit-weighted over semesters with positive credits.
    Weighted(f64),
    /// Simple mean over all semesters.
    Unweighted(f64),
}

impl Cgpa {
    pub fn value(self) -> f64 {
        match self {
            Self::Weighted(value) | Self::Unweighted(value) => value,
        }
    }
}

impl Display for Cgpa {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Weighted(value) => write!(f, "Weighted CGPA: {value:.3} (by credits)"),
            Self::Unweighted(value) => write!(f, "Unweighted CGPA: {value:.3} (simple average)"),
        }
    }
}

pub fn semester_cgpa(rows: &[SemesterRow]) -> Result<Cgpa, CalculatorError> {
    if rows.is_empty() {
        return Err(CalculatorError::NoSemesters);
    }

    let mut weighted_sum = 0.0;
    let mut weighted_credits = 0.0;
    let mut simple_sum = 0.0;
    for (row_index, row) in rows.iter().enumerate() {
        let gpa = row
            .gpa
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .ok_or(CalculatorError::InvalidGpa { row_index })?;
        simple_sum += gpa;

        if let Some(credits) = parse_credit(&row.credits) {
            weighted_sum += gpa * credits;
            weighted_credits += credits;
        }
    }

    if weighted_credits > 0.0 {
        Ok(Cgpa::Weighted(weighted_sum / weighted_credits))
    } else {
        Ok(Cgpa::Unweighted(simple_sum / rows.len() as f64))
    }
}

/// Generates default labels `Semester 1..=count`.
pub fn semester_labels(count: usize) -> Vec<String> {
    (1..=count).map(|index| format!("Semester {index}")).collect()
}

/// Quick-calculator result line, e.g. `Calculated GPA: 3.57`.
pub fn quick_gpa_display(gpa: f64) -> String {
    format!("Calculated GPA: {}", format_gpa(gpa))
}

#[cfg(test)]
mod tests {
    use super::{
        quick_gpa, quick_gpa_display, semester_cgpa, semester_labels, CalculatorError, Cgpa,
        SemesterRow,
    };
    use crate::input::CandidateRow;
    use crate::model::grade::GradeScale;

    #[test]
    fn quick_gpa_rejects_blank_rows_unlike_batch_submit() {
        let rows = vec![CandidateRow::new("Calc I", "A", "4"), CandidateRow::blank()];
        assert_eq!(
            quick_gpa(&rows, GradeScale::Campus),
            Err(CalculatorError::InvalidRow { row_index: 1 })
        );
        assert_eq!(quick_gpa(&[], GradeScale::Campus), Err(CalculatorError::NoRows));
    }

    #[test]
    fn quick_gpa_computes_weighted_mean() {
        let rows = vec![
            CandidateRow::new("Calc I", "A", "4"),
            CandidateRow::new("Phys I", "B", "3"),
        ];
        let gpa = quick_gpa(&rows, GradeScale::Campus).expect("valid rows");
        assert_eq!(quick_gpa_display(gpa), "Calculated GPA: 3.57");
    }

    #[test]
    fn semester_cgpa_weights_by_credits_when_present() {
        let rows = vec![
            SemesterRow::new("Semester 1", "3.0", "10"),
            SemesterRow::new("Semester 2", "4.0", "30"),
            SemesterRow::new("Semester 3", "1.0", ""),
        ];
        let result = semester_cgpa(&rows).expect("valid semesters");
        assert_eq!(result, Cgpa::Weighted(3.75));
        assert_eq!(result.to_string(), "Weighted CGPA: 3.750 (by credits)");
    }

    #[test]
    fn semester_cgpa_falls_back_to_simple_mean() {
        let rows = vec![
            SemesterRow::new("Semester 1", "3.0", ""),
            SemesterRow::new("Semester 2", "4.0", "0"),
        ];
        let result = semester_cgpa(&rows).expect("valid semesters");
        assert_eq!(result, Cgpa::Unweighted(3.5));
        assert_eq!(result.to_string(), "Unweighted CGPA: 3.500 (simple average)");
    }

    #[test]
    fn semester_cgpa_rejects_missing_or_negative_gpa() {
        let rows = vec![
            SemesterRow::new("Semester 1", "3.0", "10"),
            SemesterRow::new("Semester 2", "-1", "10"),
        ];
        assert_eq!(
            semester_cgpa(&rows),
            Err(CalculatorError::InvalidGpa { row_index: 1 })
        );
        assert_eq!(semester_cgpa(&[]), Err(CalculatorError::NoSemesters));
    }

    #[test]
    fn semester_labels_are_one_based() {
        assert_eq!(semester_labels(2), vec!["Semester 1", "Semester 2"]);
        assert!(semester_labels(0).is_empty());
    }
}
