//! Candidate input rows and batch validation.
//!
//! # Responsibility
//! - Classify free-text input rows as blank, partial or complete.
//! - Turn a batch of rows into committable records with all-or-nothing
//!   semantics.
//!
//! # Invariants
//! - A batch containing any partial row yields no records.
//! - Complete rows keep their relative order; blank rows are skipped.
//! - Credit text must parse as a finite number greater than zero.

use crate::model::course::CourseRecord;
use crate::model::grade::{Grade, GradeScale};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One row of user input, exactly as typed/selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateRow {
    pub name: String,
    /// Selected grade label; empty when nothing is selected.
    pub grade: String,
    /// Credit hours as typed.
    pub credit: String,
}

impl CandidateRow {
    pub fn new(
        name: impl Into<String>,
        grade: impl Into<String>,
        credit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            grade: grade.into(),
            credit: credit.into(),
        }
    }

    pub fn blank() -> Self {
        Self::default()
    }

    /// True when no field carries any input.
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty() && self.grade.trim().is_empty() && self.credit.trim().is_empty()
    }
}

/// Completeness classification of a candidate row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowClass {
    Blank,
    Partial,
    Complete(CourseRecord),
}

/// Parses credit-hour text. Returns `None` unless the value is finite and > 0.
pub fn parse_credit(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
}

/// Classifies one row, resolving its grade through `scale`.
pub fn classify_row(row: &CandidateRow, scale: GradeScale) -> RowClass {
    if row.is_blank() {
        return RowClass::Blank;
    }

    let name = row.name.trim();
    let (Some(grade), Some(credit)) = (Grade::parse(&row.grade), parse_credit(&row.credit)) else {
        return RowClass::Partial;
    };
    if name.is_empty() {
        return RowClass::Partial;
    }

    match CourseRecord::new(name, grade, credit, scale) {
        Ok(record) => RowClass::Complete(record),
        Err(_) => RowClass::Partial,
    }
}

/// Why a batch was refused. Nothing is committed in either case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchRejection {
    /// Row at `row_index` is filled in some but not all fields.
    PartialRow { row_index: usize },
    /// The batch has no complete row.
    EmptyBatch,
}

impl Display for BatchRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PartialRow { row_index } => write!(
                f,
                "row {} is incomplete; fill all fields for courses you have started entering",
                row_index + 1
            ),
            Self::EmptyBatch => write!(f, "add at least one course"),
        }
    }
}

impl Error for BatchRejection {}

/// Validates a batch and returns the records to append, in input order.
pub fn validate_batch(
    rows: &[CandidateRow],
    scale: GradeScale,
) -> Result<Vec<CourseRecord>, BatchRejection> {
    let mut records = Vec::with_capacity(rows.len());
    for (row_index, row) in rows.iter().enumerate() {
        match classify_row(row, scale) {
            RowClass::Blank => {}
            RowClass::Partial => return Err(BatchRejection::PartialRow { row_index }),
            RowClass::Complete(record) => records.push(record),
        }
    }

    if records.is_empty() {
        return Err(BatchRejection::EmptyBatch);
    }
    Ok(records)
}
