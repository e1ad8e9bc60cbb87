//! Course domain model.
//!
//! # Responsibility
//! - Define the committed course record stored in the ledger.
//! - Enforce record-level invariants on construction and deserialization.
//!
//! # Invariants
//! - `name` is non-empty after trimming.
//! - `credit` is finite and strictly positive.
//! - `grade_point` is resolved from `grade` once, at creation time, and is
//!   never recomputed afterwards.

use crate::model::grade::{Grade, GradeScale, MAX_GRADE_POINT};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failures for course records.
#[derive(Debug, Clone, PartialEq)]
pub enum CourseValidationError {
    /// Course name is blank after trim.
    EmptyName,
    /// Grade label is outside the enumerated set.
    UnknownGrade(String),
    /// Credit is zero, negative, NaN or infinite.
    InvalidCredit(f64),
    /// Stored grade point is outside `0.0..=4.0` or not finite.
    GradePointOutOfRange(f64),
}

impl Display for CourseValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "course name must not be blank"),
            Self::UnknownGrade(value) => write!(f, "unknown letter grade `{value}`"),
            Self::InvalidCredit(value) => {
                write!(f, "credit must be a positive number, got {value}")
            }
            Self::GradePointOutOfRange(value) => write!(
                f,
                "grade point {value} is outside 0.0..={MAX_GRADE_POINT}"
            ),
        }
    }
}

impl Error for CourseValidationError {}

/// One committed course in the ledger.
///
/// Serialized with camelCase field names (`gradePoint`) so persisted
/// snapshots keep the widget's established key layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CourseRecordWire", rename_all = "camelCase")]
pub struct CourseRecord {
    pub name: String,
    pub grade: Grade,
    /// Denormalized point value captured from the active scale.
    pub grade_point: f64,
    /// Credit hours.
    pub credit: f64,
}

impl CourseRecord {
    /// Creates a record, resolving `grade` through `scale`.
    ///
    /// The name is trimmed before storage.
    pub fn new(
        name: impl Into<String>,
        grade: Grade,
        credit: f64,
        scale: GradeScale,
    ) -> Result<Self, CourseValidationError> {
        let record = Self {
            name: name.into().trim().to_string(),
            grade,
            grade_point: scale.points(grade),
            credit,
        };
        record.validate()?;
        Ok(record)
    }

    /// Validates record-level invariants.
    pub fn validate(&self) -> Result<(), CourseValidationError> {
        if self.name.trim().is_empty() {
            return Err(CourseValidationError::EmptyName);
        }
        if !self.credit.is_finite() || self.credit <= 0.0 {
            return Err(CourseValidationError::InvalidCredit(self.credit));
        }
        if !self.grade_point.is_finite() || !(0.0..=MAX_GRADE_POINT).contains(&self.grade_point)
        {
            return Err(CourseValidationError::GradePointOutOfRange(
                self.grade_point,
            ));
        }
        Ok(())
    }

    /// Weighted contribution of this record (`grade_point * credit`).
    pub fn quality_points(&self) -> f64 {
        self.grade_point * self.credit
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseRecordWire {
    name: String,
    grade: String,
    grade_point: f64,
    credit: f64,
}

impl TryFrom<CourseRecordWire> for CourseRecord {
    type Error = CourseValidationError;

    fn try_from(value: CourseRecordWire) -> Result<Self, Self::Error> {
        let grade = Grade::parse(&value.grade)
            .ok_or_else(|| CourseValidationError::UnknownGrade(value.grade.clone()))?;
        let record = Self {
            name: value.name,
            grade,
            grade_point: value.grade_point,
            credit: value.credit,
        };
        record.validate()?;
        Ok(record)
    }
}
