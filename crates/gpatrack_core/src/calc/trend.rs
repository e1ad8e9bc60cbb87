//! Chart-ready trend data derived from the ledger.

use crate::model::course::CourseRecord;
use crate::model::grade::MAX_GRADE_POINT;

/// Labels and grade points in ledger order, plus the y-axis ceiling.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub labels: Vec<String>,
    pub points: Vec<f64>,
    pub y_max: f64,
}

pub fn trend_series(records: &[CourseRecord]) -> TrendSeries {
    TrendSeries {
        labels: records.iter().map(|record| record.name.clone()).collect(),
        points: records.iter().map(|record| record.grade_point).collect(),
        y_max: MAX_GRADE_POINT,
    }
}
