//! Pure computations over course data.
//!
//! # Responsibility
//! - Weighted GPA aggregation and display formatting.
//! - Standalone quick-GPA and semester CGPA calculators.
//! - Chart series and counter transitions for the presentation layer.
//!
//! Nothing in this module reads or writes storage.

pub mod aggregation;
pub mod calculators;
pub mod transition;
pub mod trend;
