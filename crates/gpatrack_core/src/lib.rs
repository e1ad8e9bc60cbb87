//! Core domain logic for gpatrack.
//! This crate is the single source of truth for ledger and GPA invariants.

pub mod calc;
pub mod clock;
pub mod config;
pub mod db;
pub mod input;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod undo;

pub use calc::aggregation::{aggregate, format_credits, format_gpa, Aggregation};
pub use calc::calculators::{
    quick_gpa, quick_gpa_display, semester_cgpa, semester_labels, CalculatorError, Cgpa,
    SemesterRow,
};
pub use calc::transition::ValueTransition;
pub use calc::trend::{trend_series, TrendSeries};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::TrackerConfig;
pub use input::{classify_row, validate_batch, BatchRejection, CandidateRow, RowClass};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::course::{CourseRecord, CourseValidationError};
pub use model::grade::{grade_point_for, Grade, GradeScale};
pub use model::theme::ThemePreference;
pub use repo::kv_repo::{KeyValueStore, SqliteKeyValueStore, StoreError, StoreResult};
pub use repo::ledger_repo::{LedgerStore, ALL_COURSES_KEY, THEME_KEY};
pub use service::tracker_service::{GpaTracker, TrackerError, TrackerResult};
pub use undo::{PendingDeletion, UndoBuffer, UndoTicket, DEFAULT_UNDO_WINDOW};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
