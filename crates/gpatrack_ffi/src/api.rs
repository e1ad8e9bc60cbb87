//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose tracker operations to Dart via FRB through one opaque handle.
//! - Flatten core results into plain-data envelopes for the UI.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Indices are `u32` on the wire and bounds-checked by core.
//! - The handle serializes access to its tracker; the UI thread is the only
//!   expected caller.

use gpatrack_core::{
    core_version as core_version_inner, format_credits, format_gpa,
    init_logging as init_logging_inner, ping as ping_inner, quick_gpa as quick_gpa_inner,
    quick_gpa_display, semester_cgpa as semester_cgpa_inner, semester_labels, Aggregation,
    CandidateRow, CourseRecord, GpaTracker, Grade, SemesterRow, SqliteKeyValueStore,
    ThemePreference, TrackerConfig, TrackerError, ValueTransition,
};
use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Letter grades offered by the grade picker, best first.
#[flutter_rust_bridge::frb(sync)]
pub fn grade_options() -> Vec<String> {
    Grade::ALL
        .iter()
        .map(|grade| grade.as_str().to_string())
        .collect()
}

/// One editable input row as the UI holds it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseInput {
    pub name: String,
    /// Selected grade label, empty when unset.
    pub grade: String,
    pub credit: String,
}

impl From<CourseInput> for CandidateRow {
    fn from(value: CourseInput) -> Self {
        CandidateRow::new(value.name, value.grade, value.credit)
    }
}

impl From<&CandidateRow> for CourseInput {
    fn from(value: &CandidateRow) -> Self {
        Self {
            name: value.name.clone(),
            grade: value.grade.clone(),
            credit: value.credit.clone(),
        }
    }
}

/// Committed course row for the ledger table.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseView {
    pub name: String,
    pub grade: String,
    pub grade_point: f64,
    pub credit: f64,
    /// Grade point with two decimals.
    pub grade_point_display: String,
    /// Credit with one decimal.
    pub credit_display: String,
}

impl From<&CourseRecord> for CourseView {
    fn from(value: &CourseRecord) -> Self {
        Self {
            name: value.name.clone(),
            grade: value.grade.as_str().to_string(),
            grade_point: value.grade_point,
            credit: value.credit,
            grade_point_display: format_gpa(value.grade_point),
            credit_display: format_credits(value.credit),
        }
    }
}

/// Dashboard totals.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationView {
    pub gpa: f64,
    pub total_credits: f64,
    pub course_count: u32,
    pub gpa_display: String,
    pub credits_display: String,
}

impl From<Aggregation> for AggregationView {
    fn from(value: Aggregation) -> Self {
        Self {
            gpa: value.gpa,
            total_credits: value.total_credits,
            course_count: u32::try_from(value.course_count).unwrap_or(u32::MAX),
            gpa_display: value.gpa_display(),
            credits_display: value.credits_display(),
        }
    }
}

/// Chart input in ledger order.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendView {
    pub labels: Vec<String>,
    pub points: Vec<f64>,
    pub y_max: f64,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Stable machine-readable failure code, empty on success.
    pub error_code: String,
    /// Human-readable message for toasts/alerts.
    pub message: String,
    /// Operation-specific count (e.g. courses added), when meaningful.
    pub count: Option<u32>,
}

impl ActionResponse {
    fn success(message: impl Into<String>, count: Option<u32>) -> Self {
        Self {
            ok: true,
            error_code: String::new(),
            message: message.into(),
            count,
        }
    }

    fn failure(err: &TrackerError) -> Self {
        Self {
            ok: false,
            error_code: tracker_error_code(err).to_string(),
            message: err.to_string(),
            count: None,
        }
    }

    fn from_result(result: Result<String, TrackerError>) -> Self {
        match result {
            Ok(message) => Self::success(message, None),
            Err(err) => Self::failure(&err),
        }
    }
}

/// Result of a delete, carrying what the host needs to schedule expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResponse {
    pub ok: bool,
    pub error_code: String,
    pub message: String,
    /// Pass back to [`TrackerHandle::expire_undo`] when the timer fires.
    pub undo_generation: Option<u64>,
    pub undo_window_ms: u64,
}

/// Result of a standalone calculator call.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorResponse {
    pub ok: bool,
    pub value: Option<f64>,
    /// Result line or validation message.
    pub message: String,
}

/// Opaque tracker session owned by the UI.
#[flutter_rust_bridge::frb(opaque)]
pub struct TrackerHandle {
    tracker: Mutex<GpaTracker<SqliteKeyValueStore>>,
}

impl TrackerHandle {
    /// Opens a tracker session.
    ///
    /// `db_path = None` resolves the path from `GPATRACK_DB_PATH` or falls
    /// back to the temp directory. File logging starts when
    /// `GPATRACK_LOG_DIR` is set; a logging failure is logged and never
    /// fails the open.
    #[flutter_rust_bridge::frb(sync)]
    pub fn open(db_path: Option<String>) -> Result<TrackerHandle, String> {
        let mut config = TrackerConfig::from_env();
        if let Some(path) = db_path
            .map(|raw| raw.trim().to_string())
            .filter(|path| !path.is_empty())
        {
            config.db_path = PathBuf::from(path);
        }
        Self::open_with_config(&config)
    }

    fn open_with_config(config: &TrackerConfig) -> Result<TrackerHandle, String> {
        if let Err(err) = config.start_logging() {
            warn!("event=logging_init module=ffi status=error error={err}");
        }

        let store = SqliteKeyValueStore::open(&config.db_path)
            .map_err(|err| format!("tracker store open failed: {err}"))?;
        let tracker = GpaTracker::open(store, config)
            .map_err(|err| format!("tracker open failed: {err}"))?;
        Ok(Self {
            tracker: Mutex::new(tracker),
        })
    }

    /// Appends a blank input row and returns its index.
    #[flutter_rust_bridge::frb(sync)]
    pub fn add_pending_row(&self) -> u32 {
        to_wire_index(self.lock().add_pending_row())
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn pending_rows(&self) -> Vec<CourseInput> {
        self.lock()
            .pending_rows()
            .iter()
            .map(CourseInput::from)
            .collect()
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn update_pending_row(&self, index: u32, row: CourseInput) -> ActionResponse {
        ActionResponse::from_result(
            self.lock()
                .update_pending_row(index as usize, row.into())
                .map(|()| "Row updated.".to_string()),
        )
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn remove_pending_row(&self, index: u32) -> ActionResponse {
        ActionResponse::from_result(
            self.lock()
                .remove_pending_row(index as usize)
                .map(|_| "Row removed.".to_string()),
        )
    }

    /// Submits the pending input rows.
    #[flutter_rust_bridge::frb(sync)]
    pub fn submit_pending(&self) -> ActionResponse {
        submit_response(self.lock().submit_pending())
    }

    /// Submits caller-provided rows (the pending buffer is reset on success).
    #[flutter_rust_bridge::frb(sync)]
    pub fn submit_batch(&self, rows: Vec<CourseInput>) -> ActionResponse {
        let rows: Vec<CandidateRow> = rows.into_iter().map(CandidateRow::from).collect();
        submit_response(self.lock().submit_batch(&rows))
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn delete_at(&self, index: u32) -> DeleteResponse {
        let mut tracker = self.lock();
        let undo_window_ms = u64::try_from(tracker.undo_window().as_millis()).unwrap_or(u64::MAX);
        match tracker.delete_at(index as usize) {
            Ok(ticket) => DeleteResponse {
                ok: true,
                error_code: String::new(),
                message: "Course deleted.".to_string(),
                undo_generation: Some(ticket.generation),
                undo_window_ms,
            },
            Err(err) => {
                // Only a failed write leaves this call's deletion in the undo slot.
                let undo_generation = match &err {
                    TrackerError::Persistence(_) => {
                        tracker.undo_ticket().map(|ticket| ticket.generation)
                    }
                    _ => None,
                };
                DeleteResponse {
                    ok: false,
                    error_code: tracker_error_code(&err).to_string(),
                    message: err.to_string(),
                    undo_generation,
                    undo_window_ms,
                }
            }
        }
    }

    /// Restores the most recent deletion if still inside the undo window.
    #[flutter_rust_bridge::frb(sync)]
    pub fn undo(&self) -> ActionResponse {
        match self.lock().undo() {
            Ok(true) => ActionResponse::success("Course restored.", Some(1)),
            Ok(false) => ActionResponse::success("Nothing to undo.", Some(0)),
            Err(err) => ActionResponse::failure(&err),
        }
    }

    /// Host timer callback. Returns whether the undo slot was cleared.
    #[flutter_rust_bridge::frb(sync)]
    pub fn expire_undo(&self, generation: u64) -> bool {
        let mut tracker = self.lock();
        match tracker.undo_ticket() {
            Some(ticket) if ticket.generation == generation => tracker.expire_undo(ticket),
            _ => false,
        }
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn undo_available(&self) -> bool {
        self.lock().undo_available()
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn aggregation(&self) -> AggregationView {
        self.lock().aggregation().into()
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn ledger_snapshot(&self) -> Vec<CourseView> {
        self.lock().ledger().iter().map(CourseView::from).collect()
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn trend(&self) -> TrendView {
        let series = self.lock().trend_series();
        TrendView {
            labels: series.labels,
            points: series.points,
            y_max: series.y_max,
        }
    }

    /// Current theme label (`light|dark`).
    #[flutter_rust_bridge::frb(sync)]
    pub fn theme(&self) -> String {
        self.lock().theme().as_str().to_string()
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn set_theme(&self, theme: String) -> ActionResponse {
        let Some(theme) = ThemePreference::parse(theme.trim()) else {
            return ActionResponse {
                ok: false,
                error_code: "invalid_theme".to_string(),
                message: format!("unsupported theme `{theme}`; expected light|dark"),
                count: None,
            };
        };
        ActionResponse::from_result(
            self.lock()
                .set_theme(theme)
                .map(|()| theme.as_str().to_string()),
        )
    }

    /// Flips the theme; the response message carries the new label.
    #[flutter_rust_bridge::frb(sync)]
    pub fn toggle_theme(&self) -> ActionResponse {
        ActionResponse::from_result(
            self.lock()
                .toggle_theme()
                .map(|theme| theme.as_str().to_string()),
        )
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn retry_persist(&self) -> ActionResponse {
        ActionResponse::from_result(
            self.lock()
                .retry_persist()
                .map(|()| "Saved.".to_string()),
        )
    }

    fn lock(&self) -> MutexGuard<'_, GpaTracker<SqliteKeyValueStore>> {
        self.tracker.lock().unwrap_or_else(|poisoned| {
            warn!("event=handle_lock module=ffi status=recovered reason=poisoned");
            poisoned.into_inner()
        })
    }
}

/// Standalone GPA over rows, using the configured grade scale.
#[flutter_rust_bridge::frb(sync)]
pub fn quick_gpa(rows: Vec<CourseInput>) -> CalculatorResponse {
    let scale = TrackerConfig::from_env().grade_scale;
    let rows: Vec<CandidateRow> = rows.into_iter().map(CandidateRow::from).collect();
    match quick_gpa_inner(&rows, scale) {
        Ok(gpa) => CalculatorResponse {
            ok: true,
            value: Some(gpa),
            message: quick_gpa_display(gpa),
        },
        Err(err) => CalculatorResponse {
            ok: false,
            value: None,
            message: err.to_string(),
        },
    }
}

/// One semester row of the CGPA calculator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SemesterInput {
    pub label: String,
    pub gpa: String,
    pub credits: String,
}

/// Cumulative GPA across semesters.
#[flutter_rust_bridge::frb(sync)]
pub fn semester_cgpa(rows: Vec<SemesterInput>) -> CalculatorResponse {
    let rows: Vec<SemesterRow> = rows
        .into_iter()
        .map(|row| SemesterRow::new(row.label, row.gpa, row.credits))
        .collect();
    match semester_cgpa_inner(&rows) {
        Ok(cgpa) => CalculatorResponse {
            ok: true,
            value: Some(cgpa.value()),
            message: cgpa.to_string(),
        },
        Err(err) => CalculatorResponse {
            ok: false,
            value: None,
            message: err.to_string(),
        },
    }
}

/// Upper bound on generated semester rows.
pub const MAX_SEMESTER_ROWS: u32 = 64;

/// Blank semester rows labelled `Semester 1..=count`.
///
/// `count` is capped at [`MAX_SEMESTER_ROWS`].
#[flutter_rust_bridge::frb(sync)]
pub fn generate_semester_rows(count: u32) -> Vec<SemesterInput> {
    semester_labels(count.min(MAX_SEMESTER_ROWS) as usize)
        .into_iter()
        .map(|label| SemesterInput {
            label,
            ..SemesterInput::default()
        })
        .collect()
}

/// Animated dashboard counter value `elapsed_ms` into a transition.
///
/// Uses the default 500 ms linear transition; returns exactly `to` once
/// finished.
#[flutter_rust_bridge::frb(sync)]
pub fn counter_value_at(from: f64, to: f64, elapsed_ms: u64) -> f64 {
    ValueTransition::new(from, to).value_at(Duration::from_millis(elapsed_ms))
}

/// Whether a counter transition has reached its target after `elapsed_ms`.
#[flutter_rust_bridge::frb(sync)]
pub fn counter_transition_finished(elapsed_ms: u64) -> bool {
    ValueTransition::new(0.0, 0.0).is_finished(Duration::from_millis(elapsed_ms))
}

fn submit_response(result: Result<usize, TrackerError>) -> ActionResponse {
    match result {
        Ok(added) => {
            let count = to_wire_index(added);
            ActionResponse::success(format!("Added {count} course(s)."), Some(count))
        }
        Err(err) => ActionResponse::failure(&err),
    }
}

fn tracker_error_code(err: &TrackerError) -> &'static str {
    match err {
        TrackerError::PartialRow { .. } => "partial_row",
        TrackerError::EmptyBatch => "empty_batch",
        TrackerError::IndexOutOfRange { .. } => "index_out_of_range",
        TrackerError::Persistence(_) => "persistence_failed",
    }
}

fn to_wire_index(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
