//! GPA tracker use-case service.
//!
//! # Responsibility
//! - Own the in-memory ledger, pending input rows, undo slot and theme.
//! - Orchestrate validation, persistence and undo expiry for UI callers.
//!
//! # Invariants
//! - Every committed ledger mutation is followed by a full snapshot write.
//! - Deletes are persisted immediately; a successful undo persists again.
//! - When a write fails, the in-memory state stays authoritative and is
//!   marked dirty until `retry_persist` succeeds.
//! - Undo is possible only while the undo slot is inside its window.
//! - Course names never appear in log events.

use crate::calc::aggregation::{aggregate, Aggregation};
use crate::calc::trend::{trend_series, TrendSeries};
use crate::clock::{Clock, SystemClock};
use crate::config::TrackerConfig;
use crate::input::{validate_batch, BatchRejection, CandidateRow};
use crate::model::course::CourseRecord;
use crate::model::grade::GradeScale;
use crate::model::theme::ThemePreference;
use crate::repo::kv_repo::{KeyValueStore, StoreError};
use crate::repo::ledger_repo::LedgerStore;
use crate::undo::{PendingDeletion, UndoBuffer, UndoTicket};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Errors surfaced by tracker operations. None of them is fatal.
#[derive(Debug)]
pub enum TrackerError {
    /// A submitted row is filled in some but not all fields.
    PartialRow { row_index: usize },
    /// A submission contained no complete row.
    EmptyBatch,
    /// Ledger or pending-row index does not exist.
    IndexOutOfRange { index: usize, len: usize },
    /// Snapshot could not be read or written.
    Persistence(StoreError),
}

impl Display for TrackerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PartialRow { row_index } => write!(
                f,
                "please fill all fields for courses you have started entering (row {})",
                row_index + 1
            ),
            Self::EmptyBatch => write!(f, "please add at least one course"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} is out of range for length {len}")
            }
            Self::Persistence(err) => write!(f, "persistence failed: {err}"),
        }
    }
}

impl Error for TrackerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BatchRejection> for TrackerError {
    fn from(value: BatchRejection) -> Self {
        match value {
            BatchRejection::PartialRow { row_index } => Self::PartialRow { row_index },
            BatchRejection::EmptyBatch => Self::EmptyBatch,
        }
    }
}

impl From<StoreError> for TrackerError {
    fn from(value: StoreError) -> Self {
        Self::Persistence(value)
    }
}

/// Explicit controller for one tracker session.
pub struct GpaTracker<S: KeyValueStore, C: Clock = SystemClock> {
    store: LedgerStore<S>,
    clock: C,
    scale: GradeScale,
    ledger: Vec<CourseRecord>,
    pending_rows: Vec<CandidateRow>,
    undo: UndoBuffer,
    theme: ThemePreference,
    ledger_dirty: bool,
    theme_dirty: bool,
}

impl<S: KeyValueStore> GpaTracker<S, SystemClock> {
    /// Loads persisted state from `store` using the real clock.
    pub fn open(store: S, config: &TrackerConfig) -> TrackerResult<Self> {
        Self::open_with_clock(store, config.grade_scale, config.undo_window, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> GpaTracker<S, C> {
    /// Loads persisted state from `store` with an explicit clock.
    ///
    /// # Errors
    /// - `Persistence` when the stored ledger cannot be read or decoded.
    pub fn open_with_clock(
        store: S,
        scale: GradeScale,
        undo_window: Duration,
        clock: C,
    ) -> TrackerResult<Self> {
        let store = LedgerStore::new(store);
        let ledger = store.load_courses().map_err(|err| {
            error!("event=tracker_open module=tracker status=error error={err}");
            err
        })?;
        let theme = store.load_theme()?.unwrap_or_default();

        info!(
            "event=tracker_open module=tracker status=ok courses={} theme={} scale={} undo_window_ms={}",
            ledger.len(),
            theme,
            scale.as_str(),
            undo_window.as_millis()
        );

        Ok(Self {
            store,
            clock,
            scale,
            ledger,
            pending_rows: vec![CandidateRow::blank()],
            undo: UndoBuffer::new(undo_window),
            theme,
            ledger_dirty: false,
            theme_dirty: false,
        })
    }

    pub fn grade_scale(&self) -> GradeScale {
        self.scale
    }

    /// Borrow of the underlying key-value store.
    pub fn store(&self) -> &S {
        self.store.inner()
    }

    /// Committed records in display order.
    pub fn ledger(&self) -> &[CourseRecord] {
        &self.ledger
    }

    /// Owned copy of the committed records.
    pub fn ledger_snapshot(&self) -> Vec<CourseRecord> {
        self.ledger.clone()
    }

    pub fn aggregation(&self) -> Aggregation {
        aggregate(&self.ledger)
    }

    pub fn trend_series(&self) -> TrendSeries {
        trend_series(&self.ledger)
    }

    // Pending input rows.

    /// Appends a blank input row and returns its index.
    pub fn add_pending_row(&mut self) -> usize {
        self.pending_rows.push(CandidateRow::blank());
        self.pending_rows.len() - 1
    }

    pub fn pending_rows(&self) -> &[CandidateRow] {
        &self.pending_rows
    }

    pub fn update_pending_row(&mut self, index: usize, row: CandidateRow) -> TrackerResult<()> {
        let len = self.pending_rows.len();
        let slot = self
            .pending_rows
            .get_mut(index)
            .ok_or(TrackerError::IndexOutOfRange { index, len })?;
        *slot = row;
        Ok(())
    }

    pub fn remove_pending_row(&mut self, index: usize) -> TrackerResult<CandidateRow> {
        if index >= self.pending_rows.len() {
            return Err(TrackerError::IndexOutOfRange {
                index,
                len: self.pending_rows.len(),
            });
        }
        Ok(self.pending_rows.remove(index))
    }

    /// Submits the pending row buffer. See [`Self::submit_batch`].
    pub fn submit_pending(&mut self) -> TrackerResult<usize> {
        let rows = std::mem::take(&mut self.pending_rows);
        let result = self.submit_batch(&rows);
        if result.is_err() && self.pending_rows.is_empty() {
            self.pending_rows = rows;
        }
        result
    }

    /// Validates `rows` and appends every complete row to the ledger.
    ///
    /// Returns the number of courses added. On success the pending row
    /// buffer is reset to one blank row.
    ///
    /// # Errors
    /// - `PartialRow` / `EmptyBatch`: nothing is committed.
    /// - `Persistence`: rows are committed in memory, snapshot is dirty.
    pub fn submit_batch(&mut self, rows: &[CandidateRow]) -> TrackerResult<usize> {
        self.sweep_expired_undo();

        let records = validate_batch(rows, self.scale).map_err(|rejection| {
            info!(
                "event=course_submit module=tracker status=rejected rows={} reason={}",
                rows.len(),
                rejection_code(rejection)
            );
            TrackerError::from(rejection)
        })?;

        let added = records.len();
        self.ledger.extend(records);
        self.pending_rows = vec![CandidateRow::blank()];
        info!(
            "event=course_submit module=tracker status=ok added={added} total={}",
            self.ledger.len()
        );

        self.persist_ledger("course_submit")?;
        Ok(added)
    }

    // Delete with undo.

    /// Removes the record at `index` into the undo slot and persists.
    ///
    /// Any earlier pending deletion is discarded and can no longer be
    /// undone. The returned ticket identifies this deletion's expiry.
    pub fn delete_at(&mut self, index: usize) -> TrackerResult<UndoTicket> {
        self.sweep_expired_undo();

        if index >= self.ledger.len() {
            return Err(TrackerError::IndexOutOfRange {
                index,
                len: self.ledger.len(),
            });
        }

        let record = self.ledger.remove(index);
        let (ticket, replaced) = self.undo.stash(record, index, self.clock.now());
        if replaced.is_some() {
            debug!("event=undo_replace module=tracker status=ok generation={}", ticket.generation);
        }
        info!(
            "event=course_delete module=tracker status=ok index={index} remaining={} generation={}",
            self.ledger.len(),
            ticket.generation
        );

        self.persist_ledger("course_delete")?;
        Ok(ticket)
    }

    /// Restores the pending deletion at its original index.
    ///
    /// Returns `Ok(false)` as a no-op when nothing is undoable (empty slot
    /// or undo window elapsed).
    pub fn undo(&mut self) -> TrackerResult<bool> {
        let Some(PendingDeletion {
            record,
            original_index,
        }) = self.undo.take_live(self.clock.now())
        else {
            debug!("event=course_undo module=tracker status=noop");
            return Ok(false);
        };

        let index = original_index.min(self.ledger.len());
        self.ledger.insert(index, record);
        info!(
            "event=course_undo module=tracker status=ok index={index} total={}",
            self.ledger.len()
        );

        self.persist_ledger("course_undo")?;
        Ok(true)
    }

    /// Host timer callback for the expiry scheduled by `ticket`.
    ///
    /// Stale or repeated tickets are ignored. Returns whether a slot was
    /// cleared.
    pub fn expire_undo(&mut self, ticket: UndoTicket) -> bool {
        let expired = self.undo.expire(ticket);
        debug!(
            "event=undo_expire module=tracker status={} generation={}",
            if expired { "ok" } else { "noop" },
            ticket.generation
        );
        expired
    }

    /// Clears the undo slot if its window has elapsed. Returns whether it did.
    pub fn poll_undo_expiry(&mut self) -> bool {
        self.sweep_expired_undo()
    }

    /// True while an undo is possible.
    pub fn undo_available(&self) -> bool {
        self.undo.is_live(self.clock.now())
    }

    /// The deletion currently held for undo, if still inside its window.
    pub fn pending_deletion(&self) -> Option<&PendingDeletion> {
        if self.undo_available() {
            self.undo.pending()
        } else {
            None
        }
    }

    /// Ticket of the deletion currently held, live or not yet swept.
    pub fn undo_ticket(&self) -> Option<UndoTicket> {
        self.undo.current_ticket()
    }

    pub fn undo_window(&self) -> Duration {
        self.undo.window()
    }

    // Theme.

    pub fn theme(&self) -> ThemePreference {
        self.theme
    }

    pub fn set_theme(&mut self, theme: ThemePreference) -> TrackerResult<()> {
        self.theme = theme;
        self.persist_theme()
    }

    /// Flips between light and dark and returns the new theme.
    pub fn toggle_theme(&mut self) -> TrackerResult<ThemePreference> {
        let next = self.theme.toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    // Persistence.

    /// True when in-memory state has not reached the store yet.
    pub fn is_dirty(&self) -> bool {
        self.ledger_dirty || self.theme_dirty
    }

    /// Rewrites whatever failed to persist earlier.
    pub fn retry_persist(&mut self) -> TrackerResult<()> {
        if self.ledger_dirty {
            self.persist_ledger("persist_retry")?;
        }
        if self.theme_dirty {
            self.persist_theme()?;
        }
        Ok(())
    }

    fn persist_ledger(&mut self, event: &'static str) -> TrackerResult<()> {
        match self.store.save_courses(&self.ledger) {
            Ok(()) => {
                self.ledger_dirty = false;
                Ok(())
            }
            Err(err) => {
                self.ledger_dirty = true;
                error!(
                    "event={event} module=tracker status=error error_code=persist_failed error={err}"
                );
                Err(TrackerError::Persistence(err))
            }
        }
    }

    fn persist_theme(&mut self) -> TrackerResult<()> {
        match self.store.save_theme(self.theme) {
            Ok(()) => {
                self.theme_dirty = false;
                info!("event=theme_set module=tracker status=ok theme={}", self.theme);
                Ok(())
            }
            Err(err) => {
                self.theme_dirty = true;
                error!(
                    "event=theme_set module=tracker status=error error_code=persist_failed error={err}"
                );
                Err(TrackerError::Persistence(err))
            }
        }
    }

    fn sweep_expired_undo(&mut self) -> bool {
        let expired = self.undo.expire_due(self.clock.now()).is_some();
        if expired {
            debug!("event=undo_expire module=tracker status=ok source=deadline");
        }
        expired
    }
}

fn rejection_code(rejection: BatchRejection) -> &'static str {
    match rejection {
        BatchRejection::PartialRow { .. } => "partial_row",
        BatchRejection::EmptyBatch => "empty_batch",
    }
}
