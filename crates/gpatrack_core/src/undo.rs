//! Single-slot, time-limited undo buffer for course deletion.
//!
//! # Responsibility
//! - Hold the most recently deleted record and its original ledger index.
//! - Decide whether an undo request is still inside the undo window.
//!
//! # Invariants
//! - At most one deletion is held; a new deletion replaces the previous one.
//! - Every stash issues a fresh generation, so tickets from replaced
//!   deletions can never clear the current slot.
//! - A slot is live while `now < deadline`.
//! - Expiring a slot twice, or with a stale ticket, is a no-op.

use crate::model::course::CourseRecord;
use std::time::{Duration, Instant};

/// Default undo window.
pub const DEFAULT_UNDO_WINDOW: Duration = Duration::from_secs(5);

/// Handle for one scheduled expiry.
///
/// Hosts that drive their own timers schedule a one-shot callback at
/// `deadline` and pass the ticket back to the tracker when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoTicket {
    pub generation: u64,
    pub deadline: Instant,
}

/// Record removed from the ledger and still restorable.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDeletion {
    pub record: CourseRecord,
    pub original_index: usize,
}

#[derive(Debug)]
struct Slot {
    entry: PendingDeletion,
    ticket: UndoTicket,
}

#[derive(Debug)]
pub struct UndoBuffer {
    window: Duration,
    slot: Option<Slot>,
    next_generation: u64,
}

impl UndoBuffer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            slot: None,
            next_generation: 1,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Stores a deletion, replacing any pending one.
    ///
    /// Returns the new ticket and the discarded previous deletion, if any.
    pub fn stash(
        &mut self,
        record: CourseRecord,
        original_index: usize,
        now: Instant,
    ) -> (UndoTicket, Option<PendingDeletion>) {
        let ticket = UndoTicket {
            generation: self.next_generation,
            deadline: now + self.window,
        };
        self.next_generation = self.next_generation.wrapping_add(1);

        let replaced = self.slot.replace(Slot {
            entry: PendingDeletion {
                record,
                original_index,
            },
            ticket,
        });
        (ticket, replaced.map(|slot| slot.entry))
    }

    /// Takes the pending deletion if it is still inside the window.
    ///
    /// An expired slot is cleared and `None` is returned.
    pub fn take_live(&mut self, now: Instant) -> Option<PendingDeletion> {
        self.expire_due(now);
        self.slot.take().map(|slot| slot.entry)
    }

    /// Clears the slot when its deadline has passed.
    ///
    /// Returns the expired deletion, or `None` when nothing was due.
    pub fn expire_due(&mut self, now: Instant) -> Option<PendingDeletion> {
        match &self.slot {
            Some(slot) if now >= slot.ticket.deadline => self.slot.take().map(|slot| slot.entry),
            _ => None,
        }
    }

    /// Fires the expiry scheduled for `ticket`.
    ///
    /// Returns `true` only when `ticket` belonged to the current slot.
    pub fn expire(&mut self, ticket: UndoTicket) -> bool {
        match &self.slot {
            Some(slot) if slot.ticket.generation == ticket.generation => {
                self.slot = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_live(&self, now: Instant) -> bool {
        self.slot
            .as_ref()
            .is_some_and(|slot| now < slot.ticket.deadline)
    }

    pub fn pending(&self) -> Option<&PendingDeletion> {
        self.slot.as_ref().map(|slot| &slot.entry)
    }

    pub fn current_ticket(&self) -> Option<UndoTicket> {
        self.slot.as_ref().map(|slot| slot.ticket)
    }
}

impl Default for UndoBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::UndoBuffer;
    use crate::model::course::CourseRecord;
    use crate::model::grade::{Grade, GradeScale};
    use std::time::{Duration, Instant};

    fn course(name: &str) -> CourseRecord {
        CourseRecord::new(name, Grade::A, 3.0, GradeScale::Campus).expect("valid course")
    }

    #[test]
    fn slot_is_live_until_deadline() {
        let mut buffer = UndoBuffer::new(Duration::from_secs(5));
        let start = Instant::now();
        buffer.stash(course("Calc I"), 0, start);

        assert!(buffer.is_live(start + Duration::from_millis(4_999)));
        assert!(!buffer.is_live(start + Duration::from_secs(5)));
    }

    #[test]
    fn take_live_after_deadline_clears_and_returns_none() {
        let mut buffer = UndoBuffer::new(Duration::from_secs(5));
        let start = Instant::now();
        buffer.stash(course("Calc I"), 0, start);

        assert!(buffer.take_live(start + Duration::from_secs(6)).is_none());
        assert!(buffer.pending().is_none());
    }

    #[test]
    fn second_stash_replaces_first_and_stales_its_ticket() {
        let mut buffer = UndoBuffer::default();
        let now = Instant::now();
        let (first_ticket, replaced) = buffer.stash(course("Calc I"), 0, now);
        assert!(replaced.is_none());

        let (second_ticket, replaced) = buffer.stash(course("Phys I"), 1, now);
        let replaced = replaced.expect("first deletion should be returned");
        assert_eq!(replaced.record.name, "Calc I");
        assert_ne!(first_ticket.generation, second_ticket.generation);

        assert!(!buffer.expire(first_ticket));
        assert_eq!(
            buffer.pending().map(|entry| entry.record.name.as_str()),
            Some("Phys I")
        );
        assert!(buffer.expire(second_ticket));
        assert!(!buffer.expire(second_ticket));
    }
}
