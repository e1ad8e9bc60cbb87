//! Persistence contracts and implementations.
//!
//! # Responsibility
//! - Define the string-keyed store contract used by the tracker.
//! - Isolate SQLite and JSON encoding details from service orchestration.
//!
//! # Invariants
//! - Snapshot writes are whole-value replacements.
//! - Read paths reject corrupt persisted state instead of masking it.

pub mod kv_repo;
pub mod ledger_repo;
