//! Domain model for the course ledger.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep grade lookup isolated from the stored record shape.
//!
//! # Invariants
//! - Records are only committed after `CourseRecord::validate()` passes.
//! - Grade points are denormalized per record.

pub mod course;
pub mod grade;
pub mod theme;
