//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, storage and undo into UI-level operations.
//! - Keep presentation and bridge layers decoupled from storage details.

pub mod tracker_service;
