//! Note domain model.
//!
//! # Responsibility
//! - Define the single persistent entity (`Note`) and its partial-update shape.
//!
//! # Invariants
//! - Every note is identified by a stable, never reused `NoteId`.
//! - Deletion is permanent; there is no tombstone state.

pub mod note;
