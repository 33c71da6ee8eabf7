//! Roster domain model.
//!
//! # Responsibility
//! - Define canonical data structures for rosters and attendance records.
//! - Own every state transition the attendance UI can trigger.
//!
//! # Invariants
//! - Every student is identified by a stable `StudentId`.
//! - Roster names are unique and at least one roster always exists.
//! - Transient selection state is never part of the persisted snapshot.

pub mod roster;
pub mod state;
pub mod student;
