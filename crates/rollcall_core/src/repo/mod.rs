//! Persistence collaborators for roster state.
//!
//! # Responsibility
//! - Define the key-value contract the roster store persists through.
//! - Keep snapshot encoding and SQLite details out of the service layer.
//!
//! # Invariants
//! - Every save is a full-state overwrite of both snapshot keys.
//! - Load paths reject invalid persisted state instead of masking it.

pub mod kv_store;
pub mod snapshot_repo;
