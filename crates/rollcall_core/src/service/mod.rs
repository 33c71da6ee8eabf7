//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate state transitions and snapshot persistence.
//! - Keep UI/CLI layers decoupled from storage details.

pub mod roster_service;
