//! Curation use-case services.
//!
//! # Responsibility
//! - Resolve evidence, propagate annotations and keep the undo history.
//! - Replay external rows and render reports on top of the engine.
//!
//! # See also
//! - `tree` for the structure these services mutate.

pub mod evidence;
pub mod ledger;
pub mod paint_service;
pub mod reconcile_service;
pub mod report;
