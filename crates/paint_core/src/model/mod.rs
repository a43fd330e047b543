//! Domain model for curated gene-family annotations.
//!
//! # Responsibility
//! - Define canonical term, evidence and annotation shapes.
//!
//! # Invariants
//! - Evidence codes, qualifiers and aspects are closed enumerations; string
//!   forms only exist at parse/export boundaries.

pub mod annotation;
pub mod term;
