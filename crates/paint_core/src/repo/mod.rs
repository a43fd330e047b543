//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define data access contracts for ontology data.
//! - Isolate SQLite query details from the curation services.

pub mod term_repo;
