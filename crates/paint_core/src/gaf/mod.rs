//! GAF row model, subject id mapping and export.
//!
//! # Responsibility
//! - Describe external annotation rows in typed form.
//! - Resolve row subjects to tree nodes.
//! - Produce rows from a curated tree.
//!
//! Byte-level GAF reading/writing lives outside this crate.

mod export;
pub mod id_mapper;
mod row;

pub use export::export_rows;
pub use id_mapper::{split_db_accession, IdMapper, TreeIdMapper};
pub use row::GafRow;
