//! Gene Ontology annotation propagation over gene-family trees.
//! This crate is the single source of truth for curation invariants.

pub mod config;
pub mod db;
pub mod gaf;
pub mod logging;
pub mod model;
pub mod ontology;
pub mod repo;
pub mod service;
pub mod tree;

pub use config::{ConfigError, CurationConfig};
pub use gaf::{export_rows, GafRow, IdMapper, TreeIdMapper};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::annotation::Annotation;
pub use model::term::{Aspect, EvidenceCode, Qualifier, Qualifiers, TermId, TermParseError};
pub use ontology::{
    parse_obo, AnyTaxon, ClosureTermGraph, OntologyError, RelationMode, TaxonChecker,
    TaxonConstraints, TermGraph,
};
pub use repo::term_repo::{SqliteTermRepository, TermRepoError, TermRepository};
pub use service::evidence::WithEvidence;
pub use service::ledger::{ActionLedger, Alert, LogAction, LogEntry, NodeAnnotation, RejectionKind};
pub use service::paint_service::{PaintError, PaintService};
pub use service::reconcile_service::{GafReconciler, ReconcileError, ReconcileReport};
pub use service::report::{render_alert_report, render_log_report};
pub use tree::{GeneNode, GeneTree, NodeId, NodeSpec, TreeError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
