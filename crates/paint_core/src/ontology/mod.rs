//! Ontology query contract used by the propagation engine.
//!
//! # Responsibility
//! - Define the narrow `TermGraph` capability: subsumption, aspect,
//!   obsolescence, replacement, exclusion and labels.
//! - Provide a precomputed-closure implementation and an OBO-style loader.
//! - Define the `TaxonChecker` capability for taxon applicability.
//!
//! # Invariants
//! - `is_descendant` is strict: a term is never its own descendant.
//! - Implementations are read-only during curation, so one graph may be
//!   shared by several families.

pub mod closure;
pub mod obo;
pub mod taxon;

use crate::model::term::{Aspect, TermId};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub use closure::{ClosureTermGraph, Relation, TermGraphBuilder, TermRecord};
pub use obo::parse_obo;
pub use taxon::{AnyTaxon, TaxonChecker, TaxonConstraints};

/// Relation set used to answer "is term A more specific than term B".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationMode {
    /// `is_a` and `part_of` chains.
    #[default]
    IsAPartOf,
    /// Adds `regulates`, `positively_regulates` and `negatively_regulates`.
    Regulates,
}

impl RelationMode {
    pub const ALL: [RelationMode; 2] = [RelationMode::IsAPartOf, RelationMode::Regulates];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::IsAPartOf => "is_a_part_of",
            Self::Regulates => "regulates",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "is_a_part_of" => Some(Self::IsAPartOf),
            "regulates" => Some(Self::Regulates),
            _ => None,
        }
    }
}

/// Ontology reasoning capability.
pub trait TermGraph {
    /// Whether `term` is strictly more specific than `ancestor` under `mode`.
    fn is_descendant(&self, term: &TermId, ancestor: &TermId, mode: RelationMode) -> bool;
    /// GO root category of `term`, or `None` for unknown terms.
    fn aspect(&self, term: &TermId) -> Option<Aspect>;
    fn is_obsolete(&self, term: &TermId) -> bool;
    /// Replacement terms for an obsolete term; empty when none exist.
    fn replaced_by(&self, term: &TermId) -> Vec<TermId>;
    /// Terms used only for ontology logic and never curated directly.
    fn is_excluded(&self, term: &TermId) -> bool;
    fn label(&self, term: &TermId) -> Option<String>;

    /// Strict subsumption over `is_a`/`part_of`.
    fn more_specific(&self, term: &TermId, than: &TermId) -> bool {
        self.is_descendant(term, than, RelationMode::IsAPartOf)
    }
}

impl<G: TermGraph + ?Sized> TermGraph for &G {
    fn is_descendant(&self, term: &TermId, ancestor: &TermId, mode: RelationMode) -> bool {
        (**self).is_descendant(term, ancestor, mode)
    }

    fn aspect(&self, term: &TermId) -> Option<Aspect> {
        (**self).aspect(term)
    }

    fn is_obsolete(&self, term: &TermId) -> bool {
        (**self).is_obsolete(term)
    }

    fn replaced_by(&self, term: &TermId) -> Vec<TermId> {
        (**self).replaced_by(term)
    }

    fn is_excluded(&self, term: &TermId) -> bool {
        (**self).is_excluded(term)
    }

    fn label(&self, term: &TermId) -> Option<String> {
        (**self).label(term)
    }
}

impl<G: TermGraph + ?Sized> TermGraph for Arc<G> {
    fn is_descendant(&self, term: &TermId, ancestor: &TermId, mode: RelationMode) -> bool {
        (**self).is_descendant(term, ancestor, mode)
    }

    fn aspect(&self, term: &TermId) -> Option<Aspect> {
        (**self).aspect(term)
    }

    fn is_obsolete(&self, term: &TermId) -> bool {
        (**self).is_obsolete(term)
    }

    fn replaced_by(&self, term: &TermId) -> Vec<TermId> {
        (**self).replaced_by(term)
    }

    fn is_excluded(&self, term: &TermId) -> bool {
        (**self).is_excluded(term)
    }

    fn label(&self, term: &TermId) -> Option<String> {
        (**self).label(term)
    }
}

/// Errors from loading ontology data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OntologyError {
    /// A stanza line could not be interpreted.
    MalformedLine { line: usize, reason: String },
    /// A `[Term]` stanza ended without an `id:` tag.
    MissingTermId { line: usize },
}

impl Display for OntologyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedLine { line, reason } => {
                write!(f, "malformed ontology line {line}: {reason}")
            }
            Self::MissingTermId { line } => {
                write!(f, "term stanza ending at line {line} has no id")
            }
        }
    }
}

impl Error for OntologyError {}
