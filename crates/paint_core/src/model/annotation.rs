//! Functional annotation attached to one gene tree node.
//!
//! # Responsibility
//! - Carry the term, evidence and provenance of one node-to-term association.
//! - Distinguish engine-authored (PAINT) annotations from imported evidence.
//!
//! # Invariants
//! - A node carries at most one PAINT annotation per term.
//! - `is_direct_mrc` marks the curated origin; inherited copies cite the
//!   origin node in `with_list`.
//! - `is_direct_not` implies `is_negated`.

use crate::model::term::{Aspect, EvidenceCode, Qualifiers, TermId};
use crate::tree::NodeId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One node-to-term association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub term: TermId,
    pub aspect: Aspect,
    pub evidence: EvidenceCode,
    /// Annotation states that the gene does NOT have this function.
    pub is_negated: bool,
    /// Negation was curated at this node rather than inherited.
    pub is_direct_not: bool,
    /// This node is the curated origin of the annotation.
    pub is_direct_mrc: bool,
    /// Experimental annotation disputed by a curator; ignored as evidence.
    pub is_challenged: bool,
    pub qualifiers: Qualifiers,
    /// Supporting evidence provenance, in citation order.
    pub with_list: Vec<NodeId>,
    pub reference: String,
    pub date: NaiveDate,
}

impl Annotation {
    /// Creates an imported (non-PAINT) annotation.
    pub fn imported(
        term: TermId,
        aspect: Aspect,
        evidence: EvidenceCode,
        reference: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            term,
            aspect,
            evidence,
            is_negated: false,
            is_direct_not: false,
            is_direct_mrc: false,
            is_challenged: false,
            qualifiers: Qualifiers::EMPTY,
            with_list: Vec::new(),
            reference: reference.into(),
            date,
        }
    }

    /// Marks the annotation as a negated assertion.
    pub fn negated(mut self) -> Self {
        self.is_negated = true;
        self
    }

    /// Replaces the qualifier set.
    pub fn with_qualifiers(mut self, qualifiers: Qualifiers) -> Self {
        self.qualifiers = qualifiers;
        self
    }

    /// Whether the propagation engine authored this annotation.
    pub fn is_paint(&self) -> bool {
        self.evidence.is_paint()
    }

    /// Whether this annotation may serve as experimental support.
    pub fn is_experimental(&self) -> bool {
        self.evidence.is_experimental() && !self.is_challenged
    }
}
