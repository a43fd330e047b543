//! GAF row shape shared by reconciliation input and export output.

use crate::model::term::{EvidenceCode, Qualifiers, TermId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One external annotation row.
///
/// Cut rows only carry a subject and mark that subject's branch as pruned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GafRow {
    /// Database id, sequence id or tree-internal node id.
    pub subject: String,
    pub term: Option<TermId>,
    pub evidence: Option<EvidenceCode>,
    pub negated: bool,
    pub qualifiers: Qualifiers,
    pub references: Vec<String>,
    /// Node ids cited as supporting evidence.
    pub with_from: Vec<String>,
    pub assigned_by: String,
    pub date: Option<NaiveDate>,
    pub is_cut: bool,
}

impl GafRow {
    /// Positive association row.
    pub fn association(
        subject: impl Into<String>,
        term: TermId,
        evidence: EvidenceCode,
        date: NaiveDate,
    ) -> Self {
        Self {
            subject: subject.into(),
            term: Some(term),
            evidence: Some(evidence),
            negated: false,
            qualifiers: Qualifiers::EMPTY,
            references: Vec::new(),
            with_from: Vec::new(),
            assigned_by: String::new(),
            date: Some(date),
            is_cut: false,
        }
    }

    /// Stub row marking `subject` as pruned.
    pub fn cut(subject: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            subject: subject.into(),
            term: None,
            evidence: None,
            negated: false,
            qualifiers: Qualifiers::EMPTY,
            references: Vec::new(),
            with_from: Vec::new(),
            assigned_by: String::new(),
            date: Some(date),
            is_cut: true,
        }
    }

    pub fn negated(mut self) -> Self {
        self.negated = true;
        self
    }

    pub fn qualifiers(mut self, qualifiers: Qualifiers) -> Self {
        self.qualifiers = qualifiers;
        self
    }

    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.references.push(reference.into());
        self
    }

    pub fn with_from(mut self, node_id: impl Into<String>) -> Self {
        self.with_from.push(node_id.into());
        self
    }

    pub fn assigned_by(mut self, assigned_by: impl Into<String>) -> Self {
        self.assigned_by = assigned_by.into();
        self
    }

    /// Whether the row reports an inherited (ancestral) inference.
    pub fn is_inherited(&self) -> bool {
        self.evidence == Some(EvidenceCode::Iba)
    }
}
