//! Experimental evidence resolution for a candidate (node, term) pair.
//!
//! # Responsibility
//! - Scan leaf descendants for experimental annotations that support or
//!   negate a candidate term.
//! - Report the supporting nodes, the negation state and the inherited
//!   qualifiers.
//!
//! # Invariants
//! - Only experimental, unchallenged, non-PAINT annotations count.
//! - A leaf that negates the exact candidate term never supports it, even if
//!   it also carries a positive annotation to a more specific term.
//! - Negation of a more specific term says nothing about the candidate and
//!   is ignored.

use crate::model::term::{Qualifiers, TermId};
use crate::ontology::{RelationMode, TermGraph};
use crate::tree::{GeneTree, NodeId};
use std::collections::{BTreeMap, BTreeSet};

/// Evidence summary for one candidate annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithEvidence {
    /// Leaves whose experimental annotations justify the candidate.
    pub exp_withs: BTreeSet<NodeId>,
    /// Support consists solely of experimentally negated leaves.
    pub is_experimental_not: bool,
    pub lacks_evidence: bool,
    /// Union of the qualifiers carried by the contributing annotations.
    pub qualifiers: Qualifiers,
}

impl WithEvidence {
    /// Resolves evidence below `node` for `term`.
    pub fn resolve<G: TermGraph + ?Sized>(
        tree: &GeneTree,
        terms: &G,
        mode: RelationMode,
        node: NodeId,
        term: &TermId,
    ) -> Self {
        let mut support: BTreeMap<NodeId, Qualifiers> = BTreeMap::new();
        let mut notted: BTreeMap<NodeId, Qualifiers> = BTreeMap::new();

        for leaf in tree.leaf_descendants(node) {
            for annotation in tree
                .annotations(leaf)
                .iter()
                .filter(|annotation| annotation.is_experimental())
            {
                let exact = &annotation.term == term;
                if !exact && !terms.is_descendant(&annotation.term, term, mode) {
                    continue;
                }
                if annotation.is_negated {
                    if exact {
                        *notted.entry(leaf).or_default() |= annotation.qualifiers;
                    }
                } else {
                    *support.entry(leaf).or_default() |= annotation.qualifiers;
                }
            }
        }
        support.retain(|leaf, _| !notted.contains_key(leaf));

        let lacks_evidence = support.is_empty() && notted.is_empty();
        let is_experimental_not = support.is_empty() && !notted.is_empty();
        let source = if is_experimental_not { notted } else { support };
        let qualifiers = source
            .values()
            .fold(Qualifiers::EMPTY, |acc, qualifiers| acc | *qualifiers);

        Self {
            exp_withs: source.into_keys().collect(),
            is_experimental_not,
            lacks_evidence,
            qualifiers,
        }
    }

    /// Supporting nodes in stable order, for an annotation's with-list.
    pub fn with_list(&self) -> Vec<NodeId> {
        self.exp_withs.iter().copied().collect()
    }
}
