//! Annotation propagation engine.
//!
//! # Responsibility
//! - Validate candidate annotations against the tree, evidence and ontology.
//! - Spread curated annotations down the tree and drop the broader ones they
//!   make redundant.
//! - Propagate negations, prune/graft branches, challenge evidence.
//! - Record every mutation in the [`ActionLedger`].
//!
//! # Invariants
//! - This service is the only code path that mutates annotations of a
//!   curation session.
//! - A node carries at most one PAINT annotation per term.
//! - Broader PAINT annotations are removed before a more specific one is
//!   added, so no node ends up with both.
//! - Pruned nodes are never entered by propagation.
//!
//! # See also
//! - `service::evidence` for the evidence rules.
//! - `service::ledger` for undo/redo.

use crate::config::CurationConfig;
use crate::model::annotation::Annotation;
use crate::model::term::{EvidenceCode, Qualifiers, TermId};
use crate::ontology::{TaxonChecker, TermGraph};
use crate::service::evidence::WithEvidence;
use crate::service::ledger::{
    ActionLedger, Alert, LogAction, LogEntry, NodeAnnotation, RejectionKind,
};
use crate::tree::{GeneTree, NodeId, TreeError};
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::collections::{BTreeSet, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from propagation engine operations.
#[derive(Debug)]
pub enum PaintError {
    /// Node handle does not belong to this tree.
    UnknownNode(NodeId),
    /// Term graph has no aspect for the term.
    UnknownTerm(TermId),
    /// Node has no PAINT annotation to the term.
    NotAnnotated { node: NodeId, term: TermId },
    /// Evidence code cannot back a curated negation.
    NotNegationEvidence(EvidenceCode),
    /// Leaf has no unchallenged experimental annotation to the term.
    NoExperimentalEvidence { node: NodeId, term: TermId },
    /// Structural tree failure.
    Tree(TreeError),
}

impl Display for PaintError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownNode(node) => write!(f, "node not found in tree: {node}"),
            Self::UnknownTerm(term) => write!(f, "term has no known aspect: {term}"),
            Self::NotAnnotated { node, term } => {
                write!(f, "node {node} has no curated annotation to {term}")
            }
            Self::NotNegationEvidence(code) => {
                write!(f, "evidence code {code} cannot back a negation")
            }
            Self::NoExperimentalEvidence { node, term } => {
                write!(f, "node {node} has no experimental annotation to {term}")
            }
            Self::Tree(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PaintError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Tree(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TreeError> for PaintError {
    fn from(value: TreeError) -> Self {
        match value {
            TreeError::UnknownNode(node) => Self::UnknownNode(node),
            other => Self::Tree(other),
        }
    }
}

/// Curation session for one gene family.
pub struct PaintService<G: TermGraph, X: TaxonChecker> {
    tree: GeneTree,
    terms: G,
    taxa: X,
    config: CurationConfig,
    ledger: ActionLedger,
}

impl<G: TermGraph, X: TaxonChecker> PaintService<G, X> {
    /// Creates a session with default configuration.
    pub fn new(tree: GeneTree, terms: G, taxa: X) -> Self {
        Self::with_config(tree, terms, taxa, CurationConfig::default())
    }

    pub fn with_config(tree: GeneTree, terms: G, taxa: X, config: CurationConfig) -> Self {
        Self {
            tree,
            terms,
            taxa,
            config,
            ledger: ActionLedger::new(),
        }
    }

    pub fn tree(&self) -> &GeneTree {
        &self.tree
    }

    pub fn terms(&self) -> &G {
        &self.terms
    }

    pub fn config(&self) -> &CurationConfig {
        &self.config
    }

    pub fn ledger(&self) -> &ActionLedger {
        &self.ledger
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut ActionLedger {
        &mut self.ledger
    }

    /// Ends the session and hands the curated tree back.
    pub fn into_tree(self) -> GeneTree {
        self.tree
    }

    /// Evidence below `node` for `term` under the configured relation mode.
    pub fn resolve_evidence(&self, node: NodeId, term: &TermId) -> WithEvidence {
        WithEvidence::resolve(&self.tree, &self.terms, self.config.relation_mode, node, term)
    }

    /// Checks whether `term` may be curated at `node`.
    ///
    /// Returns the first failing rule, or `None` when the term is valid.
    pub fn is_valid_term(
        &self,
        node: NodeId,
        term: &TermId,
    ) -> Result<Option<RejectionKind>, PaintError> {
        let gene = self.tree.get(node).ok_or(PaintError::UnknownNode(node))?;

        let rejection = if gene.is_pruned() {
            Some(RejectionKind::Prune)
        } else if self.terms.is_excluded(term) || self.config.is_excluded(term) {
            Some(RejectionKind::Excluded)
        } else if self.is_annotated_to(node, term) {
            Some(RejectionKind::AlreadyAssociated)
        } else if self.resolve_evidence(node, term).lacks_evidence {
            Some(RejectionKind::Unsupported)
        } else if self.descendants_all_broader(node, term) {
            Some(RejectionKind::TooSpecific)
        } else if self.config.check_taxa && !self.taxa.applicable(term, &self.lineage_taxa(node))
        {
            Some(RejectionKind::WrongTaxa)
        } else {
            None
        };

        if let Some(kind) = rejection {
            debug!(
                "event=paint_validate module=paint status=rejected node={} term={} kind={}",
                gene.id(),
                term,
                kind
            );
        }
        Ok(rejection)
    }

    /// Validates and, when valid, propagates `term` from `node`.
    ///
    /// Rejections are recorded as alerts and returned as `Err`-free values.
    pub fn annotate(
        &mut self,
        node: NodeId,
        term: &TermId,
        qualifiers: Qualifiers,
        date: NaiveDate,
    ) -> Result<Result<Annotation, RejectionKind>, PaintError> {
        if let Some(kind) = self.is_valid_term(node, term)? {
            let subject = self.tree.node(node).id().to_string();
            self.ledger.alert(Alert {
                kind,
                subject,
                term: Some(term.clone()),
                node: Some(node),
                date: Some(date),
            });
            return Ok(Err(kind));
        }
        match self.propagate_association(node, term, qualifiers, None, date)? {
            Some(annotation) => Ok(Ok(annotation)),
            None => Ok(Err(RejectionKind::AlreadyAssociated)),
        }
    }

    /// Curates `term` at `node` and spreads it to the non-pruned subtree.
    ///
    /// Returns the annotation created at `node`, or `None` when `node` is an
    /// evidence source, already annotated to `term`, or pruned. Callers
    /// wanting the rule checks run [`Self::is_valid_term`] first.
    pub fn propagate_association(
        &mut self,
        node: NodeId,
        term: &TermId,
        qualifiers: Qualifiers,
        reference: Option<&str>,
        date: NaiveDate,
    ) -> Result<Option<Annotation>, PaintError> {
        self.associate(node, term, qualifiers, reference, date, true)
    }

    pub(crate) fn associate(
        &mut self,
        node: NodeId,
        term: &TermId,
        qualifiers: Qualifiers,
        reference: Option<&str>,
        date: NaiveDate,
        log: bool,
    ) -> Result<Option<Annotation>, PaintError> {
        self.ensure_node(node)?;
        let aspect = self
            .terms
            .aspect(term)
            .ok_or_else(|| PaintError::UnknownTerm(term.clone()))?;

        let evidence = self.resolve_evidence(node, term);
        if self.tree.is_pruned(node)
            || evidence.exp_withs.contains(&node)
            || self.is_annotated_to(node, term)
        {
            return Ok(None);
        }

        let top = Annotation {
            term: term.clone(),
            aspect,
            evidence: EvidenceCode::for_paint(true),
            is_negated: evidence.is_experimental_not,
            is_direct_not: false,
            is_direct_mrc: true,
            is_challenged: false,
            qualifiers: qualifiers | evidence.qualifiers,
            with_list: evidence.with_list(),
            reference: reference
                .unwrap_or(self.config.default_reference.as_str())
                .to_string(),
            date,
        };

        let removed = self.remove_more_general_terms(node, term);
        self.tree.annotations_mut(node).push(top.clone());
        let mut added = vec![NodeAnnotation::new(node, top.clone())];
        added.extend(self.spread_inherited(node, false, &top, node, &evidence.exp_withs));

        info!(
            "event=paint_associate module=paint status=ok node={} term={} negated={} added={} removed={}",
            self.tree.node(node).id(),
            term,
            top.is_negated,
            added.len(),
            removed.len()
        );
        if log {
            self.ledger.record(LogEntry::new(
                LogAction::Assoc,
                node,
                Some(top.clone()),
                added,
                removed,
                date,
            ));
        }
        Ok(Some(top))
    }

    /// Deletes PAINT annotations strictly broader than `term` at `node` and
    /// across its non-pruned subtree. Negated annotations are kept.
    pub(crate) fn remove_more_general_terms(
        &mut self,
        node: NodeId,
        term: &TermId,
    ) -> Vec<NodeAnnotation> {
        let mut doomed = Vec::new();
        for current in self.tree.propagation_scope(node) {
            for annotation in self.tree.annotations(current) {
                if annotation.is_paint()
                    && !annotation.is_negated
                    && self.more_specific(term, &annotation.term)
                {
                    doomed.push(NodeAnnotation::new(current, annotation.clone()));
                }
            }
        }
        for item in &doomed {
            self.tree.remove_annotation(item.node, &item.annotation);
        }
        doomed
    }

    /// Negates the PAINT annotation to `term` at `node` and pushes the
    /// negation down through matching descendants.
    ///
    /// Returns `false` when the annotation was already negated.
    pub fn set_not(
        &mut self,
        node: NodeId,
        term: &TermId,
        evidence: EvidenceCode,
        date: NaiveDate,
    ) -> Result<bool, PaintError> {
        self.negate(node, term, evidence, date, true)
    }

    pub(crate) fn negate(
        &mut self,
        node: NodeId,
        term: &TermId,
        evidence: EvidenceCode,
        date: NaiveDate,
        log: bool,
    ) -> Result<bool, PaintError> {
        self.ensure_node(node)?;
        if !evidence.is_negation() {
            return Err(PaintError::NotNegationEvidence(evidence));
        }
        let current = self
            .tree
            .node(node)
            .paint_annotation(term)
            .cloned()
            .ok_or_else(|| PaintError::NotAnnotated {
                node,
                term: term.clone(),
            })?;
        if current.is_negated {
            return Ok(false);
        }

        let negated = Annotation {
            evidence,
            is_negated: true,
            is_direct_not: true,
            with_list: self.negation_with_list(node, term),
            date,
            ..current.clone()
        };
        if let Some(slot) = self.tree.paint_annotation_mut(node, term) {
            *slot = negated.clone();
        }
        let mut removed = vec![NodeAnnotation::new(node, current)];
        let mut added = vec![NodeAnnotation::new(node, negated.clone())];

        let (before, after) = self.propagate_negation_down(node, term, date);
        removed.extend(before);
        added.extend(after);
        added.extend(self.restore_inherited_associations(node));

        info!(
            "event=paint_negate module=paint status=ok node={} term={} evidence={} flipped={}",
            self.tree.node(node).id(),
            term,
            evidence,
            removed.len() - 1
        );
        if log {
            self.ledger.record(LogEntry::new(
                LogAction::Not,
                node,
                Some(negated),
                added,
                removed,
                date,
            ));
        }
        Ok(true)
    }

    /// Leaves below `node` that already negate `term`, or else the parent.
    fn negation_with_list(&self, node: NodeId, term: &TermId) -> Vec<NodeId> {
        let negated_leaves: Vec<NodeId> = self
            .tree
            .leaf_descendants(node)
            .into_iter()
            .filter(|leaf| *leaf != node)
            .filter(|leaf| {
                self.tree
                    .annotations(*leaf)
                    .iter()
                    .any(|annotation| annotation.is_negated && &annotation.term == term)
            })
            .collect();
        if !negated_leaves.is_empty() {
            return negated_leaves;
        }
        self.tree.parent(node).into_iter().collect()
    }

    /// Rewrites matching PAINT annotations below `node` as negations
    /// inherited from `node`, dated like the curated negation.
    ///
    /// Descent stops at pruned children and at children without a PAINT
    /// annotation to `term`. Returns the old and new states.
    fn propagate_negation_down(
        &mut self,
        node: NodeId,
        term: &TermId,
        date: NaiveDate,
    ) -> (Vec<NodeAnnotation>, Vec<NodeAnnotation>) {
        let mut affected = Vec::new();
        let mut stack: Vec<NodeId> = self.tree.children(node).to_vec();
        while let Some(child) = stack.pop() {
            if self.tree.is_pruned(child) || self.tree.node(child).paint_annotation(term).is_none()
            {
                continue;
            }
            affected.push(child);
            stack.extend(self.tree.children(child).iter().copied());
        }

        let mut before = Vec::with_capacity(affected.len());
        let mut after = Vec::with_capacity(affected.len());
        for child in affected {
            let Some(slot) = self.tree.paint_annotation_mut(child, term) else {
                continue;
            };
            before.push(NodeAnnotation::new(child, slot.clone()));
            slot.is_negated = true;
            slot.is_direct_not = false;
            slot.is_direct_mrc = false;
            slot.with_list = vec![node];
            slot.evidence = EvidenceCode::for_paint(false);
            slot.date = date;
            after.push(NodeAnnotation::new(child, slot.clone()));
        }
        (before, after)
    }

    /// Backfills ancestral coverage at `node` and its non-pruned subtree.
    ///
    /// For every term, the nearest ancestor carrying a PAINT annotation to it
    /// governs. Returns the created annotations.
    pub(crate) fn restore_inherited_associations(&mut self, node: NodeId) -> Vec<NodeAnnotation> {
        let mut seen: HashSet<TermId> = HashSet::new();
        let mut added = Vec::new();
        for ancestor in self.tree.ancestors(node) {
            let governing: Vec<Annotation> = self
                .tree
                .annotations(ancestor)
                .iter()
                .filter(|annotation| annotation.is_paint())
                .filter(|annotation| seen.insert(annotation.term.clone()))
                .cloned()
                .collect();
            for annotation in governing {
                if self.is_annotated_to(node, &annotation.term) {
                    continue;
                }
                let origin = if annotation.is_direct_mrc || annotation.is_direct_not {
                    ancestor
                } else {
                    annotation.with_list.first().copied().unwrap_or(ancestor)
                };
                added.extend(self.spread_inherited(node, true, &annotation, origin, &BTreeSet::new()));
            }
        }
        if !added.is_empty() {
            debug!(
                "event=paint_restore module=paint status=ok node={} added={}",
                self.tree.node(node).id(),
                added.len()
            );
        }
        added
    }

    /// Marks `node` pruned and drops its PAINT annotations.
    ///
    /// Returns the archive of curated (direct MRC or direct NOT) annotations
    /// needed to graft the branch back.
    pub fn prune_branch(
        &mut self,
        node: NodeId,
        date: NaiveDate,
    ) -> Result<Vec<Annotation>, PaintError> {
        self.prune(node, date, true)
    }

    pub(crate) fn prune(
        &mut self,
        node: NodeId,
        date: NaiveDate,
        log: bool,
    ) -> Result<Vec<Annotation>, PaintError> {
        self.ensure_node(node)?;
        if self.tree.is_pruned(node) {
            return Ok(Vec::new());
        }
        self.tree.set_pruned(node, true);
        let removed: Vec<NodeAnnotation> = self
            .tree
            .annotations(node)
            .iter()
            .filter(|annotation| annotation.is_paint())
            .map(|annotation| NodeAnnotation::new(node, annotation.clone()))
            .collect();
        self.tree
            .annotations_mut(node)
            .retain(|annotation| !annotation.is_paint());

        let entry = LogEntry::new(LogAction::Prune, node, None, Vec::new(), removed, date);
        let archive = entry.prune_archive();
        info!(
            "event=paint_prune module=paint status=ok node={} removed={} archived={}",
            self.tree.node(node).id(),
            entry.removed.len(),
            archive.len()
        );
        if log {
            self.ledger.record(entry);
        }
        Ok(archive)
    }

    /// Reverses a prune: clears the flag, restores ancestral coverage and
    /// replays the archived curations.
    pub fn graft_branch(&mut self, node: NodeId, archive: &[Annotation]) -> Result<(), PaintError> {
        self.ensure_node(node)?;
        self.tree.set_pruned(node, false);
        self.restore_inherited_associations(node);
        for annotation in archive {
            if annotation.is_direct_mrc {
                self.associate(
                    node,
                    &annotation.term,
                    annotation.qualifiers,
                    Some(annotation.reference.as_str()),
                    annotation.date,
                    false,
                )?;
            }
            if annotation.is_direct_not {
                match self.negate(node, &annotation.term, annotation.evidence, annotation.date, false)
                {
                    Ok(_) => {}
                    Err(PaintError::NotAnnotated { term, .. }) => warn!(
                        "event=paint_graft module=paint status=error node={} term={} reason=no_coverage_to_negate",
                        self.tree.node(node).id(),
                        term
                    ),
                    Err(err) => return Err(err),
                }
            }
        }
        info!(
            "event=paint_graft module=paint status=ok node={} replayed={}",
            self.tree.node(node).id(),
            archive.len()
        );
        Ok(())
    }

    /// Disputes the experimental annotations of `leaf` to `term`.
    ///
    /// Curated ancestors citing `leaf` whose evidence disappears lose the
    /// annotation together with its inherited copies. Returns what was
    /// removed from the tree.
    pub fn challenge_evidence(
        &mut self,
        leaf: NodeId,
        term: &TermId,
        date: NaiveDate,
    ) -> Result<Vec<NodeAnnotation>, PaintError> {
        self.challenge(leaf, term, date, true)
    }

    pub(crate) fn challenge(
        &mut self,
        leaf: NodeId,
        term: &TermId,
        date: NaiveDate,
        log: bool,
    ) -> Result<Vec<NodeAnnotation>, PaintError> {
        self.ensure_node(leaf)?;
        let targets: Vec<Annotation> = self
            .tree
            .annotations(leaf)
            .iter()
            .filter(|annotation| annotation.is_experimental() && &annotation.term == term)
            .cloned()
            .collect();
        if targets.is_empty() {
            return Err(PaintError::NoExperimentalEvidence {
                node: leaf,
                term: term.clone(),
            });
        }

        let mut added = Vec::new();
        let mut removed = Vec::new();
        for original in &targets {
            let challenged = Annotation {
                is_challenged: true,
                ..original.clone()
            };
            if let Some(slot) = self
                .tree
                .annotations_mut(leaf)
                .iter_mut()
                .find(|current| **current == *original)
            {
                *slot = challenged.clone();
            }
            removed.push(NodeAnnotation::new(leaf, original.clone()));
            added.push(NodeAnnotation::new(leaf, challenged));
        }

        let mut withdrawn = Vec::new();
        for ancestor in self.tree.ancestors(leaf) {
            let citing: Vec<Annotation> = self
                .tree
                .annotations(ancestor)
                .iter()
                .filter(|annotation| {
                    annotation.is_paint()
                        && annotation.is_direct_mrc
                        && annotation.with_list.contains(&leaf)
                })
                .cloned()
                .collect();
            for annotation in citing {
                if self.resolve_evidence(ancestor, &annotation.term).lacks_evidence {
                    withdrawn.extend(self.withdraw_association(ancestor, &annotation));
                }
            }
        }
        removed.extend(withdrawn.iter().cloned());

        info!(
            "event=paint_challenge module=paint status=ok node={} term={} challenged={} withdrawn={}",
            self.tree.node(leaf).id(),
            term,
            targets.len(),
            withdrawn.len()
        );
        if log {
            let subject = added.first().map(|item| item.annotation.clone());
            self.ledger.record(LogEntry::new(
                LogAction::Challenge,
                leaf,
                subject,
                added,
                removed,
                date,
            ));
        }
        Ok(withdrawn)
    }

    /// Removes a curated annotation and the inherited copies citing it.
    fn withdraw_association(&mut self, origin: NodeId, curated: &Annotation) -> Vec<NodeAnnotation> {
        let mut doomed = vec![NodeAnnotation::new(origin, curated.clone())];
        for current in self.tree.propagation_scope(origin).into_iter().skip(1) {
            for annotation in self.tree.annotations(current) {
                if annotation.is_paint()
                    && !annotation.is_direct_mrc
                    && annotation.term == curated.term
                    && annotation.with_list == [origin]
                {
                    doomed.push(NodeAnnotation::new(current, annotation.clone()));
                }
            }
        }
        for item in &doomed {
            self.tree.remove_annotation(item.node, &item.annotation);
        }
        doomed
    }

    /// Undoes an entry whose `added`/`removed` lists describe it fully.
    pub(crate) fn revert(&mut self, entry: &LogEntry) {
        for item in entry.added.iter().rev() {
            if !self.tree.remove_annotation(item.node, &item.annotation) {
                warn!(
                    "event=ledger_revert module=ledger status=error node={} term={} reason=annotation_missing",
                    item.node, item.annotation.term
                );
            }
        }
        for item in &entry.removed {
            self.tree
                .annotations_mut(item.node)
                .push(item.annotation.clone());
        }
    }

    /// Re-runs the forward operation of an undone entry without logging.
    pub(crate) fn replay(&mut self, entry: &LogEntry) -> Result<(), PaintError> {
        match (entry.action, entry.annotation.as_ref()) {
            (LogAction::Prune, _) => {
                self.prune(entry.node, entry.date, false)?;
            }
            (LogAction::Assoc, Some(annotation)) => {
                self.associate(
                    entry.node,
                    &annotation.term,
                    annotation.qualifiers,
                    Some(annotation.reference.as_str()),
                    entry.date,
                    false,
                )?;
            }
            (LogAction::Not, Some(annotation)) => {
                self.negate(
                    entry.node,
                    &annotation.term,
                    annotation.evidence,
                    entry.date,
                    false,
                )?;
            }
            (LogAction::Challenge, Some(annotation)) => {
                self.challenge(entry.node, &annotation.term, entry.date, false)?;
            }
            (_, None) => {
                warn!(
                    "event=ledger_replay module=ledger status=error action={} reason=missing_annotation",
                    entry.action
                );
            }
        }
        Ok(())
    }

    /// Adds inherited copies of `template` citing `origin` across the scope
    /// of `start`, skipping nodes already covered and nodes in `skip`.
    fn spread_inherited(
        &mut self,
        start: NodeId,
        include_start: bool,
        template: &Annotation,
        origin: NodeId,
        skip: &BTreeSet<NodeId>,
    ) -> Vec<NodeAnnotation> {
        let targets: Vec<NodeId> = self
            .tree
            .propagation_scope(start)
            .into_iter()
            .skip(usize::from(!include_start))
            .filter(|current| !skip.contains(current))
            .filter(|current| !self.is_annotated_to(*current, &template.term))
            .collect();

        let inherited = Annotation {
            evidence: EvidenceCode::for_paint(false),
            is_direct_not: false,
            is_direct_mrc: false,
            is_challenged: false,
            with_list: vec![origin],
            ..template.clone()
        };
        targets
            .into_iter()
            .map(|target| {
                self.tree.annotations_mut(target).push(inherited.clone());
                NodeAnnotation::new(target, inherited.clone())
            })
            .collect()
    }

    /// Node carries `term` in any state, or a positive, more specific term.
    fn is_annotated_to(&self, node: NodeId, term: &TermId) -> bool {
        self.tree.annotations(node).iter().any(|annotation| {
            !annotation.is_challenged
                && (&annotation.term == term
                    || (!annotation.is_negated && self.more_specific(&annotation.term, term)))
        })
    }

    /// Curated descendants exist and all of them are broader than `term`.
    fn descendants_all_broader(&self, node: NodeId, term: &TermId) -> bool {
        let aspect = self.terms.aspect(term);
        let mut witnessed = false;
        for current in self.tree.propagation_scope(node).into_iter().skip(1) {
            for annotation in self.tree.annotations(current) {
                if !annotation.is_paint()
                    || !annotation.is_direct_mrc
                    || annotation.is_negated
                    || Some(annotation.aspect) != aspect
                {
                    continue;
                }
                witnessed = true;
                if !self.more_specific(term, &annotation.term) {
                    return false;
                }
            }
        }
        witnessed
    }

    /// Taxon ids of `node` and its ancestors, nearest first.
    fn lineage_taxa(&self, node: NodeId) -> Vec<String> {
        std::iter::once(node)
            .chain(self.tree.ancestors(node))
            .filter_map(|current| self.tree.node(current).taxon_id().map(str::to_string))
            .collect()
    }

    fn more_specific(&self, term: &TermId, than: &TermId) -> bool {
        self.terms
            .is_descendant(term, than, self.config.relation_mode)
    }

    fn ensure_node(&self, node: NodeId) -> Result<(), PaintError> {
        self.tree
            .get(node)
            .map(|_| ())
            .ok_or(PaintError::UnknownNode(node))
    }
}
