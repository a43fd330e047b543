//! Replays external annotation rows onto a curation session.
//!
//! # Responsibility
//! - Resolve row subjects, prune cut branches, apply direct associations and
//!   then negations.
//! - Turn unresolvable or invalid rows into alerts instead of failures.
//!
//! # Invariants
//! - Rows and resolved nodes are validated up front; a malformed row or a
//!   node from another family aborts before any mutation.
//! - Pass order is prunes, positive associations, negations.
//! - Inherited (IBA) positive rows are never replayed; propagation rebuilds
//!   them.
//! - A negation whose with/from node sits in the negation bucket for the
//!   same term is skipped.

use crate::gaf::{GafRow, IdMapper};
use crate::model::term::{EvidenceCode, TermId};
use crate::ontology::{TaxonChecker, TermGraph};
use crate::service::ledger::{Alert, RejectionKind};
use crate::service::paint_service::{PaintError, PaintService};
use crate::tree::NodeId;
use chrono::NaiveDate;
use log::{info, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fatal reconciliation failures.
#[derive(Debug)]
pub enum ReconcileError {
    /// Row cannot be interpreted at all.
    MalformedRow { index: usize, reason: String },
    Paint(PaintError),
}

impl Display for ReconcileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedRow { index, reason } => {
                write!(f, "malformed annotation row #{index}: {reason}")
            }
            Self::Paint(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReconcileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Paint(err) => Some(err),
            Self::MalformedRow { .. } => None,
        }
    }
}

impl From<PaintError> for ReconcileError {
    fn from(value: PaintError) -> Self {
        Self::Paint(value)
    }
}

/// Outcome counters and alerts for one family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub applied: usize,
    pub pruned: usize,
    pub negated: usize,
    pub skipped_inherited: usize,
    pub skipped_negations: usize,
    pub alerts: Vec<Alert>,
}

/// Row fields after validation.
struct CheckedRow<'a> {
    row: &'a GafRow,
    term: Option<&'a TermId>,
    date: NaiveDate,
}

struct DeferredNot<'a> {
    term: TermId,
    row: &'a GafRow,
    date: NaiveDate,
}

/// Replays GAF rows through the paint service.
pub struct GafReconciler<M: IdMapper> {
    mapper: M,
}

impl<M: IdMapper> GafReconciler<M> {
    pub fn new(mapper: M) -> Self {
        Self { mapper }
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    /// Applies `rows` to `service` and reports what happened.
    ///
    /// # Errors
    /// - `MalformedRow` when a row lacks its subject, date, or, for non-cut
    ///   rows, its term or evidence code. Nothing is applied in that case.
    /// - `Paint(UnknownNode)` when the mapper resolves a subject to a node
    ///   outside this family, checked before any mutation.
    /// - `Paint` for other structural failures raised by the engine.
    pub fn reconcile<G: TermGraph, X: TaxonChecker>(
        &self,
        service: &mut PaintService<G, X>,
        rows: &[GafRow],
    ) -> Result<ReconcileReport, ReconcileError> {
        let checked = rows
            .iter()
            .enumerate()
            .map(|(index, row)| check_row(index, row))
            .collect::<Result<Vec<_>, _>>()?;
        info!(
            "event=gaf_reconcile module=reconcile status=start rows={}",
            checked.len()
        );

        let mut report = ReconcileReport::default();
        let mut cuts = Vec::new();
        let mut positives = Vec::new();
        let mut buckets: BTreeMap<NodeId, Vec<DeferredNot<'_>>> = BTreeMap::new();

        for item in &checked {
            let nodes = self.mapper.resolve(&item.row.subject);
            if nodes.is_empty() {
                report.alerts.push(Alert {
                    kind: RejectionKind::Missing,
                    subject: item.row.subject.clone(),
                    term: item.term.cloned(),
                    node: None,
                    date: Some(item.date),
                });
                continue;
            }
            if let Some(stale) = nodes
                .iter()
                .copied()
                .find(|node| service.tree().get(*node).is_none())
            {
                warn!(
                    "event=gaf_reconcile module=reconcile status=error subject={} reason=node_outside_family",
                    item.row.subject
                );
                return Err(PaintError::UnknownNode(stale).into());
            }
            let Some(term) = item.term else {
                cuts.extend(nodes.into_iter().map(|node| (node, item.date)));
                continue;
            };
            if item.row.negated && replays_as_negation(item.row) {
                for node in nodes {
                    buckets.entry(node).or_default().push(DeferredNot {
                        term: term.clone(),
                        row: item.row,
                        date: item.date,
                    });
                }
            } else if item.row.is_inherited() {
                report.skipped_inherited += 1;
            } else {
                positives.push((nodes, term, item));
            }
        }

        for (node, date) in cuts {
            if !service.tree().is_pruned(node) {
                service.prune_branch(node, date)?;
                report.pruned += 1;
            }
        }

        for (nodes, term, item) in positives {
            let Some(terms) = current_terms(service, term, item, &mut report) else {
                continue;
            };
            for node in &nodes {
                for term in &terms {
                    if let Some(kind) = service.is_valid_term(*node, term)? {
                        report.alerts.push(Alert {
                            kind,
                            subject: item.row.subject.clone(),
                            term: Some(term.clone()),
                            node: Some(*node),
                            date: Some(item.date),
                        });
                        continue;
                    }
                    let applied = service.propagate_association(
                        *node,
                        term,
                        item.row.qualifiers,
                        item.row.references.first().map(String::as_str),
                        item.date,
                    )?;
                    if applied.is_some() {
                        report.applied += 1;
                    }
                }
            }
        }

        self.apply_nots(service, &buckets, &mut report)?;

        for alert in &report.alerts {
            service.ledger_mut().alert(alert.clone());
        }
        info!(
            "event=gaf_reconcile module=reconcile status=ok applied={} pruned={} negated={} skipped_inherited={} skipped_negations={} alerts={}",
            report.applied,
            report.pruned,
            report.negated,
            report.skipped_inherited,
            report.skipped_negations,
            report.alerts.len()
        );
        Ok(report)
    }

    /// Second pass over deferred negations, in node order.
    fn apply_nots<G: TermGraph, X: TaxonChecker>(
        &self,
        service: &mut PaintService<G, X>,
        buckets: &BTreeMap<NodeId, Vec<DeferredNot<'_>>>,
        report: &mut ReconcileReport,
    ) -> Result<(), ReconcileError> {
        for (node, deferred) in buckets {
            for not in deferred {
                let covered_by_bucket = not
                    .row
                    .with_from
                    .iter()
                    .flat_map(|with| self.mapper.resolve(with))
                    .filter(|with_node| with_node != node)
                    .any(|with_node| {
                        buckets.get(&with_node).is_some_and(|entries| {
                            entries.iter().any(|entry| entry.term == not.term)
                        })
                    });
                if covered_by_bucket {
                    report.skipped_negations += 1;
                    continue;
                }

                let evidence = not
                    .row
                    .evidence
                    .filter(|code| code.is_negation())
                    .unwrap_or(EvidenceCode::Ikr);
                match service.set_not(*node, &not.term, evidence, not.date) {
                    Ok(true) => report.negated += 1,
                    Ok(false) => {}
                    Err(PaintError::NotAnnotated { node, term }) => {
                        warn!(
                            "event=gaf_reconcile module=reconcile status=rejected node={} term={} reason=nothing_to_negate",
                            service.tree().node(node).id(),
                            term
                        );
                        report.alerts.push(Alert {
                            kind: RejectionKind::Unsupported,
                            subject: not.row.subject.clone(),
                            term: Some(term),
                            node: Some(node),
                            date: Some(not.date),
                        });
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        }
        Ok(())
    }
}

fn check_row(index: usize, row: &GafRow) -> Result<CheckedRow<'_>, ReconcileError> {
    let malformed = |reason: &str| ReconcileError::MalformedRow {
        index,
        reason: reason.to_string(),
    };
    if row.subject.trim().is_empty() {
        return Err(malformed("blank subject"));
    }
    let date = row.date.ok_or_else(|| malformed("missing date"))?;
    if row.is_cut {
        return Ok(CheckedRow {
            row,
            term: None,
            date,
        });
    }
    let term = row.term.as_ref().ok_or_else(|| malformed("missing term"))?;
    if row.evidence.is_none() {
        return Err(malformed("missing evidence code"));
    }
    Ok(CheckedRow {
        row,
        term: Some(term),
        date,
    })
}

/// Negated rows replay through `set_not`, except curated experimental
/// negations (IBD), which propagation rebuilds from the evidence itself.
fn replays_as_negation(row: &GafRow) -> bool {
    row.evidence != Some(EvidenceCode::Ibd)
}

/// Swaps an obsolete term for its replacements; alerts when none exist.
fn current_terms<G: TermGraph, X: TaxonChecker>(
    service: &PaintService<G, X>,
    term: &TermId,
    item: &CheckedRow<'_>,
    report: &mut ReconcileReport,
) -> Option<Vec<TermId>> {
    if !service.terms().is_obsolete(term) {
        return Some(vec![term.clone()]);
    }
    let replacements = service.terms().replaced_by(term);
    if replacements.is_empty() {
        report.alerts.push(Alert {
            kind: RejectionKind::ObsoleteTerm,
            subject: item.row.subject.clone(),
            term: Some(term.clone()),
            node: None,
            date: Some(item.date),
        });
        return None;
    }
    info!(
        "event=gaf_reconcile module=reconcile status=ok term={} replaced_by={}",
        term,
        replacements.len()
    );
    Some(replacements)
}
