//! Reversible action ledger.
//!
//! # Responsibility
//! - Record every curation mutation as an immutable `LogEntry`.
//! - Drive undo/redo by calling back into the paint service.
//! - Keep non-reversible alerts (rejections, reconciliation problems).
//!
//! # Invariants
//! - Entries move between `done` and `undone` but are never mutated.
//! - Recording a new entry clears `undone`.
//! - The ledger never edits the tree itself; the paint service is the single
//!   mutation authority.

use crate::model::annotation::Annotation;
use crate::model::term::TermId;
use crate::ontology::{TaxonChecker, TermGraph};
use crate::service::paint_service::{PaintError, PaintService};
use crate::tree::NodeId;
use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable ledger entry identifier.
pub type EntryId = Uuid;

/// Kind of a reversible curation action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogAction {
    Assoc,
    Not,
    Prune,
    Challenge,
}

impl LogAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assoc => "ASSOC",
            Self::Not => "NOT",
            Self::Prune => "PRUNE",
            Self::Challenge => "CHALLENGE",
        }
    }
}

impl Display for LogAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason a candidate annotation or external row was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionKind {
    /// Target node is pruned.
    Prune,
    Excluded,
    AlreadyAssociated,
    Unsupported,
    TooSpecific,
    WrongTaxa,
    /// External subject could not be resolved to a node.
    Missing,
    /// Obsolete term without replacement.
    ObsoleteTerm,
}

impl RejectionKind {
    pub const ALL: [RejectionKind; 8] = [
        RejectionKind::Prune,
        RejectionKind::Excluded,
        RejectionKind::AlreadyAssociated,
        RejectionKind::Unsupported,
        RejectionKind::TooSpecific,
        RejectionKind::WrongTaxa,
        RejectionKind::Missing,
        RejectionKind::ObsoleteTerm,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Prune => "PRUNE",
            Self::Excluded => "EXCLUDED",
            Self::AlreadyAssociated => "ALREADY_ASSOCIATED",
            Self::Unsupported => "UNSUPPORTED",
            Self::TooSpecific => "TOO_SPECIFIC",
            Self::WrongTaxa => "WRONG_TAXA",
            Self::Missing => "MISSING",
            Self::ObsoleteTerm => "OBSOLETE_TERM",
        }
    }

    /// Report heading for alerts of this kind.
    pub fn description(self) -> &'static str {
        match self {
            Self::Prune => "Target node is pruned",
            Self::Excluded => "Term is reserved for ontology logic",
            Self::AlreadyAssociated => "Already annotated to this or a more specific term",
            Self::Unsupported => "No supporting experimental evidence",
            Self::TooSpecific => "Descendants are curated to broader terms only",
            Self::WrongTaxa => "Term is not applicable to this taxon",
            Self::Missing => "Subject not found in the family tree",
            Self::ObsoleteTerm => "Obsolete term without replacement",
        }
    }
}

impl Display for RejectionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An annotation together with the node carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAnnotation {
    pub node: NodeId,
    pub annotation: Annotation,
}

impl NodeAnnotation {
    pub fn new(node: NodeId, annotation: Annotation) -> Self {
        Self { node, annotation }
    }
}

/// One recorded curation mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: EntryId,
    pub action: LogAction,
    pub node: NodeId,
    /// Annotation the action is about; `None` for prunes.
    pub annotation: Option<Annotation>,
    /// Annotations created or rewritten by the action, in their new state.
    pub added: Vec<NodeAnnotation>,
    /// Annotations deleted or rewritten by the action, in their old state.
    pub removed: Vec<NodeAnnotation>,
    pub date: NaiveDate,
}

impl LogEntry {
    pub fn new(
        action: LogAction,
        node: NodeId,
        annotation: Option<Annotation>,
        added: Vec<NodeAnnotation>,
        removed: Vec<NodeAnnotation>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            action,
            node,
            annotation,
            added,
            removed,
            date,
        }
    }

    /// Curated annotations a prune took away, kept for grafting.
    pub fn prune_archive(&self) -> Vec<Annotation> {
        self.removed
            .iter()
            .map(|item| &item.annotation)
            .filter(|annotation| annotation.is_direct_mrc || annotation.is_direct_not)
            .cloned()
            .collect()
    }
}

/// Non-reversible note about something that was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: RejectionKind,
    /// External subject id, or the node id for interactive rejections.
    pub subject: String,
    pub term: Option<TermId>,
    pub node: Option<NodeId>,
    pub date: Option<NaiveDate>,
}

/// Done/undone history plus alerts for one family.
#[derive(Debug, Clone, Default)]
pub struct ActionLedger {
    done: Vec<LogEntry>,
    undone: Vec<LogEntry>,
    alerts: Vec<Alert>,
}

impl ActionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new action and forgets the redo history.
    pub fn record(&mut self, entry: LogEntry) {
        self.done.push(entry);
        self.undone.clear();
    }

    pub fn alert(&mut self, alert: Alert) {
        self.alerts.push(alert);
    }

    pub fn done(&self) -> &[LogEntry] {
        &self.done
    }

    pub fn undone(&self) -> &[LogEntry] {
        &self.undone
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Drops all history and alerts.
    pub fn clear(&mut self) {
        self.done.clear();
        self.undone.clear();
        self.alerts.clear();
    }
}

impl<G: TermGraph, X: TaxonChecker> PaintService<G, X> {
    /// Reverses the most recent action.
    ///
    /// Returns the reversed action kind, or `None` when there is nothing to
    /// undo.
    pub fn undo(&mut self) -> Result<Option<LogAction>, PaintError> {
        let Some(entry) = self.ledger_mut().done.pop() else {
            return Ok(None);
        };
        let outcome = match entry.action {
            LogAction::Assoc | LogAction::Not | LogAction::Challenge => {
                self.revert(&entry);
                Ok(())
            }
            LogAction::Prune => self.graft_branch(entry.node, &entry.prune_archive()),
        };
        let action = entry.action;
        if let Err(err) = outcome {
            self.ledger_mut().done.push(entry);
            return Err(err);
        }
        info!(
            "event=ledger_undo module=ledger status=ok action={} node={} remaining={}",
            action,
            entry.node,
            self.ledger().done.len()
        );
        self.ledger_mut().undone.push(entry);
        Ok(Some(action))
    }

    /// Re-applies the most recently undone action.
    pub fn redo(&mut self) -> Result<Option<LogAction>, PaintError> {
        let Some(entry) = self.ledger_mut().undone.pop() else {
            return Ok(None);
        };
        let outcome = self.replay(&entry);
        let action = entry.action;
        if let Err(err) = outcome {
            self.ledger_mut().undone.push(entry);
            return Err(err);
        }
        info!(
            "event=ledger_redo module=ledger status=ok action={} node={} remaining={}",
            action,
            entry.node,
            self.ledger().undone.len()
        );
        self.ledger_mut().done.push(entry);
        Ok(Some(action))
    }
}
