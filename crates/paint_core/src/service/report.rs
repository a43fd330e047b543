//! Human-readable curation and alert reports.
//!
//! Lines follow `<date>: <species>_<id> <verb> <term-label> (<term-id>)`.

use crate::model::term::{Aspect, TermId};
use crate::ontology::TermGraph;
use crate::service::ledger::{ActionLedger, Alert, LogAction, LogEntry, RejectionKind};
use crate::tree::GeneTree;
use chrono::NaiveDate;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Renders the done history grouped by aspect, then action kind, then a
/// pruned section.
pub fn render_log_report<G: TermGraph + ?Sized>(
    ledger: &ActionLedger,
    tree: &GeneTree,
    terms: &G,
) -> String {
    let mut out = String::new();
    for aspect in Aspect::ALL {
        let in_aspect: Vec<&LogEntry> = ledger
            .done()
            .iter()
            .filter(|entry| {
                entry
                    .annotation
                    .as_ref()
                    .is_some_and(|annotation| annotation.aspect == aspect)
            })
            .collect();
        if in_aspect.is_empty() {
            continue;
        }
        out.push_str(&format!("# {aspect}\n"));
        for action in [LogAction::Assoc, LogAction::Not, LogAction::Challenge] {
            let lines: Vec<String> = in_aspect
                .iter()
                .filter(|entry| entry.action == action)
                .filter_map(|entry| {
                    let annotation = entry.annotation.as_ref()?;
                    Some(line(
                        entry.date,
                        &tree.node(entry.node).label(),
                        verb(action),
                        terms,
                        &annotation.term,
                    ))
                })
                .collect();
            if lines.is_empty() {
                continue;
            }
            out.push_str(&format!("## {}\n", heading(action)));
            for text in lines {
                out.push_str(&text);
            }
        }
    }

    let pruned: Vec<&LogEntry> = ledger
        .done()
        .iter()
        .filter(|entry| entry.action == LogAction::Prune)
        .collect();
    if !pruned.is_empty() {
        out.push_str("# Pruned\n");
        for entry in pruned {
            out.push_str(&format!(
                "{}: {} pruned\n",
                entry.date.format(DATE_FORMAT),
                tree.node(entry.node).label()
            ));
        }
    }
    out
}

/// Renders alerts grouped by kind.
pub fn render_alert_report<G: TermGraph + ?Sized>(alerts: &[Alert], terms: &G) -> String {
    let mut out = String::new();
    for kind in RejectionKind::ALL {
        let of_kind: Vec<&Alert> = alerts.iter().filter(|alert| alert.kind == kind).collect();
        if of_kind.is_empty() {
            continue;
        }
        out.push_str(&format!("# {} ({})\n", kind.description(), kind));
        for alert in of_kind {
            let date = alert
                .date
                .map(|date| date.format(DATE_FORMAT).to_string())
                .unwrap_or_else(|| "-".to_string());
            match &alert.term {
                Some(term) => out.push_str(&format!(
                    "{date}: {} {} ({term})\n",
                    alert.subject,
                    term_label(terms, term)
                )),
                None => out.push_str(&format!("{date}: {}\n", alert.subject)),
            }
        }
    }
    out
}

fn line<G: TermGraph + ?Sized>(
    date: NaiveDate,
    label: &str,
    verb: &str,
    terms: &G,
    term: &TermId,
) -> String {
    format!(
        "{}: {label} {verb} {} ({term})\n",
        date.format(DATE_FORMAT),
        term_label(terms, term)
    )
}

fn term_label<G: TermGraph + ?Sized>(terms: &G, term: &TermId) -> String {
    terms.label(term).unwrap_or_else(|| term.to_string())
}

fn heading(action: LogAction) -> &'static str {
    match action {
        LogAction::Assoc => "Associations",
        LogAction::Not => "Negations",
        LogAction::Prune => "Pruned",
        LogAction::Challenge => "Challenged evidence",
    }
}

fn verb(action: LogAction) -> &'static str {
    match action {
        LogAction::Assoc => "annotated to",
        LogAction::Not => "NOT annotated to",
        LogAction::Prune => "pruned",
        LogAction::Challenge => "challenged evidence for",
    }
}
