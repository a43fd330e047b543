//! GAF export of a curated tree.

use super::row::GafRow;
use crate::config::CurationConfig;
use crate::tree::{GeneNode, GeneTree};
use chrono::NaiveDate;
use log::info;

/// Produces the rows describing the curated state of `tree`.
///
/// One row per PAINT annotation that is direct MRC, direct NOT, or sits on a
/// leaf. Pruned nodes yield a single cut row dated `export_date`.
pub fn export_rows(tree: &GeneTree, config: &CurationConfig, export_date: NaiveDate) -> Vec<GafRow> {
    let mut rows = Vec::new();
    let mut cut = 0usize;
    for node_id in tree.node_ids() {
        let node = tree.node(node_id);
        let subject = export_subject(node);
        if node.is_pruned() {
            rows.push(GafRow::cut(subject, export_date).assigned_by(config.assigned_by.as_str()));
            cut += 1;
            continue;
        }
        for annotation in node.annotations().iter().filter(|annotation| {
            annotation.is_paint()
                && (annotation.is_direct_mrc || annotation.is_direct_not || node.is_leaf())
        }) {
            let mut row = GafRow::association(
                subject.as_str(),
                annotation.term.clone(),
                annotation.evidence,
                annotation.date,
            )
            .qualifiers(annotation.qualifiers)
            .reference(annotation.reference.as_str())
            .assigned_by(config.assigned_by.as_str());
            if annotation.is_negated {
                row = row.negated();
            }
            for cited in &annotation.with_list {
                if let Some(cited_node) = tree.get(*cited) {
                    row = row.with_from(cited_node.id());
                }
            }
            rows.push(row);
        }
    }
    info!(
        "event=gaf_export module=gaf status=ok rows={} cut={}",
        rows.len(),
        cut
    );
    rows
}

/// First database id, falling back to the tree-internal id.
fn export_subject(node: &GeneNode) -> String {
    node.db_ids()
        .first()
        .map(String::as_str)
        .unwrap_or(node.id())
        .to_string()
}
