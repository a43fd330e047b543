//! OBO-style flat file loader.
//!
//! Reads `[Term]` stanzas into a [`TermGraphBuilder`]. Other stanza types
//! (`[Typedef]`, `[Instance]`) and unknown tags are skipped.

use super::closure::{Relation, TermGraphBuilder, TermRecord};
use super::OntologyError;
use crate::model::term::{Aspect, TermId};

/// Subsets whose members are never curated directly.
const EXCLUDED_SUBSETS: &[&str] = &["gocheck_do_not_annotate", "gocheck_do_not_manually_annotate"];

#[derive(Default)]
struct PendingTerm {
    id: Option<TermId>,
    label: String,
    aspect: Option<Aspect>,
    is_obsolete: bool,
    replaced_by: Vec<TermId>,
    is_excluded: bool,
    parents: Vec<(Relation, TermId)>,
}

/// Parses OBO text into a graph builder.
///
/// # Errors
/// - `MissingTermId` when a `[Term]` stanza has no `id:` tag.
/// - `MalformedLine` for tag lines without a `:` separator inside a term
///   stanza, and for `relationship:` lines without a target.
pub fn parse_obo(text: &str) -> Result<TermGraphBuilder, OntologyError> {
    let mut builder = TermGraphBuilder::new();
    let mut pending: Option<PendingTerm> = None;

    for (index, raw_line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            finish_term(&mut builder, pending.take(), line_no)?;
            if line == "[Term]" {
                pending = Some(PendingTerm::default());
            }
            continue;
        }

        let Some(term) = pending.as_mut() else {
            continue;
        };
        let (tag, value) = line.split_once(':').ok_or_else(|| OntologyError::MalformedLine {
            line: line_no,
            reason: format!("expected `tag: value`, got `{line}`"),
        })?;
        let value = strip_trailing_modifiers(value.trim());

        match tag.trim() {
            "id" => term.id = Some(TermId::new(value)),
            "name" => term.label = value.to_string(),
            "namespace" => term.aspect = Aspect::parse(value).ok(),
            "is_a" => term.parents.push((Relation::IsA, TermId::new(value))),
            "relationship" => {
                let (relation, target) =
                    value
                        .split_once(char::is_whitespace)
                        .ok_or_else(|| OntologyError::MalformedLine {
                            line: line_no,
                            reason: format!("relationship without target: `{value}`"),
                        })?;
                if let Some(relation) = Relation::parse(relation) {
                    term.parents.push((relation, TermId::new(target.trim())));
                }
            }
            "is_obsolete" => term.is_obsolete = value == "true",
            "replaced_by" => term.replaced_by.push(TermId::new(value)),
            "subset" => {
                if EXCLUDED_SUBSETS.contains(&value) {
                    term.is_excluded = true;
                }
            }
            _ => {}
        }
    }

    let last_line = text.lines().count();
    finish_term(&mut builder, pending, last_line)?;
    Ok(builder)
}

fn finish_term(
    builder: &mut TermGraphBuilder,
    pending: Option<PendingTerm>,
    line_no: usize,
) -> Result<(), OntologyError> {
    let Some(pending) = pending else {
        return Ok(());
    };
    let id = pending
        .id
        .ok_or(OntologyError::MissingTermId { line: line_no })?;
    for (relation, parent) in pending.parents {
        builder.add_edge(id.clone(), relation, parent);
    }
    builder.add_term(TermRecord {
        id,
        label: pending.label,
        aspect: pending.aspect,
        is_obsolete: pending.is_obsolete,
        replaced_by: pending.replaced_by,
        is_excluded: pending.is_excluded,
    });
    Ok(())
}

/// Drops the `! label` trailer used for human readers.
fn strip_comment(line: &str) -> &str {
    match line.find(" !") {
        Some(position) => &line[..position],
        None => line,
    }
}

/// Drops `{...}` trailing modifiers.
fn strip_trailing_modifiers(value: &str) -> &str {
    match value.find(" {") {
        Some(position) => value[..position].trim_end(),
        None => value,
    }
}
