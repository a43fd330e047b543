//! Precomputed transitive-closure term graph.
//!
//! # Responsibility
//! - Collect term records and typed parent edges.
//! - Materialize strict ancestor sets once per relation mode.
//!
//! # Invariants
//! - `IsAPartOf` closure follows only `is_a`/`part_of` edges.
//! - `Regulates` closure follows paths with at most one regulation edge,
//!   since regulation does not compose with itself.

use super::{RelationMode, TermGraph};
use crate::model::term::{Aspect, TermId};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// Typed ontology edge from a child term to a parent term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    IsA,
    PartOf,
    Regulates,
    PositivelyRegulates,
    NegativelyRegulates,
}

impl Relation {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "is_a" => Some(Self::IsA),
            "part_of" => Some(Self::PartOf),
            "regulates" => Some(Self::Regulates),
            "positively_regulates" => Some(Self::PositivelyRegulates),
            "negatively_regulates" => Some(Self::NegativelyRegulates),
            _ => None,
        }
    }

    fn is_regulation(self) -> bool {
        matches!(
            self,
            Self::Regulates | Self::PositivelyRegulates | Self::NegativelyRegulates
        )
    }
}

/// Per-term metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermRecord {
    pub id: TermId,
    pub label: String,
    pub aspect: Option<Aspect>,
    pub is_obsolete: bool,
    pub replaced_by: Vec<TermId>,
    pub is_excluded: bool,
}

impl TermRecord {
    pub fn new(id: TermId, label: impl Into<String>, aspect: Aspect) -> Self {
        Self {
            id,
            label: label.into(),
            aspect: Some(aspect),
            is_obsolete: false,
            replaced_by: Vec::new(),
            is_excluded: false,
        }
    }
}

/// Accumulates records and edges before the closure is computed.
#[derive(Debug, Clone, Default)]
pub struct TermGraphBuilder {
    records: BTreeMap<TermId, TermRecord>,
    edges: Vec<(TermId, Relation, TermId)>,
}

impl TermGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces one term record.
    pub fn add_term(&mut self, record: TermRecord) -> &mut Self {
        self.records.insert(record.id.clone(), record);
        self
    }

    pub fn add_edge(&mut self, child: TermId, relation: Relation, parent: TermId) -> &mut Self {
        self.edges.push((child, relation, parent));
        self
    }

    pub fn term_count(&self) -> usize {
        self.records.len()
    }

    /// Computes the closure for every relation mode.
    pub fn build(self) -> ClosureTermGraph {
        let mut parents: HashMap<&TermId, Vec<(Relation, &TermId)>> = HashMap::new();
        for (child, relation, parent) in &self.edges {
            parents.entry(child).or_default().push((*relation, parent));
        }

        let mut ancestors = HashMap::new();
        for mode in RelationMode::ALL {
            let mut per_term = HashMap::new();
            for term in parents.keys() {
                let found = walk_ancestors(term, &parents, mode);
                if !found.is_empty() {
                    per_term.insert((*term).clone(), found);
                }
            }
            ancestors.insert(mode, per_term);
        }

        ClosureTermGraph {
            records: self.records.into_iter().collect(),
            ancestors,
        }
    }
}

fn walk_ancestors(
    start: &TermId,
    parents: &HashMap<&TermId, Vec<(Relation, &TermId)>>,
    mode: RelationMode,
) -> HashSet<TermId> {
    let mut found = HashSet::new();
    let mut seen: HashSet<(&TermId, bool)> = HashSet::new();
    let mut queue = VecDeque::from([(start, false)]);
    while let Some((term, crossed_regulation)) = queue.pop_front() {
        let Some(edges) = parents.get(term) else {
            continue;
        };
        for &(relation, parent) in edges {
            let crossed = if relation.is_regulation() {
                if mode == RelationMode::IsAPartOf || crossed_regulation {
                    continue;
                }
                true
            } else {
                crossed_regulation
            };
            if parent != start {
                found.insert(parent.clone());
            }
            if seen.insert((parent, crossed)) {
                queue.push_back((parent, crossed));
            }
        }
    }
    found
}

/// Term graph answering subsumption from materialized ancestor sets.
#[derive(Debug, Clone, Default)]
pub struct ClosureTermGraph {
    records: HashMap<TermId, TermRecord>,
    ancestors: HashMap<RelationMode, HashMap<TermId, HashSet<TermId>>>,
}

impl ClosureTermGraph {
    /// Rebuilds a graph from persisted records and closure rows.
    pub fn from_closure(
        records: impl IntoIterator<Item = TermRecord>,
        rows: impl IntoIterator<Item = (TermId, TermId, RelationMode)>,
    ) -> Self {
        let mut ancestors: HashMap<RelationMode, HashMap<TermId, HashSet<TermId>>> =
            HashMap::new();
        for (term, ancestor, mode) in rows {
            ancestors
                .entry(mode)
                .or_default()
                .entry(term)
                .or_default()
                .insert(ancestor);
        }
        Self {
            records: records
                .into_iter()
                .map(|record| (record.id.clone(), record))
                .collect(),
            ancestors,
        }
    }

    pub fn record(&self, term: &TermId) -> Option<&TermRecord> {
        self.records.get(term)
    }

    /// Records sorted by term id.
    pub fn records(&self) -> Vec<&TermRecord> {
        let mut records = self.records.values().collect::<Vec<_>>();
        records.sort_by(|left, right| left.id.cmp(&right.id));
        records
    }

    /// Every `(term, ancestor, mode)` closure row, sorted.
    pub fn closure_rows(&self) -> Vec<(TermId, TermId, RelationMode)> {
        let mut rows = Vec::new();
        for (mode, per_term) in &self.ancestors {
            for (term, ancestors) in per_term {
                for ancestor in ancestors {
                    rows.push((term.clone(), ancestor.clone(), *mode));
                }
            }
        }
        rows.sort_by(|left, right| {
            (left.2.as_str(), &left.0, &left.1).cmp(&(right.2.as_str(), &right.0, &right.1))
        });
        rows
    }

    /// Strict ancestors of `term` under `mode`, sorted.
    pub fn ancestors(&self, term: &TermId, mode: RelationMode) -> Vec<TermId> {
        let mut result = self
            .ancestors
            .get(&mode)
            .and_then(|per_term| per_term.get(term))
            .map(|set| set.iter().cloned().collect::<Vec<_>>())
            .unwrap_or_default();
        result.sort();
        result
    }
}

impl TermGraph for ClosureTermGraph {
    fn is_descendant(&self, term: &TermId, ancestor: &TermId, mode: RelationMode) -> bool {
        term != ancestor
            && self
                .ancestors
                .get(&mode)
                .and_then(|per_term| per_term.get(term))
                .is_some_and(|set| set.contains(ancestor))
    }

    fn aspect(&self, term: &TermId) -> Option<Aspect> {
        self.records.get(term).and_then(|record| record.aspect)
    }

    fn is_obsolete(&self, term: &TermId) -> bool {
        self.records
            .get(term)
            .is_some_and(|record| record.is_obsolete)
    }

    fn replaced_by(&self, term: &TermId) -> Vec<TermId> {
        self.records
            .get(term)
            .map(|record| record.replaced_by.clone())
            .unwrap_or_default()
    }

    fn is_excluded(&self, term: &TermId) -> bool {
        self.records
            .get(term)
            .is_some_and(|record| record.is_excluded)
    }

    fn label(&self, term: &TermId) -> Option<String> {
        self.records.get(term).map(|record| record.label.clone())
    }
}
