use super::TreeError;
use crate::model::annotation::Annotation;
use crate::model::term::TermId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt::{Display, Formatter};

/// Arena handle of one node. Only meaningful for the tree that minted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Input description of one node, as delivered by a tree loader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSpec {
    /// Stable tree-internal id, e.g. `PTN000012345` or `AN7`.
    pub id: String,
    /// Species mnemonic used in reports, e.g. `HUMAN`.
    pub species: Option<String>,
    pub taxon_id: Option<String>,
    /// External database ids, e.g. `UniProtKB:P12345`.
    pub db_ids: Vec<String>,
    pub seq_id: Option<String>,
}

impl NodeSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn species(mut self, species: impl Into<String>) -> Self {
        self.species = Some(species.into());
        self
    }

    pub fn taxon(mut self, taxon_id: impl Into<String>) -> Self {
        self.taxon_id = Some(taxon_id.into());
        self
    }

    pub fn db_id(mut self, db_id: impl Into<String>) -> Self {
        self.db_ids.push(db_id.into());
        self
    }

    pub fn seq_id(mut self, seq_id: impl Into<String>) -> Self {
        self.seq_id = Some(seq_id.into());
        self
    }
}

/// One gene (leaf) or ancestral gene (internal node).
#[derive(Debug, Clone)]
pub struct GeneNode {
    spec: NodeSpec,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    pruned: bool,
    annotations: Vec<Annotation>,
}

impl GeneNode {
    fn new(spec: NodeSpec, parent: Option<NodeId>) -> Self {
        Self {
            spec,
            parent,
            children: Vec::new(),
            pruned: false,
            annotations: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.spec.id
    }

    pub fn species(&self) -> Option<&str> {
        self.spec.species.as_deref()
    }

    pub fn taxon_id(&self) -> Option<&str> {
        self.spec.taxon_id.as_deref()
    }

    pub fn db_ids(&self) -> &[String] {
        &self.spec.db_ids
    }

    pub fn seq_id(&self) -> Option<&str> {
        self.spec.seq_id.as_deref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_pruned(&self) -> bool {
        self.pruned
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// PAINT annotation to exactly `term`, if any.
    pub fn paint_annotation(&self, term: &TermId) -> Option<&Annotation> {
        self.annotations
            .iter()
            .find(|annotation| annotation.is_paint() && &annotation.term == term)
    }

    /// Report label `<species>_<id>`, or the bare id without species.
    pub fn label(&self) -> String {
        match self.species() {
            Some(species) => format!("{species}_{}", self.id()),
            None => self.id().to_string(),
        }
    }
}

/// Arena-backed gene-family tree.
#[derive(Debug, Clone)]
pub struct GeneTree {
    nodes: Vec<GeneNode>,
    root: NodeId,
    index: HashMap<String, NodeId>,
}

impl GeneTree {
    /// Creates a single-node tree.
    pub fn new(root: NodeSpec) -> Self {
        let mut index = HashMap::new();
        index.insert(root.id.clone(), NodeId(0));
        Self {
            nodes: vec![GeneNode::new(root, None)],
            root: NodeId(0),
            index,
        }
    }

    /// Builds a tree from `(node, parent id)` pairs in any order.
    ///
    /// Children keep the relative order in which they appear in `entries`.
    ///
    /// # Errors
    /// - `DuplicateNodeId` when two entries share an id.
    /// - `MissingRoot` / `MultipleRoots` unless exactly one entry has no parent.
    /// - `UnknownParent` when a parent id is not among the entries.
    /// - `Cycle` when some entries are unreachable from the root.
    pub fn from_parent_links(
        entries: Vec<(NodeSpec, Option<String>)>,
    ) -> Result<Self, TreeError> {
        let mut position = HashMap::with_capacity(entries.len());
        let mut root_index: Option<usize> = None;
        for (index, (spec, parent)) in entries.iter().enumerate() {
            if position.insert(spec.id.clone(), index).is_some() {
                return Err(TreeError::DuplicateNodeId(spec.id.clone()));
            }
            if parent.is_none() {
                if let Some(first) = root_index {
                    return Err(TreeError::MultipleRoots {
                        first: entries[first].0.id.clone(),
                        second: spec.id.clone(),
                    });
                }
                root_index = Some(index);
            }
        }
        let root_index = root_index.ok_or(TreeError::MissingRoot)?;

        let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); entries.len()];
        for (index, (spec, parent)) in entries.iter().enumerate() {
            if let Some(parent) = parent {
                let parent_index =
                    *position
                        .get(parent)
                        .ok_or_else(|| TreeError::UnknownParent {
                            node: spec.id.clone(),
                            parent: parent.clone(),
                        })?;
                children_of[parent_index].push(index);
            }
        }

        let mut specs: Vec<Option<NodeSpec>> =
            entries.into_iter().map(|(spec, _)| Some(spec)).collect();
        let root_spec = specs[root_index].take().ok_or(TreeError::MissingRoot)?;
        let mut tree = Self::new(root_spec);

        let mut queue = VecDeque::from([(root_index, tree.root)]);
        while let Some((input_index, node_id)) = queue.pop_front() {
            for &child_index in &children_of[input_index] {
                let spec = specs[child_index]
                    .take()
                    .ok_or_else(|| TreeError::Cycle(format!("input #{child_index}")))?;
                let child_id = tree.add_child(node_id, spec)?;
                queue.push_back((child_index, child_id));
            }
        }

        if let Some(unreached) = specs.into_iter().flatten().next() {
            return Err(TreeError::Cycle(unreached.id));
        }
        Ok(tree)
    }

    /// Appends a child node under `parent`.
    pub fn add_child(&mut self, parent: NodeId, spec: NodeSpec) -> Result<NodeId, TreeError> {
        self.get(parent).ok_or(TreeError::UnknownNode(parent))?;
        if self.index.contains_key(&spec.id) {
            return Err(TreeError::DuplicateNodeId(spec.id));
        }
        let id = NodeId(self.nodes.len());
        self.index.insert(spec.id.clone(), id);
        self.nodes.push(GeneNode::new(spec, Some(parent)));
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// Attaches an externally sourced annotation, e.g. experimental evidence.
    pub fn add_annotation(
        &mut self,
        node: NodeId,
        annotation: Annotation,
    ) -> Result<(), TreeError> {
        self.nodes
            .get_mut(node.0)
            .ok_or(TreeError::UnknownNode(node))?
            .annotations
            .push(annotation);
        Ok(())
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&GeneNode> {
        self.nodes.get(id.0)
    }

    /// Returns one node.
    ///
    /// # Panics
    /// When `id` was minted by a different tree and is out of range.
    pub fn node(&self, id: NodeId) -> &GeneNode {
        &self.nodes[id.0]
    }

    /// Looks a node up by its stable id.
    pub fn find(&self, stable_id: &str) -> Option<NodeId> {
        self.index.get(stable_id).copied()
    }

    /// All node handles in insertion (breadth-first for loaded trees) order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Children of `id`; empty for handles from another tree.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(GeneNode::children).unwrap_or_default()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(GeneNode::parent)
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(GeneNode::is_leaf)
    }

    pub fn is_pruned(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(GeneNode::is_pruned)
    }

    pub fn annotations(&self, id: NodeId) -> &[Annotation] {
        self.get(id).map(GeneNode::annotations).unwrap_or_default()
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut cursor = self.parent(id);
        while let Some(current) = cursor {
            result.push(current);
            cursor = self.parent(current);
        }
        result
    }

    /// Leaves below `id`, in pre-order.
    ///
    /// Pruned nodes count as their own terminus: they are returned but their
    /// subtrees are not visited. A leaf or pruned `id` yields itself.
    pub fn leaf_descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.get(current) else {
                continue;
            };
            if node.is_leaf() || node.pruned {
                leaves.push(current);
                continue;
            }
            stack.extend(node.children.iter().rev().copied());
        }
        leaves
    }

    /// `id` and its descendants in pre-order, never entering pruned children.
    ///
    /// This is the set of nodes a propagation starting at `id` may touch.
    /// Empty for handles from another tree.
    pub fn propagation_scope(&self, id: NodeId) -> Vec<NodeId> {
        let mut scope = Vec::new();
        let mut stack: Vec<NodeId> = self.get(id).map(|_| id).into_iter().collect();
        while let Some(current) = stack.pop() {
            scope.push(current);
            stack.extend(
                self.children(current)
                    .iter()
                    .rev()
                    .copied()
                    .filter(|child| !self.is_pruned(*child)),
            );
        }
        scope
    }

    pub(crate) fn set_pruned(&mut self, id: NodeId, pruned: bool) {
        self.nodes[id.0].pruned = pruned;
    }

    pub(crate) fn annotations_mut(&mut self, id: NodeId) -> &mut Vec<Annotation> {
        &mut self.nodes[id.0].annotations
    }

    pub(crate) fn paint_annotation_mut(
        &mut self,
        id: NodeId,
        term: &TermId,
    ) -> Option<&mut Annotation> {
        self.nodes[id.0]
            .annotations
            .iter_mut()
            .find(|annotation| annotation.is_paint() && &annotation.term == term)
    }

    /// Removes the first annotation equal to `annotation`.
    pub(crate) fn remove_annotation(&mut self, id: NodeId, annotation: &Annotation) -> bool {
        let annotations = &mut self.nodes[id.0].annotations;
        match annotations.iter().position(|current| current == annotation) {
            Some(position) => {
                annotations.remove(position);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GeneTree, NodeSpec};

    fn spec(id: &str) -> NodeSpec {
        NodeSpec::new(id)
    }

    #[test]
    fn label_prefers_species_mnemonic() {
        let tree = GeneTree::new(NodeSpec::new("PTN1").species("HUMAN"));
        assert_eq!(tree.node(tree.root()).label(), "HUMAN_PTN1");
    }

    #[test]
    fn scope_skips_pruned_children_but_leaf_walk_keeps_them() {
        let mut tree = GeneTree::new(spec("root"));
        let a = tree.add_child(tree.root(), spec("a")).unwrap();
        let b = tree.add_child(a, spec("b")).unwrap();
        let c = tree.add_child(a, spec("c")).unwrap();
        let d = tree.add_child(c, spec("d")).unwrap();
        tree.set_pruned(c, true);

        assert_eq!(tree.propagation_scope(tree.root()), vec![tree.root(), a, b]);
        assert_eq!(tree.leaf_descendants(a), vec![b, c]);
        assert_eq!(tree.leaf_descendants(d), vec![d]);
    }
}
