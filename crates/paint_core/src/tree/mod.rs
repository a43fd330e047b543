//! Gene-family tree model.
//!
//! # Responsibility
//! - Own every node of one family tree and its per-node annotation list.
//! - Provide traversal helpers shared by evidence, propagation and export.
//!
//! # Invariants
//! - Nodes live in an arena; parent/child links are `NodeId` indices, so the
//!   structure can not form ownership cycles.
//! - Nodes are never removed, only marked pruned.
//! - A pruned node is a terminus: traversals include it but never descend
//!   into its subtree.
//! - No curation rule lives here; this is a structural container.

mod gene_tree;

pub use gene_tree::{GeneNode, GeneTree, NodeId, NodeSpec};

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Structural errors raised while building or addressing a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Input contained no root node.
    MissingRoot,
    /// Input contained more than one parentless node.
    MultipleRoots { first: String, second: String },
    /// Two nodes share the same stable id.
    DuplicateNodeId(String),
    /// A node names a parent that is not part of the input.
    UnknownParent { node: String, parent: String },
    /// Some nodes are unreachable from the root through parent links.
    Cycle(String),
    /// A `NodeId` does not belong to this tree.
    UnknownNode(NodeId),
}

impl Display for TreeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRoot => write!(f, "gene tree has no root node"),
            Self::MultipleRoots { first, second } => {
                write!(f, "gene tree has more than one root: {first}, {second}")
            }
            Self::DuplicateNodeId(id) => write!(f, "duplicate gene tree node id: {id}"),
            Self::UnknownParent { node, parent } => {
                write!(f, "node {node} references unknown parent {parent}")
            }
            Self::Cycle(id) => write!(f, "node {id} is part of a parent cycle"),
            Self::UnknownNode(id) => write!(f, "node handle {id} is not part of this tree"),
        }
    }
}

impl Error for TreeError {}
