//! External subject id resolution.
//!
//! # Responsibility
//! - Map database ids, bare accessions, sequence ids and node ids to tree
//!   nodes.
//!
//! # Invariants
//! - One mapper instance serves one family; `clear()` resets it before the
//!   next family is indexed.

use crate::tree::{GeneTree, NodeId};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static DB_ACCESSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9_.-]*):(\S+)$").expect("valid db accession regex")
});

/// Resolves external subject ids to zero or more nodes.
pub trait IdMapper {
    fn resolve(&self, subject: &str) -> Vec<NodeId>;
}

impl<M: IdMapper + ?Sized> IdMapper for &M {
    fn resolve(&self, subject: &str) -> Vec<NodeId> {
        (**self).resolve(subject)
    }
}

/// Splits `DB:ACC` into its database and accession parts.
pub fn split_db_accession(value: &str) -> Option<(&str, &str)> {
    let captures = DB_ACCESSION_RE.captures(value)?;
    let db = captures.get(1)?.as_str();
    let accession = captures.get(2)?.as_str();
    Some((db, accession))
}

/// Lookup table built from the identifiers carried by tree nodes.
#[derive(Debug, Clone, Default)]
pub struct TreeIdMapper {
    index: HashMap<String, Vec<NodeId>>,
}

impl TreeIdMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tree(tree: &GeneTree) -> Self {
        let mut mapper = Self::new();
        mapper.index_tree(tree);
        mapper
    }

    /// Adds every node of `tree` to the table.
    pub fn index_tree(&mut self, tree: &GeneTree) {
        for node_id in tree.node_ids() {
            let node = tree.node(node_id);
            self.insert(node.id(), node_id);
            for db_id in node.db_ids() {
                self.insert(db_id, node_id);
                if let Some((_, accession)) = split_db_accession(db_id) {
                    self.insert(accession, node_id);
                }
            }
            if let Some(seq_id) = node.seq_id() {
                self.insert(seq_id, node_id);
            }
        }
        debug!(
            "event=id_mapper_index module=gaf status=ok nodes={} keys={}",
            tree.len(),
            self.index.len()
        );
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn clear(&mut self) {
        self.index.clear();
    }

    fn insert(&mut self, key: &str, node: NodeId) {
        let nodes = self.index.entry(key.to_string()).or_default();
        if !nodes.contains(&node) {
            nodes.push(node);
        }
    }
}

impl IdMapper for TreeIdMapper {
    fn resolve(&self, subject: &str) -> Vec<NodeId> {
        let subject = subject.trim();
        if let Some(nodes) = self.index.get(subject) {
            return nodes.clone();
        }
        split_db_accession(subject)
            .and_then(|(_, accession)| self.index.get(accession))
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::{split_db_accession, IdMapper, TreeIdMapper};
    use crate::tree::{GeneTree, NodeSpec};

    #[test]
    fn resolves_db_ids_accessions_and_seq_ids() {
        let mut tree = GeneTree::new(NodeSpec::new("PTN000001"));
        let leaf = tree
            .add_child(
                tree.root(),
                NodeSpec::new("PTN000002")
                    .db_id("UniProtKB:P12345")
                    .seq_id("ENSG0001"),
            )
            .unwrap();
        let mut mapper = TreeIdMapper::from_tree(&tree);

        assert_eq!(mapper.resolve("UniProtKB:P12345"), vec![leaf]);
        assert_eq!(mapper.resolve("P12345"), vec![leaf]);
        assert_eq!(mapper.resolve("TrEMBL:P12345"), vec![leaf]);
        assert_eq!(mapper.resolve("ENSG0001"), vec![leaf]);
        assert_eq!(mapper.resolve("PTN000001"), vec![tree.root()]);
        assert!(mapper.resolve("UniProtKB:Q99999").is_empty());

        mapper.clear();
        assert!(mapper.resolve("P12345").is_empty());
    }

    #[test]
    fn db_accession_split_requires_prefix() {
        assert_eq!(split_db_accession("MGI:MGI:98834"), Some(("MGI", "MGI:98834")));
        assert_eq!(split_db_accession("P12345"), None);
    }
}
