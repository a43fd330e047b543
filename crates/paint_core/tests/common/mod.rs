#![allow(dead_code)]

use chrono::NaiveDate;
use paint_core::ontology::{Relation, TermGraphBuilder, TermRecord};
use paint_core::{
    Annotation, AnyTaxon, Aspect, ClosureTermGraph, EvidenceCode, GeneTree, NodeId, NodeSpec,
    PaintService, TermId,
};

pub const BIOLOGICAL_PROCESS: &str = "GO:0008150";
pub const CELLULAR_PROCESS: &str = "GO:0009987";
pub const APOPTOSIS: &str = "GO:0006915";
pub const NECROPTOSIS: &str = "GO:0070266";
pub const REGULATION_OF_APOPTOSIS: &str = "GO:0042981";
pub const MOLECULAR_FUNCTION: &str = "GO:0003674";
pub const BINDING: &str = "GO:0005488";
pub const PROTEIN_BINDING: &str = "GO:0005515";
pub const CELLULAR_COMPONENT: &str = "GO:0005575";
pub const NUCLEUS: &str = "GO:0005634";
pub const CELL_PART: &str = "GO:0044464";
pub const OLD_BINDING: &str = "GO:0000004";
pub const RETIRED: &str = "GO:0000005";

pub fn t(id: &str) -> TermId {
    TermId::new(id)
}

pub fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, n).unwrap()
}

/// Small GO slice covering all three aspects.
pub fn terms() -> ClosureTermGraph {
    let mut builder = TermGraphBuilder::new();
    let records = [
        (BIOLOGICAL_PROCESS, "biological_process", Aspect::BiologicalProcess),
        (CELLULAR_PROCESS, "cellular process", Aspect::BiologicalProcess),
        (APOPTOSIS, "apoptotic process", Aspect::BiologicalProcess),
        (NECROPTOSIS, "necroptotic process", Aspect::BiologicalProcess),
        (REGULATION_OF_APOPTOSIS, "regulation of apoptotic process", Aspect::BiologicalProcess),
        (MOLECULAR_FUNCTION, "molecular_function", Aspect::MolecularFunction),
        (BINDING, "binding", Aspect::MolecularFunction),
        (PROTEIN_BINDING, "protein binding", Aspect::MolecularFunction),
        (CELLULAR_COMPONENT, "cellular_component", Aspect::CellularComponent),
        (NUCLEUS, "nucleus", Aspect::CellularComponent),
    ];
    for (id, label, aspect) in records {
        builder.add_term(TermRecord::new(t(id), label, aspect));
    }

    let mut cell_part = TermRecord::new(t(CELL_PART), "cell part", Aspect::CellularComponent);
    cell_part.is_excluded = true;
    builder.add_term(cell_part);

    let mut old_binding = TermRecord::new(t(OLD_BINDING), "obsolete binding", Aspect::MolecularFunction);
    old_binding.is_obsolete = true;
    old_binding.replaced_by = vec![t(PROTEIN_BINDING)];
    builder.add_term(old_binding);

    let mut retired = TermRecord::new(t(RETIRED), "obsolete process", Aspect::BiologicalProcess);
    retired.is_obsolete = true;
    builder.add_term(retired);

    builder
        .add_edge(t(CELLULAR_PROCESS), Relation::IsA, t(BIOLOGICAL_PROCESS))
        .add_edge(t(APOPTOSIS), Relation::IsA, t(CELLULAR_PROCESS))
        .add_edge(t(NECROPTOSIS), Relation::IsA, t(CELLULAR_PROCESS))
        .add_edge(t(REGULATION_OF_APOPTOSIS), Relation::IsA, t(BIOLOGICAL_PROCESS))
        .add_edge(t(REGULATION_OF_APOPTOSIS), Relation::Regulates, t(APOPTOSIS))
        .add_edge(t(BINDING), Relation::IsA, t(MOLECULAR_FUNCTION))
        .add_edge(t(PROTEIN_BINDING), Relation::IsA, t(BINDING))
        .add_edge(t(NUCLEUS), Relation::PartOf, t(CELL_PART))
        .add_edge(t(CELL_PART), Relation::IsA, t(CELLULAR_COMPONENT));
    builder.build()
}

/// `Root(A(B_leaf, C_leaf), D_leaf)`.
pub struct Family {
    pub tree: GeneTree,
    pub root: NodeId,
    pub a: NodeId,
    pub b: NodeId,
    pub c: NodeId,
    pub d: NodeId,
}

pub fn family() -> Family {
    let mut tree = GeneTree::new(NodeSpec::new("PTN000001").taxon("NCBITaxon:2759"));
    let root = tree.root();
    let a = tree
        .add_child(root, NodeSpec::new("PTN000002").taxon("NCBITaxon:40674"))
        .unwrap();
    let b = tree
        .add_child(
            a,
            NodeSpec::new("PTN000003")
                .species("HUMAN")
                .taxon("NCBITaxon:9606")
                .db_id("UniProtKB:P04637"),
        )
        .unwrap();
    let c = tree
        .add_child(
            a,
            NodeSpec::new("PTN000004")
                .species("MOUSE")
                .taxon("NCBITaxon:10090")
                .db_id("UniProtKB:P02340"),
        )
        .unwrap();
    let d = tree
        .add_child(
            root,
            NodeSpec::new("PTN000005")
                .species("YEAST")
                .taxon("NCBITaxon:4932")
                .db_id("SGD:S000001855"),
        )
        .unwrap();
    Family {
        tree,
        root,
        a,
        b,
        c,
        d,
    }
}

/// Experimental (IDA) annotation dated day 1.
pub fn exp(term: &str, aspect: Aspect) -> Annotation {
    Annotation::imported(t(term), aspect, EvidenceCode::Ida, "PMID:10000001", day(1))
}

/// Family with HUMAN (B) carrying experimental apoptosis evidence.
pub fn apoptosis_family() -> Family {
    let mut family = family();
    family
        .tree
        .add_annotation(family.b, exp(APOPTOSIS, Aspect::BiologicalProcess))
        .unwrap();
    family
}

pub fn service(tree: GeneTree) -> PaintService<ClosureTermGraph, AnyTaxon> {
    PaintService::new(tree, terms(), AnyTaxon)
}

/// Order-insensitive view of every node's annotations and pruned flag.
pub fn snapshot(tree: &GeneTree) -> Vec<(NodeId, bool, Vec<String>)> {
    tree.node_ids()
        .map(|node| {
            let mut annotations = tree
                .annotations(node)
                .iter()
                .map(|annotation| format!("{annotation:?}"))
                .collect::<Vec<_>>();
            annotations.sort();
            (node, tree.is_pruned(node), annotations)
        })
        .collect()
}

/// PAINT annotation terms at `node`, sorted.
pub fn paint_terms(tree: &GeneTree, node: NodeId) -> Vec<String> {
    let mut terms = tree
        .annotations(node)
        .iter()
        .filter(|annotation| annotation.is_paint())
        .map(|annotation| annotation.term.to_string())
        .collect::<Vec<_>>();
    terms.sort();
    terms
}
