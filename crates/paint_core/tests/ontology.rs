mod common;

use common::{
    t, terms, APOPTOSIS, BIOLOGICAL_PROCESS, CELLULAR_COMPONENT, CELL_PART, NUCLEUS, OLD_BINDING,
    PROTEIN_BINDING, REGULATION_OF_APOPTOSIS,
};
use paint_core::db::open_db_in_memory;
use paint_core::ontology::{Relation, TermGraphBuilder, TermRecord};
use paint_core::{
    parse_obo, Aspect, OntologyError, RelationMode, SqliteTermRepository, TermGraph,
    TermRepository,
};

const SAMPLE_OBO: &str = r#"format-version: 1.2
ontology: go

[Term]
id: GO:0008150
name: biological_process
namespace: biological_process

[Term]
id: GO:0009987
name: cellular process
namespace: biological_process
is_a: GO:0008150 ! biological_process

[Term]
id: GO:0006915
name: apoptotic process
namespace: biological_process
is_a: GO:0009987 ! cellular process

[Term]
id: GO:0042981
name: regulation of apoptotic process
namespace: biological_process
is_a: GO:0008150 ! biological_process
relationship: regulates GO:0006915 ! apoptotic process

[Term]
id: GO:0005634
name: nucleus
namespace: cellular_component
relationship: part_of GO:0044464 {source="GOC:go_curators"} ! cell part

[Term]
id: GO:0044464
name: cell part
namespace: cellular_component
subset: gocheck_do_not_annotate
is_a: GO:0005575 ! cellular_component

[Term]
id: GO:0000004
name: obsolete binding
namespace: molecular_function
is_obsolete: true
replaced_by: GO:0005515

[Typedef]
id: part_of
name: part of
"#;

#[test]
fn obo_stanzas_become_a_queryable_graph() {
    let graph = parse_obo(SAMPLE_OBO).unwrap().build();

    assert!(graph.more_specific(&t(APOPTOSIS), &t(BIOLOGICAL_PROCESS)));
    assert!(graph.more_specific(&t(NUCLEUS), &t(CELLULAR_COMPONENT)));
    assert!(!graph.more_specific(&t(REGULATION_OF_APOPTOSIS), &t(APOPTOSIS)));
    assert!(graph.is_descendant(
        &t(REGULATION_OF_APOPTOSIS),
        &t(APOPTOSIS),
        RelationMode::Regulates
    ));

    assert_eq!(graph.aspect(&t(NUCLEUS)), Some(Aspect::CellularComponent));
    assert_eq!(graph.label(&t(APOPTOSIS)).as_deref(), Some("apoptotic process"));
    assert!(graph.is_excluded(&t(CELL_PART)));
    assert!(graph.is_obsolete(&t(OLD_BINDING)));
    assert_eq!(graph.replaced_by(&t(OLD_BINDING)), vec![t(PROTEIN_BINDING)]);
    assert!(graph.record(&t("GO:0005575")).is_none());
}

#[test]
fn term_stanza_without_id_is_rejected() {
    let err = parse_obo("[Term]\nname: nameless\n").unwrap_err();
    assert!(matches!(err, OntologyError::MissingTermId { .. }));

    let err = parse_obo("[Term]\nid: GO:0000001\nnot a tag line\n").unwrap_err();
    assert!(matches!(err, OntologyError::MalformedLine { line: 3, .. }));
}

#[test]
fn stored_graph_loads_back_identically() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTermRepository::new(&conn);
    let graph = terms();

    repo.save_graph(&graph).unwrap();
    assert_eq!(repo.term_count().unwrap(), graph.records().len());

    let loaded = repo.load_graph().unwrap();
    assert_eq!(loaded.records(), graph.records());
    assert_eq!(loaded.closure_rows(), graph.closure_rows());
    assert!(loaded.more_specific(&t(NUCLEUS), &t(CELLULAR_COMPONENT)));
    assert_eq!(loaded.replaced_by(&t(OLD_BINDING)), vec![t(PROTEIN_BINDING)]);
}

#[test]
fn saving_again_replaces_the_stored_graph() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTermRepository::new(&conn);
    repo.save_graph(&terms()).unwrap();

    let mut builder = TermGraphBuilder::new();
    builder
        .add_term(TermRecord::new(t(BIOLOGICAL_PROCESS), "biological_process", Aspect::BiologicalProcess))
        .add_term(TermRecord::new(t(APOPTOSIS), "apoptotic process", Aspect::BiologicalProcess))
        .add_edge(t(APOPTOSIS), Relation::IsA, t(BIOLOGICAL_PROCESS));
    repo.save_graph(&builder.build()).unwrap();

    assert_eq!(repo.term_count().unwrap(), 2);
    let loaded = repo.load_graph().unwrap();
    assert!(loaded.more_specific(&t(APOPTOSIS), &t(BIOLOGICAL_PROCESS)));
    assert!(loaded.aspect(&t(NUCLEUS)).is_none());
    assert_eq!(loaded.closure_rows().len(), 2);
}
