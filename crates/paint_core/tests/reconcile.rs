mod common;

use common::{
    apoptosis_family, day, exp, family, paint_terms, service, snapshot, t, APOPTOSIS, NUCLEUS,
    OLD_BINDING, PROTEIN_BINDING, RETIRED,
};
use paint_core::{
    export_rows, Aspect, CurationConfig, EvidenceCode, GafReconciler, GafRow, GeneTree, NodeSpec,
    PaintError, Qualifiers, ReconcileError, RejectionKind, TreeIdMapper,
};

fn ibd(subject: &str, term: &str) -> GafRow {
    GafRow::association(subject, t(term), EvidenceCode::Ibd, day(2))
}

#[test]
fn exported_rows_rebuild_the_curated_family() {
    let family = apoptosis_family();
    let mut curated = service(family.tree);
    curated
        .propagate_association(family.a, &t(APOPTOSIS), Qualifiers::EMPTY, None, day(2))
        .unwrap()
        .unwrap();
    curated
        .set_not(family.c, &t(APOPTOSIS), EvidenceCode::Ikr, day(3))
        .unwrap();
    curated.prune_branch(family.d, day(4)).unwrap();

    let rows = export_rows(curated.tree(), &CurationConfig::default(), day(5));
    assert_eq!(rows.len(), 3);
    assert!(rows
        .iter()
        .any(|row| row.is_cut && row.subject == "SGD:S000001855"));
    let not_row = rows.iter().find(|row| row.negated).unwrap();
    assert_eq!(not_row.subject, "UniProtKB:P02340");
    assert_eq!(not_row.with_from, vec!["PTN000002".to_string()]);
    assert!(rows.iter().all(|row| row.assigned_by == "GO_Central"));

    let fresh = apoptosis_family();
    let reconciler = GafReconciler::new(TreeIdMapper::from_tree(&fresh.tree));
    let mut replayed = service(fresh.tree);
    let report = reconciler.reconcile(&mut replayed, &rows).unwrap();

    assert_eq!(report.applied, 1);
    assert_eq!(report.pruned, 1);
    assert_eq!(report.negated, 1);
    assert!(report.alerts.is_empty());
    assert_eq!(snapshot(replayed.tree()), snapshot(curated.tree()));
}

#[test]
fn unresolved_and_retired_rows_become_alerts() {
    let family = apoptosis_family();
    let reconciler = GafReconciler::new(TreeIdMapper::from_tree(&family.tree));
    let mut service = service(family.tree);
    let rows = vec![
        ibd("UniProtKB:NOPE", APOPTOSIS),
        ibd("PTN000002", RETIRED),
        ibd("PTN000002", NUCLEUS),
    ];

    let report = reconciler.reconcile(&mut service, &rows).unwrap();

    let kinds: Vec<RejectionKind> = report.alerts.iter().map(|alert| alert.kind).collect();
    assert_eq!(
        kinds,
        vec![
            RejectionKind::Missing,
            RejectionKind::ObsoleteTerm,
            RejectionKind::Unsupported
        ]
    );
    assert_eq!(report.alerts[0].subject, "UniProtKB:NOPE");
    assert_eq!(report.alerts[2].node, Some(family.a));
    assert_eq!(report.applied, 0);
    assert_eq!(service.ledger().alerts().len(), 3);
    assert!(service.ledger().done().is_empty());
}

#[test]
fn obsolete_term_is_replaced_before_applying() {
    let mut family = family();
    family
        .tree
        .add_annotation(family.b, exp(PROTEIN_BINDING, Aspect::MolecularFunction))
        .unwrap();
    let reconciler = GafReconciler::new(TreeIdMapper::from_tree(&family.tree));
    let mut service = service(family.tree);

    let report = reconciler
        .reconcile(&mut service, &[ibd("PTN000002", OLD_BINDING)])
        .unwrap();

    assert_eq!(report.applied, 1);
    assert!(report.alerts.is_empty());
    assert_eq!(paint_terms(service.tree(), family.a), vec![PROTEIN_BINDING]);
}

#[test]
fn negation_covered_by_cited_node_is_skipped() {
    let family = apoptosis_family();
    let reconciler = GafReconciler::new(TreeIdMapper::from_tree(&family.tree));
    let mut service = service(family.tree);
    let rows = vec![
        ibd("PTN000002", APOPTOSIS).with_from("PTN000003"),
        GafRow::association("PTN000002", t(APOPTOSIS), EvidenceCode::Ikr, day(3))
            .negated()
            .with_from("PTN000001"),
        GafRow::association("UniProtKB:P02340", t(APOPTOSIS), EvidenceCode::Iba, day(3))
            .negated()
            .with_from("PTN000002"),
    ];

    let report = reconciler.reconcile(&mut service, &rows).unwrap();

    assert_eq!(report.applied, 1);
    assert_eq!(report.negated, 1);
    assert_eq!(report.skipped_negations, 1);
    let inherited = service
        .tree()
        .node(family.c)
        .paint_annotation(&t(APOPTOSIS))
        .unwrap();
    assert!(inherited.is_negated);
    assert!(!inherited.is_direct_not);
}

#[test]
fn inherited_positive_rows_are_left_to_propagation() {
    let family = apoptosis_family();
    let reconciler = GafReconciler::new(TreeIdMapper::from_tree(&family.tree));
    let mut service = service(family.tree);
    let rows = vec![GafRow::association(
        "UniProtKB:P02340",
        t(APOPTOSIS),
        EvidenceCode::Iba,
        day(2),
    )];

    let report = reconciler.reconcile(&mut service, &rows).unwrap();

    assert_eq!(report.skipped_inherited, 1);
    assert_eq!(report.applied, 0);
    assert!(paint_terms(service.tree(), family.c).is_empty());
}

#[test]
fn malformed_row_aborts_before_any_change() {
    let family = apoptosis_family();
    let reconciler = GafReconciler::new(TreeIdMapper::from_tree(&family.tree));
    let mut service = service(family.tree);
    let before = snapshot(service.tree());
    let mut termless = ibd("PTN000004", APOPTOSIS);
    termless.term = None;
    let rows = vec![GafRow::cut("PTN000005", day(2)), termless];

    let err = reconciler.reconcile(&mut service, &rows).unwrap_err();

    assert!(matches!(err, ReconcileError::MalformedRow { index: 1, .. }));
    assert_eq!(snapshot(service.tree()), before);
    assert!(service.ledger().done().is_empty());
}

#[test]
fn negating_an_unannotated_node_is_an_alert() {
    let family = apoptosis_family();
    let reconciler = GafReconciler::new(TreeIdMapper::from_tree(&family.tree));
    let mut service = service(family.tree);
    let rows = vec![GafRow::association(
        "SGD:S000001855",
        t(APOPTOSIS),
        EvidenceCode::Ikr,
        day(2),
    )
    .negated()];

    let report = reconciler.reconcile(&mut service, &rows).unwrap();

    assert_eq!(report.negated, 0);
    assert_eq!(report.alerts.len(), 1);
    assert_eq!(report.alerts[0].kind, RejectionKind::Unsupported);
    assert_eq!(report.alerts[0].node, Some(family.d));
}

#[test]
fn mapper_from_another_family_aborts_without_changes() {
    let family = apoptosis_family();
    let reconciler = GafReconciler::new(TreeIdMapper::from_tree(&family.tree));
    let mut service = service(GeneTree::new(NodeSpec::new("PTN000001")));
    let rows = vec![GafRow::cut("SGD:S000001855", day(2))];

    let err = reconciler.reconcile(&mut service, &rows).unwrap_err();

    assert!(matches!(
        err,
        ReconcileError::Paint(PaintError::UnknownNode(node)) if node == family.d
    ));
    assert!(!service.tree().is_pruned(service.tree().root()));
    assert!(service.ledger().done().is_empty());
}
