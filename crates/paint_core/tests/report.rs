mod common;

use common::{apoptosis_family, day, service, t, terms, APOPTOSIS, RETIRED};
use paint_core::{
    render_alert_report, render_log_report, Alert, EvidenceCode, Qualifiers, RejectionKind,
};

#[test]
fn log_report_groups_by_aspect_action_and_pruning() {
    let family = apoptosis_family();
    let mut service = service(family.tree);
    service
        .propagate_association(family.a, &t(APOPTOSIS), Qualifiers::EMPTY, None, day(2))
        .unwrap();
    service
        .set_not(family.c, &t(APOPTOSIS), EvidenceCode::Ikr, day(3))
        .unwrap();
    service.prune_branch(family.d, day(4)).unwrap();

    let report = render_log_report(service.ledger(), service.tree(), service.terms());

    assert_eq!(
        report,
        "# biological_process\n\
         ## Associations\n\
         2024-01-02: PTN000002 annotated to apoptotic process (GO:0006915)\n\
         ## Negations\n\
         2024-01-03: MOUSE_PTN000004 NOT annotated to apoptotic process (GO:0006915)\n\
         # Pruned\n\
         2024-01-04: YEAST_PTN000005 pruned\n"
    );
}

#[test]
fn undone_actions_leave_the_log_report() {
    let family = apoptosis_family();
    let mut service = service(family.tree);
    service
        .propagate_association(family.a, &t(APOPTOSIS), Qualifiers::EMPTY, None, day(2))
        .unwrap();
    service
        .challenge_evidence(family.b, &t(APOPTOSIS), day(5))
        .unwrap();

    let report = render_log_report(service.ledger(), service.tree(), service.terms());
    assert!(report.contains("## Challenged evidence\n"));
    assert!(report.contains(
        "2024-01-05: HUMAN_PTN000003 challenged evidence for apoptotic process (GO:0006915)\n"
    ));

    service.undo().unwrap();
    service.undo().unwrap();
    assert!(render_log_report(service.ledger(), service.tree(), service.terms()).is_empty());
}

#[test]
fn alert_report_lists_kinds_in_fixed_order() {
    let alerts = vec![
        Alert {
            kind: RejectionKind::ObsoleteTerm,
            subject: "PTN000002".to_string(),
            term: Some(t(RETIRED)),
            node: None,
            date: Some(day(2)),
        },
        Alert {
            kind: RejectionKind::Missing,
            subject: "UniProtKB:NOPE".to_string(),
            term: Some(t(APOPTOSIS)),
            node: None,
            date: Some(day(2)),
        },
        Alert {
            kind: RejectionKind::Missing,
            subject: "PTN999999".to_string(),
            term: None,
            node: None,
            date: None,
        },
    ];

    let report = render_alert_report(&alerts, &terms());

    assert_eq!(
        report,
        "# Subject not found in the family tree (MISSING)\n\
         2024-01-02: UniProtKB:NOPE apoptotic process (GO:0006915)\n\
         -: PTN999999\n\
         # Obsolete term without replacement (OBSOLETE_TERM)\n\
         2024-01-02: PTN000002 obsolete process (GO:0000005)\n"
    );
}
