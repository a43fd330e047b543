//! Taxon applicability checks.

use crate::model::term::TermId;
use std::collections::{HashMap, HashSet};

/// Decides whether a term may be applied to genes of the given taxa.
pub trait TaxonChecker {
    /// `taxon_ids` holds the node's taxon followed by its ancestors' taxa.
    fn applicable(&self, term: &TermId, taxon_ids: &[String]) -> bool;
}

impl<T: TaxonChecker + ?Sized> TaxonChecker for &T {
    fn applicable(&self, term: &TermId, taxon_ids: &[String]) -> bool {
        (**self).applicable(term, taxon_ids)
    }
}

/// Accepts every term for every taxon.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyTaxon;

impl TaxonChecker for AnyTaxon {
    fn applicable(&self, _term: &TermId, _taxon_ids: &[String]) -> bool {
        true
    }
}

/// Table of `never_in_taxon` / `only_in_taxon` constraints keyed by term.
#[derive(Debug, Clone, Default)]
pub struct TaxonConstraints {
    never_in: HashMap<TermId, HashSet<String>>,
    only_in: HashMap<TermId, HashSet<String>>,
}

impl TaxonConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn never_in(&mut self, term: TermId, taxon_id: impl Into<String>) -> &mut Self {
        self.never_in
            .entry(term)
            .or_default()
            .insert(taxon_id.into());
        self
    }

    pub fn only_in(&mut self, term: TermId, taxon_id: impl Into<String>) -> &mut Self {
        self.only_in.entry(term).or_default().insert(taxon_id.into());
        self
    }
}

impl TaxonChecker for TaxonConstraints {
    fn applicable(&self, term: &TermId, taxon_ids: &[String]) -> bool {
        if let Some(forbidden) = self.never_in.get(term) {
            if taxon_ids.iter().any(|taxon| forbidden.contains(taxon)) {
                return false;
            }
        }
        match self.only_in.get(term) {
            Some(allowed) => taxon_ids.iter().any(|taxon| allowed.contains(taxon)),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TaxonChecker, TaxonConstraints};
    use crate::model::term::TermId;

    #[test]
    fn never_in_wins_over_only_in() {
        let term = TermId::new("GO:0009507");
        let mut table = TaxonConstraints::new();
        table
            .only_in(term.clone(), "NCBITaxon:2759")
            .never_in(term.clone(), "NCBITaxon:33208");

        let plant = ["NCBITaxon:3702".to_string(), "NCBITaxon:2759".to_string()];
        let animal = ["NCBITaxon:33208".to_string(), "NCBITaxon:2759".to_string()];
        let bacterium = ["NCBITaxon:2".to_string()];
        assert!(table.applicable(&term, &plant));
        assert!(!table.applicable(&term, &animal));
        assert!(!table.applicable(&term, &bacterium));
    }
}
