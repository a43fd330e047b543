//! Closed vocabularies for ontology terms, evidence and qualifiers.
//!
//! # Responsibility
//! - Give GO term ids, aspects, evidence codes and qualifiers typed shapes.
//! - Parse the short string forms used by external annotation rows.
//!
//! # Invariants
//! - `TermId::parse` accepts only `GO:` followed by seven digits.
//! - Every evidence code is exactly one of experimental, PAINT or other.
//! - `Qualifiers` only ever carries bits of known `Qualifier` values.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

static GO_TERM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^GO:\d{7}$").expect("valid GO term regex"));

/// Errors from parsing term-level vocabulary strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermParseError {
    InvalidTermId(String),
    UnknownAspect(String),
    UnknownEvidenceCode(String),
    UnknownQualifier(String),
}

impl Display for TermParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTermId(value) => write!(f, "invalid GO term id `{value}`"),
            Self::UnknownAspect(value) => write!(f, "unknown GO aspect `{value}`"),
            Self::UnknownEvidenceCode(value) => write!(f, "unknown evidence code `{value}`"),
            Self::UnknownQualifier(value) => write!(f, "unknown annotation qualifier `{value}`"),
        }
    }
}

impl Error for TermParseError {}

/// Ontology term identifier, e.g. `GO:0008150`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermId(String);

impl TermId {
    /// Wraps an id without format validation.
    ///
    /// Used for ids that come from an already-validated ontology source.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Parses and validates a GO term id.
    pub fn parse(value: &str) -> Result<Self, TermParseError> {
        let trimmed = value.trim();
        if !GO_TERM_RE.is_match(trimmed) {
            return Err(TermParseError::InvalidTermId(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TermId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TermId {
    type Err = TermParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// One of the three GO root categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aspect {
    MolecularFunction,
    BiologicalProcess,
    CellularComponent,
}

impl Aspect {
    /// All aspects in report order.
    pub const ALL: [Aspect; 3] = [
        Aspect::MolecularFunction,
        Aspect::BiologicalProcess,
        Aspect::CellularComponent,
    ];

    /// Single-letter code used in the GAF aspect column.
    pub fn code(self) -> char {
        match self {
            Self::MolecularFunction => 'F',
            Self::BiologicalProcess => 'P',
            Self::CellularComponent => 'C',
        }
    }

    /// OBO namespace name.
    pub fn namespace(self) -> &'static str {
        match self {
            Self::MolecularFunction => "molecular_function",
            Self::BiologicalProcess => "biological_process",
            Self::CellularComponent => "cellular_component",
        }
    }

    /// Root term of this aspect.
    pub fn root_term(self) -> TermId {
        match self {
            Self::MolecularFunction => TermId::new("GO:0003674"),
            Self::BiologicalProcess => TermId::new("GO:0008150"),
            Self::CellularComponent => TermId::new("GO:0005575"),
        }
    }

    /// Parses either a one-letter code or an OBO namespace.
    pub fn parse(value: &str) -> Result<Self, TermParseError> {
        match value.trim() {
            "F" | "molecular_function" => Ok(Self::MolecularFunction),
            "P" | "biological_process" => Ok(Self::BiologicalProcess),
            "C" | "cellular_component" => Ok(Self::CellularComponent),
            other => Err(TermParseError::UnknownAspect(other.to_string())),
        }
    }
}

impl Display for Aspect {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.namespace())
    }
}

/// GO evidence code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EvidenceCode {
    Exp,
    Ida,
    Ipi,
    Imp,
    Igi,
    Iep,
    Htp,
    Hda,
    Hmp,
    Hgi,
    Hep,
    /// Inferred from biological aspect of descendant: direct PAINT curation.
    Ibd,
    /// Inferred from biological aspect of ancestor: inherited PAINT annotation.
    Iba,
    /// Inferred from key residues: direct PAINT negation.
    Ikr,
    /// Inferred from rapid divergence: direct PAINT negation.
    Ird,
    Iss,
    Iso,
    Isa,
    Ism,
    Igc,
    Rca,
    Tas,
    Nas,
    Ic,
    Nd,
    Iea,
}

impl EvidenceCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exp => "EXP",
            Self::Ida => "IDA",
            Self::Ipi => "IPI",
            Self::Imp => "IMP",
            Self::Igi => "IGI",
            Self::Iep => "IEP",
            Self::Htp => "HTP",
            Self::Hda => "HDA",
            Self::Hmp => "HMP",
            Self::Hgi => "HGI",
            Self::Hep => "HEP",
            Self::Ibd => "IBD",
            Self::Iba => "IBA",
            Self::Ikr => "IKR",
            Self::Ird => "IRD",
            Self::Iss => "ISS",
            Self::Iso => "ISO",
            Self::Isa => "ISA",
            Self::Ism => "ISM",
            Self::Igc => "IGC",
            Self::Rca => "RCA",
            Self::Tas => "TAS",
            Self::Nas => "NAS",
            Self::Ic => "IC",
            Self::Nd => "ND",
            Self::Iea => "IEA",
        }
    }

    /// Whether the code counts as experimental support for propagation.
    pub fn is_experimental(self) -> bool {
        matches!(
            self,
            Self::Exp
                | Self::Ida
                | Self::Ipi
                | Self::Imp
                | Self::Igi
                | Self::Iep
                | Self::Htp
                | Self::Hda
                | Self::Hmp
                | Self::Hgi
                | Self::Hep
        )
    }

    /// Whether the code is authored by the propagation engine.
    pub fn is_paint(self) -> bool {
        matches!(self, Self::Ibd | Self::Iba | Self::Ikr | Self::Ird)
    }

    /// Whether the code may justify a direct negation.
    pub fn is_negation(self) -> bool {
        matches!(self, Self::Ikr | Self::Ird)
    }

    /// Evidence for an engine-authored annotation.
    pub fn for_paint(is_direct_mrc: bool) -> Self {
        if is_direct_mrc {
            Self::Ibd
        } else {
            Self::Iba
        }
    }
}

impl Display for EvidenceCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvidenceCode {
    type Err = TermParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = match s.trim().to_ascii_uppercase().as_str() {
            "EXP" => Self::Exp,
            "IDA" => Self::Ida,
            "IPI" => Self::Ipi,
            "IMP" => Self::Imp,
            "IGI" => Self::Igi,
            "IEP" => Self::Iep,
            "HTP" => Self::Htp,
            "HDA" => Self::Hda,
            "HMP" => Self::Hmp,
            "HGI" => Self::Hgi,
            "HEP" => Self::Hep,
            "IBD" => Self::Ibd,
            "IBA" => Self::Iba,
            "IKR" => Self::Ikr,
            "IRD" => Self::Ird,
            "ISS" => Self::Iss,
            "ISO" => Self::Iso,
            "ISA" => Self::Isa,
            "ISM" => Self::Ism,
            "IGC" => Self::Igc,
            "RCA" => Self::Rca,
            "TAS" => Self::Tas,
            "NAS" => Self::Nas,
            "IC" => Self::Ic,
            "ND" => Self::Nd,
            "IEA" => Self::Iea,
            _ => return Err(TermParseError::UnknownEvidenceCode(s.to_string())),
        };
        Ok(code)
    }
}

/// Annotation modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Qualifier {
    ContributesTo,
    ColocalizesWith,
    IntegralTo,
}

impl Qualifier {
    pub const ALL: [Qualifier; 3] = [
        Qualifier::ContributesTo,
        Qualifier::ColocalizesWith,
        Qualifier::IntegralTo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ContributesTo => "contributes_to",
            Self::ColocalizesWith => "colocalizes_with",
            Self::IntegralTo => "integral_to",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Self::ContributesTo => 0b001,
            Self::ColocalizesWith => 0b010,
            Self::IntegralTo => 0b100,
        }
    }
}

impl FromStr for Qualifier {
    type Err = TermParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contributes_to" => Ok(Self::ContributesTo),
            "colocalizes_with" => Ok(Self::ColocalizesWith),
            "integral_to" => Ok(Self::IntegralTo),
            other => Err(TermParseError::UnknownQualifier(other.to_string())),
        }
    }
}

/// Bit set of [`Qualifier`] values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Qualifiers(u8);

impl Qualifiers {
    pub const EMPTY: Qualifiers = Qualifiers(0);

    pub fn of(qualifier: Qualifier) -> Self {
        Self(qualifier.bit())
    }

    pub fn insert(&mut self, qualifier: Qualifier) {
        self.0 |= qualifier.bit();
    }

    pub fn contains(self, qualifier: Qualifier) -> bool {
        self.0 & qualifier.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Qualifiers in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Qualifier> {
        Qualifier::ALL
            .into_iter()
            .filter(move |qualifier| self.contains(*qualifier))
    }

    /// Parses a `|`-separated list, e.g. `contributes_to|colocalizes_with`.
    pub fn parse_list(value: &str) -> Result<Self, TermParseError> {
        let mut qualifiers = Self::EMPTY;
        for part in value.split('|').map(str::trim).filter(|part| !part.is_empty()) {
            qualifiers.insert(part.parse()?);
        }
        Ok(qualifiers)
    }
}

impl BitOr for Qualifiers {
    type Output = Qualifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        Qualifiers(self.0 | rhs.0)
    }
}

impl BitOrAssign for Qualifiers {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl FromIterator<Qualifier> for Qualifiers {
    fn from_iter<I: IntoIterator<Item = Qualifier>>(iter: I) -> Self {
        let mut qualifiers = Self::EMPTY;
        for qualifier in iter {
            qualifiers.insert(qualifier);
        }
        qualifiers
    }
}

impl Display for Qualifiers {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .iter()
            .map(Qualifier::as_str)
            .collect::<Vec<_>>()
            .join("|");
        f.write_str(&joined)
    }
}

#[cfg(test)]
mod tests {
    use super::{Aspect, EvidenceCode, Qualifier, Qualifiers, TermId, TermParseError};

    #[test]
    fn term_id_parse_requires_go_format() {
        assert_eq!(
            TermId::parse(" GO:0008150 ").expect("valid id").as_str(),
            "GO:0008150"
        );
        assert_eq!(
            TermId::parse("GO:815").unwrap_err(),
            TermParseError::InvalidTermId("GO:815".to_string())
        );
    }

    #[test]
    fn evidence_classes_are_disjoint() {
        for code in ["EXP", "IDA", "IBA", "IBD", "IKR", "IEA", "ISS"] {
            let code: EvidenceCode = code.parse().expect("known code");
            assert!(!(code.is_experimental() && code.is_paint()));
        }
        assert!("ida".parse::<EvidenceCode>().expect("case folds").is_experimental());
        assert!(EvidenceCode::Ird.is_negation());
        assert!(!EvidenceCode::Iba.is_negation());
    }

    #[test]
    fn qualifier_list_round_trips_through_display() {
        let parsed = Qualifiers::parse_list("colocalizes_with|contributes_to").expect("valid");
        assert!(parsed.contains(Qualifier::ContributesTo));
        assert!(parsed.contains(Qualifier::ColocalizesWith));
        assert!(!parsed.contains(Qualifier::IntegralTo));
        assert_eq!(parsed.to_string(), "contributes_to|colocalizes_with");
        assert!(Qualifiers::parse_list("").expect("empty list").is_empty());
    }

    #[test]
    fn aspect_accepts_codes_and_namespaces() {
        assert_eq!(Aspect::parse("C").unwrap(), Aspect::CellularComponent);
        assert_eq!(
            Aspect::parse("biological_process").unwrap(),
            Aspect::BiologicalProcess
        );
        assert!(Aspect::parse("X").is_err());
    }
}
