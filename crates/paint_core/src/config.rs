//! Curation session configuration.
//!
//! # Responsibility
//! - Hold the tunables of the propagation engine and GAF export.
//! - Parse them from JSON with every field defaulted.
//!
//! # Invariants
//! - `assigned_by` is never blank.
//! - `excluded_terms` only holds well-formed GO ids.

use crate::model::term::TermId;
use crate::ontology::RelationMode;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Assigner label of engine-authored annotations.
pub const DEFAULT_ASSIGNED_BY: &str = "GO_Central";
/// Reference cited by phylogenetic inferences.
pub const DEFAULT_REFERENCE: &str = "GO_REF:0000033";

/// Errors from loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    BlankAssignedBy,
    InvalidExcludedTerm(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid curation config: {err}"),
            Self::BlankAssignedBy => write!(f, "assigned_by must not be blank"),
            Self::InvalidExcludedTerm(value) => {
                write!(f, "excluded_terms contains invalid GO id `{value}`")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::BlankAssignedBy => None,
            Self::InvalidExcludedTerm(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Engine and export settings for one curation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurationConfig {
    /// Relation set behind "more specific than".
    pub relation_mode: RelationMode,
    pub assigned_by: String,
    /// Reference used when a caller supplies none.
    pub default_reference: String,
    /// Terms rejected as EXCLUDED on top of the term graph's own list.
    pub excluded_terms: Vec<TermId>,
    /// Skips the WRONG_TAXA step when false.
    pub check_taxa: bool,
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            relation_mode: RelationMode::IsAPartOf,
            assigned_by: DEFAULT_ASSIGNED_BY.to_string(),
            default_reference: DEFAULT_REFERENCE.to_string(),
            excluded_terms: Vec::new(),
            check_taxa: true,
        }
    }
}

impl CurationConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let mut config: CurationConfig = serde_json::from_str(json)?;
        config.assigned_by = config.assigned_by.trim().to_string();
        if config.assigned_by.is_empty() {
            return Err(ConfigError::BlankAssignedBy);
        }
        let mut excluded = Vec::with_capacity(config.excluded_terms.len());
        for term in &config.excluded_terms {
            let parsed = TermId::parse(term.as_str())
                .map_err(|_| ConfigError::InvalidExcludedTerm(term.to_string()))?;
            excluded.push(parsed);
        }
        config.excluded_terms = excluded;
        Ok(config)
    }

    pub fn is_excluded(&self, term: &TermId) -> bool {
        self.excluded_terms.contains(term)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CurationConfig, DEFAULT_ASSIGNED_BY};
    use crate::ontology::RelationMode;

    #[test]
    fn empty_document_yields_defaults() {
        let config = CurationConfig::from_json_str("{}").expect("defaults");
        assert_eq!(config, CurationConfig::default());
        assert_eq!(config.assigned_by, DEFAULT_ASSIGNED_BY);
        assert!(config.check_taxa);
    }

    #[test]
    fn fields_are_parsed_and_validated() {
        let config = CurationConfig::from_json_str(
            r#"{"relation_mode":"regulates","excluded_terms":["GO:0005488"],"check_taxa":false}"#,
        )
        .expect("valid config");
        assert_eq!(config.relation_mode, RelationMode::Regulates);
        assert_eq!(config.excluded_terms.len(), 1);
        assert!(!config.check_taxa);

        let err = CurationConfig::from_json_str(r#"{"excluded_terms":["binding"]}"#)
            .expect_err("bad id must fail");
        assert!(matches!(err, ConfigError::InvalidExcludedTerm(value) if value == "binding"));

        let err = CurationConfig::from_json_str(r#"{"assigned_by":"  "}"#)
            .expect_err("blank assigner must fail");
        assert!(matches!(err, ConfigError::BlankAssignedBy));
    }
}
