//! Term graph repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist term records, replacements and closure rows per relation mode.
//! - Rebuild a [`ClosureTermGraph`] without re-reading the OBO source.
//!
//! # Invariants
//! - `save_graph` replaces the stored graph atomically.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::term::{Aspect, TermId};
use crate::ontology::{ClosureTermGraph, RelationMode, TermRecord};
use log::info;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TermRepoResult<T> = Result<T, TermRepoError>;

/// Errors from term graph persistence.
#[derive(Debug)]
pub enum TermRepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for TermRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted term data: {message}"),
        }
    }
}

impl Error for TermRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for TermRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for TermRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage interface for precomputed term graphs.
pub trait TermRepository {
    fn save_graph(&self, graph: &ClosureTermGraph) -> TermRepoResult<()>;
    fn load_graph(&self) -> TermRepoResult<ClosureTermGraph>;
    fn term_count(&self) -> TermRepoResult<usize>;
}

/// SQLite-backed term graph repository.
pub struct SqliteTermRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTermRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TermRepository for SqliteTermRepository<'_> {
    fn save_graph(&self, graph: &ClosureTermGraph) -> TermRepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(
            "DELETE FROM term_closure;
             DELETE FROM term_replacements;
             DELETE FROM terms;",
        )?;

        let records = graph.records();
        {
            let mut insert_term = tx.prepare(
                "INSERT INTO terms (term_id, label, aspect, is_obsolete, is_excluded)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            let mut insert_replacement = tx.prepare(
                "INSERT INTO term_replacements (term_id, position, replacement_id)
                 VALUES (?1, ?2, ?3)",
            )?;
            for record in &records {
                insert_term.execute(params![
                    record.id.as_str(),
                    record.label,
                    record.aspect.map(|aspect| aspect.code().to_string()),
                    record.is_obsolete,
                    record.is_excluded,
                ])?;
                for (position, replacement) in record.replaced_by.iter().enumerate() {
                    insert_replacement.execute(params![
                        record.id.as_str(),
                        position as i64,
                        replacement.as_str(),
                    ])?;
                }
            }
        }

        let rows = graph.closure_rows();
        {
            let mut insert_closure = tx.prepare(
                "INSERT INTO term_closure (term_id, ancestor_id, mode) VALUES (?1, ?2, ?3)",
            )?;
            for (term, ancestor, mode) in &rows {
                insert_closure.execute(params![term.as_str(), ancestor.as_str(), mode.as_str()])?;
            }
        }
        tx.commit()?;

        info!(
            "event=term_graph_save module=repo status=ok terms={} closure_rows={}",
            records.len(),
            rows.len()
        );
        Ok(())
    }

    fn load_graph(&self) -> TermRepoResult<ClosureTermGraph> {
        let mut replacements: HashMap<String, Vec<TermId>> = HashMap::new();
        {
            let mut stmt = self.conn.prepare(
                "SELECT term_id, replacement_id FROM term_replacements
                 ORDER BY term_id, position",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;
            for row in rows {
                let (term_id, replacement) = row?;
                replacements
                    .entry(term_id)
                    .or_default()
                    .push(parse_term_id(&replacement)?);
            }
        }

        let mut records = Vec::new();
        {
            let mut stmt = self.conn.prepare(
                "SELECT term_id, label, aspect, is_obsolete, is_excluded FROM terms
                 ORDER BY term_id",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, bool>(3)?,
                    row.get::<_, bool>(4)?,
                ))
            })?;
            for row in rows {
                let (term_id, label, aspect, is_obsolete, is_excluded) = row?;
                let aspect = aspect
                    .map(|code| {
                        Aspect::parse(&code).map_err(|_| {
                            TermRepoError::InvalidData(format!("unknown aspect `{code}` for {term_id}"))
                        })
                    })
                    .transpose()?;
                records.push(TermRecord {
                    id: parse_term_id(&term_id)?,
                    label,
                    aspect,
                    is_obsolete,
                    replaced_by: replacements.remove(&term_id).unwrap_or_default(),
                    is_excluded,
                });
            }
        }

        let mut closure = Vec::new();
        {
            let mut stmt = self
                .conn
                .prepare("SELECT term_id, ancestor_id, mode FROM term_closure")?;
            let rows = stmt.query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?;
            for row in rows {
                let (term_id, ancestor_id, mode) = row?;
                let mode = RelationMode::parse(&mode).ok_or_else(|| {
                    TermRepoError::InvalidData(format!("unknown relation mode `{mode}`"))
                })?;
                closure.push((parse_term_id(&term_id)?, parse_term_id(&ancestor_id)?, mode));
            }
        }

        info!(
            "event=term_graph_load module=repo status=ok terms={} closure_rows={}",
            records.len(),
            closure.len()
        );
        Ok(ClosureTermGraph::from_closure(records, closure))
    }

    fn term_count(&self) -> TermRepoResult<usize> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM terms", [], |row| row.get::<_, i64>(0))?;
        usize::try_from(count).map_err(|_| TermRepoError::InvalidData(format!("negative count {count}")))
    }
}

fn parse_term_id(value: &str) -> TermRepoResult<TermId> {
    TermId::parse(value).map_err(|err| TermRepoError::InvalidData(err.to_string()))
}
