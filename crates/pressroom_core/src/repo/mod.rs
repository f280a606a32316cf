//! Record store contracts and their implementations.
//!
//! # Responsibility
//! - Define one repository trait per record type.
//! - Keep SQL inside the SQLite implementations.
//! - Provide lock-guarded in-memory stores for tests and embedding.
//!
//! # Invariants
//! - Write paths run the record's field rules before any mutation.
//! - Author name uniqueness is enforced by the store itself, not only by a
//!   prior lookup.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::db::DbError;
use crate::model::validation::ValidationError;
use rusqlite::types::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

pub mod author_repo;
pub mod memory;
pub mod post_repo;

/// SQL expression for "now" in Unix epoch milliseconds.
pub(crate) const NOW_EPOCH_MS_SQL: &str =
    "CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by author and post stores.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound { record: &'static str, id: Uuid },
    InvalidData(String),
    /// An in-memory store's lock was poisoned by a panicking writer.
    Poisoned(&'static str),
}

impl RepoError {
    /// Returns the validation failure, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { record, id } => write!(f, "{record} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Poisoned(store) => write!(f, "{store} store lock poisoned"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } | Self::InvalidData(_) | Self::Poisoned(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn parse_record_id(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

/// Appends `LIMIT`/`OFFSET` clauses and their bind values.
pub(crate) fn push_pagination(
    sql: &mut String,
    bind_values: &mut Vec<Value>,
    limit: Option<u32>,
    offset: u32,
) {
    if let Some(limit) = limit {
        sql.push_str(" LIMIT ?");
        bind_values.push(Value::Integer(i64::from(limit)));
        if offset > 0 {
            sql.push_str(" OFFSET ?");
            bind_values.push(Value::Integer(i64::from(offset)));
        }
    } else if offset > 0 {
        sql.push_str(" LIMIT -1 OFFSET ?");
        bind_values.push(Value::Integer(i64::from(offset)));
    }
}

/// Applies `limit`/`offset` to an already ordered in-memory listing.
pub(crate) fn paginate<T>(items: Vec<T>, limit: Option<u32>, offset: u32) -> Vec<T> {
    let skipped = items.into_iter().skip(offset as usize);
    match limit {
        Some(limit) => skipped.take(limit as usize).collect(),
        None => skipped.collect(),
    }
}

pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{paginate, push_pagination};
    use rusqlite::types::Value;

    #[test]
    fn pagination_without_limit_uses_negative_limit() {
        let mut sql = String::from("SELECT 1");
        let mut binds = Vec::new();
        push_pagination(&mut sql, &mut binds, None, 3);
        assert_eq!(sql, "SELECT 1 LIMIT -1 OFFSET ?");
        assert_eq!(binds, vec![Value::Integer(3)]);
    }

    #[test]
    fn paginate_skips_then_takes() {
        assert_eq!(paginate(vec![1, 2, 3, 4], Some(2), 1), vec![2, 3]);
        assert_eq!(paginate(vec![1, 2, 3], None, 5), Vec::<i32>::new());
    }
}
