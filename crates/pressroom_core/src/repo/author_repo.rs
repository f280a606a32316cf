//! Author repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/lookup/list/update/delete over the `authors` table.
//! - Translate the `authors.name` unique constraint into a validation error.
//!
//! # Invariants
//! - `create_author` and `update_author` run field rules before SQL writes.
//! - The store assigns `id`, `created_at` and `updated_at`; callers never do.
//! - A duplicate name surfaces as `ValidationError::DuplicateName` whether it
//!   was caught by a lookup or by the constraint.

use crate::db::DbError;
use crate::model::author::{Author, AuthorId, AuthorPatch, NewAuthor};
use crate::model::validation::ValidationError;
use crate::repo::{parse_record_id, push_pagination, RepoError, RepoResult, NOW_EPOCH_MS_SQL};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use uuid::Uuid;

const AUTHOR_SELECT_SQL: &str = "SELECT
    id,
    name,
    phone_number,
    created_at,
    updated_at
FROM authors";

pub(crate) const AUTHOR_RECORD: &str = "author";

/// Query options for listing authors, ordered by `name ASC`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorListQuery {
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Record store interface for authors.
pub trait AuthorRepository {
    /// Persists a validated draft and returns the stored record.
    fn create_author(&self, draft: &NewAuthor) -> RepoResult<Author>;
    /// Point-in-time exact-match lookup by name.
    fn find_author_by_name(&self, name: &str) -> RepoResult<Option<Author>>;
    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>>;
    fn list_authors(&self, query: &AuthorListQuery) -> RepoResult<Vec<Author>>;
    /// Validates and applies a patch, returning the updated record.
    fn update_author(&self, id: AuthorId, patch: &AuthorPatch) -> RepoResult<Author>;
    fn delete_author(&self, id: AuthorId) -> RepoResult<()>;
}

/// SQLite-backed author repository over a migrated connection.
pub struct SqliteAuthorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuthorRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn require_author(&self, id: AuthorId) -> RepoResult<Author> {
        self.get_author(id)?.ok_or(RepoError::NotFound {
            record: AUTHOR_RECORD,
            id,
        })
    }
}

impl AuthorRepository for SqliteAuthorRepository<'_> {
    fn create_author(&self, draft: &NewAuthor) -> RepoResult<Author> {
        draft.validate()?;

        let id = Uuid::new_v4();
        self.conn
            .execute(
                "INSERT INTO authors (id, name, phone_number) VALUES (?1, ?2, ?3);",
                params![
                    id.to_string(),
                    draft.name.as_str(),
                    draft.phone_number.as_deref()
                ],
            )
            .map_err(|err| unique_name_error(err, &draft.name))?;

        self.require_author(id)
    }

    fn find_author_by_name(&self, name: &str) -> RepoResult<Option<Author>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AUTHOR_SELECT_SQL} WHERE name = ?1;"))?;
        let author = stmt
            .query_row([name], |row| Ok(read_author_row(row)))
            .optional()?;
        author.transpose()
    }

    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AUTHOR_SELECT_SQL} WHERE id = ?1;"))?;
        let author = stmt
            .query_row([id.to_string()], |row| Ok(read_author_row(row)))
            .optional()?;
        author.transpose()
    }

    fn list_authors(&self, query: &AuthorListQuery) -> RepoResult<Vec<Author>> {
        let mut sql = format!("{AUTHOR_SELECT_SQL} ORDER BY name ASC, id ASC");
        let mut bind_values: Vec<Value> = Vec::new();
        push_pagination(&mut sql, &mut bind_values, query.limit, query.offset);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut authors = Vec::new();
        while let Some(row) = rows.next()? {
            authors.push(read_author_row(row)?);
        }
        Ok(authors)
    }

    fn update_author(&self, id: AuthorId, patch: &AuthorPatch) -> RepoResult<Author> {
        patch.validate()?;
        let mut author = self.require_author(id)?;
        if patch.is_empty() {
            return Ok(author);
        }
        patch.apply_to(&mut author)?;

        let changed = self
            .conn
            .execute(
                &format!(
                    "UPDATE authors
                     SET
                        name = ?1,
                        phone_number = ?2,
                        updated_at = MAX(updated_at, {NOW_EPOCH_MS_SQL})
                     WHERE id = ?3;"
                ),
                params![
                    author.name.as_str(),
                    author.phone_number.as_deref(),
                    id.to_string()
                ],
            )
            .map_err(|err| unique_name_error(err, &author.name))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                record: AUTHOR_RECORD,
                id,
            });
        }

        self.require_author(id)
    }

    fn delete_author(&self, id: AuthorId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM authors WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                record: AUTHOR_RECORD,
                id,
            });
        }
        Ok(())
    }
}

fn unique_name_error(err: rusqlite::Error, name: &str) -> RepoError {
    let err = DbError::from(err);
    if err.is_unique_violation() {
        RepoError::Validation(ValidationError::DuplicateName(name.to_string()))
    } else {
        RepoError::Db(err)
    }
}

fn read_author_row(row: &Row<'_>) -> RepoResult<Author> {
    let id_text: String = row.get("id")?;
    let author = Author {
        id: parse_record_id(&id_text, "authors.id")?,
        name: row.get("name")?,
        phone_number: row.get("phone_number")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    author.validate()?;
    Ok(author)
}
