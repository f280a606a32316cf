//! Post repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/get/list/update/delete over the `posts` table.
//! - Map `PostCategory` to and from its stored spelling.
//!
//! # Invariants
//! - Write paths run every touched field rule before SQL writes.
//! - Listing is ordered by `created_at DESC, id ASC`.

use crate::model::post::{NewPost, Post, PostCategory, PostId, PostPatch};
use crate::repo::{parse_record_id, push_pagination, RepoError, RepoResult, NOW_EPOCH_MS_SQL};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use uuid::Uuid;

const POST_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    summary,
    category,
    created_at,
    updated_at
FROM posts";

pub(crate) const POST_RECORD: &str = "post";

/// Query options for listing posts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostListQuery {
    pub category: Option<PostCategory>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Record store interface for posts.
pub trait PostRepository {
    fn create_post(&self, draft: &NewPost) -> RepoResult<Post>;
    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>>;
    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>>;
    /// Validates and applies a patch, returning the updated record.
    fn update_post(&self, id: PostId, patch: &PostPatch) -> RepoResult<Post>;
    fn delete_post(&self, id: PostId) -> RepoResult<()>;
}

/// SQLite-backed post repository over a migrated connection.
pub struct SqlitePostRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePostRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn require_post(&self, id: PostId) -> RepoResult<Post> {
        self.get_post(id)?.ok_or(RepoError::NotFound {
            record: POST_RECORD,
            id,
        })
    }
}

impl PostRepository for SqlitePostRepository<'_> {
    fn create_post(&self, draft: &NewPost) -> RepoResult<Post> {
        let category = draft.validate()?;

        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO posts (id, title, content, summary, category)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                id.to_string(),
                draft.title.as_str(),
                draft.content.as_str(),
                draft.summary.as_str(),
                category.as_str(),
            ],
        )?;

        self.require_post(id)
    }

    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POST_SELECT_SQL} WHERE id = ?1;"))?;
        let post = stmt
            .query_row([id.to_string()], |row| Ok(read_post_row(row)))
            .optional()?;
        post.transpose()
    }

    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>> {
        let mut sql = format!("{POST_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(category) = query.category {
            sql.push_str(" AND category = ?");
            bind_values.push(Value::Text(category.as_str().to_string()));
        }

        sql.push_str(" ORDER BY created_at DESC, id ASC");
        push_pagination(&mut sql, &mut bind_values, query.limit, query.offset);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut posts = Vec::new();
        while let Some(row) = rows.next()? {
            posts.push(read_post_row(row)?);
        }
        Ok(posts)
    }

    fn update_post(&self, id: PostId, patch: &PostPatch) -> RepoResult<Post> {
        patch.validate()?;
        let mut post = self.require_post(id)?;
        if patch.is_empty() {
            return Ok(post);
        }
        patch.apply_to(&mut post)?;

        let changed = self.conn.execute(
            &format!(
                "UPDATE posts
                 SET
                    title = ?1,
                    content = ?2,
                    summary = ?3,
                    category = ?4,
                    updated_at = MAX(updated_at, {NOW_EPOCH_MS_SQL})
                 WHERE id = ?5;"
            ),
            params![
                post.title.as_str(),
                post.content.as_str(),
                post.summary.as_str(),
                post.category.as_str(),
                id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                record: POST_RECORD,
                id,
            });
        }

        self.require_post(id)
    }

    fn delete_post(&self, id: PostId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM posts WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                record: POST_RECORD,
                id,
            });
        }
        Ok(())
    }
}

fn read_post_row(row: &Row<'_>) -> RepoResult<Post> {
    let id_text: String = row.get("id")?;
    let category_text: String = row.get("category")?;
    let category = PostCategory::parse(&category_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid category `{category_text}` in posts.category"
        ))
    })?;

    let post = Post {
        id: parse_record_id(&id_text, "posts.id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        summary: row.get("summary")?,
        category,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    post.validate()?;
    Ok(post)
}
