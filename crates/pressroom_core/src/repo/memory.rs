//! In-memory record stores.
//!
//! Map-backed implementations of the repository traits for tests and for
//! embedding without SQLite. Records live behind an `RwLock`; reads and
//! writes clone.
//!
//! # Invariants
//! - Same validation and error semantics as the SQLite repositories.
//! - Author name uniqueness is checked and the insert performed under one
//!   write lock, so concurrent creators cannot both succeed.
//! - `updated_at` never moves backwards.

use crate::model::author::{Author, AuthorId, AuthorPatch, NewAuthor};
use crate::model::post::{NewPost, Post, PostId, PostPatch};
use crate::model::validation::ValidationError;
use crate::repo::author_repo::{AuthorListQuery, AuthorRepository, AUTHOR_RECORD};
use crate::repo::post_repo::{PostListQuery, PostRepository, POST_RECORD};
use crate::repo::{now_epoch_ms, paginate, RepoError, RepoResult};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// `HashMap`-based author store.
#[derive(Debug, Default)]
pub struct InMemoryAuthorRepository {
    authors: RwLock<HashMap<AuthorId, Author>>,
}

impl InMemoryAuthorRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored authors.
    pub fn len(&self) -> RepoResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> RepoResult<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> RepoResult<RwLockReadGuard<'_, HashMap<AuthorId, Author>>> {
        self.authors
            .read()
            .map_err(|_| RepoError::Poisoned(AUTHOR_RECORD))
    }

    fn write(&self) -> RepoResult<RwLockWriteGuard<'_, HashMap<AuthorId, Author>>> {
        self.authors
            .write()
            .map_err(|_| RepoError::Poisoned(AUTHOR_RECORD))
    }
}

impl AuthorRepository for InMemoryAuthorRepository {
    fn create_author(&self, draft: &NewAuthor) -> RepoResult<Author> {
        draft.validate()?;

        let mut authors = self.write()?;
        if name_taken(&authors, &draft.name, None) {
            return Err(ValidationError::DuplicateName(draft.name.clone()).into());
        }

        let now = now_epoch_ms();
        let author = Author {
            id: Uuid::new_v4(),
            name: draft.name.clone(),
            phone_number: draft.phone_number.clone(),
            created_at: now,
            updated_at: now,
        };
        authors.insert(author.id, author.clone());
        Ok(author)
    }

    fn find_author_by_name(&self, name: &str) -> RepoResult<Option<Author>> {
        Ok(self
            .read()?
            .values()
            .find(|author| author.name == name)
            .cloned())
    }

    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        Ok(self.read()?.get(&id).cloned())
    }

    fn list_authors(&self, query: &AuthorListQuery) -> RepoResult<Vec<Author>> {
        let mut authors: Vec<Author> = self.read()?.values().cloned().collect();
        authors.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(paginate(authors, query.limit, query.offset))
    }

    fn update_author(&self, id: AuthorId, patch: &AuthorPatch) -> RepoResult<Author> {
        patch.validate()?;

        let mut authors = self.write()?;
        if let Some(name) = &patch.name {
            if name_taken(&authors, name, Some(id)) {
                return Err(ValidationError::DuplicateName(name.clone()).into());
            }
        }

        let author = authors.get_mut(&id).ok_or(RepoError::NotFound {
            record: AUTHOR_RECORD,
            id,
        })?;
        if !patch.is_empty() {
            patch.apply_to(author)?;
            author.updated_at = author.updated_at.max(now_epoch_ms());
        }
        Ok(author.clone())
    }

    fn delete_author(&self, id: AuthorId) -> RepoResult<()> {
        self.write()?
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound {
                record: AUTHOR_RECORD,
                id,
            })
    }
}

fn name_taken(authors: &HashMap<AuthorId, Author>, name: &str, except: Option<AuthorId>) -> bool {
    authors
        .values()
        .any(|author| author.name == name && Some(author.id) != except)
}

/// `HashMap`-based post store.
#[derive(Debug, Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<HashMap<PostId, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> RepoResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> RepoResult<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> RepoResult<RwLockReadGuard<'_, HashMap<PostId, Post>>> {
        self.posts.read().map_err(|_| RepoError::Poisoned(POST_RECORD))
    }

    fn write(&self) -> RepoResult<RwLockWriteGuard<'_, HashMap<PostId, Post>>> {
        self.posts
            .write()
            .map_err(|_| RepoError::Poisoned(POST_RECORD))
    }
}

impl PostRepository for InMemoryPostRepository {
    fn create_post(&self, draft: &NewPost) -> RepoResult<Post> {
        let category = draft.validate()?;

        let now = now_epoch_ms();
        let post = Post {
            id: Uuid::new_v4(),
            title: draft.title.clone(),
            content: draft.content.clone(),
            summary: draft.summary.clone(),
            category,
            created_at: now,
            updated_at: now,
        };
        self.write()?.insert(post.id, post.clone());
        Ok(post)
    }

    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>> {
        Ok(self.read()?.get(&id).cloned())
    }

    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .read()?
            .values()
            .filter(|post| query.category.map_or(true, |c| post.category == c))
            .cloned()
            .collect();
        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(paginate(posts, query.limit, query.offset))
    }

    fn update_post(&self, id: PostId, patch: &PostPatch) -> RepoResult<Post> {
        patch.validate()?;

        let mut posts = self.write()?;
        let post = posts.get_mut(&id).ok_or(RepoError::NotFound {
            record: POST_RECORD,
            id,
        })?;
        if !patch.is_empty() {
            patch.apply_to(post)?;
            post.updated_at = post.updated_at.max(now_epoch_ms());
        }
        Ok(post.clone())
    }

    fn delete_post(&self, id: PostId) -> RepoResult<()> {
        self.write()?
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound {
                record: POST_RECORD,
                id,
            })
    }
}
