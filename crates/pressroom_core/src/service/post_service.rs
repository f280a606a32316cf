//! Post use-case service.
//!
//! Thin orchestration over any `PostRepository`: every write passes the post
//! field rules (inside the repository) and logs its outcome without the
//! post text itself.

use crate::model::post::{NewPost, Post, PostId, PostPatch};
use crate::repo::post_repo::{PostListQuery, PostRepository};
use crate::repo::{RepoError, RepoResult};
use log::{info, warn};

/// Use-case service over a post repository.
pub struct PostService<R: PostRepository> {
    repo: R,
}

impl<R: PostRepository> PostService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Creates a post; all four field rules must pass.
    pub fn create_post(&self, draft: &NewPost) -> RepoResult<Post> {
        let result = self.repo.create_post(draft);
        log_outcome("post_create", &result);
        result
    }

    /// Re-validates the touched fields, then persists the patch.
    ///
    /// Any failing field rejects the whole patch.
    pub fn update_post(&self, id: PostId, patch: &PostPatch) -> RepoResult<Post> {
        let result = self.repo.update_post(id, patch);
        log_outcome("post_update", &result);
        result
    }

    pub fn get_post(&self, id: PostId) -> RepoResult<Option<Post>> {
        self.repo.get_post(id)
    }

    pub fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>> {
        self.repo.list_posts(query)
    }

    pub fn delete_post(&self, id: PostId) -> RepoResult<()> {
        self.repo.delete_post(id)?;
        info!("event=post_delete module=service status=ok post_id={id}");
        Ok(())
    }
}

fn log_outcome(event: &str, result: &RepoResult<Post>) {
    match result {
        Ok(post) => info!(
            "event={event} module=service status=ok post_id={} category={}",
            post.id, post.category
        ),
        Err(RepoError::Validation(err)) => warn!(
            "event={event} module=service status=rejected field={} reason=\"{}\"",
            err.field(),
            err.reason()
        ),
        Err(err) => warn!("event={event} module=service status=error error={err}"),
    }
}
