//! Author and post records with validate-on-write field rules.
//! This crate owns every record invariant; callers go through its services.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::author::{Author, AuthorId, AuthorPatch, NewAuthor};
pub use model::post::{NewPost, Post, PostCategory, PostId, PostPatch, TITLE_MARKERS};
pub use model::validation::ValidationError;
pub use repo::author_repo::{AuthorListQuery, AuthorRepository, SqliteAuthorRepository};
pub use repo::memory::{InMemoryAuthorRepository, InMemoryPostRepository};
pub use repo::post_repo::{PostListQuery, PostRepository, SqlitePostRepository};
pub use repo::{RepoError, RepoResult};
pub use service::author_service::AuthorService;
pub use service::post_service::PostService;

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
