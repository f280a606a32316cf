//! Author use-case service.
//!
//! # Responsibility
//! - Orchestrate author creation: field rules, name lookup, persistence.
//! - Expose read/update/delete entry points over any `AuthorRepository`.
//!
//! # Invariants
//! - A rejected mutation leaves the store untouched.
//! - Log lines carry field names and reasons only, never field values.

use crate::model::author::{Author, AuthorId, AuthorPatch, NewAuthor};
use crate::model::validation::ValidationError;
use crate::repo::author_repo::{AuthorListQuery, AuthorRepository};
use crate::repo::{RepoError, RepoResult};
use log::{info, warn};

/// Use-case service over an author repository.
pub struct AuthorService<R: AuthorRepository> {
    repo: R,
}

impl<R: AuthorRepository> AuthorService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Borrows the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Creates an author after field rules and a name availability check.
    ///
    /// # Errors
    /// - `RepoError::Validation` with `EmptyName`, `InvalidPhoneFormat` or
    ///   `DuplicateName`.
    /// - Storage errors from the repository unchanged.
    pub fn create_author(&self, draft: &NewAuthor) -> RepoResult<Author> {
        let result = draft
            .validate()
            .map_err(RepoError::from)
            .and_then(|()| self.ensure_name_available(&draft.name))
            .and_then(|()| self.repo.create_author(draft));
        log_outcome("author_create", &result);
        result
    }

    /// Convenience wrapper over `create_author`.
    pub fn register(
        &self,
        name: impl Into<String>,
        phone_number: Option<String>,
    ) -> RepoResult<Author> {
        self.create_author(&NewAuthor::new(name, phone_number))
    }

    /// Point-in-time check that no stored author already uses `name`.
    ///
    /// The store's own uniqueness enforcement still backs this up when two
    /// creators race.
    pub fn ensure_name_available(&self, name: &str) -> RepoResult<()> {
        match self.repo.find_author_by_name(name)? {
            Some(_) => Err(ValidationError::DuplicateName(name.to_string()).into()),
            None => Ok(()),
        }
    }

    /// Re-validates the touched fields, then persists the patch.
    pub fn update_author(&self, id: AuthorId, patch: &AuthorPatch) -> RepoResult<Author> {
        let result = self.repo.update_author(id, patch);
        log_outcome("author_update", &result);
        result
    }

    pub fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        self.repo.get_author(id)
    }

    pub fn find_author_by_name(&self, name: &str) -> RepoResult<Option<Author>> {
        self.repo.find_author_by_name(name)
    }

    pub fn list_authors(&self, query: &AuthorListQuery) -> RepoResult<Vec<Author>> {
        self.repo.list_authors(query)
    }

    pub fn delete_author(&self, id: AuthorId) -> RepoResult<()> {
        self.repo.delete_author(id)?;
        info!("event=author_delete module=service status=ok author_id={id}");
        Ok(())
    }
}

fn log_outcome(event: &str, result: &RepoResult<Author>) {
    match result {
        Ok(author) => info!(
            "event={event} module=service status=ok author_id={}",
            author.id
        ),
        Err(RepoError::Validation(err)) => warn!(
            "event={event} module=service status=rejected field={} reason=\"{}\"",
            err.field(),
            err.reason()
        ),
        Err(err) => warn!("event={event} module=service status=error error={err}"),
    }
}
