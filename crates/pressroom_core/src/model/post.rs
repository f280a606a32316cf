//! Post domain model and field rules.
//!
//! # Responsibility
//! - Define the persisted post shape and its create/update inputs.
//! - Own the `title`, `content`, `summary` and `category` field rules.
//!
//! # Invariants
//! - Lengths are counted in Unicode scalar values (`chars().count()`). This
//!   agrees with SQLite `length()` on TEXT except that SQLite stops at the
//!   first NUL character.
//! - Category storage/wire spellings are exactly `Fiction` and `Non-Fiction`.
//! - Field rules are independent; no cross-field checks exist.

use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier assigned by the record store on create.
pub type PostId = Uuid;

/// Phrases a title must contain at least one of (case-sensitive).
pub const TITLE_MARKERS: [&str; 4] = ["Won't Believe", "Secret", "Top", "Guess"];
/// Minimum `content` length in characters.
pub const CONTENT_MIN_CHARS: usize = 250;
/// Maximum `summary` length in characters.
pub const SUMMARY_MAX_CHARS: usize = 250;

/// Allowed post categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostCategory {
    #[serde(rename = "Fiction")]
    Fiction,
    #[serde(rename = "Non-Fiction")]
    NonFiction,
}

impl PostCategory {
    /// Storage and wire spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fiction => "Fiction",
            Self::NonFiction => "Non-Fiction",
        }
    }

    /// Exact-match parse; no case folding or trimming.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Fiction" => Some(Self::Fiction),
            "Non-Fiction" => Some(Self::NonFiction),
            _ => None,
        }
    }
}

impl Display for PostCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted post record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub summary: String,
    pub category: PostCategory,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds, refreshed by every update.
    pub updated_at: i64,
}

impl Post {
    /// Re-checks field rules on an already materialized record.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        validate_content(&self.content)?;
        validate_summary(&self.summary)?;
        Ok(())
    }
}

/// Caller-supplied values for a new post.
///
/// `category` stays a raw string so out-of-set values can be rejected with a
/// validation error instead of failing at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub summary: String,
    pub category: String,
}

impl NewPost {
    /// Returns the first failing field rule in declaration order and the
    /// parsed category on success.
    pub fn validate(&self) -> Result<PostCategory, ValidationError> {
        validate_title(&self.title)?;
        validate_content(&self.content)?;
        validate_summary(&self.summary)?;
        validate_category(&self.category)
    }

    /// Runs every field rule and collects all failures.
    pub fn violations(&self) -> Vec<ValidationError> {
        [
            validate_title(&self.title).err(),
            validate_content(&self.content).err(),
            validate_summary(&self.summary).err(),
            validate_category(&self.category).err(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Partial post update; `None` (or an absent key) leaves a field untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PostPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.summary.is_none()
            && self.category.is_none()
    }

    /// Validates touched fields and returns the parsed category, if touched.
    pub fn validate(&self) -> Result<Option<PostCategory>, ValidationError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(content) = &self.content {
            validate_content(content)?;
        }
        if let Some(summary) = &self.summary {
            validate_summary(summary)?;
        }
        self.category.as_deref().map(validate_category).transpose()
    }

    pub fn violations(&self) -> Vec<ValidationError> {
        [
            self.title.as_deref().and_then(|v| validate_title(v).err()),
            self.content.as_deref().and_then(|v| validate_content(v).err()),
            self.summary.as_deref().and_then(|v| validate_summary(v).err()),
            self.category
                .as_deref()
                .and_then(|v| validate_category(v).err()),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Validates, then applies touched fields onto `post`.
    ///
    /// On error `post` is left unchanged.
    pub fn apply_to(&self, post: &mut Post) -> Result<(), ValidationError> {
        let category = self.validate()?;
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(content) = &self.content {
            post.content = content.clone();
        }
        if let Some(summary) = &self.summary {
            post.summary = summary.clone();
        }
        if let Some(category) = category {
            post.category = category;
        }
        Ok(())
    }
}

/// Requires at least one marker phrase anywhere in the title.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if TITLE_MARKERS.iter().any(|marker| title.contains(marker)) {
        Ok(())
    } else {
        Err(ValidationError::MissingRequiredPhrase)
    }
}

pub fn validate_content(content: &str) -> Result<(), ValidationError> {
    let length = content.chars().count();
    if length < CONTENT_MIN_CHARS {
        return Err(ValidationError::ContentTooShort {
            length,
            minimum: CONTENT_MIN_CHARS,
        });
    }
    Ok(())
}

pub fn validate_summary(summary: &str) -> Result<(), ValidationError> {
    let length = summary.chars().count();
    if length > SUMMARY_MAX_CHARS {
        return Err(ValidationError::SummaryTooLong {
            length,
            maximum: SUMMARY_MAX_CHARS,
        });
    }
    Ok(())
}

pub fn validate_category(category: &str) -> Result<PostCategory, ValidationError> {
    PostCategory::parse(category)
        .ok_or_else(|| ValidationError::InvalidCategory(category.to_string()))
}
