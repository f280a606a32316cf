//! Field validation error shared by author and post records.
//!
//! # Responsibility
//! - Represent every field-rule failure as one error kind.
//! - Expose stable reason strings and offending field names.
//!
//! # Invariants
//! - `reason()` strings are stable and safe to surface to callers.
//! - `Display` never echoes full user payloads (post bodies, summaries).

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejection raised when a candidate field value breaks its rule.
///
/// A single failure rejects the whole mutation it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Author name is empty.
    EmptyName,
    /// Author phone number is not exactly 10 ASCII digits.
    InvalidPhoneFormat(String),
    /// Another author already owns this name.
    DuplicateName(String),
    /// Post title lacks every marker phrase.
    MissingRequiredPhrase,
    /// Post content is below the minimum character count.
    ContentTooShort { length: usize, minimum: usize },
    /// Post summary is above the maximum character count.
    SummaryTooLong { length: usize, maximum: usize },
    /// Post category is outside the allowed set.
    InvalidCategory(String),
}

impl ValidationError {
    /// Short machine-stable reason for this failure.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::EmptyName => "empty name",
            Self::InvalidPhoneFormat(_) => "invalid phone format",
            Self::DuplicateName(_) => "duplicate name",
            Self::MissingRequiredPhrase => "missing required phrase",
            Self::ContentTooShort { .. } => "content too short",
            Self::SummaryTooLong { .. } => "summary too long",
            Self::InvalidCategory(_) => "invalid category",
        }
    }

    /// Name of the record field that failed.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::DuplicateName(_) => "name",
            Self::InvalidPhoneFormat(_) => "phone_number",
            Self::MissingRequiredPhrase => "title",
            Self::ContentTooShort { .. } => "content",
            Self::SummaryTooLong { .. } => "summary",
            Self::InvalidCategory(_) => "category",
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "empty name: author name cannot be empty"),
            Self::InvalidPhoneFormat(value) => write!(
                f,
                "invalid phone format: `{value}` must be exactly 10 digits"
            ),
            Self::DuplicateName(name) => {
                write!(f, "duplicate name: an author named `{name}` already exists")
            }
            Self::MissingRequiredPhrase => write!(
                f,
                "missing required phrase: title must contain one of {}",
                crate::model::post::TITLE_MARKERS
                    .iter()
                    .map(|marker| format!("\"{marker}\""))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Self::ContentTooShort { length, minimum } => write!(
                f,
                "content too short: {length} characters, at least {minimum} required"
            ),
            Self::SummaryTooLong { length, maximum } => write!(
                f,
                "summary too long: {length} characters, at most {maximum} allowed"
            ),
            Self::InvalidCategory(value) => write!(
                f,
                "invalid category: `{value}` is not one of \"Fiction\", \"Non-Fiction\""
            ),
        }
    }
}

impl Error for ValidationError {}
