//! Author domain model and field rules.
//!
//! # Responsibility
//! - Define the persisted author shape and its create/update inputs.
//! - Own the `name` and `phone_number` field rules.
//!
//! # Invariants
//! - `name` is never empty.
//! - `phone_number`, when present, is exactly 10 ASCII digits.
//! - Name uniqueness is a store-level concern; see `AuthorService`.

use crate::model::validation::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Stable identifier assigned by the record store on create.
pub type AuthorId = Uuid;

// `\d` is Unicode-aware in `regex`; spell out the ASCII class.
static PHONE_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone number regex"));

/// Persisted author record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
    pub phone_number: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds, refreshed by every update.
    pub updated_at: i64,
}

impl Author {
    /// Re-checks field rules on an already materialized record.
    ///
    /// Read paths use this to reject rows that bypassed write validation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_phone_number(self.phone_number.as_deref())?;
        Ok(())
    }
}

/// Caller-supplied values for a new author.
///
/// A missing or `null` name decodes as `""` so it fails `validate_name`
/// instead of failing at decode time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewAuthor {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl NewAuthor {
    pub fn new(name: impl Into<String>, phone_number: Option<String>) -> Self {
        Self {
            name: name.into(),
            phone_number,
        }
    }

    /// Returns the first failing field rule, `name` before `phone_number`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_phone_number(self.phone_number.as_deref())?;
        Ok(())
    }

    /// Runs every field rule and collects all failures.
    pub fn violations(&self) -> Vec<ValidationError> {
        [
            validate_name(&self.name).err(),
            validate_phone_number(self.phone_number.as_deref()).err(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Partial author update.
///
/// `None` leaves a field untouched. `phone_number: Some(None)` clears the
/// stored number; on the wire an absent key is `None` and an explicit
/// `null` is `Some(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthorPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_as_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone_number: Option<Option<String>>,
}

impl AuthorPatch {
    /// Returns true when the patch touches no field.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone_number.is_none()
    }

    /// Validates only the fields this patch touches.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.violations().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn violations(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if let Some(name) = &self.name {
            errors.extend(validate_name(name).err());
        }
        if let Some(phone_number) = &self.phone_number {
            errors.extend(validate_phone_number(phone_number.as_deref()).err());
        }
        errors
    }

    /// Validates, then applies touched fields onto `author`.
    ///
    /// On error `author` is left unchanged.
    pub fn apply_to(&self, author: &mut Author) -> Result<(), ValidationError> {
        self.validate()?;
        if let Some(name) = &self.name {
            author.name = name.clone();
        }
        if let Some(phone_number) = &self.phone_number {
            author.phone_number = phone_number.clone();
        }
        Ok(())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// Only runs when the key is present, so `null` becomes `Some(None)`.
fn present_as_some<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Rejects empty author names.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

/// Accepts `None` or exactly 10 ASCII digits with no separators.
pub fn validate_phone_number(phone_number: Option<&str>) -> Result<(), ValidationError> {
    match phone_number {
        None => Ok(()),
        Some(value) if PHONE_NUMBER_RE.is_match(value) => Ok(()),
        Some(value) => Err(ValidationError::InvalidPhoneFormat(value.to_string())),
    }
}
