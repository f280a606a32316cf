//! Domain model for authors and posts.
//!
//! # Responsibility
//! - Define persisted record shapes and their create/update inputs.
//! - Own per-field validation rules as plain functions.
//!
//! # Invariants
//! - Every record write passes its field rules before reaching storage.
//! - Authors and posts are independent; neither references the other.

pub mod author;
pub mod post;
pub mod validation;
