//! Use-case services over the record repositories.
//!
//! # Responsibility
//! - Provide the entry points callers use to create and change records.
//! - Stay storage-agnostic: every service is generic over its repository.

pub mod author_service;
pub mod post_service;
