//! # Blog Core
//!
//! The domain layer of the blog API.
//! Entities, repository ports and use cases live here, with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod use_cases;

pub use error::{DomainError, RepoError};
