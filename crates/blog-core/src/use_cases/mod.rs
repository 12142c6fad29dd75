//! Use cases - application behaviour composed from repository calls.
//!
//! Each use-case struct receives its repositories as explicitly passed
//! `Arc<dyn ...>` handles; none of them reach for global state.

mod auth;
mod comments;
mod posts;

pub use auth::{AuthUseCases, IssuedToken, RegisterUser};
pub use comments::CommentUseCases;
pub use posts::BlogPostUseCases;

pub(crate) const BLOG_POST: &str = "BlogPost";
pub(crate) const COMMENT: &str = "Comment";
pub(crate) const USER: &str = "User";
