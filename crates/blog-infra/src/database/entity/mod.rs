//! SeaORM entities mirroring the tables created by the `migration` crate.

pub mod blog_post;
pub mod comment;
pub mod user;
