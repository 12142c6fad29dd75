//! Domain entities - the core business objects.

mod comment;
mod post;
mod user;

pub use comment::{
    Comment, CommentChanges, CommentStatistics, DEFAULT_AUTHOR_NAME, ModerationAction,
};
pub use post::{
    BlogPost, MAX_TITLE_LEN, PostChanges, PostStatistics, PostSummary, PostWithComments,
};
pub use user::{User, normalize_email, validate_password_strength, validate_username};
