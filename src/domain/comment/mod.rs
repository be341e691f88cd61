mod comment_body;
mod identifier;
mod new_comment;
mod types;

pub use comment_body::CommentBody;
pub use identifier::{CheckinId, CommentId, UserId};
pub use new_comment::NewComment;
pub use types::*;
