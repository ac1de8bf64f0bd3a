mod comment_history;
mod create_comment;
mod delete_comment;
mod list_comments;
mod update_comment;

use std::fmt::{self, Display, Formatter};

use crate::prelude::*;

pub use self::{
	comment_history::*,
	create_comment::*,
	delete_comment::*,
	list_comments::*,
	update_comment::*,
};

/// Route to a single comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommentPath {
	/// The id of the comment
	pub comment_id: CommentId,
}

impl Display for CommentPath {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "/comments/{}/", self.comment_id)
	}
}
