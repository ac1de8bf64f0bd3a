use http::Method;
use serde::{Deserialize, Serialize};

use super::CommentPath;
use crate::prelude::*;

/// Changes the content of a comment. Needs `edit` on the page. The backend
/// records the change as a revision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateCommentRequest {
	/// The new content
	pub content: String,
}

impl ApiEndpoint for UpdateCommentRequest {
	const METHOD: Method = Method::PUT;
	const IS_PROTECTED: bool = true;

	type RequestPath = CommentPath;
	type RequestQuery = ();
	type RequestBody = Self;
	type ResponseBody = Comment;
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn path() {
		assert_eq!(CommentPath { comment_id: 42 }.to_string(), "/comments/42/");
	}
}
