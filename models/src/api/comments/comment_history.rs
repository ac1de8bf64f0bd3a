use std::fmt::{self, Display, Formatter};

use http::Method;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Route to the revisions of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommentHistoryPath {
	/// The id of the comment
	pub comment_id: CommentId,
}

impl Display for CommentHistoryPath {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "/comments/history/{}/", self.comment_id)
	}
}

/// Lists every recorded change of a comment. Only superadmins may call it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentHistoryRequest;

impl ApiEndpoint for CommentHistoryRequest {
	const METHOD: Method = Method::GET;
	const IS_PROTECTED: bool = true;

	type RequestPath = CommentHistoryPath;
	type RequestQuery = ();
	type RequestBody = ();
	type ResponseBody = Vec<CommentRevision>;
}
