use http::Method;
use serde::{Deserialize, Serialize};

use super::CommentPath;
use crate::prelude::*;

/// Removes a comment. Needs `delete` on the page.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteCommentRequest;

impl ApiEndpoint for DeleteCommentRequest {
	const METHOD: Method = Method::DELETE;
	const IS_PROTECTED: bool = true;

	type RequestPath = CommentPath;
	type RequestQuery = ();
	type RequestBody = ();
	type ResponseBody = ();
}
