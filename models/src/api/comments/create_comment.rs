use http::Method;
use serde::{Deserialize, Serialize};

use super::CommentsPath;
use crate::prelude::*;

/// Posts a comment on a page. Needs `create` on the page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateCommentRequest {
	/// The id of the page
	pub page: String,
	/// The content of the comment
	pub content: String,
}

impl ApiEndpoint for CreateCommentRequest {
	const METHOD: Method = Method::POST;
	const IS_PROTECTED: bool = true;

	type RequestPath = CommentsPath;
	type RequestQuery = ();
	type RequestBody = Self;
	type ResponseBody = Comment;
}

#[cfg(test)]
mod test {
	use serde_test::{assert_tokens, Token};

	use super::*;

	#[test]
	fn assert_request_types() {
		assert_tokens(
			&CreateCommentRequest {
				page: "products".to_string(),
				content: "Restock soon".to_string(),
			},
			&[
				Token::Struct {
					name: "CreateCommentRequest",
					len: 2,
				},
				Token::Str("page"),
				Token::Str("products"),
				Token::Str("content"),
				Token::Str("Restock soon"),
				Token::StructEnd,
			],
		);
	}
}
