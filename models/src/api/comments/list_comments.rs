use http::Method;
use serde::{Deserialize, Serialize};

use crate::{api::api_path, prelude::*};

api_path!(
	/// Route to list and post the comments of a page.
	CommentsPath => "/comments/"
);

/// Lists the comments of a page, newest first.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListCommentsRequest;

/// Selects the page whose comments are listed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListCommentsQuery {
	/// The id of the page
	pub page: String,
}

impl ApiEndpoint for ListCommentsRequest {
	const METHOD: Method = Method::GET;
	const IS_PROTECTED: bool = true;

	type RequestPath = CommentsPath;
	type RequestQuery = ListCommentsQuery;
	type RequestBody = ();
	type ResponseBody = Vec<Comment>;
}

#[cfg(test)]
mod test {
	use serde_test::{assert_tokens, Token};

	use super::*;

	#[test]
	fn assert_query_types() {
		assert_tokens(
			&ListCommentsQuery {
				page: "orders".to_string(),
			},
			&[
				Token::Struct {
					name: "ListCommentsQuery",
					len: 1,
				},
				Token::Str("page"),
				Token::Str("orders"),
				Token::StructEnd,
			],
		);
	}
}
