use http::Method;
use serde::{Deserialize, Serialize};

use crate::{api::api_path, prelude::*};

api_path!(
	/// Route to change the profile of the logged in user.
	UpdateProfilePath => "/auth/profile/"
);

/// Changes the username of the logged in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateProfileRequest {
	/// The new username
	pub username: String,
}

impl ApiEndpoint for UpdateProfileRequest {
	const METHOD: Method = Method::PUT;
	const IS_PROTECTED: bool = true;

	type RequestPath = UpdateProfilePath;
	type RequestQuery = ();
	type RequestBody = Self;
	type ResponseBody = UpdateProfileResponse;
}

/// The profile as stored after the change
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateProfileResponse {
	/// The username now stored
	pub username: String,
}

#[cfg(test)]
mod test {
	use serde_test::{assert_tokens, Token};

	use super::*;

	#[test]
	fn assert_request_types() {
		assert_tokens(
			&UpdateProfileRequest {
				username: "alice".to_string(),
			},
			&[
				Token::Struct {
					name: "UpdateProfileRequest",
					len: 1,
				},
				Token::Str("username"),
				Token::Str("alice"),
				Token::StructEnd,
			],
		);
	}
}
