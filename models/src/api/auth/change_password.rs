use http::Method;
use serde::{Deserialize, Serialize};

use crate::{
	api::{api_path, MessageResponse},
	prelude::*,
};

api_path!(
	/// Route to change the password of the logged in user.
	ChangePasswordPath => "/auth/change-password/"
);

/// Changes the password of the logged in user. The current password has to
/// be given again.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangePasswordRequest {
	/// The current password
	pub old_password: String,
	/// The password to switch to
	pub new_password: String,
}

impl ApiEndpoint for ChangePasswordRequest {
	const METHOD: Method = Method::POST;
	const IS_PROTECTED: bool = true;

	type RequestPath = ChangePasswordPath;
	type RequestQuery = ();
	type RequestBody = Self;
	type ResponseBody = MessageResponse;
}

#[cfg(test)]
mod test {
	use serde_test::{assert_tokens, Token};

	use super::*;

	#[test]
	fn assert_request_types() {
		assert_tokens(
			&ChangePasswordRequest {
				old_password: "old".to_string(),
				new_password: "new".to_string(),
			},
			&[
				Token::Struct {
					name: "ChangePasswordRequest",
					len: 2,
				},
				Token::Str("old_password"),
				Token::Str("old"),
				Token::Str("new_password"),
				Token::Str("new"),
				Token::StructEnd,
			],
		);
	}

	#[test]
	fn assert_response_types() {
		assert_tokens(
			&MessageResponse {
				message: "Password changed".to_string(),
			},
			&[
				Token::Struct {
					name: "MessageResponse",
					len: 1,
				},
				Token::Str("message"),
				Token::Str("Password changed"),
				Token::StructEnd,
			],
		);
	}
}
