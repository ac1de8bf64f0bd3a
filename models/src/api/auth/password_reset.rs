use http::Method;
use serde::{Deserialize, Serialize};

use crate::{
	api::{api_path, MessageResponse},
	prelude::*,
};

api_path!(
	/// Route to request a one-time password for a password reset.
	PasswordResetPath => "/auth/password-reset/"
);

api_path!(
	/// Route to set a new password using a one-time password.
	VerifyPasswordResetPath => "/auth/password-reset/verify/"
);

/// Asks the backend to email a one-time password to the account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasswordResetRequest {
	/// The email of the account
	pub email: String,
}

impl ApiEndpoint for PasswordResetRequest {
	const METHOD: Method = Method::POST;
	const IS_PROTECTED: bool = false;

	type RequestPath = PasswordResetPath;
	type RequestQuery = ();
	type RequestBody = Self;
	type ResponseBody = MessageResponse;
}

/// Sets a new password, proving ownership of the account with the one-time
/// password that was emailed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerifyPasswordResetRequest {
	/// The email of the account
	pub email: String,
	/// The six digit one-time password
	pub otp: String,
	/// The password to switch to
	pub new_password: String,
}

impl ApiEndpoint for VerifyPasswordResetRequest {
	const METHOD: Method = Method::POST;
	const IS_PROTECTED: bool = false;

	type RequestPath = VerifyPasswordResetPath;
	type RequestQuery = ();
	type RequestBody = Self;
	type ResponseBody = MessageResponse;
}

#[cfg(test)]
mod test {
	use serde_test::{assert_tokens, Token};

	use super::*;

	#[test]
	fn paths() {
		assert_eq!(PasswordResetPath.to_string(), "/auth/password-reset/");
		assert_eq!(
			VerifyPasswordResetPath.to_string(),
			"/auth/password-reset/verify/"
		);
	}

	#[test]
	fn assert_verify_request_types() {
		assert_tokens(
			&VerifyPasswordResetRequest {
				email: "a@x.com".to_string(),
				otp: "123456".to_string(),
				new_password: "n".to_string(),
			},
			&[
				Token::Struct {
					name: "VerifyPasswordResetRequest",
					len: 3,
				},
				Token::Str("email"),
				Token::Str("a@x.com"),
				Token::Str("otp"),
				Token::Str("123456"),
				Token::Str("new_password"),
				Token::Str("n"),
				Token::StructEnd,
			],
		);
	}
}
