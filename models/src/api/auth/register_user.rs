use http::Method;
use serde::{Deserialize, Serialize};

use crate::{api::api_path, prelude::*};

api_path!(
	/// Route to create a new account. Only superadmins may call it.
	RegisterUserPath => "/auth/register/"
);

/// Creates a new account. The backend can email the generated password to
/// the new user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterUserRequest {
	/// The username of the new account
	pub username: String,
	/// The email of the new account
	pub email: String,
	/// The initial password of the new account
	pub password: String,
	/// The role of the new account
	#[serde(default)]
	pub role: Role,
	/// Whether the backend should email the password to the new user
	#[serde(default)]
	pub send_password_email: bool,
}

impl ApiEndpoint for RegisterUserRequest {
	const METHOD: Method = Method::POST;
	const IS_PROTECTED: bool = true;

	type RequestPath = RegisterUserPath;
	type RequestQuery = ();
	type RequestBody = Self;
	type ResponseBody = User;
}

#[cfg(test)]
mod test {
	use serde_test::{assert_tokens, Token};

	use super::*;

	#[test]
	fn assert_request_types() {
		assert_tokens(
			&RegisterUserRequest {
				username: "bob".to_string(),
				email: "bob@x.com".to_string(),
				password: "Secr3t!pass1".to_string(),
				role: Role::User,
				send_password_email: true,
			},
			&[
				Token::Struct {
					name: "RegisterUserRequest",
					len: 5,
				},
				Token::Str("username"),
				Token::Str("bob"),
				Token::Str("email"),
				Token::Str("bob@x.com"),
				Token::Str("password"),
				Token::Str("Secr3t!pass1"),
				Token::Str("role"),
				Token::UnitVariant {
					name: "Role",
					variant: "user",
				},
				Token::Str("send_password_email"),
				Token::Bool(true),
				Token::StructEnd,
			],
		);
	}
}
