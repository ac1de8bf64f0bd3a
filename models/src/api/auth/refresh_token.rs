use http::Method;
use serde::{Deserialize, Serialize};

use crate::{api::api_path, prelude::*};

api_path!(
	/// Route to exchange a refresh token for a new access token.
	RefreshTokenPath => "/auth/token/refresh/"
);

/// Exchanges the refresh token of a session for a new access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshTokenRequest {
	/// The refresh token of the session
	pub refresh: String,
}

impl ApiEndpoint for RefreshTokenRequest {
	const METHOD: Method = Method::POST;
	const IS_PROTECTED: bool = false;

	type RequestPath = RefreshTokenPath;
	type RequestQuery = ();
	type RequestBody = Self;
	type ResponseBody = RefreshTokenResponse;
}

/// The new tokens of the session. The backend only rotates the refresh token
/// when it is configured to, so it may be absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshTokenResponse {
	/// The new access token
	pub access: String,
	/// The new refresh token, if it was rotated
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh: Option<String>,
}

#[cfg(test)]
mod test {
	use serde_test::{assert_tokens, Token};

	use super::*;

	#[test]
	fn assert_request_types() {
		assert_tokens(
			&RefreshTokenRequest {
				refresh: "r".to_string(),
			},
			&[
				Token::Struct {
					name: "RefreshTokenRequest",
					len: 1,
				},
				Token::Str("refresh"),
				Token::Str("r"),
				Token::StructEnd,
			],
		);
	}

	#[test]
	fn refresh_is_optional_in_response() {
		let response: RefreshTokenResponse =
			serde_json::from_value(serde_json::json!({ "access": "a" })).unwrap();
		assert_eq!(response.access, "a");
		assert_eq!(response.refresh, None);
	}
}
