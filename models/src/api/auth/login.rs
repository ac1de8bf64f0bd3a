use http::Method;
use serde::{Deserialize, Serialize};

use crate::{api::api_path, prelude::*};

api_path!(
	/// Route to login and start a new session.
	LoginPath => "/auth/login/"
);

/// Logs a user in with their email and password. When a role is given, the
/// backend refuses accounts of any other role, so that each login portal only
/// admits the accounts it is meant for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
	/// The email of the user
	pub email: String,
	/// The password of the user
	pub password: String,
	/// The role the account is expected to have
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub role: Option<Role>,
}

impl ApiEndpoint for LoginRequest {
	const METHOD: Method = Method::POST;
	const IS_PROTECTED: bool = false;

	type RequestPath = LoginPath;
	type RequestQuery = ();
	type RequestBody = Self;
	type ResponseBody = LoginResponse;
}

/// The tokens of a new session, along with the logged in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
	/// The access token, sent as a bearer token on protected requests
	pub access: String,
	/// The refresh token, used to get a new access token once it expires
	pub refresh: String,
	/// The logged in user
	pub user: User,
}
