use http::Method;
use serde::{Deserialize, Serialize};

use crate::{
	api::{api_path, MessageResponse},
	prelude::*,
};

api_path!(
	/// Route to delete an account. Only superadmins may call it.
	DeleteUserPath => "/auth/users/delete/"
);

/// Deletes an account. The backend refuses to delete superadmins and the
/// caller's own account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteUserRequest {
	/// The id of the account to delete
	pub user_id: Uuid,
}

impl ApiEndpoint for DeleteUserRequest {
	const METHOD: Method = Method::DELETE;
	const IS_PROTECTED: bool = true;

	type RequestPath = DeleteUserPath;
	type RequestQuery = ();
	type RequestBody = Self;
	type ResponseBody = MessageResponse;
}
