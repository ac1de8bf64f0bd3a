use http::Method;
use serde::{Deserialize, Serialize};

use crate::{api::api_path, prelude::*};

api_path!(
	/// Route to list every account. Only superadmins may call it.
	ListUsersPath => "/auth/users/"
);

/// Lists every account, with their roles and permissions.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListUsersRequest;

impl ApiEndpoint for ListUsersRequest {
	const METHOD: Method = Method::GET;
	const IS_PROTECTED: bool = true;

	type RequestPath = ListUsersPath;
	type RequestQuery = ();
	type RequestBody = ();
	type ResponseBody = Vec<User>;
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn parses_user_list() {
		let users: <ListUsersRequest as ApiEndpoint>::ResponseBody =
			serde_json::from_value(serde_json::json!([
				{
					"id": "0b0c3bf6-1c4b-4d6c-9a44-6f1d0ab1d2a1",
					"username": "root",
					"email": "root@x.com",
					"role": "superadmin"
				},
				{
					"id": "1b0c3bf6-1c4b-4d6c-9a44-6f1d0ab1d2a1",
					"username": "bob",
					"email": "bob@x.com",
					"role": "user",
					"permissions": { "orders": { "view": true } }
				}
			]))
			.unwrap();

		assert_eq!(users.len(), 2);
		assert!(users[0].is_super_admin());
		assert!(users[1].permissions.resolve("orders").view);
		assert!(!users[1].permissions.resolve("orders").edit);
	}
}
