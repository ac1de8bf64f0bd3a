use http::Method;
use serde::{Deserialize, Serialize};

use crate::{api::api_path, prelude::*};

api_path!(
	/// Route to replace the permissions of an account. Only superadmins may
	/// call it.
	UpdatePermissionsPath => "/permissions/update/"
);

/// Replaces the whole permission matrix of an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdatePermissionsRequest {
	/// The account to change
	pub user_id: Uuid,
	/// The matrix to store
	pub permissions: PermissionMatrix,
}

impl ApiEndpoint for UpdatePermissionsRequest {
	const METHOD: Method = Method::POST;
	const IS_PROTECTED: bool = true;

	type RequestPath = UpdatePermissionsPath;
	type RequestQuery = ();
	type RequestBody = Self;
	type ResponseBody = UpdatePermissionsResponse;
}

/// The matrix as stored by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdatePermissionsResponse {
	/// A user-facing description of what happened
	#[serde(default)]
	pub message: String,
	/// The account that changed
	pub user_id: Uuid,
	/// The matrix now stored
	pub permissions: PermissionMatrix,
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn request_body() {
		let mut permissions = PermissionMatrix::new();
		permissions.insert("orders", PermissionSet::NONE.with(Action::View));

		let body = serde_json::to_value(UpdatePermissionsRequest {
			user_id: Uuid::nil(),
			permissions,
		})
		.unwrap();

		assert_eq!(
			body,
			serde_json::json!({
				"user_id": "00000000-0000-0000-0000-000000000000",
				"permissions": {
					"orders": { "view": true, "create": false, "edit": false, "delete": false }
				}
			})
		);
	}
}
