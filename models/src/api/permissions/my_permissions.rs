use http::Method;
use serde::{Deserialize, Serialize};

use crate::{api::api_path, prelude::*};

api_path!(
	/// Route to get the permissions of the logged in user.
	MyPermissionsPath => "/permissions/my-permissions/"
);

/// Gets the permission matrix of the logged in user. For superadmins the
/// backend reports every page as fully granted.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MyPermissionsRequest;

impl ApiEndpoint for MyPermissionsRequest {
	const METHOD: Method = Method::GET;
	const IS_PROTECTED: bool = true;

	type RequestPath = MyPermissionsPath;
	type RequestQuery = ();
	type RequestBody = ();
	type ResponseBody = PermissionMatrix;
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn parses_partial_matrix() {
		let matrix: PermissionMatrix = serde_json::from_value(serde_json::json!({
			"products": { "view": true, "edit": true },
			"orders": {}
		}))
		.unwrap();

		assert!(matrix.resolve("products").view);
		assert!(matrix.resolve("products").edit);
		assert!(!matrix.resolve("products").delete);
		assert_eq!(matrix.resolve("orders"), PermissionSet::NONE);
		assert_eq!(matrix.resolve("finance"), PermissionSet::NONE);
	}
}
