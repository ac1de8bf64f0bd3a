/// All authentication and account management endpoints
pub mod auth;
/// All comment related endpoints
pub mod comments;
/// All permission related endpoints
pub mod permissions;

use serde::{Deserialize, Serialize};

/// Declares a path without parameters. The path is rendered exactly as given,
/// trailing slash included.
macro_rules! api_path {
	($(#[$meta:meta])* $name:ident => $path:literal) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
		pub struct $name;

		impl ::std::fmt::Display for $name {
			fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
				f.write_str($path)
			}
		}
	};
}

pub(crate) use api_path;

/// The body the backend sends back for actions that only report a status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
	/// A user-facing description of what happened
	pub message: String,
}
