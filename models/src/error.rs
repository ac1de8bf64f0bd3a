use std::{
	error::Error as StdError,
	fmt::{Display, Formatter},
	mem,
};

use http::StatusCode;
use serde::{de::Error, Deserialize, Serialize};

/// A list of all the possible errors that a backend call (or a check made
/// before one) can end in.
#[derive(Debug)]
pub enum ErrorType {
	/// The credentials or the token presented were rejected. Login and refresh
	/// failures end here, and so does any request made with an expired access
	/// token.
	AuthorizationTokenInvalid,
	/// There is no session to make an authenticated request with
	NotLoggedIn,
	/// The backend refused the action for the current user
	PermissionDenied,
	/// The resource that the user is trying to access does not exist
	ResourceDoesNotExist,
	/// The backend rejected the parameters sent with the request
	WrongParameters,
	/// The input was rejected locally, before any request was made
	ValidationFailed,
	/// A mutation on the same item is still waiting for the backend
	OperationInProgress,
	/// The backend could not be reached
	NetworkError,
	/// An error that does not fit any of the above. This should not happen
	/// unless there is a bug on either side
	InternalServerError(anyhow::Error),
}

impl ErrorType {
	/// Returns the status code that should be used for this error. Errors that
	/// never reach the network map onto the closest HTTP equivalent.
	pub fn default_status_code(&self) -> StatusCode {
		match self {
			Self::AuthorizationTokenInvalid => StatusCode::UNAUTHORIZED,
			Self::NotLoggedIn => StatusCode::UNAUTHORIZED,
			Self::PermissionDenied => StatusCode::FORBIDDEN,
			Self::ResourceDoesNotExist => StatusCode::NOT_FOUND,
			Self::WrongParameters => StatusCode::BAD_REQUEST,
			Self::ValidationFailed => StatusCode::BAD_REQUEST,
			Self::OperationInProgress => StatusCode::CONFLICT,
			Self::NetworkError => StatusCode::SERVICE_UNAVAILABLE,
			Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// Classifies a non-2xx status code returned by the backend
	pub fn from_status_code(status_code: StatusCode) -> Self {
		match status_code {
			StatusCode::UNAUTHORIZED => Self::AuthorizationTokenInvalid,
			StatusCode::FORBIDDEN => Self::PermissionDenied,
			StatusCode::NOT_FOUND => Self::ResourceDoesNotExist,
			status if status.is_client_error() => Self::WrongParameters,
			status => Self::server_error(format!("unexpected status code {status}")),
		}
	}

	/// Returns the message that should be used for this error. This is the
	/// message that is user-friendly and can be shown to the user
	pub fn message(&self) -> impl Into<String> {
		match self {
			Self::AuthorizationTokenInvalid => "Your session has expired. Please login again",
			Self::NotLoggedIn => "You are not logged in",
			Self::PermissionDenied => "You are not allowed to perform that action",
			Self::ResourceDoesNotExist => "The resource you are trying to access does not exist",
			Self::WrongParameters => "The parameters sent with that request is invalid",
			Self::ValidationFailed => "The input provided is invalid",
			Self::OperationInProgress => "Please wait for the previous action to finish",
			Self::NetworkError => "Network error",
			Self::InternalServerError(_) => "Something went wrong",
		}
	}

	/// Whether the error means the current credentials can no longer be used
	pub fn is_auth_error(&self) -> bool {
		matches!(self, Self::AuthorizationTokenInvalid | Self::NotLoggedIn)
	}

	/// Creates an [`ErrorType::InternalServerError`] with the given message
	pub fn server_error(message: impl Display) -> Self {
		Self::InternalServerError(anyhow::anyhow!(message.to_string()))
	}
}

impl PartialEq for ErrorType {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::InternalServerError(_), Self::InternalServerError(_)) => true,
			_ => mem::discriminant(self) == mem::discriminant(other),
		}
	}
}

impl Eq for ErrorType {}

impl<Error> From<Error> for ErrorType
where
	Error: StdError + Send + Sync + 'static,
{
	fn from(error: Error) -> Self {
		Self::InternalServerError(error.into())
	}
}

impl Clone for ErrorType {
	fn clone(&self) -> Self {
		match self {
			Self::AuthorizationTokenInvalid => Self::AuthorizationTokenInvalid,
			Self::NotLoggedIn => Self::NotLoggedIn,
			Self::PermissionDenied => Self::PermissionDenied,
			Self::ResourceDoesNotExist => Self::ResourceDoesNotExist,
			Self::WrongParameters => Self::WrongParameters,
			Self::ValidationFailed => Self::ValidationFailed,
			Self::OperationInProgress => Self::OperationInProgress,
			Self::NetworkError => Self::NetworkError,
			Self::InternalServerError(error) => Self::server_error(error),
		}
	}
}

impl Display for ErrorType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.message().into())
	}
}

impl Serialize for ErrorType {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_str(match self {
			Self::AuthorizationTokenInvalid => "authorizationTokenInvalid",
			Self::NotLoggedIn => "notLoggedIn",
			Self::PermissionDenied => "permissionDenied",
			Self::ResourceDoesNotExist => "resourceDoesNotExist",
			Self::WrongParameters => "wrongParameters",
			Self::ValidationFailed => "validationFailed",
			Self::OperationInProgress => "operationInProgress",
			Self::NetworkError => "networkError",
			Self::InternalServerError(_) => "internalServerError",
		})
	}
}

impl<'de> Deserialize<'de> for ErrorType {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		let string = String::deserialize(deserializer)?;
		Ok(match string.as_str() {
			"authorizationTokenInvalid" => Self::AuthorizationTokenInvalid,
			"notLoggedIn" => Self::NotLoggedIn,
			"permissionDenied" => Self::PermissionDenied,
			"resourceDoesNotExist" => Self::ResourceDoesNotExist,
			"wrongParameters" => Self::WrongParameters,
			"validationFailed" => Self::ValidationFailed,
			"operationInProgress" => Self::OperationInProgress,
			"networkError" => Self::NetworkError,
			"internalServerError" => Self::server_error("Internal Server Error"),
			unknown => return Err(Error::custom(format!("unknown variant: {unknown}"))),
		})
	}
}

#[cfg(test)]
mod test {
	use http::StatusCode;
	use serde_test::{assert_tokens, Token};

	use super::ErrorType;

	#[test]
	fn status_codes_are_classified() {
		assert_eq!(
			ErrorType::from_status_code(StatusCode::UNAUTHORIZED),
			ErrorType::AuthorizationTokenInvalid
		);
		assert_eq!(
			ErrorType::from_status_code(StatusCode::FORBIDDEN),
			ErrorType::PermissionDenied
		);
		assert_eq!(
			ErrorType::from_status_code(StatusCode::NOT_FOUND),
			ErrorType::ResourceDoesNotExist
		);
		assert_eq!(
			ErrorType::from_status_code(StatusCode::UNPROCESSABLE_ENTITY),
			ErrorType::WrongParameters
		);
		assert_eq!(
			ErrorType::from_status_code(StatusCode::BAD_GATEWAY),
			ErrorType::server_error("bad gateway")
		);
	}

	#[test]
	fn auth_errors() {
		assert!(ErrorType::AuthorizationTokenInvalid.is_auth_error());
		assert!(ErrorType::NotLoggedIn.is_auth_error());
		assert!(!ErrorType::PermissionDenied.is_auth_error());
	}

	#[test]
	fn assert_error_codes() {
		assert_tokens(
			&ErrorType::OperationInProgress,
			&[Token::Str("operationInProgress")],
		);
		assert_tokens(&ErrorType::NetworkError, &[Token::Str("networkError")]);
	}
}
