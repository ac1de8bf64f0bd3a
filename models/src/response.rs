use std::fmt::{Display, Formatter};

use http::StatusCode;
use monostate::{MustBe, MustBeBool};
use serde::{Deserialize, Serialize};

use crate::ErrorType;

/// The message used when the backend gives no usable explanation
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

/// This struct represents an error response from the API, or an error that was
/// raised locally before a request was made. It contains the status code and
/// the body of the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorResponse {
	/// The status code of the error response. Ideally in the 4xx or 5xx range.
	pub status_code: StatusCode,
	/// The normalized body of the error response.
	pub body: ApiErrorResponseBody,
}

impl ApiErrorResponse {
	/// Creates a new [`ApiErrorResponse`] with the given [`ErrorType`], using
	/// the default status code and message.
	pub fn error(error: ErrorType) -> Self {
		Self {
			status_code: error.default_status_code(),
			body: ApiErrorResponseBody {
				success: MustBe!(false),
				message: error.message().into(),
				error,
			},
		}
	}

	/// Creates a new [`ApiErrorResponse`] with the given [`ErrorType`] and the
	/// given message, using the default status code.
	pub fn error_with_message(error: ErrorType, message: impl Into<String>) -> Self {
		Self {
			status_code: error.default_status_code(),
			body: ApiErrorResponseBody {
				success: MustBe!(false),
				error,
				message: message.into(),
			},
		}
	}

	/// Creates a new [`ApiErrorResponse`] for input that was rejected before
	/// any request was made.
	pub fn validation(message: impl Into<String>) -> Self {
		Self::error_with_message(ErrorType::ValidationFailed, message)
	}

	/// Creates a new [`ApiErrorResponse`] for a request that never got a
	/// response.
	pub fn network_error() -> Self {
		Self::error(ErrorType::NetworkError)
	}

	/// Creates a new [`ApiErrorResponse`] with the given message as an internal
	/// server error.
	pub fn internal_error(message: impl Into<String>) -> Self {
		let message = message.into();
		Self::error_with_message(ErrorType::server_error(&message), message)
	}

	/// Builds the error for a non-2xx response. The message is taken from the
	/// `detail` field of the body, then the `error` field, and falls back to a
	/// generic message when neither is present or the body is not JSON.
	pub fn from_backend(status_code: StatusCode, body: &[u8]) -> Self {
		let message = serde_json::from_slice::<BackendErrorBody>(body)
			.ok()
			.and_then(BackendErrorBody::into_message)
			.unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
		Self {
			status_code,
			body: ApiErrorResponseBody {
				success: MustBe!(false),
				error: ErrorType::from_status_code(status_code),
				message,
			},
		}
	}

	/// The [`ErrorType`] of this error
	pub fn error_type(&self) -> &ErrorType {
		&self.body.error
	}

	/// The user-facing message of this error
	pub fn message(&self) -> &str {
		&self.body.message
	}
}

impl Display for ApiErrorResponse {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.body.message)
	}
}

impl std::error::Error for ApiErrorResponse {}

/// The JSON body of an error. Serializes as
/// `{"success": false, "error": "<message>", "code": "<error type>"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiErrorResponseBody {
	/// Whether the request was successful or not. This is always false.
	pub success: MustBe!(false),
	/// A user-friendly message describing the error.
	#[serde(rename = "error")]
	pub message: String,
	/// The error type of the response.
	#[serde(rename = "code")]
	pub error: ErrorType,
}

/// The JSON body of a successful response, as handed to the presentation
/// layer. Serializes as `{"success": true, "data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiSuccessResponseBody<T> {
	/// Whether the request was successful or not. This is always true.
	pub success: MustBeBool<true>,
	/// The data returned by the backend.
	pub data: T,
}

impl<T> ApiSuccessResponseBody<T> {
	/// Wraps the given data in a success body
	pub fn new(data: T) -> Self {
		Self {
			success: MustBe!(true),
			data,
		}
	}
}

/// The normalized outcome of a backend call: either `{success: true, data}` or
/// `{success: false, error}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ApiResponseBody<T> {
	/// Success response, with the given body.
	Success(ApiSuccessResponseBody<T>),
	/// Error response
	Error(ApiErrorResponseBody),
}

impl<T> From<Result<T, ApiErrorResponse>> for ApiResponseBody<T> {
	fn from(result: Result<T, ApiErrorResponse>) -> Self {
		match result {
			Ok(data) => Self::Success(ApiSuccessResponseBody::new(data)),
			Err(error) => Self::Error(error.body),
		}
	}
}

/// The shape of error bodies sent by the backend. Validation failures may put
/// arbitrary JSON under `error`, so it is kept as a raw value.
#[derive(Debug, Clone, Default, Deserialize)]
struct BackendErrorBody {
	/// Set by the framework for authentication and permission failures
	#[serde(default)]
	detail: Option<String>,
	/// Set by handlers for their own failures
	#[serde(default)]
	error: Option<serde_json::Value>,
}

impl BackendErrorBody {
	/// Picks the message to show to the user
	fn into_message(self) -> Option<String> {
		if let Some(detail) = self.detail.filter(|detail| !detail.is_empty()) {
			return Some(detail);
		}
		match self.error? {
			serde_json::Value::Null => None,
			serde_json::Value::String(message) if message.is_empty() => None,
			serde_json::Value::String(message) => Some(message),
			other => Some(other.to_string()),
		}
	}
}

#[cfg(test)]
mod test {
	use http::StatusCode;
	use serde_test::{assert_ser_tokens, Token};

	use super::*;

	#[test]
	fn detail_takes_precedence() {
		let error = ApiErrorResponse::from_backend(
			StatusCode::UNAUTHORIZED,
			br#"{"detail": "No active account found", "error": "ignored"}"#,
		);
		assert_eq!(error.message(), "No active account found");
		assert_eq!(error.error_type(), &ErrorType::AuthorizationTokenInvalid);
		assert_eq!(error.status_code, StatusCode::UNAUTHORIZED);
	}

	#[test]
	fn error_field_is_used_without_detail() {
		let error = ApiErrorResponse::from_backend(
			StatusCode::FORBIDDEN,
			br#"{"error": "Only super admins can delete users."}"#,
		);
		assert_eq!(error.message(), "Only super admins can delete users.");
		assert_eq!(error.error_type(), &ErrorType::PermissionDenied);
	}

	#[test]
	fn generic_fallback() {
		let error = ApiErrorResponse::from_backend(StatusCode::BAD_REQUEST, br#"{"content": ["x"]}"#);
		assert_eq!(error.message(), GENERIC_ERROR_MESSAGE);
		assert_eq!(error.error_type(), &ErrorType::WrongParameters);

		let error = ApiErrorResponse::from_backend(StatusCode::BAD_GATEWAY, b"<html>");
		assert_eq!(error.message(), GENERIC_ERROR_MESSAGE);
	}

	#[test]
	fn assert_error_body_tokens() {
		assert_ser_tokens(
			&ApiErrorResponse::network_error().body,
			&[
				Token::Struct {
					name: "ApiErrorResponseBody",
					len: 3,
				},
				Token::Str("success"),
				Token::Bool(false),
				Token::Str("error"),
				Token::Str("Network error"),
				Token::Str("code"),
				Token::Str("networkError"),
				Token::StructEnd,
			],
		);
	}

	#[test]
	fn result_is_normalized() {
		let success: ApiResponseBody<u32> = Ok(4).into();
		assert_eq!(
			serde_json::to_value(&success).unwrap(),
			serde_json::json!({ "success": true, "data": 4 })
		);

		let failure: ApiResponseBody<u32> =
			Err(ApiErrorResponse::validation("New passwords do not match")).into();
		assert_eq!(
			serde_json::to_value(&failure).unwrap(),
			serde_json::json!({
				"success": false,
				"error": "New passwords do not match",
				"code": "validationFailed",
			})
		);
	}

	#[test]
	fn success_flag_picks_the_variant() {
		let success: ApiResponseBody<Vec<String>> =
			serde_json::from_str(r#"{"success": true, "data": ["orders"]}"#).unwrap();
		assert_eq!(
			success,
			ApiResponseBody::Success(ApiSuccessResponseBody::new(vec!["orders".to_string()]))
		);

		let failure: ApiResponseBody<Vec<String>> = serde_json::from_str(
			r#"{"success": false, "error": "Network error", "code": "networkError"}"#,
		)
		.unwrap();
		assert_eq!(
			failure,
			ApiResponseBody::Error(ApiErrorResponse::network_error().body)
		);

		assert!(
			serde_json::from_str::<ApiSuccessResponseBody<u32>>(r#"{"success": false, "data": 1}"#)
				.is_err()
		);
	}
}
