use typed_builder::TypedBuilder;

use crate::ApiEndpoint;

/// This struct represents a request to the API. It contains the path, query
/// and body of the request. This struct provides a builder API to make it
/// easier to construct requests.
///
/// The bearer token is not part of the request: it belongs to the session and
/// is attached by whoever owns the session when the endpoint is protected.
#[derive(Debug, Clone, TypedBuilder)]
pub struct ApiRequest<E>
where
	E: ApiEndpoint,
{
	/// The path of the request. This is the part of the URL after the base URL.
	pub path: E::RequestPath,
	/// The query of the request. This is the part of the URL after the `?`.
	pub query: E::RequestQuery,
	/// The JSON body of the request.
	pub body: E::RequestBody,
}
