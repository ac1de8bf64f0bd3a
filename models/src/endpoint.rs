use std::fmt::{Debug, Display};

use http::Method;
use serde::{de::DeserializeOwned, Serialize};

/// The path of an endpoint, relative to the API base URL. The [`Display`]
/// implementation renders the path with all of its parameters filled in,
/// including the trailing slash the backend expects.
pub trait ApiPath: Display + Debug + Clone + Send + Sync + 'static {}

impl<T> ApiPath for T where T: Display + Debug + Clone + Send + Sync + 'static {}

/// A trait that defines an API endpoint: its method, whether it needs a bearer
/// token, and the path, query, body and response types.
///
/// Ideally, this trait would contain all the information needed to make a call
/// to the endpoint, so that the transport never needs to know about specific
/// endpoints.
pub trait ApiEndpoint: Sized + Clone + Send + 'static {
	/// The HTTP method that should be used for this endpoint
	const METHOD: Method;
	/// Whether the request needs an `Authorization: Bearer` header
	const IS_PROTECTED: bool;

	/// The path that should be used for this endpoint
	type RequestPath: ApiPath;
	/// The query that should be used for this endpoint. Use `()` for none
	type RequestQuery: Serialize + Debug + Clone + Send + Sync + 'static;
	/// The JSON body of the request. Use `()` for none
	type RequestBody: Serialize + Debug + Clone + Send + Sync + 'static;
	/// The JSON body returned on success. Use `()` when the backend returns
	/// nothing
	type ResponseBody: DeserializeOwned + Serialize + Debug + Send + Sync + 'static;
}
