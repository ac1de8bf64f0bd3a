use std::future::Future;

use reqwest::{header, Client};
use serde_json::Value;
use url::Url;

use crate::prelude::*;

/// Something that can deliver a request to the backend and bring back its
/// response. The session owner decides which token, if any, is attached.
pub trait Transport: Send + Sync + 'static {
	/// Sends the request, attaching `token` as a bearer token when present.
	fn send<E>(
		&self,
		request: ApiRequest<E>,
		token: Option<String>,
	) -> impl Future<Output = Result<E::ResponseBody, ApiErrorResponse>> + Send
	where
		E: ApiEndpoint;
}

/// Sends requests to the backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
	/// The underlying HTTP client
	client: Client,
	/// The base URL every path is appended to, without a trailing slash
	base_url: String,
}

impl HttpTransport {
	/// Creates a transport for the backend at `base_url`
	pub fn new(base_url: &str) -> Result<Self, ApiErrorResponse> {
		Url::parse(base_url).map_err(|err| {
			ApiErrorResponse::internal_error(format!("invalid API base URL `{base_url}`: {err}"))
		})?;
		let client = Client::builder()
			.build()
			.map_err(|err| ApiErrorResponse::internal_error(err.to_string()))?;

		Ok(Self {
			client,
			base_url: base_url.trim_end_matches('/').to_string(),
		})
	}

	/// The full URL of a path. Paths are appended to the base URL rather than
	/// joined, so that a base URL with a path of its own (like `/api`) is kept.
	pub fn url_for(&self, path: &impl ApiPath) -> Result<Url, ApiErrorResponse> {
		Url::parse(&format!("{}{}", self.base_url, path))
			.map_err(|err| ApiErrorResponse::internal_error(err.to_string()))
	}
}

impl Transport for HttpTransport {
	#[instrument(skip_all, fields(method = %E::METHOD, path = %request.path))]
	async fn send<E>(
		&self,
		request: ApiRequest<E>,
		token: Option<String>,
	) -> Result<E::ResponseBody, ApiErrorResponse>
	where
		E: ApiEndpoint,
	{
		let ApiRequest { path, query, body } = request;
		let url = self.url_for(&path)?;
		let query = serde_json::to_value(&query)
			.map_err(|err| ApiErrorResponse::internal_error(err.to_string()))?;
		let body = serde_json::to_value(&body)
			.map_err(|err| ApiErrorResponse::internal_error(err.to_string()))?;

		let mut builder = self
			.client
			.request(E::METHOD, url)
			.header(header::ACCEPT, "application/json");
		if let Value::Object(query) = &query {
			builder = builder.query(query);
		}
		if !body.is_null() {
			builder = builder.json(&body);
		}
		if let Some(token) = token {
			builder = builder.bearer_auth(token);
		}

		let response = builder.send().await.map_err(|err| {
			warn!("Request could not be delivered: {err}");
			ApiErrorResponse::network_error()
		})?;

		let status_code = response.status();
		let bytes = response.bytes().await.map_err(|err| {
			warn!("Response body could not be read: {err}");
			ApiErrorResponse::network_error()
		})?;

		if !status_code.is_success() {
			debug!("Backend responded with {status_code}");
			return Err(ApiErrorResponse::from_backend(status_code, &bytes));
		}

		parse_body(&bytes)
	}
}

/// Parses a successful response body. An empty body is read as `null`, so that
/// endpoints without a response can use `()`.
pub(crate) fn parse_body<T>(bytes: &[u8]) -> Result<T, ApiErrorResponse>
where
	T: serde::de::DeserializeOwned,
{
	let result = if bytes.iter().all(u8::is_ascii_whitespace) {
		serde_json::from_value(Value::Null)
	} else {
		serde_json::from_slice(bytes)
	};
	result.map_err(|err| {
		error!("Unable to parse response body: {err}");
		ApiErrorResponse::internal_error(err.to_string())
	})
}

#[cfg(test)]
pub(crate) mod mock {
	use std::{collections::VecDeque, sync::Arc};

	use http::Method;
	use parking_lot::Mutex;
	use serde::Serialize;
	use serde_json::Value;

	use super::Transport;
	use crate::prelude::*;

	/// A request as seen by the [`MockTransport`]
	#[derive(Debug, Clone, PartialEq)]
	pub struct RecordedCall {
		/// The method of the request
		pub method: Method,
		/// The rendered path of the request
		pub path: String,
		/// The query, as JSON
		pub query: Value,
		/// The body, as JSON
		pub body: Value,
		/// The bearer token that was attached
		pub token: Option<String>,
	}

	/// The state shared between clones of a [`MockTransport`]
	#[derive(Debug, Default)]
	struct MockState {
		/// Scripted responses, handed out in order
		responses: VecDeque<Result<Value, ApiErrorResponse>>,
		/// Every request received so far
		calls: Vec<RecordedCall>,
	}

	/// A transport that answers with scripted responses and records every
	/// request. Running out of responses is reported as a network error.
	#[derive(Debug, Clone, Default)]
	pub struct MockTransport {
		/// The shared state
		state: Arc<Mutex<MockState>>,
	}

	impl MockTransport {
		/// Queues a successful response
		pub fn respond(&self, body: impl Serialize) -> &Self {
			let body = serde_json::to_value(body).unwrap();
			self.state.lock().responses.push_back(Ok(body));
			self
		}

		/// Queues a failed response
		pub fn fail(&self, error: ApiErrorResponse) -> &Self {
			self.state.lock().responses.push_back(Err(error));
			self
		}

		/// Every request received so far
		pub fn calls(&self) -> Vec<RecordedCall> {
			self.state.lock().calls.clone()
		}

		/// The number of requests received so far
		pub fn call_count(&self) -> usize {
			self.state.lock().calls.len()
		}
	}

	impl Transport for MockTransport {
		async fn send<E>(
			&self,
			request: ApiRequest<E>,
			token: Option<String>,
		) -> Result<E::ResponseBody, ApiErrorResponse>
		where
			E: ApiEndpoint,
		{
			let response = {
				let mut state = self.state.lock();
				state.calls.push(RecordedCall {
					method: E::METHOD,
					path: request.path.to_string(),
					query: serde_json::to_value(&request.query).unwrap(),
					body: serde_json::to_value(&request.body).unwrap(),
					token,
				});
				state.responses.pop_front()
			};

			match response {
				Some(Ok(value)) => serde_json::from_value(value)
					.map_err(|err| ApiErrorResponse::internal_error(err.to_string())),
				Some(Err(error)) => Err(error),
				None => Err(ApiErrorResponse::network_error()),
			}
		}
	}
}

#[cfg(test)]
mod test {
	use models::api::{auth::LoginPath, comments::CommentPath};

	use super::*;

	#[test]
	fn paths_are_appended_to_the_base_url() {
		let transport = HttpTransport::new("http://localhost:8000/api/").unwrap();
		assert_eq!(
			transport.url_for(&LoginPath).unwrap().as_str(),
			"http://localhost:8000/api/auth/login/"
		);
		assert_eq!(
			transport
				.url_for(&CommentPath { comment_id: 9 })
				.unwrap()
				.as_str(),
			"http://localhost:8000/api/comments/9/"
		);
	}

	#[test]
	fn invalid_base_url_is_rejected() {
		assert!(HttpTransport::new("not a url").is_err());
	}

	#[test]
	fn empty_body_parses_as_unit() {
		parse_body::<()>(b"").unwrap();
		parse_body::<()>(b"  \n").unwrap();
		assert_eq!(parse_body::<Vec<u32>>(b"[1,2]").unwrap(), vec![1, 2]);
		assert_eq!(
			*parse_body::<Vec<u32>>(b"{").unwrap_err().error_type(),
			ErrorType::server_error("")
		);
	}
}
