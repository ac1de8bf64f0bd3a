#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! Shared types for the admin console: the page catalog, the per-page
//! permission model, the access resolver, users, comments, the error taxonomy
//! and the typed declarations of every backend endpoint.

/// Declarations of every endpoint exposed by the backend.
pub mod api;
/// Resolution of a permission policy into navigable pages.
pub mod access;
/// Comments attached to pages and their revision history.
pub mod comment;
/// The static catalog of pages.
pub mod page;
/// Per-page permission sets and matrices.
pub mod permission;
/// Users and their roles.
pub mod user;

/// A prelude that re-exports commonly used items.
pub mod prelude {
	pub use uuid::Uuid;

	pub use crate::{
		access::*,
		comment::*,
		page::*,
		permission::*,
		user::*,
		ApiEndpoint,
		ApiErrorResponse,
		ApiErrorResponseBody,
		ApiPath,
		ApiRequest,
		ApiResponseBody,
		ApiSuccessResponseBody,
		ErrorType,
	};
}

/// The trait describing a single backend endpoint.
mod endpoint;
/// The error taxonomy shared by every layer.
mod error;
/// A request to a single endpoint.
mod request;
/// Success and error envelopes.
mod response;

pub use self::{endpoint::*, error::*, request::*, response::*};
