#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! The client-side core of the admin console. Owns the session lifecycle,
//! the dashboard navigation, the optimistic comment boards and the admin
//! operations, and talks to the backend through a [`transport::Transport`].

/// User management for superadmins.
pub mod admin;
/// Optimistic comment boards with rollback.
pub mod comments;
/// Layered configuration of the client.
pub mod config;
/// The navigation state of a logged in user.
pub mod dashboard;
/// User-facing success and error notices.
pub mod notice;
/// The session lifecycle and the account operations.
pub mod session;
/// Persistence of the session between runs.
pub mod storage;
/// The HTTP transport to the backend.
pub mod transport;

/// A prelude that re-exports commonly used items.
pub mod prelude {
	pub use models::prelude::*;
	pub use tracing::{debug, error, info, instrument, trace, warn};

	pub use crate::{
		admin::*,
		comments::*,
		config::*,
		dashboard::*,
		notice::*,
		session::*,
		storage::*,
		transport::*,
	};
}
