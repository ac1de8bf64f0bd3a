use std::{
	io::ErrorKind,
	path::{Path, PathBuf},
};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::prelude::*;

/// The environment variable that overrides where the session is stored
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

/// The session as it is kept between runs
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(untagged)]
pub enum StoredSession {
	/// A user is logged in
	LoggedIn {
		/// The access token of the session
		access_token: String,
		/// The refresh token of the session
		refresh_token: String,
		/// The logged in user
		user: User,
		/// The last time the user did something
		#[serde(with = "time::serde::rfc3339")]
		last_activity: OffsetDateTime,
	},
	/// Nobody is logged in
	#[default]
	LoggedOut,
}

impl StoredSession {
	/// Returns true if the user is logged in, false otherwise.
	pub fn is_logged_in(&self) -> bool {
		matches!(self, Self::LoggedIn { .. })
	}

	/// Returns true if the user is logged out, false otherwise.
	pub fn is_logged_out(&self) -> bool {
		matches!(self, Self::LoggedOut)
	}
}

/// The errors that can happen while reading or writing the stored session
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
	/// The storage could not be read or written
	#[error("unable to access the session store: {0}")]
	Io(#[from] std::io::Error),
	/// The stored data is not a valid session
	#[error("unable to parse the stored session: {0}")]
	Serialization(#[from] serde_json::Error),
}

/// A place where the session is kept between runs. Clearing the store is the
/// same as storing a logged out session.
pub trait SessionStore: Send + Sync + 'static {
	/// Reads the stored session. A store that was never written to holds a
	/// logged out session.
	fn load(&self) -> Result<StoredSession, StorageError>;

	/// Replaces the stored session
	fn save(&self, session: &StoredSession) -> Result<(), StorageError>;

	/// Removes any stored credentials
	fn clear(&self) -> Result<(), StorageError> {
		self.save(&StoredSession::LoggedOut)
	}
}

/// Keeps the session as a JSON file
#[derive(Debug, Clone)]
pub struct FileStore {
	/// The path of the file
	path: PathBuf,
}

impl FileStore {
	/// Creates a store backed by the file at `path`. The file is only created
	/// on the first save.
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	/// Creates a store at the path given by the `CONFIG_PATH` environment
	/// variable, or at `default_path` if it is not set
	pub fn from_env(default_path: impl Into<PathBuf>) -> Self {
		std::env::var_os(CONFIG_PATH_ENV)
			.map(PathBuf::from)
			.map(Self::new)
			.unwrap_or_else(|| Self::new(default_path))
	}

	/// The path of the file
	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl SessionStore for FileStore {
	fn load(&self) -> Result<StoredSession, StorageError> {
		let data = match std::fs::read(&self.path) {
			Ok(data) => data,
			Err(err) if err.kind() == ErrorKind::NotFound => {
				trace!("No session stored at `{}`", self.path.display());
				return Ok(StoredSession::LoggedOut);
			}
			Err(err) => return Err(err.into()),
		};
		if data.iter().all(u8::is_ascii_whitespace) {
			return Ok(StoredSession::LoggedOut);
		}
		Ok(serde_json::from_slice(&data)?)
	}

	fn save(&self, session: &StoredSession) -> Result<(), StorageError> {
		if let Some(parent) = self.path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(&self.path, serde_json::to_vec_pretty(session)?)?;
		Ok(())
	}
}

/// Keeps the session in memory only
#[derive(Debug, Default)]
pub struct MemoryStore {
	/// The stored session
	session: Mutex<StoredSession>,
}

impl MemoryStore {
	/// Creates a store already holding `session`
	pub fn with_session(session: StoredSession) -> Self {
		Self {
			session: Mutex::new(session),
		}
	}
}

impl SessionStore for MemoryStore {
	fn load(&self) -> Result<StoredSession, StorageError> {
		Ok(self.session.lock().clone())
	}

	fn save(&self, session: &StoredSession) -> Result<(), StorageError> {
		*self.session.lock() = session.clone();
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use time::macros::datetime;

	use super::*;

	fn logged_in() -> StoredSession {
		StoredSession::LoggedIn {
			access_token: "access".to_string(),
			refresh_token: "refresh".to_string(),
			user: User {
				id: Uuid::nil(),
				username: "alice".to_string(),
				email: "a@x.com".to_string(),
				role: Role::User,
				permissions: PermissionMatrix::new(),
				created_at: None,
			},
			last_activity: datetime!(2024-05-01 10:00 UTC),
		}
	}

	#[test]
	fn file_store_round_trip() {
		let dir = tempfile::tempdir().unwrap();
		let store = FileStore::new(dir.path().join("nested").join("session.json"));

		assert_eq!(store.load().unwrap(), StoredSession::LoggedOut);

		store.save(&logged_in()).unwrap();
		assert_eq!(store.load().unwrap(), logged_in());

		store.clear().unwrap();
		assert!(store.load().unwrap().is_logged_out());
	}

	#[test]
	fn corrupt_file_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("session.json");
		std::fs::write(&path, b"{ not json").unwrap();

		assert!(matches!(
			FileStore::new(path).load(),
			Err(StorageError::Serialization(_))
		));
	}

	#[test]
	fn memory_store() {
		let store = MemoryStore::with_session(logged_in());
		assert!(store.load().unwrap().is_logged_in());
		store.clear().unwrap();
		assert!(store.load().unwrap().is_logged_out());
	}
}
