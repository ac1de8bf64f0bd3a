use std::{
	fmt::{Display, Formatter},
	path::{Path, PathBuf},
	time::Duration,
};

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// The prefix of the environment variables that override the configuration
pub const ENV_PREFIX: &str = "PAGEGATE";

/// The configuration of the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
	/// The base URL of the backend, without a trailing slash
	pub api_base_url: String,
	/// How long a session may stay without activity before it is ended
	pub idle_timeout_secs: u64,
	/// How often the idle watcher checks the session
	pub idle_check_interval_secs: u64,
	/// Where the session is stored between runs. When unset, a file in the
	/// user's config directory is used
	pub state_path: Option<PathBuf>,
	/// The environment the client is running in
	pub environment: RunningEnvironment,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			api_base_url: "http://localhost:8000/api".to_string(),
			idle_timeout_secs: 60 * 60,
			idle_check_interval_secs: 60,
			state_path: None,
			environment: RunningEnvironment::default(),
		}
	}
}

impl ClientConfig {
	/// Reads the configuration. Values are layered: the defaults, then the
	/// config file (if it exists), then the `PAGEGATE__*` environment
	/// variables, such as `PAGEGATE__API_BASE_URL`.
	#[instrument]
	pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
		trace!("Reading config data...");

		let builder = Config::builder();
		let builder = match path {
			Some(path) => builder.add_source(File::from(path).required(false)),
			None => builder.add_source(File::with_name("config/pagegate").required(false)),
		};

		builder
			.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
			.build()?
			.try_deserialize()
	}

	/// The idle timeout as a [`Duration`]
	pub fn idle_timeout(&self) -> Duration {
		Duration::from_secs(self.idle_timeout_secs)
	}

	/// The idle check interval as a [`Duration`]. Never zero.
	pub fn idle_check_interval(&self) -> Duration {
		Duration::from_secs(self.idle_check_interval_secs.max(1))
	}
}

/// The environment the client is running in. Development enables verbose
/// logging.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunningEnvironment {
	/// Local development
	Development,
	/// A production deployment
	#[default]
	Production,
}

impl Display for RunningEnvironment {
	fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
		write!(
			formatter,
			"{}",
			match self {
				RunningEnvironment::Development => "Development",
				RunningEnvironment::Production => "Production",
			}
		)
	}
}

#[cfg(test)]
mod test {
	use std::io::Write;

	use super::*;

	#[test]
	fn defaults_apply_without_a_file() {
		let dir = tempfile::tempdir().unwrap();
		let config = ClientConfig::load(Some(&dir.path().join("missing.json"))).unwrap();

		assert_eq!(config.api_base_url, "http://localhost:8000/api");
		assert_eq!(config.idle_timeout(), Duration::from_secs(3600));
		assert_eq!(config.idle_check_interval(), Duration::from_secs(60));
		assert_eq!(config.environment, RunningEnvironment::Production);
	}

	#[test]
	fn file_overrides_defaults() {
		let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
		write!(
			file,
			r#"{{ "api_base_url": "https://admin.example.com/api", "idle_timeout_secs": 900, "environment": "development" }}"#
		)
		.unwrap();

		let config = ClientConfig::load(Some(file.path())).unwrap();
		assert_eq!(config.api_base_url, "https://admin.example.com/api");
		assert_eq!(config.idle_timeout_secs, 900);
		assert_eq!(config.idle_check_interval_secs, 60);
		assert_eq!(config.environment, RunningEnvironment::Development);
	}

	#[test]
	fn environment_uses_a_double_underscore_after_the_prefix() {
		std::env::set_var("PAGEGATE__STATE_PATH", "/tmp/pagegate-state.json");
		let config = ClientConfig::load(Some(Path::new("missing.json"))).unwrap();
		std::env::remove_var("PAGEGATE__STATE_PATH");

		assert_eq!(
			config.state_path.as_deref(),
			Some(Path::new("/tmp/pagegate-state.json"))
		);
	}

	#[test]
	fn check_interval_is_never_zero() {
		let config = ClientConfig {
			idle_check_interval_secs: 0,
			..Default::default()
		};
		assert_eq!(config.idle_check_interval(), Duration::from_secs(1));
	}
}
