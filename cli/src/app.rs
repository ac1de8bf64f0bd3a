use std::sync::Arc;

use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use strum::Display;

use crate::prelude::*;

/// The format a command prints its result in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum OutputType {
	/// Human readable text and tables
	#[default]
	Text,
	/// Compact JSON
	Json,
	/// Indented JSON
	PrettyJson,
}

/// The result of a command, in both of the formats it can be printed in
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
	/// The human readable result
	pub text: String,
	/// The machine readable result
	pub json: Value,
}

impl CommandOutput {
	/// Creates an output from its text and anything that serializes to JSON
	pub fn new(text: impl Into<String>, json: impl Serialize) -> Self {
		Self {
			text: text.into(),
			json: serde_json::to_value(json).unwrap_or_default(),
		}
	}

	/// Wraps the output in an `Ok`
	pub fn into_result(self) -> Result<Self, ApiErrorResponse> {
		Ok(self)
	}
}

/// Everything a command needs to run
pub struct AppContext {
	/// The configuration of the client
	pub config: ClientConfig,
	/// The session of the user running the command
	pub session: Arc<SessionController<HttpTransport>>,
}

/// Something that can be run from the command line
pub trait CommandExecutor {
	/// Runs the command
	async fn execute(
		self,
		global_args: &GlobalArgs,
		context: &AppContext,
	) -> Result<CommandOutput, ApiErrorResponse>;
}
