#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! A command line console for the page permission admin backend. Regular
//! users browse the pages they were granted and manage comments on them;
//! superadmins also manage accounts and their permissions.

use std::sync::Arc;

use clap::Parser;
use tracing::{Dispatch, Level};
use tracing_subscriber::{
	filter::LevelFilter,
	fmt::{format::FmtSpan, Layer as FmtLayer},
	layer::SubscriberExt,
	prelude::*,
};

use crate::prelude::*;

/// All items related to running the CLI goes here
mod app;
/// All the commands, arguments and the functionalities for it.
mod commands;
/// Utilities module for helper functions, structs, and enums.
mod utils;

/// A prelude that re-exports commonly used items.
pub mod prelude {
	pub use client::prelude::*;

	pub use crate::{
		app::{AppContext, CommandExecutor, CommandOutput, OutputType},
		commands::{AppArgs, GlobalArgs, GlobalCommands},
		utils::*,
	};
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let AppArgs {
		global_args,
		command,
	} = AppArgs::parse();

	let config = ClientConfig::load(global_args.config.as_deref())?;

	tracing::dispatcher::set_global_default(Dispatch::new(
		tracing_subscriber::registry().with(
			FmtLayer::new()
				.with_writer(std::io::stderr)
				.with_span_events(FmtSpan::NONE)
				.event_format(
					tracing_subscriber::fmt::format()
						.with_ansi(true)
						.with_file(false)
						.without_time()
						.compact(),
				)
				.with_filter(
					tracing_subscriber::filter::Targets::new()
						.with_target(env!("CARGO_PKG_NAME"), LevelFilter::TRACE)
						.with_target("client", LevelFilter::TRACE)
						.with_target("models", LevelFilter::TRACE),
				)
				.with_filter(LevelFilter::from_level(
					if global_args.verbose || config.environment == RunningEnvironment::Development {
						Level::DEBUG
					} else {
						Level::WARN
					},
				)),
		),
	))?;

	let store = Arc::new(FileStore::from_env(
		config
			.state_path
			.clone()
			.unwrap_or_else(utils::default_state_path),
	));
	let transport = HttpTransport::new(&config.api_base_url)?;
	let session = Arc::new(SessionController::new(
		transport,
		store,
		config.clone().into(),
	));

	let mut logouts = session.subscribe();
	session.restore()?;
	if *logouts.borrow_and_update() == Some(LogoutReason::IdleTimeout) {
		eprintln!("Your session expired after a period of inactivity. Please login again.");
	}
	session.record_activity(InteractionKind::Command);

	let context = AppContext { config, session };
	let output = match command.execute(&global_args, &context).await {
		Ok(output) => output,
		Err(error) => {
			debug!("Command failed: {error:?}");
			anyhow::bail!("{}", error.message());
		}
	};

	println!(
		"{}",
		match global_args.output {
			OutputType::Text => output.text,
			OutputType::Json => serde_json::to_string(&output.json)?,
			OutputType::PrettyJson => serde_json::to_string_pretty(&output.json)?,
		}
	);

	Ok(())
}
