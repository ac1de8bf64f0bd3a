use clap::Args;

use crate::prelude::*;

/// The arguments that can be passed to the login command.
#[derive(Debug, Clone, Args)]
pub struct LoginArgs {
	/// The email address to login with.
	#[arg(short = 'e', long, alias = "username")]
	pub email: String,
	/// The password to login with.
	#[arg(short = 'p', long, env = "PAGEGATE_PASSWORD", hide_env_values = true)]
	pub password: String,
	/// Only accept an account with this role (`user` or `superadmin`).
	#[arg(long = "as")]
	pub role: Option<Role>,
}

/// A command that logs the user in and stores the session.
pub(super) async fn execute(
	args: LoginArgs,
	_: &GlobalArgs,
	context: &AppContext,
) -> Result<CommandOutput, ApiErrorResponse> {
	let LoginArgs {
		email,
		password,
		role,
	} = args;

	let user = context.session.login(&email, &password, role).await?;

	CommandOutput::new(
		format!("Logged in as {} ({}).", user.display_name(), user.role),
		&user,
	)
	.into_result()
}
