use clap::Args;

use crate::prelude::*;

/// The arguments that can be passed to the profile command.
#[derive(Debug, Clone, Args)]
pub struct ProfileArgs {
	/// The new username.
	#[arg(short, long)]
	pub username: String,
}

/// A command that changes the username of the logged in user.
pub(super) async fn execute(
	args: ProfileArgs,
	_: &GlobalArgs,
	context: &AppContext,
) -> Result<CommandOutput, ApiErrorResponse> {
	require_login(context)?;
	let user = context.session.update_profile(&args.username).await?;

	CommandOutput::new(format!("Your username is now {}.", user.username), &user).into_result()
}
