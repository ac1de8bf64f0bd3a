use clap::Subcommand;

use crate::prelude::*;

/// The commands to change or reset a password.
#[derive(Debug, Clone, Subcommand)]
#[command(rename_all = "kebab-case")]
pub enum PasswordCommands {
	/// Change the password of the logged in user.
	Change {
		/// The current password.
		#[arg(long)]
		old: String,
		/// The new password.
		#[arg(long)]
		new: String,
		/// The new password, again.
		#[arg(long)]
		confirm: String,
	},
	/// Email a one-time code to reset a forgotten password.
	Reset {
		/// The email of the account.
		email: String,
	},
	/// Set a new password with the code that was emailed.
	Verify {
		/// The email of the account.
		email: String,
		/// The six digit code.
		#[arg(long)]
		otp: String,
		/// The new password.
		#[arg(long)]
		new: String,
		/// The new password, again.
		#[arg(long)]
		confirm: String,
	},
}

impl CommandExecutor for PasswordCommands {
	async fn execute(
		self,
		_: &GlobalArgs,
		context: &AppContext,
	) -> Result<CommandOutput, ApiErrorResponse> {
		let response = match self {
			Self::Change { old, new, confirm } => {
				require_login(context)?;
				context.session.change_password(&old, &new, &confirm).await?
			}
			Self::Reset { email } => context.session.request_password_reset(&email).await?,
			Self::Verify {
				email,
				otp,
				new,
				confirm,
			} => {
				context
					.session
					.verify_password_reset(&email, &otp, &new, &confirm)
					.await?
			}
		};

		CommandOutput::new(response.message.clone(), &response).into_result()
	}
}
