use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use self::{
	comments::CommentCommands,
	login::LoginArgs,
	password::PasswordCommands,
	permissions::PermissionCommands,
	profile::ProfileArgs,
	users::UserCommands,
};
use crate::prelude::*;

/// The commands to read and manage the comments of a page.
mod comments;
/// The command to get information about the current logged in user.
mod info;
/// The command to login.
mod login;
/// The command to logout.
mod logout;
/// The command to list the pages the user can access.
mod pages;
/// The commands to change or reset a password.
mod password;
/// The commands to read and change permissions.
mod permissions;
/// The command to change the profile of the user.
mod profile;
/// The commands to manage accounts.
mod users;

/// A list of all the arguments that can be passed to the CLI.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about)]
pub struct AppArgs {
	/// All global arguments that can be used across all commands.
	#[command(flatten)]
	pub global_args: GlobalArgs,
	/// A command that is called on the CLI.
	#[command(subcommand)]
	pub command: GlobalCommands,
}

/// A global list of all the arguments that can be passed to the CLI.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
	/// The output type of each command. Defaults to text.
	#[arg(short = 'o', long, global = true, default_value_t = OutputType::Text)]
	pub output: OutputType,
	/// The config file to read, instead of `config/pagegate`
	#[arg(short = 'c', long, global = true)]
	pub config: Option<PathBuf>,
	/// Print debug logs
	#[arg(short = 'v', long, global = true)]
	pub verbose: bool,
}

/// A list of all the commands that can be called on the CLI.
#[derive(Debug, Clone, Subcommand)]
#[command(rename_all = "kebab-case")]
pub enum GlobalCommands {
	/// Login with your email and password.
	#[command(alias = "signin", alias = "sign-in")]
	Login(LoginArgs),
	/// Logout and forget the stored session.
	Logout,
	/// Get information about the current logged in user.
	#[command(alias = "whoami")]
	Info,
	/// List the pages you can access, with your permissions on each.
	Pages,
	/// Read and manage the comments of a page.
	#[command(subcommand)]
	Comments(CommentCommands),
	/// Manage accounts. Superadmins only.
	#[command(subcommand)]
	Users(UserCommands),
	/// Read and change permissions.
	#[command(subcommand)]
	Permissions(PermissionCommands),
	/// Change or reset a password.
	#[command(subcommand)]
	Password(PasswordCommands),
	/// Change your username.
	Profile(ProfileArgs),
}

impl CommandExecutor for GlobalCommands {
	async fn execute(
		self,
		global_args: &GlobalArgs,
		context: &AppContext,
	) -> Result<CommandOutput, ApiErrorResponse> {
		match self {
			Self::Login(args) => login::execute(args, global_args, context).await,
			Self::Logout => logout::execute(global_args, context).await,
			Self::Info => info::execute(global_args, context).await,
			Self::Pages => pages::execute(global_args, context).await,
			Self::Comments(commands) => commands.execute(global_args, context).await,
			Self::Users(commands) => commands.execute(global_args, context).await,
			Self::Permissions(commands) => commands.execute(global_args, context).await,
			Self::Password(commands) => commands.execute(global_args, context).await,
			Self::Profile(args) => profile::execute(args, global_args, context).await,
		}
	}
}

#[cfg(test)]
mod test {
	use clap::{CommandFactory, Parser};

	use super::*;

	#[test]
	fn arguments_are_consistent() {
		AppArgs::command().debug_assert();
	}

	#[test]
	fn parses_global_flags_after_the_command() {
		let args =
			AppArgs::try_parse_from(["pagegate", "comments", "list", "--page", "orders", "-o", "json"])
				.unwrap();
		assert_eq!(args.global_args.output, OutputType::Json);
		assert!(matches!(
			args.command,
			GlobalCommands::Comments(CommentCommands::List { page: Some(ref page) }) if page == "orders"
		));
	}

	#[test]
	fn login_role_is_parsed() {
		let args = AppArgs::try_parse_from([
			"pagegate",
			"login",
			"--email",
			"root@x.com",
			"--password",
			"secret",
			"--as",
			"superadmin",
		])
		.unwrap();
		let GlobalCommands::Login(login) = args.command else {
			panic!("expected the login command");
		};
		assert_eq!(login.role, Some(Role::Superadmin));
	}
}
