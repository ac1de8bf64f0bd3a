use clap::Subcommand;

use super::users::find_user;
use crate::prelude::*;

/// The commands to read and change permissions.
#[derive(Debug, Clone, Subcommand)]
#[command(rename_all = "kebab-case")]
pub enum PermissionCommands {
	/// Show your own permissions.
	Mine,
	/// Show the permissions of an account. Superadmins only.
	Show {
		/// The email of the account.
		email: String,
	},
	/// Replace the permissions of an account on one page. Actions that are
	/// not given are revoked. Superadmins only.
	Set {
		/// The email of the account.
		email: String,
		/// The page to change.
		page: String,
		/// Allow the account to see the page.
		#[arg(long)]
		view: bool,
		/// Allow the account to post comments.
		#[arg(long)]
		create: bool,
		/// Allow the account to edit comments.
		#[arg(long)]
		edit: bool,
		/// Allow the account to delete comments.
		#[arg(long)]
		delete: bool,
	},
}

impl CommandExecutor for PermissionCommands {
	async fn execute(
		self,
		_: &GlobalArgs,
		context: &AppContext,
	) -> Result<CommandOutput, ApiErrorResponse> {
		require_login(context)?;
		let catalog = PageCatalog::default();

		match self {
			Self::Mine => {
				let policy = context.session.reload_access().await?;
				CommandOutput::new(
					permission_table(catalog.pages(), &policy).to_string(),
					&policy,
				)
				.into_result()
			}
			Self::Show { email } => {
				let console = AdminConsole::new(context.session.clone(), catalog);
				let target = find_user(&console, &email).await?;
				let policy = target.access_policy();
				CommandOutput::new(
					permission_table(catalog.pages(), &policy).to_string(),
					target.permissions.normalized(catalog),
				)
				.into_result()
			}
			Self::Set {
				email,
				page,
				view,
				create,
				edit,
				delete,
			} => {
				let console = AdminConsole::new(context.session.clone(), catalog);
				let target = find_user(&console, &email).await?;

				let mut permissions = target.permissions.normalized(catalog);
				permissions.insert(
					page,
					PermissionSet {
						view,
						create,
						edit,
						delete,
					},
				);
				let response = console.update_permissions(&target, &permissions).await?;

				CommandOutput::new(
					format!(
						"{}\n{}",
						if response.message.is_empty() {
							"Permissions updated"
						} else {
							response.message.as_str()
						},
						permission_table(
							catalog.pages(),
							&AccessPolicy::Restricted(response.permissions.clone())
						)
					),
					&response,
				)
				.into_result()
			}
		}
	}
}
