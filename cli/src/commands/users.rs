use clap::Subcommand;
use comfy_table::Table;

use crate::prelude::*;

/// The commands to manage accounts. Superadmins only.
#[derive(Debug, Clone, Subcommand)]
#[command(rename_all = "kebab-case")]
pub enum UserCommands {
	/// List accounts.
	#[command(alias = "ls")]
	List {
		/// Only show accounts whose email contains this text.
		#[arg(short, long, default_value = "")]
		search: String,
		/// Only show accounts with this role.
		#[arg(short, long)]
		role: Option<Role>,
	},
	/// Create a regular account with a generated password.
	Create {
		/// The email of the new account.
		email: String,
		/// The username of the new account. Derived from the email when
		/// missing.
		#[arg(short, long)]
		username: Option<String>,
		/// Email the generated password to the new user.
		#[arg(long)]
		send_email: bool,
	},
	/// Delete an account.
	#[command(alias = "rm")]
	Delete {
		/// The email of the account to delete.
		email: String,
	},
}

impl CommandExecutor for UserCommands {
	async fn execute(
		self,
		_: &GlobalArgs,
		context: &AppContext,
	) -> Result<CommandOutput, ApiErrorResponse> {
		require_login(context)?;
		let console = AdminConsole::new(context.session.clone(), PageCatalog::default());

		match self {
			Self::List { search, role } => {
				let users = console.list_users().await?;
				let stats = UserStats::from_users(&users);
				let users = filter_users(&users, &search, role);

				let mut table = Table::new();
				table.set_header(["Email", "Username", "Role", "Permissions", "Created At"]);
				for user in &users {
					table.add_row([
						user.email.clone(),
						user.username.clone(),
						user.role.to_string(),
						if user.access_policy().is_unrestricted() {
							"all".to_string()
						} else {
							user.permissions.count_active().to_string()
						},
						user.created_at.map(format_time).unwrap_or_default(),
					]);
				}

				CommandOutput::new(
					format!(
						"{} accounts: {} users, {} superadmins, {} active permissions\n{table}",
						stats.total, stats.users, stats.superadmins, stats.active_permissions
					),
					serde_json::json!({ "stats": stats, "users": users }),
				)
				.into_result()
			}
			Self::Create {
				email,
				username,
				send_email,
			} => {
				let created = console
					.create_user(&email, username.as_deref(), send_email)
					.await?;
				CommandOutput::new(
					format!(
						"Created {} ({}). Temporary password: {}",
						created.user.email, created.user.username, created.password
					),
					&created,
				)
				.into_result()
			}
			Self::Delete { email } => {
				let target = find_user(&console, &email).await?;
				let response = console.delete_user(&target).await?;
				CommandOutput::new(response.message.clone(), &response).into_result()
			}
		}
	}
}

/// Looks up an account by its email
pub(super) async fn find_user<T>(
	console: &AdminConsole<T>,
	email: &str,
) -> Result<User, ApiErrorResponse>
where
	T: Transport,
{
	console
		.list_users()
		.await?
		.into_iter()
		.find(|user| user.email.eq_ignore_ascii_case(email.trim()))
		.ok_or_else(|| {
			ApiErrorResponse::error_with_message(
				ErrorType::ResourceDoesNotExist,
				format!("No account uses the email `{email}`"),
			)
		})
}
