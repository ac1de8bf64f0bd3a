use std::sync::Arc;

use models::api::{
	auth::{
		DeleteUserPath,
		DeleteUserRequest,
		ListUsersPath,
		ListUsersRequest,
		RegisterUserPath,
		RegisterUserRequest,
	},
	comments::{CommentHistoryPath, CommentHistoryRequest},
	permissions::{UpdatePermissionsPath, UpdatePermissionsRequest, UpdatePermissionsResponse},
	MessageResponse,
};
use rand::{seq::SliceRandom, Rng};
use serde::Serialize;

use crate::prelude::*;

/// The characters generated passwords are made of
pub const PASSWORD_CHARSET: &[u8] =
	b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";

/// The length of generated passwords
pub const GENERATED_PASSWORD_LENGTH: usize = 12;

/// Counts shown at the top of the user list
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct UserStats {
	/// Every account
	pub total: usize,
	/// Accounts with the `user` role
	pub users: usize,
	/// Accounts with the `superadmin` role
	pub superadmins: usize,
	/// The number of granted actions over every regular account
	pub active_permissions: usize,
}

impl UserStats {
	/// Counts the given accounts
	pub fn from_users(users: &[User]) -> Self {
		users.iter().fold(Self::default(), |mut stats, user| {
			stats.total += 1;
			if user.is_super_admin() {
				stats.superadmins += 1;
			} else {
				stats.users += 1;
				stats.active_permissions += user.permissions.count_active();
			}
			stats
		})
	}
}

/// Keeps the accounts whose email contains `search` (ignoring case) and
/// whose role matches `role`, when given
pub fn filter_users(users: &[User], search: &str, role: Option<Role>) -> Vec<User> {
	let search = search.trim().to_lowercase();
	users
		.iter()
		.filter(|user| user.email.to_lowercase().contains(&search))
		.filter(|user| role.map_or(true, |role| user.role == role))
		.cloned()
		.collect()
}

/// Derives a username from the local part of an email, keeping only
/// lowercase letters and digits
pub fn username_from_email(email: &str) -> String {
	email
		.split('@')
		.next()
		.unwrap_or_default()
		.to_lowercase()
		.chars()
		.filter(|char| char.is_ascii_lowercase() || char.is_ascii_digit())
		.collect()
}

/// Generates a password for a new account
pub fn generate_password(rng: &mut impl Rng) -> String {
	(0..GENERATED_PASSWORD_LENGTH)
		.filter_map(|_| PASSWORD_CHARSET.choose(&mut *rng))
		.map(|byte| char::from(*byte))
		.collect()
}

/// A new account along with the password it was created with. The password
/// is only known at this point and has to be handed to the user.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CreatedUser {
	/// The new account
	pub user: User,
	/// The generated password
	pub password: String,
}

/// The user management operations of a superadmin. Every operation is checked
/// locally first; the backend has the final say.
pub struct AdminConsole<T> {
	/// The session of the superadmin
	session: Arc<SessionController<T>>,
	/// Every page of the application
	catalog: PageCatalog,
}

impl<T> AdminConsole<T>
where
	T: Transport,
{
	/// Creates the console for a session
	pub fn new(session: Arc<SessionController<T>>, catalog: PageCatalog) -> Self {
		Self { session, catalog }
	}

	/// Lists every account
	#[instrument(skip(self))]
	pub async fn list_users(&self) -> Result<Vec<User>, ApiErrorResponse> {
		self.require_super_admin()?;
		self.session
			.call(
				ApiRequest::<ListUsersRequest>::builder()
					.path(ListUsersPath)
					.query(())
					.body(())
					.build(),
			)
			.await
	}

	/// Creates a regular account with a generated password. Without a
	/// username, one is derived from the email.
	#[instrument(skip(self))]
	pub async fn create_user(
		&self,
		email: &str,
		username: Option<&str>,
		send_password_email: bool,
	) -> Result<CreatedUser, ApiErrorResponse> {
		self.require_super_admin()?;
		let email = email.trim();
		if email.is_empty() || !email.contains('@') {
			return Err(ApiErrorResponse::validation("A valid email is required"));
		}
		let username = username
			.map(str::trim)
			.filter(|username| !username.is_empty())
			.map(ToString::to_string)
			.unwrap_or_else(|| username_from_email(email));
		if username.is_empty() {
			return Err(ApiErrorResponse::validation("Username cannot be empty"));
		}
		let password = generate_password(&mut rand::thread_rng());

		let user = self
			.session
			.call(
				ApiRequest::<RegisterUserRequest>::builder()
					.path(RegisterUserPath)
					.query(())
					.body(RegisterUserRequest {
						username,
						email: email.to_string(),
						password: password.clone(),
						role: Role::User,
						send_password_email,
					})
					.build(),
			)
			.await?;
		info!("Created account `{}`", user.email);

		Ok(CreatedUser { user, password })
	}

	/// Deletes an account. Superadmin accounts and the caller's own account
	/// are refused before anything is sent.
	#[instrument(skip(self, target), fields(target = %target.id))]
	pub async fn delete_user(&self, target: &User) -> Result<MessageResponse, ApiErrorResponse> {
		let actor = self.require_super_admin()?;
		if target.id == actor.id {
			return Err(ApiErrorResponse::error_with_message(
				ErrorType::PermissionDenied,
				"You cannot delete your own account",
			));
		}
		if !actor.can_delete(target) {
			return Err(ApiErrorResponse::error_with_message(
				ErrorType::PermissionDenied,
				"Superadmin accounts cannot be deleted",
			));
		}

		self.session
			.call(
				ApiRequest::<DeleteUserRequest>::builder()
					.path(DeleteUserPath)
					.query(())
					.body(DeleteUserRequest { user_id: target.id })
					.build(),
			)
			.await
	}

	/// Replaces the permissions of an account. The matrix is filled out to
	/// cover every page and checked for unknown pages before it is sent.
	#[instrument(skip(self, target, permissions), fields(target = %target.id))]
	pub async fn update_permissions(
		&self,
		target: &User,
		permissions: &PermissionMatrix,
	) -> Result<UpdatePermissionsResponse, ApiErrorResponse> {
		let actor = self.require_super_admin()?;
		if !actor.can_edit_permissions_of(target) {
			return Err(ApiErrorResponse::error_with_message(
				ErrorType::PermissionDenied,
				"Superadmin permissions cannot be changed",
			));
		}
		permissions.validate(self.catalog)?;

		self.session
			.call(
				ApiRequest::<UpdatePermissionsRequest>::builder()
					.path(UpdatePermissionsPath)
					.query(())
					.body(UpdatePermissionsRequest {
						user_id: target.id,
						permissions: permissions.normalized(self.catalog),
					})
					.build(),
			)
			.await
	}

	/// Every recorded change of a comment
	#[instrument(skip(self))]
	pub async fn comment_history(
		&self,
		comment_id: CommentId,
	) -> Result<Vec<CommentRevision>, ApiErrorResponse> {
		self.require_super_admin()?;
		self.session
			.call(
				ApiRequest::<CommentHistoryRequest>::builder()
					.path(CommentHistoryPath { comment_id })
					.query(())
					.body(())
					.build(),
			)
			.await
	}

	/// Returns the logged in user if they are a superadmin
	fn require_super_admin(&self) -> Result<User, ApiErrorResponse> {
		let user = self
			.session
			.user()
			.ok_or_else(|| ApiErrorResponse::error(ErrorType::NotLoggedIn))?;
		if !user.is_super_admin() {
			return Err(ApiErrorResponse::error_with_message(
				ErrorType::PermissionDenied,
				"Only superadmins can manage users",
			));
		}
		Ok(user)
	}
}
