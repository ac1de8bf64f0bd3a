use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{access::AccessPolicy, permission::PermissionMatrix};

/// The role of a user account.
#[derive(
	Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
	/// A regular user, restricted by their permission matrix
	#[default]
	User,
	/// The administrator of the application. Bypasses the permission matrix
	/// entirely.
	Superadmin,
}

/// A user account as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
	/// The id of the user
	pub id: Uuid,
	/// The username of the user
	#[serde(default)]
	pub username: String,
	/// The email of the user, used to login
	pub email: String,
	/// The role of the user
	#[serde(default)]
	pub role: Role,
	/// The per-page permissions granted to the user. For superadmins, the
	/// backend reports every page as fully granted.
	#[serde(default)]
	pub permissions: PermissionMatrix,
	/// When the account was created
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
}

impl User {
	/// Returns true if the user is a superadmin.
	pub fn is_super_admin(&self) -> bool {
		self.role == Role::Superadmin
	}

	/// The access policy of the user. This is the one place where the role
	/// bypass is decided: superadmins are unrestricted whatever their matrix
	/// says, everyone else is restricted to their matrix.
	pub fn access_policy(&self) -> AccessPolicy {
		match self.role {
			Role::Superadmin => AccessPolicy::Unrestricted,
			Role::User => AccessPolicy::Restricted(self.permissions.clone()),
		}
	}

	/// Whether `self` may delete the `target` account. Superadmin accounts can
	/// never be deleted, and nobody can delete their own account. Only
	/// superadmins delete accounts at all.
	pub fn can_delete(&self, target: &User) -> bool {
		self.is_super_admin() && target.id != self.id && !target.is_super_admin()
	}

	/// Whether `self` may change the permissions of the `target` account.
	/// Superadmin accounts are immutable.
	pub fn can_edit_permissions_of(&self, target: &User) -> bool {
		self.is_super_admin() && !target.is_super_admin()
	}

	/// The name to show for this user
	pub fn display_name(&self) -> &str {
		if self.username.is_empty() {
			&self.email
		} else {
			&self.username
		}
	}
}
