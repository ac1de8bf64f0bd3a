use std::path::PathBuf;

use comfy_table::Table;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::prelude::*;

/// The file the session is kept in when no other path is configured
pub fn default_state_path() -> PathBuf {
	std::env::var_os("XDG_CONFIG_HOME")
		.map(PathBuf::from)
		.or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
		.unwrap_or_else(|| PathBuf::from("."))
		.join("pagegate")
		.join("session.json")
}

/// Formats a timestamp for a table
pub fn format_time(time: OffsetDateTime) -> String {
	time.format(&Rfc3339).unwrap_or_else(|_| time.to_string())
}

/// Shows whether a flag is set
pub fn mark(granted: bool) -> &'static str {
	if granted {
		"yes"
	} else {
		"-"
	}
}

/// Fails with a message telling the user to login first
pub fn require_login(context: &AppContext) -> Result<User, ApiErrorResponse> {
	context.session.user().ok_or_else(|| {
		ApiErrorResponse::error_with_message(
			ErrorType::NotLoggedIn,
			"You are not logged in. Run `pagegate login` to sign in.",
		)
	})
}

/// A table with one row per page and one column per action
pub fn permission_table(pages: &[Page], policy: &AccessPolicy) -> Table {
	let mut table = Table::new();
	table.set_header(["Page", "Name", "View", "Create", "Edit", "Delete"]);
	for page in pages {
		let permissions = policy.permissions_for(page.id);
		table.add_row([
			page.id,
			page.name,
			mark(permissions.view),
			mark(permissions.create),
			mark(permissions.edit),
			mark(permissions.delete),
		]);
	}
	table
}

/// Joins the messages of notices, one per line
pub fn notice_text(notices: &[Notice]) -> String {
	notices
		.iter()
		.map(|notice| notice.message.as_str())
		.collect::<Vec<_>>()
		.join("\n")
}

#[cfg(test)]
mod test {
	use time::macros::datetime;

	use super::*;

	#[test]
	fn formats() {
		assert_eq!(format_time(datetime!(2024-05-01 10:20:30 UTC)), "2024-05-01T10:20:30Z");
		assert_eq!(mark(true), "yes");
		assert_eq!(mark(false), "-");
	}

	#[test]
	fn permission_table_covers_the_catalog() {
		let mut matrix = PermissionMatrix::new();
		matrix.insert("orders", PermissionSet::ALL);
		let table = permission_table(PAGES, &AccessPolicy::Restricted(matrix));
		assert_eq!(table.row_iter().count(), PAGES.len());
	}
}
