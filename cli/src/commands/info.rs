use comfy_table::Table;

use crate::prelude::*;

/// A command that gets information about the current logged in user.
pub(super) async fn execute(
	_: &GlobalArgs,
	context: &AppContext,
) -> Result<CommandOutput, ApiErrorResponse> {
	require_login(context)?;
	let pages = context
		.session
		.reload_access()
		.await?
		.accessible_pages(PageCatalog::default());
	let user = require_login(context)?;

	CommandOutput::new(
		Table::new()
			.set_header(["Data", "Value"])
			.add_row(["ID".to_owned(), user.id.to_string()])
			.add_row(["Username", user.display_name()])
			.add_row(["Email", user.email.as_str()])
			.add_row(["Role", user.role.to_string().as_str()])
			.add_row([
				"Created At",
				user.created_at
					.map(format_time)
					.unwrap_or_default()
					.as_str(),
			])
			.add_row([
				"Accessible Pages",
				pages
					.iter()
					.map(|page| page.name)
					.collect::<Vec<_>>()
					.join(", ")
					.as_str(),
			])
			.to_string(),
		&user,
	)
	.into_result()
}
