use crate::prelude::*;

/// A command that lists the pages the user can access.
pub(super) async fn execute(
	_: &GlobalArgs,
	context: &AppContext,
) -> Result<CommandOutput, ApiErrorResponse> {
	require_login(context)?;
	let dashboard = Dashboard::new(context.session.clone(), PageCatalog::default())?;
	let navigation = dashboard.refresh_access().await?;

	if navigation.is_no_access() {
		return CommandOutput::new(
			"You do not have access to any page yet. Ask a superadmin to grant you access.",
			&navigation,
		)
		.into_result();
	}

	let table = permission_table(&navigation.pages, &dashboard.policy());

	CommandOutput::new(table.to_string(), &navigation).into_result()
}
