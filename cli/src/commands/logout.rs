use crate::prelude::*;

/// A command that ends the session and forgets the stored credentials.
pub(super) async fn execute(
	_: &GlobalArgs,
	context: &AppContext,
) -> Result<CommandOutput, ApiErrorResponse> {
	if !context.session.is_authenticated() {
		return CommandOutput::new(
			"You are already logged out.",
			serde_json::json!({ "loggedOut": true }),
		)
		.into_result();
	}

	context.session.logout();

	CommandOutput::new(
		"You have been logged out.",
		serde_json::json!({ "loggedOut": true }),
	)
	.into_result()
}
