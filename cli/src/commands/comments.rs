use clap::Subcommand;
use comfy_table::Table;

use crate::prelude::*;

/// The commands to read and manage the comments of a page.
#[derive(Debug, Clone, Subcommand)]
#[command(rename_all = "kebab-case")]
pub enum CommentCommands {
	/// List the comments of a page, newest first.
	#[command(alias = "ls")]
	List {
		/// The page to read. Defaults to your first accessible page.
		#[arg(short, long)]
		page: Option<String>,
	},
	/// Post a comment on a page.
	#[command(alias = "create")]
	Post {
		/// The page to post on. Defaults to your first accessible page.
		#[arg(short, long)]
		page: Option<String>,
		/// The content of the comment.
		content: String,
	},
	/// Change the content of a comment.
	Edit {
		/// The page the comment is on. Defaults to your first accessible page.
		#[arg(short, long)]
		page: Option<String>,
		/// The comment to change.
		comment_id: CommentId,
		/// The new content.
		content: String,
	},
	/// Delete a comment.
	#[command(alias = "rm")]
	Delete {
		/// The page the comment is on. Defaults to your first accessible page.
		#[arg(short, long)]
		page: Option<String>,
		/// The comment to delete.
		comment_id: CommentId,
	},
	/// Show every change made to a comment. Superadmins only.
	History {
		/// The comment to inspect.
		comment_id: CommentId,
	},
}

impl CommandExecutor for CommentCommands {
	async fn execute(
		self,
		_: &GlobalArgs,
		context: &AppContext,
	) -> Result<CommandOutput, ApiErrorResponse> {
		require_login(context)?;
		if let Self::History { comment_id } = self {
			return history(comment_id, context).await;
		}

		let page = match &self {
			Self::List { page } |
			Self::Post { page, .. } |
			Self::Edit { page, .. } |
			Self::Delete { page, .. } => page.clone(),
			Self::History { .. } => None,
		};
		let (dashboard, page) =
			Dashboard::open(context.session.clone(), PageCatalog::default(), page.as_deref())
				.await?;
		let board = dashboard.board();
		board.load().await?;

		match self {
			Self::List { .. } => CommandOutput::new(comment_table(&board.comments()), board.comments())
				.into_result(),
			Self::Post { content, .. } => {
				let comment = board.create(&content).await?;
				CommandOutput::new(
					format!("{} on {}.", notice_text(&board.take_notices()), page.name),
					&comment,
				)
				.into_result()
			}
			Self::Edit {
				comment_id,
				content,
				..
			} => {
				let comment = board.edit(comment_id, &content).await?;
				CommandOutput::new(notice_text(&board.take_notices()), &comment).into_result()
			}
			Self::Delete { comment_id, .. } => {
				board.delete(comment_id).await?;
				CommandOutput::new(
					notice_text(&board.take_notices()),
					serde_json::json!({ "deleted": comment_id }),
				)
				.into_result()
			}
			Self::History { .. } => unreachable!("history is handled before a page is loaded"),
		}
	}
}

/// Shows the revisions of a comment
async fn history(
	comment_id: CommentId,
	context: &AppContext,
) -> Result<CommandOutput, ApiErrorResponse> {
	let console = AdminConsole::new(context.session.clone(), PageCatalog::default());
	let revisions = console.comment_history(comment_id).await?;

	if revisions.is_empty() {
		return CommandOutput::new("This comment was never edited.", &revisions).into_result();
	}

	let mut table = Table::new();
	table.set_header(["When", "By", "Before", "After"]);
	for revision in &revisions {
		table.add_row([
			format_time(revision.modified_at).as_str(),
			revision.modified_by_display(),
			revision.old_content.as_str(),
			revision.new_content.as_str(),
		]);
	}

	CommandOutput::new(table.to_string(), &revisions).into_result()
}

/// A table of comments
fn comment_table(comments: &[Comment]) -> String {
	if comments.is_empty() {
		return "No comments yet.".to_string();
	}

	let mut table = Table::new();
	table.set_header(["ID", "Author", "Comment", "Posted", "Edited"]);
	for comment in comments {
		table.add_row([
			comment.id.to_string().as_str(),
			comment.author(),
			comment.content.as_str(),
			format_time(comment.created_at).as_str(),
			if comment.is_edited() { "edited" } else { "" },
		]);
	}
	table.to_string()
}
