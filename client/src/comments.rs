use std::{collections::HashSet, sync::Arc};

use models::api::comments::*;
use parking_lot::Mutex;

use crate::prelude::*;

/// Identifies a comment load. A load whose generation is older than the
/// board's was made for a page that is no longer open, and its result is
/// dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
	/// The page being loaded
	pub page: String,
	/// The generation of the board when the load started
	pub generation: u64,
}

/// A mutation that has been applied to the board optimistically and is
/// waiting for the backend. Settling it either keeps the change or rolls it
/// back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMutation {
	/// The generation of the board when the mutation started
	pub generation: u64,
	/// What is being changed
	pub kind: MutationKind,
}

/// The change made by a [`PendingMutation`], with what is needed to undo it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
	/// A new comment is being posted. Nothing is shown until the backend
	/// accepts it.
	Create {
		/// The page the comment is posted on
		page: String,
		/// The content being posted
		content: String,
	},
	/// The content of a comment is being changed
	Edit {
		/// The comment as it was before the change
		snapshot: Comment,
		/// The content being stored
		content: String,
	},
	/// A comment is being removed
	Delete {
		/// The comment that was removed
		snapshot: Comment,
		/// The comment that came right after it, if any
		next: Option<CommentId>,
	},
}

impl MutationKind {
	/// The comment being changed, if it already exists
	pub fn comment_id(&self) -> Option<CommentId> {
		match self {
			Self::Create { .. } => None,
			Self::Edit { snapshot, .. } | Self::Delete { snapshot, .. } => Some(snapshot.id),
		}
	}
}

/// The state of a board, behind its lock
#[derive(Debug, Default)]
struct BoardState {
	/// The page currently open
	page: Option<String>,
	/// Bumped every time another page is opened
	generation: u64,
	/// The comments of the open page, newest first
	comments: Vec<Comment>,
	/// The comments with a mutation waiting for the backend
	in_flight: HashSet<CommentId>,
	/// The notices waiting to be seen
	notices: Notices,
}

/// The comments of the open page. Mutations are shown straight away and
/// rolled back if the backend refuses them. At most one mutation per comment
/// can be waiting at any time.
pub struct CommentBoard<T> {
	/// The session the requests are made with
	session: Arc<SessionController<T>>,
	/// The state of the board
	state: Mutex<BoardState>,
}

impl<T> CommentBoard<T>
where
	T: Transport,
{
	/// Creates a board with no page open
	pub fn new(session: Arc<SessionController<T>>) -> Self {
		Self {
			session,
			state: Mutex::new(BoardState::default()),
		}
	}

	/// The page currently open
	pub fn page(&self) -> Option<String> {
		self.state.lock().page.clone()
	}

	/// The generation of the board
	pub fn generation(&self) -> u64 {
		self.state.lock().generation
	}

	/// The comments of the open page, newest first
	pub fn comments(&self) -> Vec<Comment> {
		self.state.lock().comments.clone()
	}

	/// Whether a mutation on the comment is waiting for the backend
	pub fn is_in_flight(&self, comment_id: CommentId) -> bool {
		self.state.lock().in_flight.contains(&comment_id)
	}

	/// The notices waiting to be seen, oldest first, with the ids they can be
	/// dismissed by
	pub fn notices(&self) -> Vec<(u64, Notice)> {
		self.state
			.lock()
			.notices
			.entries()
			.map(|(id, notice)| (id, notice.clone()))
			.collect()
	}

	/// Removes and returns every notice
	pub fn take_notices(&self) -> Vec<Notice> {
		self.state.lock().notices.drain()
	}

	/// Dismisses a single notice
	pub fn dismiss_notice(&self, id: u64) -> bool {
		self.state.lock().notices.dismiss(id)
	}

	/// Opens a page. Everything that was in flight for the previous page is
	/// forgotten and its late responses are dropped.
	pub fn open_page(&self, page_id: &str) -> u64 {
		let mut state = self.state.lock();
		state.page = Some(page_id.to_string());
		state.generation += 1;
		state.comments.clear();
		state.in_flight.clear();
		trace!("Opened page `{page_id}` at generation {}", state.generation);
		state.generation
	}

	/// Closes the open page
	pub fn close(&self) {
		let mut state = self.state.lock();
		state.page = None;
		state.generation += 1;
		state.comments.clear();
		state.in_flight.clear();
	}

	/// Loads the comments of the open page. Returns false if another page was
	/// opened while loading, in which case the result was dropped.
	#[instrument(skip(self))]
	pub async fn load(&self) -> Result<bool, ApiErrorResponse> {
		let ticket = self.begin_load()?;
		let result = self
			.session
			.call(
				ApiRequest::<ListCommentsRequest>::builder()
					.path(CommentsPath)
					.query(ListCommentsQuery {
						page: ticket.page.clone(),
					})
					.body(())
					.build(),
			)
			.await;
		self.settle_load(ticket, result)
	}

	/// Starts loading the open page
	pub fn begin_load(&self) -> Result<LoadTicket, ApiErrorResponse> {
		let (page, generation) = {
			let state = self.state.lock();
			let page = state
				.page
				.clone()
				.ok_or_else(|| ApiErrorResponse::validation("No page is open"))?;
			(page, state.generation)
		};
		self.require(&page, Action::View)?;
		Ok(LoadTicket { page, generation })
	}

	/// Applies the result of a load. Returns false if the result was dropped
	/// because another page was opened in the meantime.
	pub fn settle_load(
		&self,
		ticket: LoadTicket,
		result: Result<Vec<Comment>, ApiErrorResponse>,
	) -> Result<bool, ApiErrorResponse> {
		let mut state = self.state.lock();
		if state.generation != ticket.generation {
			debug!(
				"Dropping comments of `{}` from generation {}",
				ticket.page, ticket.generation
			);
			return Ok(false);
		}

		match result {
			Ok(comments) => {
				state.comments = comments;
				Ok(true)
			}
			Err(error) => {
				state.notices.push(Notice::from(&error));
				Err(error)
			}
		}
	}

	/// Posts a comment on the open page. The comment is added to the top of
	/// the list once the backend has stored it.
	#[instrument(skip(self, content))]
	pub async fn create(&self, content: &str) -> Result<Comment, ApiErrorResponse> {
		let pending = self.begin_create(content)?;
		let MutationKind::Create { page, content } = pending.kind.clone() else {
			unreachable!("begin_create always starts a create");
		};
		let result = self
			.session
			.call(
				ApiRequest::<CreateCommentRequest>::builder()
					.path(CommentsPath)
					.query(())
					.body(CreateCommentRequest { page, content })
					.build(),
			)
			.await
			.map(Some);
		self.settle(pending, result).map(expect_comment)?
	}

	/// Changes the content of a comment. The new content is shown straight
	/// away and the old one comes back if the backend refuses the change.
	#[instrument(skip(self, content))]
	pub async fn edit(
		&self,
		comment_id: CommentId,
		content: &str,
	) -> Result<Comment, ApiErrorResponse> {
		let pending = self.begin_edit(comment_id, content)?;
		let MutationKind::Edit { content, .. } = pending.kind.clone() else {
			unreachable!("begin_edit always starts an edit");
		};
		let result = self
			.session
			.call(
				ApiRequest::<UpdateCommentRequest>::builder()
					.path(CommentPath { comment_id })
					.query(())
					.body(UpdateCommentRequest { content })
					.build(),
			)
			.await
			.map(Some);
		self.settle(pending, result).map(expect_comment)?
	}

	/// Removes a comment. The comment disappears straight away and comes back
	/// in the same place if the backend refuses the removal.
	#[instrument(skip(self))]
	pub async fn delete(&self, comment_id: CommentId) -> Result<(), ApiErrorResponse> {
		let pending = self.begin_delete(comment_id)?;
		let result = self
			.session
			.call(
				ApiRequest::<DeleteCommentRequest>::builder()
					.path(CommentPath { comment_id })
					.query(())
					.body(())
					.build(),
			)
			.await
			.map(|()| None);
		self.settle(pending, result).map(|_| ())
	}

	/// Checks a new comment before it is posted. Nothing is shown until the
	/// backend accepts it.
	pub fn begin_create(&self, content: &str) -> Result<PendingMutation, ApiErrorResponse> {
		let content = check_content(content)?;
		let (page, generation) = {
			let state = self.state.lock();
			let page = state
				.page
				.clone()
				.ok_or_else(|| ApiErrorResponse::validation("No page is open"))?;
			(page, state.generation)
		};
		self.require(&page, Action::Create)?;

		Ok(PendingMutation {
			generation,
			kind: MutationKind::Create { page, content },
		})
	}

	/// Shows the new content of a comment before the backend has stored it
	pub fn begin_edit(
		&self,
		comment_id: CommentId,
		content: &str,
	) -> Result<PendingMutation, ApiErrorResponse> {
		let content = check_content(content)?;
		self.require_on_open_page(Action::Edit)?;
		let now = self.session.now();

		let mut state = self.state.lock();
		if state.in_flight.contains(&comment_id) {
			return Err(ApiErrorResponse::error(ErrorType::OperationInProgress));
		}
		let generation = state.generation;
		let comment = state
			.comments
			.iter_mut()
			.find(|comment| comment.id == comment_id)
			.ok_or_else(|| ApiErrorResponse::error(ErrorType::ResourceDoesNotExist))?;

		let snapshot = comment.clone();
		comment.content = content.clone();
		comment.updated_at = now;
		state.in_flight.insert(comment_id);

		Ok(PendingMutation {
			generation,
			kind: MutationKind::Edit { snapshot, content },
		})
	}

	/// Removes a comment from the list before the backend has removed it
	pub fn begin_delete(&self, comment_id: CommentId) -> Result<PendingMutation, ApiErrorResponse> {
		self.require_on_open_page(Action::Delete)?;

		let mut state = self.state.lock();
		if state.in_flight.contains(&comment_id) {
			return Err(ApiErrorResponse::error(ErrorType::OperationInProgress));
		}
		let index = state
			.comments
			.iter()
			.position(|comment| comment.id == comment_id)
			.ok_or_else(|| ApiErrorResponse::error(ErrorType::ResourceDoesNotExist))?;

		let snapshot = state.comments.remove(index);
		let next = state.comments.get(index).map(|comment| comment.id);
		state.in_flight.insert(comment_id);

		Ok(PendingMutation {
			generation: state.generation,
			kind: MutationKind::Delete { snapshot, next },
		})
	}

	/// Finishes a mutation with the backend's answer. On success the
	/// backend's copy of the comment replaces the optimistic one; on failure
	/// the board goes back to how it was before the mutation started. Either
	/// way a notice is left for the user. Nothing on the board changes if
	/// another page was opened in the meantime.
	pub fn settle(
		&self,
		pending: PendingMutation,
		result: Result<Option<Comment>, ApiErrorResponse>,
	) -> Result<Option<Comment>, ApiErrorResponse> {
		let mut state = self.state.lock();
		let current = state.generation == pending.generation;
		if let Some(comment_id) = pending.kind.comment_id() {
			if current {
				state.in_flight.remove(&comment_id);
			}
		}

		match &result {
			Ok(comment) => {
				let message = match &pending.kind {
					MutationKind::Create { .. } => "Comment posted",
					MutationKind::Edit { .. } => "Comment updated",
					MutationKind::Delete { .. } => "Comment deleted",
				};
				state.notices.push(Notice::success(message));
				if current {
					apply(&mut state.comments, pending.kind, comment.clone());
				}
			}
			Err(error) => {
				debug!("Rolling back {:?}: {error}", pending.kind.comment_id());
				state.notices.push(Notice::from(error));
				if current {
					roll_back(&mut state.comments, pending.kind);
				}
			}
		}

		result
	}

	/// Fails unless the logged in user may perform `action` on `page_id`
	fn require(&self, page_id: &str, action: Action) -> Result<(), ApiErrorResponse> {
		let user = self
			.session
			.user()
			.ok_or_else(|| ApiErrorResponse::error(ErrorType::NotLoggedIn))?;
		if user.access_policy().allows(page_id, action) {
			Ok(())
		} else {
			Err(ApiErrorResponse::error_with_message(
				ErrorType::PermissionDenied,
				format!("You do not have permission to {action} comments on this page"),
			))
		}
	}

	/// Fails unless the logged in user may perform `action` on the open page
	fn require_on_open_page(&self, action: Action) -> Result<(), ApiErrorResponse> {
		let page = self
			.page()
			.ok_or_else(|| ApiErrorResponse::validation("No page is open"))?;
		self.require(&page, action)
	}
}

/// Keeps a successful mutation on the list
fn apply(comments: &mut Vec<Comment>, kind: MutationKind, stored: Option<Comment>) {
	match (kind, stored) {
		(MutationKind::Create { .. }, Some(stored)) => comments.insert(0, stored),
		(MutationKind::Edit { snapshot, .. }, Some(stored)) => {
			if let Some(comment) = comments.iter_mut().find(|comment| comment.id == snapshot.id) {
				*comment = stored;
			}
		}
		_ => (),
	}
}

/// Undoes a failed mutation on the list
fn roll_back(comments: &mut Vec<Comment>, kind: MutationKind) {
	match kind {
		MutationKind::Create { .. } => (),
		MutationKind::Edit { snapshot, .. } => {
			if let Some(comment) = comments.iter_mut().find(|comment| comment.id == snapshot.id) {
				*comment = snapshot;
			}
		}
		MutationKind::Delete { snapshot, next } => {
			let index = next
				.and_then(|next| comments.iter().position(|comment| comment.id == next))
				.unwrap_or_else(|| newest_first_position(comments, &snapshot));
			comments.insert(index, snapshot);
		}
	}
}

/// Where a comment goes in a list ordered newest first. Used when the comment
/// that followed it is gone as well.
fn newest_first_position(comments: &[Comment], comment: &Comment) -> usize {
	comments
		.iter()
		.position(|other| (other.created_at, other.id) < (comment.created_at, comment.id))
		.unwrap_or(comments.len())
}

/// Rejects empty content before anything is sent
fn check_content(content: &str) -> Result<String, ApiErrorResponse> {
	let content = content.trim();
	if content.is_empty() {
		return Err(ApiErrorResponse::validation("Comment cannot be empty"));
	}
	Ok(content.to_string())
}

/// Unwraps the comment returned for a create or an edit
fn expect_comment(comment: Option<Comment>) -> Result<Comment, ApiErrorResponse> {
	comment.ok_or_else(|| ApiErrorResponse::internal_error("the backend returned no comment"))
}
