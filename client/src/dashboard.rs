use std::sync::Arc;

use parking_lot::Mutex;

use crate::prelude::*;

/// What the logged in user can see and the page they are on
#[derive(Debug)]
struct DashboardState {
	/// The access of the user, resolved from their role and permissions
	policy: AccessPolicy,
	/// The accessible pages and the open one
	navigation: Navigation,
}

/// The navigation of a logged in user. Resolves their access once, keeps
/// track of the open page, and points the comment board at it.
pub struct Dashboard<T> {
	/// The session of the user
	session: Arc<SessionController<T>>,
	/// Every page of the application
	catalog: PageCatalog,
	/// The resolved access and navigation
	state: Mutex<DashboardState>,
	/// The comments of the open page
	board: CommentBoard<T>,
}

impl<T> Dashboard<T>
where
	T: Transport,
{
	/// Builds the dashboard of the logged in user and opens their first
	/// accessible page, if they have one
	pub fn new(
		session: Arc<SessionController<T>>,
		catalog: PageCatalog,
	) -> Result<Self, ApiErrorResponse> {
		let user = session
			.user()
			.ok_or_else(|| ApiErrorResponse::error(ErrorType::NotLoggedIn))?;
		let policy = user.access_policy();
		let navigation = policy.navigation(catalog);

		let board = CommentBoard::new(session.clone());
		if let Some(page) = navigation.active {
			board.open_page(page.id);
		}

		Ok(Self {
			session,
			catalog,
			state: Mutex::new(DashboardState { policy, navigation }),
			board,
		})
	}

	/// Builds the dashboard with access fetched from the backend, so grants and
	/// revocations made since login are seen, and opens `page_id`. Without a
	/// page id the first accessible page is opened.
	#[instrument(skip(session, catalog))]
	pub async fn open(
		session: Arc<SessionController<T>>,
		catalog: PageCatalog,
		page_id: Option<&str>,
	) -> Result<(Self, Page), ApiErrorResponse> {
		let dashboard = Self::new(session, catalog)?;
		let navigation = dashboard.refresh_access().await?;
		let page = match page_id {
			Some(page_id) => dashboard.select(page_id)?,
			None => navigation.active.ok_or_else(|| {
				ApiErrorResponse::error_with_message(
					ErrorType::PermissionDenied,
					"You do not have access to any page yet",
				)
			})?,
		};
		Ok((dashboard, page))
	}

	/// The access of the user
	pub fn policy(&self) -> AccessPolicy {
		self.state.lock().policy.clone()
	}

	/// The accessible pages and the open one
	pub fn navigation(&self) -> Navigation {
		self.state.lock().navigation.clone()
	}

	/// The open page. None means the user has no accessible page at all.
	pub fn active_page(&self) -> Option<Page> {
		self.state.lock().navigation.active
	}

	/// The permissions of the user on the open page
	pub fn permissions(&self) -> PermissionSet {
		let state = self.state.lock();
		state
			.navigation
			.active
			.map(|page| state.policy.permissions_for(page.id))
			.unwrap_or(PermissionSet::NONE)
	}

	/// The comments of the open page
	pub fn board(&self) -> &CommentBoard<T> {
		&self.board
	}

	/// Opens another page. Pages the user cannot view are refused and the
	/// open page stays open.
	#[instrument(skip(self))]
	pub fn select(&self, page_id: &str) -> Result<Page, ApiErrorResponse> {
		let (page, changed) = {
			let mut state = self.state.lock();
			let previous = state.navigation.active;
			let page = state.navigation.select(page_id).ok_or_else(|| {
				ApiErrorResponse::error_with_message(
					ErrorType::PermissionDenied,
					"You do not have access to this page",
				)
			})?;
			(page, previous != Some(page))
		};

		if changed {
			self.board.open_page(page.id);
		}
		Ok(page)
	}

	/// Gets the permissions of the user from the backend again and resolves
	/// their access. The open page stays open if it is still accessible.
	#[instrument(skip(self))]
	pub async fn refresh_access(&self) -> Result<Navigation, ApiErrorResponse> {
		let policy = self.session.reload_access().await?;

		let (navigation, reopen) = {
			let mut state = self.state.lock();
			let previous = state.navigation.active;
			let mut navigation = policy.navigation(self.catalog);
			if let Some(previous) = previous {
				navigation.select(previous.id);
			}
			let reopen = navigation.active != previous;
			state.policy = policy;
			state.navigation = navigation.clone();
			(navigation, reopen)
		};

		if reopen {
			match navigation.active {
				Some(page) => {
					self.board.open_page(page.id);
				}
				None => self.board.close(),
			}
		}
		Ok(navigation)
	}
}

#[cfg(test)]
mod test {
	use serde_json::json;

	use super::*;
	use crate::session::test::{harness, logged_in, user};

	fn viewer(pages: &[&str]) -> User {
		let mut user = user(Role::User);
		for page in pages {
			user.permissions
				.insert(*page, PermissionSet::NONE.with(Action::View));
		}
		user
	}

	#[tokio::test]
	async fn opens_the_first_accessible_page() {
		let harness = logged_in(viewer(&["sales", "orders"])).await;
		let dashboard = Dashboard::new(harness.controller.clone(), PageCatalog::default()).unwrap();

		assert_eq!(dashboard.active_page().map(|page| page.id), Some("orders"));
		assert_eq!(dashboard.board().page().as_deref(), Some("orders"));
		assert_eq!(
			dashboard.permissions(),
			PermissionSet::NONE.with(Action::View)
		);
	}

	#[tokio::test]
	async fn no_access_is_a_state_not_an_error() {
		let harness = logged_in(viewer(&[])).await;
		let dashboard = Dashboard::new(harness.controller.clone(), PageCatalog::default()).unwrap();

		assert!(dashboard.navigation().is_no_access());
		assert_eq!(dashboard.active_page(), None);
		assert_eq!(dashboard.board().page(), None);
		assert_eq!(dashboard.permissions(), PermissionSet::NONE);
	}

	#[tokio::test]
	async fn selecting_bumps_the_board_generation() {
		let harness = logged_in(viewer(&["orders", "sales"])).await;
		let dashboard = Dashboard::new(harness.controller.clone(), PageCatalog::default()).unwrap();
		let generation = dashboard.board().generation();

		dashboard.select("orders").unwrap();
		assert_eq!(dashboard.board().generation(), generation);

		dashboard.select("sales").unwrap();
		assert_eq!(dashboard.board().generation(), generation + 1);

		let error = dashboard.select("finance").unwrap_err();
		assert_eq!(*error.error_type(), ErrorType::PermissionDenied);
		assert_eq!(dashboard.active_page().map(|page| page.id), Some("sales"));
	}

	#[tokio::test]
	async fn superadmin_gets_every_page() {
		let harness = logged_in(user(Role::Superadmin)).await;
		let dashboard = Dashboard::new(harness.controller.clone(), PageCatalog::default()).unwrap();

		assert!(dashboard.policy().is_unrestricted());
		assert_eq!(dashboard.navigation().pages, PAGES);
		assert_eq!(dashboard.permissions(), PermissionSet::ALL);

		let navigation = dashboard.refresh_access().await.unwrap();
		assert_eq!(navigation.pages.len(), PAGES.len());
		assert_eq!(harness.transport.call_count(), 1);
	}

	#[tokio::test]
	async fn refreshing_access_keeps_the_open_page_when_possible() {
		let harness = logged_in(viewer(&["orders", "sales"])).await;
		let dashboard = Dashboard::new(harness.controller.clone(), PageCatalog::default()).unwrap();
		dashboard.select("sales").unwrap();

		harness
			.transport
			.respond(json!({ "sales": { "view": true }, "finance": { "view": true } }));
		let navigation = dashboard.refresh_access().await.unwrap();
		assert_eq!(navigation.active.map(|page| page.id), Some("sales"));

		harness.transport.respond(json!({ "finance": { "view": true } }));
		let navigation = dashboard.refresh_access().await.unwrap();
		assert_eq!(navigation.active.map(|page| page.id), Some("finance"));
		assert_eq!(dashboard.board().page().as_deref(), Some("finance"));
	}

	#[tokio::test]
	async fn opening_sees_grants_made_after_login() {
		let harness = logged_in(viewer(&[])).await;
		harness
			.transport
			.respond(json!({ "sales": { "view": true, "create": true } }));

		let (dashboard, page) =
			Dashboard::open(harness.controller.clone(), PageCatalog::default(), Some("sales"))
				.await
				.unwrap();

		assert_eq!(page.id, "sales");
		assert_eq!(dashboard.board().page().as_deref(), Some("sales"));
		assert!(dashboard.board().begin_load().is_ok());
		assert!(dashboard.board().begin_create("hello").is_ok());
	}

	#[tokio::test]
	async fn opening_sees_revocations_made_after_login() {
		let harness = logged_in(viewer(&["orders", "sales"])).await;
		harness.transport.respond(json!({ "orders": { "view": true } }));

		let error =
			Dashboard::open(harness.controller.clone(), PageCatalog::default(), Some("sales"))
				.await
				.err()
				.unwrap();
		assert_eq!(*error.error_type(), ErrorType::PermissionDenied);

		harness.transport.respond(json!({}));
		let error = Dashboard::open(harness.controller.clone(), PageCatalog::default(), None)
			.await
			.err()
			.unwrap();
		assert_eq!(*error.error_type(), ErrorType::PermissionDenied);
	}

	#[test]
	fn needs_a_session() {
		let harness = harness();
		assert!(Dashboard::new(harness.controller.clone(), PageCatalog::default()).is_err());
	}
}
