use serde::{Deserialize, Serialize};

use crate::{
	page::{Page, PageCatalog},
	permission::{Action, PermissionMatrix, PermissionSet},
};

/// Represents the kind of access a user has to the pages of the application.
///
/// The superadmin bypass is modelled here and nowhere else: code that needs to
/// know what a user may do asks the policy, never the role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "permissions")]
pub enum AccessPolicy {
	/// Full access to every page, regardless of any matrix.
	Unrestricted,
	/// Access limited to what the matrix grants.
	Restricted(PermissionMatrix),
}

impl AccessPolicy {
	/// Returns true if the policy grants everything.
	pub fn is_unrestricted(&self) -> bool {
		matches!(self, Self::Unrestricted)
	}

	/// The permission set on a page. Total: unknown pages resolve to nothing
	/// granted under a restricted policy.
	pub fn permissions_for(&self, page_id: &str) -> PermissionSet {
		match self {
			Self::Unrestricted => PermissionSet::ALL,
			Self::Restricted(matrix) => matrix.resolve(page_id),
		}
	}

	/// Whether the action is granted on the page
	pub fn allows(&self, page_id: &str, action: Action) -> bool {
		self.permissions_for(page_id).allows(action)
	}

	/// The pages the user may navigate to, in catalog order. Unrestricted
	/// policies get the whole catalog without consulting any matrix.
	pub fn accessible_pages(&self, catalog: PageCatalog) -> Vec<Page> {
		match self {
			Self::Unrestricted => catalog.pages().to_vec(),
			Self::Restricted(matrix) => accessible_pages(catalog, matrix),
		}
	}

	/// The navigation state for this policy
	pub fn navigation(&self, catalog: PageCatalog) -> Navigation {
		Navigation::new(self.accessible_pages(catalog))
	}
}

/// Filters the catalog down to the pages whose `view` flag is granted. The
/// result is always a subsequence of the catalog: order is preserved and
/// nothing is added.
pub fn accessible_pages(catalog: PageCatalog, matrix: &PermissionMatrix) -> Vec<Page> {
	catalog
		.into_iter()
		.filter(|page| matrix.resolve(page.id).view)
		.copied()
		.collect()
}

/// The page to open first: the first accessible page, or none when nothing is
/// accessible. None is the "no access" state, not an error.
pub fn default_active_page(pages: &[Page]) -> Option<Page> {
	pages.first().copied()
}

/// The pages a user can navigate to and the one currently open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
	/// The accessible pages, in catalog order
	pub pages: Vec<Page>,
	/// The page currently open
	pub active: Option<Page>,
}

impl Navigation {
	/// Builds the navigation for a list of accessible pages, opening the
	/// default page
	pub fn new(pages: Vec<Page>) -> Self {
		let active = default_active_page(&pages);
		Self { pages, active }
	}

	/// Whether the user has no accessible page at all
	pub fn is_no_access(&self) -> bool {
		self.pages.is_empty()
	}

	/// Opens another page. Pages that are not accessible are refused and the
	/// current page stays open.
	pub fn select(&mut self, page_id: &str) -> Option<Page> {
		let page = self.pages.iter().copied().find(|page| page.id == page_id)?;
		self.active = Some(page);
		Some(page)
	}
}

#[cfg(test)]
mod test {
	use uuid::Uuid;

	use super::*;
	use crate::{
		page::PAGES,
		user::{Role, User},
	};

	/// Builds a matrix granting `view` on every page whose index bit is set
	fn matrix_from_bits(bits: u16) -> PermissionMatrix {
		let mut matrix = PermissionMatrix::new();
		for (index, page) in PAGES.iter().enumerate() {
			matrix.set(page.id, Action::View, bits & (1 << index) != 0);
			matrix.set(page.id, Action::Edit, bits & (1 << ((index + 3) % 10)) != 0);
		}
		matrix
	}

	fn is_subsequence(candidate: &[Page], catalog: &[Page]) -> bool {
		let mut catalog = catalog.iter();
		candidate
			.iter()
			.all(|page| catalog.any(|other| other == page))
	}

	#[test]
	fn accessible_pages_is_an_ordered_subsequence() {
		let catalog = PageCatalog::default();
		for bits in 0..(1u16 << PAGES.len()) {
			let pages = accessible_pages(catalog, &matrix_from_bits(bits));
			assert!(is_subsequence(&pages, PAGES), "bits {bits:#b}");
			assert_eq!(pages.len(), bits.count_ones() as usize);
		}
	}

	#[test]
	fn view_is_required() {
		let mut matrix = PermissionMatrix::new();
		matrix.insert("orders", PermissionSet::ALL);
		matrix.insert("products", PermissionSet::NONE.with(Action::Edit));
		matrix.insert("unknown", PermissionSet::ALL);

		let pages = accessible_pages(PageCatalog::default(), &matrix);
		assert_eq!(pages.iter().map(|page| page.id).collect::<Vec<_>>(), ["orders"]);
	}

	#[test]
	fn products_only() {
		let mut matrix = PermissionMatrix::new();
		matrix.insert("products", PermissionSet::NONE.with(Action::View));

		let navigation = AccessPolicy::Restricted(matrix).navigation(PageCatalog::default());
		assert_eq!(navigation.pages, vec![PAGES[0]]);
		assert_eq!(navigation.active, Some(PAGES[0]));
		assert_eq!(navigation.active.map(|page| page.name), Some("Products List"));
	}

	#[test]
	fn empty_matrix_means_no_access() {
		let navigation =
			AccessPolicy::Restricted(PermissionMatrix::new()).navigation(PageCatalog::default());
		assert!(navigation.pages.is_empty());
		assert_eq!(navigation.active, None);
		assert!(navigation.is_no_access());
		assert_eq!(default_active_page(&[]), None);
	}

	#[test]
	fn superadmin_sees_everything_whatever_the_matrix() {
		for bits in [0u16, 1, 0b1010101010, 0b1111111111] {
			let admin = User {
				id: Uuid::new_v4(),
				username: "root".to_string(),
				email: "root@x.com".to_string(),
				role: Role::Superadmin,
				permissions: matrix_from_bits(bits),
				created_at: None,
			};
			let policy = admin.access_policy();
			assert_eq!(policy.accessible_pages(PageCatalog::default()), PAGES);
			assert_eq!(policy.permissions_for("finance"), PermissionSet::ALL);
			assert!(policy.allows("anything", Action::Delete));
		}
	}

	#[test]
	fn selecting_pages() {
		let mut matrix = PermissionMatrix::new();
		matrix.insert("orders", PermissionSet::NONE.with(Action::View));
		matrix.insert("sales", PermissionSet::NONE.with(Action::View));
		let mut navigation = AccessPolicy::Restricted(matrix).navigation(PageCatalog::default());

		assert_eq!(navigation.active.map(|page| page.id), Some("orders"));
		assert_eq!(navigation.select("sales").map(|page| page.id), Some("sales"));
		assert_eq!(navigation.select("finance"), None);
		assert_eq!(navigation.active.map(|page| page.id), Some("sales"));
	}
}
