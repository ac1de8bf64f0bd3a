use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, VariantNames};

use crate::{page::PageCatalog, ApiErrorResponse};

/// A list of all actions that can be granted on a page.
#[derive(
	Debug,
	Clone,
	Copy,
	Serialize,
	Deserialize,
	PartialEq,
	Eq,
	Hash,
	PartialOrd,
	Ord,
	Display,
	EnumIter,
	EnumString,
	VariantNames,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Action {
	/// See the page and its comments
	View,
	/// Post comments on the page
	Create,
	/// Change the content of comments on the page
	Edit,
	/// Remove comments from the page
	Delete,
}

/// The four-action access grant for one user on one page.
///
/// All four flags are independent. In particular, `edit` does not imply
/// `view`; whoever reads a set must check the exact action it needs.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(default)]
pub struct PermissionSet {
	/// Whether the page is visible
	pub view: bool,
	/// Whether comments can be posted
	pub create: bool,
	/// Whether comments can be edited
	pub edit: bool,
	/// Whether comments can be deleted
	pub delete: bool,
}

impl PermissionSet {
	/// A set with nothing granted. Pages missing from a matrix resolve to this.
	pub const NONE: Self = Self {
		view: false,
		create: false,
		edit: false,
		delete: false,
	};

	/// A set with every action granted.
	pub const ALL: Self = Self {
		view: true,
		create: true,
		edit: true,
		delete: true,
	};

	/// Whether the given action is granted
	pub const fn allows(&self, action: Action) -> bool {
		match action {
			Action::View => self.view,
			Action::Create => self.create,
			Action::Edit => self.edit,
			Action::Delete => self.delete,
		}
	}

	/// Grants or revokes a single action
	pub fn set(&mut self, action: Action, granted: bool) {
		match action {
			Action::View => self.view = granted,
			Action::Create => self.create = granted,
			Action::Edit => self.edit = granted,
			Action::Delete => self.delete = granted,
		}
	}

	/// Flips a single action, as a checkbox in the permission editor does
	pub fn toggle(&mut self, action: Action) {
		self.set(action, !self.allows(action));
	}

	/// Returns a copy with the given action granted
	pub fn with(mut self, action: Action) -> Self {
		self.set(action, true);
		self
	}

	/// The number of granted actions, between 0 and 4
	pub fn count_active(&self) -> usize {
		Action::iter().filter(|action| self.allows(*action)).count()
	}

	/// The granted actions, in [`Action`] order
	pub fn granted(&self) -> Vec<Action> {
		Action::iter().filter(|action| self.allows(*action)).collect()
	}

	/// Whether nothing is granted
	pub fn is_empty(&self) -> bool {
		self.count_active() == 0
	}
}

/// A mapping from page id to the permission set granted on that page. Pages
/// that are not in the mapping are treated as having nothing granted.
///
/// The JSON form is a plain object keyed by page id, for example
/// `{"products": {"view": true, "create": false, "edit": false, "delete": false}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct PermissionMatrix(BTreeMap<String, PermissionSet>);

impl PermissionMatrix {
	/// An empty matrix, granting nothing
	pub fn new() -> Self {
		Self::default()
	}

	/// A matrix granting every action on every page of the catalog. This is
	/// what the backend reports for superadmins.
	pub fn full(catalog: PageCatalog) -> Self {
		catalog
			.into_iter()
			.map(|page| (page.id.to_string(), PermissionSet::ALL))
			.collect()
	}

	/// Returns the permission set for a page. This never fails: pages that are
	/// unknown or absent resolve to [`PermissionSet::NONE`].
	pub fn resolve(&self, page_id: &str) -> PermissionSet {
		self.0.get(page_id).copied().unwrap_or(PermissionSet::NONE)
	}

	/// Replaces the permission set of a page
	pub fn insert(&mut self, page_id: impl Into<String>, permissions: PermissionSet) {
		self.0.insert(page_id.into(), permissions);
	}

	/// Grants or revokes a single action on a page, creating the entry if
	/// needed
	pub fn set(&mut self, page_id: &str, action: Action, granted: bool) {
		self.0
			.entry(page_id.to_string())
			.or_default()
			.set(action, granted);
	}

	/// Flips a single action on a page, creating the entry if needed
	pub fn toggle(&mut self, page_id: &str, action: Action) {
		self.0.entry(page_id.to_string()).or_default().toggle(action);
	}

	/// The number of granted actions summed across all pages
	pub fn count_active(&self) -> usize {
		self.0.values().map(PermissionSet::count_active).sum()
	}

	/// Iterates over all pages that have an entry, ordered by page id
	pub fn iter(&self) -> impl Iterator<Item = (&str, &PermissionSet)> {
		self.0
			.iter()
			.map(|(page_id, permissions)| (page_id.as_str(), permissions))
	}

	/// The number of pages with an entry
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether no page has an entry
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns a matrix with exactly one entry per catalog page, absent pages
	/// filled in with [`PermissionSet::NONE`]. Entries for pages outside the
	/// catalog are dropped.
	pub fn normalized(&self, catalog: PageCatalog) -> Self {
		catalog
			.into_iter()
			.map(|page| (page.id.to_string(), self.resolve(page.id)))
			.collect()
	}

	/// Checks that every entry refers to a page of the catalog. The backend
	/// refuses updates that mention unknown pages, so this catches them before
	/// a request is made.
	pub fn validate(&self, catalog: PageCatalog) -> Result<(), ApiErrorResponse> {
		match self.0.keys().find(|page_id| !catalog.contains(page_id)) {
			Some(page_id) => Err(ApiErrorResponse::validation(format!(
				"Invalid page: {page_id}"
			))),
			None => Ok(()),
		}
	}
}

impl FromIterator<(String, PermissionSet)> for PermissionMatrix {
	fn from_iter<T: IntoIterator<Item = (String, PermissionSet)>>(iter: T) -> Self {
		Self(iter.into_iter().collect())
	}
}

#[cfg(test)]
mod test {
	use std::str::FromStr;

	use serde_test::{assert_de_tokens, assert_tokens, Token};

	use super::*;
	use crate::{page::PAGES, ErrorType};

	fn products_view_only() -> PermissionMatrix {
		let mut matrix = PermissionMatrix::new();
		matrix.insert("products", PermissionSet::NONE.with(Action::View));
		matrix
	}

	#[test]
	fn resolve_is_total() {
		let matrix = products_view_only();
		assert!(matrix.resolve("products").view);
		assert_eq!(matrix.resolve("finance"), PermissionSet::NONE);
		assert_eq!(matrix.resolve("not-a-page"), PermissionSet::NONE);
		assert_eq!(matrix.resolve(""), PermissionSet::NONE);
		assert_eq!(PermissionMatrix::new().resolve("products"), PermissionSet::NONE);
	}

	#[test]
	fn actions_are_independent() {
		let set = PermissionSet::NONE.with(Action::Edit);
		assert!(set.allows(Action::Edit));
		assert!(!set.allows(Action::View));
		assert_eq!(set.granted(), vec![Action::Edit]);
	}

	#[test]
	fn counting() {
		assert_eq!(PermissionSet::NONE.count_active(), 0);
		assert_eq!(PermissionSet::ALL.count_active(), 4);
		assert_eq!(
			PermissionSet::NONE
				.with(Action::View)
				.with(Action::Delete)
				.count_active(),
			2
		);

		let mut matrix = products_view_only();
		matrix.insert("orders", PermissionSet::ALL);
		assert_eq!(matrix.count_active(), 5);
		assert_eq!(PermissionMatrix::full(PageCatalog::default()).count_active(), 40);
	}

	#[test]
	fn toggling() {
		let mut matrix = PermissionMatrix::new();
		matrix.toggle("media", Action::Create);
		assert!(matrix.resolve("media").create);
		matrix.toggle("media", Action::Create);
		assert!(matrix.resolve("media").is_empty());
		assert_eq!(matrix.len(), 1);

		matrix.set("clients", Action::Delete, true);
		assert_eq!(matrix.resolve("clients").granted(), vec![Action::Delete]);
	}

	#[test]
	fn normalization_covers_the_catalog() {
		let mut matrix = products_view_only();
		matrix.insert("payroll", PermissionSet::ALL);
		let normalized = matrix.normalized(PageCatalog::default());

		assert_eq!(normalized.len(), PAGES.len());
		assert!(normalized.resolve("products").view);
		assert_eq!(normalized.resolve("payroll"), PermissionSet::NONE);
		assert_eq!(normalized.count_active(), 1);
	}

	#[test]
	fn validation_rejects_unknown_pages() {
		assert!(products_view_only().validate(PageCatalog::default()).is_ok());

		let mut matrix = products_view_only();
		matrix.insert("payroll", PermissionSet::ALL);
		let error = matrix.validate(PageCatalog::default()).unwrap_err();
		assert_eq!(error.error_type(), &ErrorType::ValidationFailed);
		assert_eq!(error.message(), "Invalid page: payroll");
	}

	#[test]
	fn action_names() {
		assert_eq!(Action::from_str("delete").unwrap(), Action::Delete);
		assert_eq!(Action::Create.to_string(), "create");
		assert_eq!(Action::VARIANTS, &["view", "create", "edit", "delete"]);
	}

	#[test]
	fn assert_matrix_tokens() {
		assert_tokens(
			&products_view_only(),
			&[
				Token::Map { len: Some(1) },
				Token::Str("products"),
				Token::Struct {
					name: "PermissionSet",
					len: 4,
				},
				Token::Str("view"),
				Token::Bool(true),
				Token::Str("create"),
				Token::Bool(false),
				Token::Str("edit"),
				Token::Bool(false),
				Token::Str("delete"),
				Token::Bool(false),
				Token::StructEnd,
				Token::MapEnd,
			],
		);
	}

	#[test]
	fn missing_flags_default_to_false() {
		assert_de_tokens(
			&PermissionSet::NONE.with(Action::Edit),
			&[
				Token::Struct {
					name: "PermissionSet",
					len: 1,
				},
				Token::Str("edit"),
				Token::Bool(true),
				Token::StructEnd,
			],
		);
	}
}
