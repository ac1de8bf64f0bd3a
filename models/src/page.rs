use serde::{Deserialize, Serialize};

/// A named section of the application that is gated by its own permission
/// set. Pages are fixed at build time; the catalog order is the navigation
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Page {
	/// The stable identifier the backend uses for the page
	pub id: &'static str,
	/// The name shown to the user
	pub name: &'static str,
}

/// Every page of the application, in navigation order.
pub const PAGES: &[Page] = &[
	Page {
		id: "products",
		name: "Products List",
	},
	Page {
		id: "marketing",
		name: "Marketing List",
	},
	Page {
		id: "orders",
		name: "Order List",
	},
	Page {
		id: "media",
		name: "Media Plans",
	},
	Page {
		id: "offers",
		name: "Offer Pricing SKUs",
	},
	Page {
		id: "clients",
		name: "Clients",
	},
	Page {
		id: "suppliers",
		name: "Suppliers",
	},
	Page {
		id: "support",
		name: "Customer Support",
	},
	Page {
		id: "sales",
		name: "Sales Reports",
	},
	Page {
		id: "finance",
		name: "Finance & Accounting",
	},
];

/// An ordered list of pages. The order defines navigation order and is a
/// product decision, not an alphabetical one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCatalog(&'static [Page]);

impl PageCatalog {
	/// Wraps a static list of pages
	pub const fn new(pages: &'static [Page]) -> Self {
		Self(pages)
	}

	/// All pages of the catalog, in order
	pub const fn pages(&self) -> &'static [Page] {
		self.0
	}

	/// Looks up a page by its id
	pub fn find(&self, page_id: &str) -> Option<Page> {
		self.0.iter().copied().find(|page| page.id == page_id)
	}

	/// Whether the catalog has a page with the given id
	pub fn contains(&self, page_id: &str) -> bool {
		self.find(page_id).is_some()
	}

	/// The number of pages in the catalog
	pub const fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether the catalog has no pages at all
	pub const fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl Default for PageCatalog {
	fn default() -> Self {
		Self(PAGES)
	}
}

impl IntoIterator for PageCatalog {
	type Item = &'static Page;
	type IntoIter = std::slice::Iter<'static, Page>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

#[cfg(test)]
mod test {
	use super::{PageCatalog, PAGES};

	#[test]
	fn catalog_ids_are_unique() {
		for (index, page) in PAGES.iter().enumerate() {
			assert!(
				PAGES[index + 1..].iter().all(|other| other.id != page.id),
				"duplicate page id `{}`",
				page.id
			);
		}
	}

	#[test]
	fn lookup() {
		let catalog = PageCatalog::default();
		assert_eq!(catalog.len(), 10);
		assert_eq!(catalog.find("media").map(|page| page.name), Some("Media Plans"));
		assert_eq!(catalog.pages()[0].id, "products");
		assert!(!catalog.contains("payroll"));
	}
}
